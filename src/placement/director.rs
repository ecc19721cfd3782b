//! Placement director: runs the generators in order and owns the results.

use serde::{Deserialize, Serialize};

use crate::core::IVec2;
use crate::world::WorldCache;
use super::definitions::PlacementDefTable;
use super::landmark::LandmarkGenerator;
use super::settlement::SettlementGenerator;
use super::{PlacementGenerator, PlacementKind, PlacementRecord};

/// Runs placement generators once, in registration order. Each generator
/// sees the records of all generators before it.
pub struct PlacementDirector {
    generators: Vec<Box<dyn PlacementGenerator>>,
}

impl PlacementDirector {
    pub fn new(generators: Vec<Box<dyn PlacementGenerator>>) -> Self {
        Self { generators }
    }

    /// Landmarks first, then settlements (which keep clear of landmarks).
    pub fn with_defaults(table: &PlacementDefTable) -> Self {
        Self::new(vec![
            Box::new(LandmarkGenerator::new(table.landmarks.clone(), table.landmark_rules.clone())),
            Box::new(SettlementGenerator::new(table.settlements.clone(), table.settlement_rules.clone())),
        ])
    }

    pub fn push(&mut self, generator: Box<dyn PlacementGenerator>) {
        self.generators.push(generator);
    }

    pub fn kinds(&self) -> Vec<PlacementKind> {
        self.generators.iter().map(|g| g.kind()).collect()
    }

    pub fn run(&self, seed: u64, cache: &mut WorldCache) -> PlacementSet {
        let mut records: Vec<PlacementRecord> = Vec::new();
        for generator in &self.generators {
            let placed = generator.generate(seed, cache, &records);
            records.extend(placed);
        }
        log::info!("Placement finished: {} records from {} generators", records.len(), self.generators.len());
        PlacementSet { records }
    }
}

/// All placement records of a world. Round-trips through serde with the
/// discovery and visit state intact.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementSet {
    records: Vec<PlacementRecord>,
}

impl PlacementSet {
    pub fn from_records(records: Vec<PlacementRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn of_kind(&self, kind: PlacementKind) -> impl Iterator<Item = &PlacementRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn get(&self, id: &str) -> Option<&PlacementRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PlacementRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn at(&self, position: IVec2) -> Option<&PlacementRecord> {
        self.records.iter().find(|r| r.position == position)
    }

    /// Closest record of a kind; ties go to the earlier record.
    pub fn nearest(&self, kind: PlacementKind, at: IVec2) -> Option<&PlacementRecord> {
        self.of_kind(kind).fold(None, |best: Option<&PlacementRecord>, r| match best {
            Some(b) if b.distance_to(at) <= r.distance_to(at) => Some(b),
            _ => Some(r),
        })
    }

    /// Mark every record within `radius` of `at` as discovered. Returns the
    /// ids that were newly discovered.
    pub fn discover_within(&mut self, at: IVec2, radius: f32) -> Vec<String> {
        self.records
            .iter_mut()
            .filter(|r| r.distance_to(at) <= radius)
            .filter_map(|r| r.mark_discovered().then(|| r.id.clone()))
            .collect()
    }
}
