//! Points of interest: settlements and landmarks scattered across the world.
//!
//! Placement runs once per new world. Each kind is a [`PlacementGenerator`];
//! the [`PlacementDirector`] runs them in order so later kinds can keep
//! their distance from earlier ones (landmarks are placed before settlements).
//!
//! Fewer records than the configured target is a normal outcome: indices
//! with no valid site are skipped with a warning.

pub mod definitions;
pub mod search;
pub mod landmark;
pub mod settlement;
pub mod director;

pub use definitions::{PlacementDef, PlacementDefTable, PlacementRules, SearchArea, Separation};
pub use director::{PlacementDirector, PlacementSet};
pub use landmark::LandmarkGenerator;
pub use settlement::SettlementGenerator;

use serde::{Deserialize, Serialize};

use crate::core::{tile_distance, IVec2};
use crate::world::{BiomeId, WorldCache};

/// Kind of point of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    Settlement,
    Landmark,
}

impl PlacementKind {
    /// Prefix of record ids.
    pub fn prefix(self) -> &'static str {
        match self {
            PlacementKind::Settlement => "settlement",
            PlacementKind::Landmark => "landmark",
        }
    }

    /// Hash salt keeping the kinds' candidate streams apart.
    pub(crate) fn salt(self) -> u64 {
        match self {
            PlacementKind::Settlement => 0x5E77_1E00,
            PlacementKind::Landmark => 0x1A4D_3A00,
        }
    }
}

/// Kind-specific fields of a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlacementDetails {
    Settlement { population: u32 },
    Landmark { rarity: u32, danger_tier: u8 },
}

/// One placed point of interest. Created once by a generator; afterwards
/// only discovery and visit state changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    /// `"<kind>_<index>_<biome>"`
    pub id: String,
    pub kind: PlacementKind,
    /// Id of the [`PlacementDef`] it was built from.
    pub definition: String,
    pub position: IVec2,
    /// Biome of the tile at placement time.
    pub biome: BiomeId,
    pub discovered: bool,
    /// In-game day of the last visit.
    pub visited_day: Option<u32>,
    pub details: PlacementDetails,
}

impl PlacementRecord {
    pub fn distance_to(&self, at: IVec2) -> f32 {
        tile_distance(self.position, at)
    }

    /// Returns true if this call changed the flag.
    pub fn mark_discovered(&mut self) -> bool {
        !std::mem::replace(&mut self.discovered, true)
    }

    /// Visiting implies discovery.
    pub fn record_visit(&mut self, day: u32) {
        self.discovered = true;
        self.visited_day = Some(day);
    }

    pub fn population(&self) -> Option<u32> {
        match self.details {
            PlacementDetails::Settlement { population } => Some(population),
            _ => None,
        }
    }
}

/// A batch placement algorithm for one kind of point of interest.
pub trait PlacementGenerator {
    fn kind(&self) -> PlacementKind;

    /// Place this kind's records. `existing` holds records from generators
    /// that already ran, for cross-kind separation.
    fn generate(&self, seed: u64, cache: &mut WorldCache, existing: &[PlacementRecord]) -> Vec<PlacementRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PlacementRecord {
        PlacementRecord {
            id: "settlement_0_plains".into(),
            kind: PlacementKind::Settlement,
            definition: "hamlet".into(),
            position: IVec2::new(3, 4),
            biome: "plains".into(),
            discovered: false,
            visited_day: None,
            details: PlacementDetails::Settlement { population: 42 },
        }
    }

    #[test]
    fn test_discovery_and_visit() {
        let mut r = record();
        assert!(r.mark_discovered());
        assert!(!r.mark_discovered());

        let mut r = record();
        r.record_visit(12);
        assert!(r.discovered);
        assert_eq!(r.visited_day, Some(12));
    }

    #[test]
    fn test_record_serde_keeps_mutable_state() {
        let mut r = record();
        r.record_visit(3);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"type\":\"settlement\""));
        let back: PlacementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.population(), Some(42));
    }

    #[test]
    fn test_distance_to() {
        assert_eq!(record().distance_to(IVec2::ZERO), 5.0);
    }
}
