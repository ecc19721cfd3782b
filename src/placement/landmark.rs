//! Landmark generator: unique sites (ruins, shrines, lairs) over the working range.

use crate::world::WorldCache;
use super::definitions::{PlacementDef, PlacementRules};
use super::search::scatter;
use super::{PlacementDetails, PlacementGenerator, PlacementKind, PlacementRecord};

/// Highest danger tier.
pub const MAX_DANGER_TIER: u8 = 5;

/// Scatters landmarks. Runs before settlements so they can keep clear.
pub struct LandmarkGenerator {
    definitions: Vec<PlacementDef>,
    rules: PlacementRules,
}

impl LandmarkGenerator {
    pub fn new(definitions: Vec<PlacementDef>, rules: PlacementRules) -> Self {
        Self { definitions, rules }
    }

    pub fn rules(&self) -> &PlacementRules {
        &self.rules
    }
}

/// Danger follows rarity, sometimes one tier higher.
fn danger_tier(rarity: u32, spare_hash: u64) -> u8 {
    let bump = (spare_hash % 3 == 0) as u32;
    (rarity + bump).clamp(1, MAX_DANGER_TIER as u32) as u8
}

impl PlacementGenerator for LandmarkGenerator {
    fn kind(&self) -> PlacementKind {
        PlacementKind::Landmark
    }

    fn generate(&self, seed: u64, cache: &mut WorldCache, existing: &[PlacementRecord]) -> Vec<PlacementRecord> {
        scatter(
            PlacementKind::Landmark,
            seed,
            cache,
            existing,
            &self.definitions,
            &self.rules,
            |_, rarity, spare| PlacementDetails::Landmark {
                rarity,
                danger_tier: danger_tier(rarity, spare),
            },
        )
    }
}
