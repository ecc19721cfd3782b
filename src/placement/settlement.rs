//! Settlement generator: populated places inside a bounded square around the origin.

use crate::world::WorldCache;
use super::definitions::{PlacementDef, PlacementRules};
use super::search::scatter;
use super::{PlacementDetails, PlacementGenerator, PlacementKind, PlacementRecord};

/// Scatters settlements, keeping clear of already placed landmarks.
pub struct SettlementGenerator {
    definitions: Vec<PlacementDef>,
    rules: PlacementRules,
}

impl SettlementGenerator {
    pub fn new(definitions: Vec<PlacementDef>, rules: PlacementRules) -> Self {
        Self { definitions, rules }
    }

    pub fn rules(&self) -> &PlacementRules {
        &self.rules
    }
}

impl PlacementGenerator for SettlementGenerator {
    fn kind(&self) -> PlacementKind {
        PlacementKind::Settlement
    }

    fn generate(&self, seed: u64, cache: &mut WorldCache, existing: &[PlacementRecord]) -> Vec<PlacementRecord> {
        scatter(
            PlacementKind::Settlement,
            seed,
            cache,
            existing,
            &self.definitions,
            &self.rules,
            |_, population, _| PlacementDetails::Settlement { population },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{tile_distance, IVec2};
    use crate::placement::{SearchArea, Separation};
    use crate::world::{BiomeBand, BiomeTable, GenerationConfig, TileGenerator};

    fn plains_cache() -> WorldCache {
        let config = GenerationConfig {
            bands: vec![BiomeBand::new(1.0, "plains")],
            ..Default::default()
        };
        WorldCache::new(TileGenerator::new(1, config, BiomeTable::default()))
    }

    fn rules(target_count: u32, half_extent: i32, min_separation: f32) -> PlacementRules {
        PlacementRules {
            target_count,
            min_separation,
            keep_clear_of: vec![Separation { kind: PlacementKind::Landmark, distance: 6.0 }],
            search: SearchArea::Square { center: IVec2::ZERO, half_extent },
            fallback_stride: 1,
        }
    }

    fn landmark_at(p: IVec2) -> PlacementRecord {
        PlacementRecord {
            id: "landmark_0_plains".into(),
            kind: PlacementKind::Landmark,
            definition: "cairn".into(),
            position: p,
            biome: "plains".into(),
            discovered: false,
            visited_day: None,
            details: PlacementDetails::Landmark { rarity: 1, danger_tier: 1 },
        }
    }

    #[test]
    fn test_settlements_separated() {
        let generator = SettlementGenerator::new(
            vec![PlacementDef::new("village", &["plains"], 50, 500)],
            rules(8, 60, 15.0),
        );
        let records = generator.generate(4242, &mut plains_cache(), &[]);
        assert_eq!(records.len(), 8);
        for (i, a) in records.iter().enumerate() {
            assert!((50..=500).contains(&a.population().unwrap()));
            for b in &records[i + 1..] {
                assert!(tile_distance(a.position, b.position) >= 15.0);
            }
        }
    }

    #[test]
    fn test_degrades_in_tiny_world() {
        // A 9×9 square fits only one settlement with 20 tiles of separation.
        let generator = SettlementGenerator::new(
            vec![PlacementDef::new("village", &["plains"], 50, 500)],
            rules(8, 4, 20.0),
        );
        let records = generator.generate(7, &mut plains_cache(), &[]);
        assert!(records.len() < 8);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_no_compatible_biome_yields_empty() {
        let generator = SettlementGenerator::new(
            vec![PlacementDef::new("igloo", &["tundra"], 1, 5)],
            rules(3, 5, 2.0),
        );
        assert!(generator.generate(7, &mut plains_cache(), &[]).is_empty());
    }

    #[test]
    fn test_keeps_clear_of_landmarks() {
        let generator = SettlementGenerator::new(
            vec![PlacementDef::new("village", &["plains"], 50, 500)],
            rules(6, 12, 4.0),
        );
        let landmarks = [landmark_at(IVec2::new(0, 0)), landmark_at(IVec2::new(8, -8))];
        let records = generator.generate(11, &mut plains_cache(), &landmarks);
        assert!(!records.is_empty());
        for r in &records {
            for l in &landmarks {
                assert!(tile_distance(r.position, l.position) >= 6.0);
            }
        }
    }
}
