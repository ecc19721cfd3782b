//! The procedural world: biomes, tile generation and the tile cache.
//!
//! [`World`] ties the pieces together for one seed. It owns the cache (and
//! through it the generator) plus the placement records, and is the unit
//! that gets snapshotted and restored.

pub mod hash;
pub mod biome;
pub mod config;
pub mod influence;
pub mod mask;
pub mod tile;
pub mod generator;
pub mod cache;

pub use biome::{BiomeBand, BiomeId, BiomePowerTable, BiomeVariant};
pub use cache::WorldCache;
pub use config::{BiomeConfig, BiomeTable, GenerationConfig, Rgb, SubBiomeConfig};
pub use generator::TileGenerator;
pub use mask::{Direction, EdgeMask};
pub use tile::TileDescriptor;

use std::path::Path as FsPath;

use serde::{Deserialize, Serialize};

use crate::core::{Error, IVec2, Result};
use crate::pathfinding::{Path, Pathfinder};
use crate::placement::{PlacementDefTable, PlacementDirector, PlacementSet};

/// Everything needed to build a world. Two worlds built from equal configs
/// are identical.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    pub generation: GenerationConfig,
    pub biomes: BiomeTable,
    pub placements: PlacementDefTable,
}

impl WorldConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Default::default() }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_sync(path: &FsPath) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&mut self) -> Result<()> {
        self.generation.validate()?;
        self.biomes.validate()?;
        self.placements.validate()
    }
}

/// Mutable state of a world: player overrides and placement records.
/// Generated tiles are not stored; they come back from the seed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub seed: u64,
    pub overrides: Vec<TileDescriptor>,
    pub placements: PlacementSet,
}

pub struct World {
    cache: WorldCache,
    placements: PlacementSet,
    pathfinder: Pathfinder,
}

impl World {
    /// Build a new world and run placement once.
    pub fn create(config: WorldConfig) -> Result<Self> {
        let (mut cache, pathfinder, table) = Self::build(config)?;
        let placements = PlacementDirector::with_defaults(&table).run(cache.seed(), &mut cache);
        log::info!("Created world seed={} with {} placements", cache.seed(), placements.len());
        Ok(Self { cache, placements, pathfinder })
    }

    /// Rebuild a world from a snapshot. Placement does not run again.
    pub fn restore(config: WorldConfig, snapshot: WorldSnapshot) -> Result<Self> {
        if snapshot.seed != config.seed {
            return Err(Error::Config(format!(
                "snapshot seed {} does not match config seed {}",
                snapshot.seed, config.seed
            )));
        }
        let (mut cache, pathfinder, _) = Self::build(config)?;
        cache.import_overrides(snapshot.overrides);
        log::info!(
            "Restored world seed={} ({} overrides, {} placements)",
            cache.seed(),
            cache.override_count(),
            snapshot.placements.len()
        );
        Ok(Self { cache, placements: snapshot.placements, pathfinder })
    }

    fn build(mut config: WorldConfig) -> Result<(WorldCache, Pathfinder, PlacementDefTable)> {
        config.validate()?;
        let pathfinder = Pathfinder::for_table(&config.biomes, &config.generation);
        let generator = TileGenerator::new(config.seed, config.generation, config.biomes);
        Ok((WorldCache::new(generator), pathfinder, config.placements))
    }

    pub fn seed(&self) -> u64 {
        self.cache.seed()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            seed: self.seed(),
            overrides: self.cache.export_overrides(),
            placements: self.placements.clone(),
        }
    }

    pub fn tile(&mut self, at: IVec2) -> &TileDescriptor {
        self.cache.get_tile(at)
    }

    /// Cheapest route using this world's pathfinder. Its heuristic drops to
    /// the cache's cost floor, so overrides cheaper than any biome still
    /// yield optimal routes.
    pub fn find_path(&mut self, start: IVec2, goal: IVec2) -> Option<Path> {
        self.pathfinder.find_path(&mut self.cache, start, goal)
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn set_pathfinder(&mut self, pathfinder: Pathfinder) {
        self.pathfinder = pathfinder;
    }

    pub fn placements(&self) -> &PlacementSet {
        &self.placements
    }

    pub fn placements_mut(&mut self) -> &mut PlacementSet {
        &mut self.placements
    }

    pub fn cache(&self) -> &WorldCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut WorldCache {
        &mut self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::PlacementKind;

    fn small_config(seed: u64) -> WorldConfig {
        let mut config = WorldConfig::with_seed(seed);
        config.placements.landmark_rules.target_count = 12;
        config.placements.settlement_rules.target_count = 4;
        config
    }

    #[test]
    fn test_create_is_deterministic() {
        let mut a = World::create(small_config(99)).unwrap();
        let mut b = World::create(small_config(99)).unwrap();
        assert_eq!(a.placements(), b.placements());
        let p = IVec2::new(-7, 31);
        assert_eq!(a.tile(p).clone(), b.tile(p).clone());
    }

    #[test]
    fn test_create_rejects_missing_default_biome() {
        let mut config = small_config(1);
        config.biomes.default_biome = BiomeId::from("swamp");
        assert!(matches!(World::create(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_create_rejects_missing_definitions() {
        let mut config = small_config(1);
        config.placements.settlements.clear();
        assert!(matches!(
            World::create(config),
            Err(Error::MissingDefinitions(PlacementKind::Settlement))
        ));
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut world = World::create(small_config(2024)).unwrap();
        let at = IVec2::new(3, -2);
        let road = world.tile(at).with_move_cost(0.25);
        world.cache_mut().set_override(road.clone());
        let id = world.placements().records()[0].id.clone();
        world.placements_mut().get_mut(&id).unwrap().record_visit(4);

        let json = serde_json::to_string(&world.snapshot()).unwrap();
        let snapshot: WorldSnapshot = serde_json::from_str(&json).unwrap();

        let mut restored = World::restore(small_config(2024), snapshot).unwrap();
        assert_eq!(restored.tile(at), &road);
        assert_eq!(restored.placements(), world.placements());
        assert_eq!(restored.placements().get(&id).unwrap().visited_day, Some(4));
        assert_eq!(restored.snapshot(), world.snapshot());
    }

    #[test]
    fn test_restore_rejects_other_seed() {
        let world = World::create(small_config(5)).unwrap();
        assert!(World::restore(small_config(6), world.snapshot()).is_err());
    }

    #[test]
    fn test_find_path_between_settlements() {
        let mut world = World::create(small_config(31)).unwrap();
        let towns: Vec<IVec2> = world
            .placements()
            .of_kind(PlacementKind::Settlement)
            .map(|r| r.position)
            .take(2)
            .collect();
        assert_eq!(towns.len(), 2);
        let path = world.find_path(towns[0], towns[1]).unwrap();
        assert_eq!(path.start(), Some(towns[0]));
        assert_eq!(path.goal(), Some(towns[1]));
    }

    #[test]
    fn test_find_path_uses_cheap_override_road() {
        let mut config = small_config(4);
        config.generation.bands = vec![BiomeBand::new(1.0, "plains")];
        let mut world = World::create(config).unwrap();

        let road: Vec<IVec2> = (0..=5).map(|y| IVec2::new(0, -y))
            .chain((1..=10).map(|x| IVec2::new(x, -5)))
            .chain((0..5).rev().map(|y| IVec2::new(10, -y)))
            .collect();
        for &p in &road {
            let tile = world.tile(p).with_move_cost(0.01);
            world.cache_mut().set_override(tile);
        }

        let (start, goal) = (IVec2::ZERO, IVec2::new(10, 0));
        let route = world.find_path(start, goal).unwrap();
        let exhaustive = Pathfinder { heuristic_scale: 0.0, ..world.pathfinder().clone() }
            .find_path(world.cache_mut(), start, goal)
            .unwrap();

        assert!(route.cost <= exhaustive.cost + 1e-4, "{} > {}", route.cost, exhaustive.cost);
        assert_eq!(route.steps, road);
    }

    #[test]
    fn test_config_json_partial() {
        let config = WorldConfig::from_json_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(config, WorldConfig::with_seed(7));
    }
}
