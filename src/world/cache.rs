//! World cache: memoized tile generation plus player overrides.
//!
//! Reads check the override map first, then the generated map, and only
//! then call the generator. Each coordinate is generated at most once per
//! cache lifetime (until [`WorldCache::clear_generated`]).
//!
//! The cache has a single owner: every mutation goes through `&mut self`.
//! Bulk generation ([`WorldCache::prefetch_region`]) runs the pure generator
//! in parallel and inserts the results from the owning thread.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::core::IVec2;
use super::biome::BiomeId;
use super::generator::TileGenerator;
use super::tile::TileDescriptor;

/// Memoizing tile store with an override layer.
pub struct WorldCache {
    generator: TileGenerator,
    /// Write-once per key.
    generated: HashMap<IVec2, TileDescriptor>,
    /// Write-many; always wins on read.
    overrides: HashMap<IVec2, TileDescriptor>,
    /// Number of generator invocations since creation.
    generation_count: u64,
}

impl WorldCache {
    pub fn new(generator: TileGenerator) -> Self {
        Self {
            generator,
            generated: HashMap::new(),
            overrides: HashMap::new(),
            generation_count: 0,
        }
    }

    pub fn generator(&self) -> &TileGenerator {
        &self.generator
    }

    pub fn seed(&self) -> u64 {
        self.generator.seed()
    }

    /// Tile at a coordinate: override, else cached, else freshly generated.
    pub fn get_tile(&mut self, at: IVec2) -> &TileDescriptor {
        if self.overrides.contains_key(&at) {
            return &self.overrides[&at];
        }
        if !self.generated.contains_key(&at) {
            self.generation_count += 1;
            let tile = self.generator.generate(at);
            self.generated.insert(at, tile);
        }
        &self.generated[&at]
    }

    /// Biome of the tile (override-aware).
    pub fn biome_at(&mut self, at: IVec2) -> BiomeId {
        self.get_tile(at).biome.clone()
    }

    /// Move cost of the tile (override-aware).
    pub fn move_cost(&mut self, at: IVec2) -> f32 {
        self.get_tile(at).move_cost
    }

    /// Cached procedural tile, without generating and ignoring overrides.
    pub fn generated_tile(&self, at: IVec2) -> Option<&TileDescriptor> {
        self.generated.get(&at)
    }

    pub fn is_generated(&self, at: IVec2) -> bool {
        self.generated.contains_key(&at)
    }

    pub fn generation_count(&self) -> u64 {
        self.generation_count
    }

    pub fn generated_len(&self) -> usize {
        self.generated.len()
    }

    /// Forget all generated tiles. Overrides are kept.
    pub fn clear_generated(&mut self) {
        self.generated.clear();
    }

    /// Insert or replace the override at `tile.position`. The generated map
    /// is left alone, so removing the override restores procedural content.
    pub fn set_override(&mut self, tile: TileDescriptor) -> Option<TileDescriptor> {
        self.overrides.insert(tile.position, tile)
    }

    pub fn remove_override(&mut self, at: IVec2) -> Option<TileDescriptor> {
        self.overrides.remove(&at)
    }

    pub fn override_at(&self, at: IVec2) -> Option<&TileDescriptor> {
        self.overrides.get(&at)
    }

    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }

    /// Lower bound on the positive move cost of any tile: the cheapest
    /// jittered biome cost, lowered by any cheaper override.
    pub fn cost_floor(&self) -> f32 {
        let table = self.generator.biomes().min_move_cost() * self.generator.config().jitter_min;
        self.overrides
            .values()
            .map(|t| t.move_cost)
            .filter(|&c| c > 0.0)
            .fold(table, f32::min)
    }

    /// All overrides, sorted by (y, x) for stable save output.
    pub fn export_overrides(&self) -> Vec<TileDescriptor> {
        let mut tiles: Vec<TileDescriptor> = self.overrides.values().cloned().collect();
        tiles.sort_by_key(|t| (t.position.y, t.position.x));
        tiles
    }

    /// Replace the whole override map. Later entries win on duplicate
    /// positions.
    pub fn import_overrides(&mut self, tiles: impl IntoIterator<Item = TileDescriptor>) {
        self.overrides = tiles.into_iter().map(|t| (t.position, t)).collect();
    }

    /// Generate every missing tile in the inclusive rectangle `[min, max]`.
    ///
    /// Returns the number of tiles generated.
    pub fn prefetch_region(&mut self, min: IVec2, max: IVec2) -> usize {
        let (lo, hi) = (min.min(max), min.max(max));
        let missing: Vec<IVec2> = (lo.y..=hi.y)
            .flat_map(|y| (lo.x..=hi.x).map(move |x| IVec2::new(x, y)))
            .filter(|p| !self.generated.contains_key(p))
            .collect();

        let generator = &self.generator;
        let tiles: Vec<TileDescriptor> = missing
            .par_iter()
            .map(|&p| generator.generate(p))
            .collect();

        let count = tiles.len();
        self.generation_count += count as u64;
        self.generated.extend(tiles.into_iter().map(|t| (t.position, t)));
        log::debug!("Prefetched {} tiles in [{}, {}]", count, lo, hi);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::config::{BiomeTable, GenerationConfig};

    fn test_cache() -> WorldCache {
        WorldCache::new(TileGenerator::new(777, GenerationConfig::default(), BiomeTable::default()))
    }

    #[test]
    fn test_get_tile_generates_once() {
        let mut cache = test_cache();
        let p = IVec2::new(5, -9);
        let first = cache.get_tile(p).clone();
        for _ in 0..10 {
            assert_eq!(cache.get_tile(p), &first);
        }
        assert_eq!(cache.generation_count(), 1);
        assert_eq!(cache.generated_len(), 1);
    }

    #[test]
    fn test_cached_tile_matches_generator() {
        let mut cache = test_cache();
        let p = IVec2::new(-31, 44);
        let direct = cache.generator().generate(p);
        assert_eq!(cache.get_tile(p), &direct);
    }

    #[test]
    fn test_override_precedence_and_restore() {
        let mut cache = test_cache();
        let p = IVec2::new(2, 2);
        let original = cache.get_tile(p).clone();

        let replaced = original.with_biome("cave").with_move_cost(0.0);
        assert!(cache.set_override(replaced.clone()).is_none());
        assert_eq!(cache.get_tile(p), &replaced);
        assert_eq!(cache.generated_tile(p), Some(&original));

        cache.remove_override(p);
        assert_eq!(cache.get_tile(p), &original);
        assert_eq!(cache.generation_count(), 1);
    }

    #[test]
    fn test_override_before_generation_skips_generator() {
        let mut cache = test_cache();
        let p = IVec2::new(100, 100);
        cache.set_override(TileDescriptor::plain(p, "plains", 1.0));
        cache.get_tile(p);
        assert_eq!(cache.generation_count(), 0);
        assert!(!cache.is_generated(p));
    }

    #[test]
    fn test_cost_floor_tracks_overrides() {
        let mut cache = test_cache();
        assert_eq!(cache.cost_floor(), 1.0 * 0.8);

        let p = IVec2::new(4, 4);
        cache.set_override(TileDescriptor::plain(p, "plains", 0.25));
        cache.set_override(TileDescriptor::plain(IVec2::new(5, 4), "cave", 0.0));
        assert_eq!(cache.cost_floor(), 0.25);

        cache.remove_override(p);
        assert_eq!(cache.cost_floor(), 0.8);

        cache.import_overrides([TileDescriptor::plain(p, "plains", 0.05)]);
        assert_eq!(cache.cost_floor(), 0.05);
    }

    #[test]
    fn test_export_import_overrides() {
        let mut cache = test_cache();
        cache.set_override(TileDescriptor::plain(IVec2::new(3, 1), "forest", 2.0));
        cache.set_override(TileDescriptor::plain(IVec2::new(-1, 0), "desert", 1.0));
        cache.set_override(TileDescriptor::plain(IVec2::new(0, 1), "tundra", 1.0));

        let exported = cache.export_overrides();
        let order: Vec<IVec2> = exported.iter().map(|t| t.position).collect();
        assert_eq!(order, vec![IVec2::new(-1, 0), IVec2::new(0, 1), IVec2::new(3, 1)]);

        let mut other = test_cache();
        other.set_override(TileDescriptor::plain(IVec2::new(50, 50), "cave", 1.0));
        other.import_overrides(exported.clone());
        assert_eq!(other.override_count(), 3);
        assert!(other.override_at(IVec2::new(50, 50)).is_none());
        assert_eq!(other.export_overrides(), exported);
    }

    #[test]
    fn test_clear_generated_keeps_overrides() {
        let mut cache = test_cache();
        cache.get_tile(IVec2::ZERO);
        cache.set_override(TileDescriptor::plain(IVec2::ONE, "cave", 1.0));
        cache.clear_generated();
        assert_eq!(cache.generated_len(), 0);
        assert_eq!(cache.override_count(), 1);

        cache.get_tile(IVec2::ZERO);
        assert_eq!(cache.generation_count(), 2);
    }

    #[test]
    fn test_prefetch_region_matches_lazy_generation() {
        let mut cache = test_cache();
        cache.get_tile(IVec2::new(0, 0));
        let generated = cache.prefetch_region(IVec2::new(2, 2), IVec2::new(-2, -2));
        assert_eq!(generated, 24);
        assert_eq!(cache.generated_len(), 25);
        assert_eq!(cache.generation_count(), 25);

        let mut lazy = test_cache();
        for y in -2..=2 {
            for x in -2..=2 {
                let p = IVec2::new(x, y);
                assert_eq!(cache.generated_tile(p), Some(lazy.get_tile(p)));
            }
        }
    }
}
