//! Tile generator: a pure function of (position, seed, config).
//!
//! Steps per tile:
//! 1. tile-local random stream from `hash(seed, combine_xy(x, y))`
//! 2. base biome from fractal noise thresholded into bands
//! 3. biome config lookup (fallback biome on miss)
//! 4. edge mask + dominant neighbor from the neighbors' *base* biomes only
//! 5. blend-zone decoration rings around the dominant neighbor
//! 6. jittered move cost and event chances
//! 7. sub-biome, color hint, visual variant

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::core::IVec2;
use super::biome::{band_for, BiomeId, BiomeVariant};
use super::config::{parse_hex_color, BiomeConfig, BiomeTable, GenerationConfig, Rgb};
use super::hash::{combine_xy, hash, TileRng};
use super::influence::resolve_influence;
use super::mask::{Direction, EdgeMask};
use super::tile::TileDescriptor;

/// Salt separating the blend-zone stream from the main tile stream.
const BLEND_SALT: u64 = 0xB1E7_D20E;

/// Salts for the noise seed and the coordinate offset. Both hash the full
/// 64-bit world seed.
const NOISE_SEED_SALT: u64 = 0x4E01_5E5E;
const NOISE_OFFSET_SALT: u64 = 0x0FF5_E700;

/// Offsets are folded into this range, keeping the sample points well
/// inside f64 precision.
const SEED_OFFSET_MODULUS: u64 = 65_536;

/// Deterministic per-tile world generator.
pub struct TileGenerator {
    seed: u64,
    config: GenerationConfig,
    biomes: BiomeTable,
    noise: Fbm<Perlin>,
    /// Hashed seed in `[0, SEED_OFFSET_MODULUS)` scaling the noise offsets.
    offset: f64,
}

impl TileGenerator {
    pub fn new(seed: u64, config: GenerationConfig, biomes: BiomeTable) -> Self {
        let noise_seed = hash(seed, NOISE_SEED_SALT) as u32;
        let offset = (hash(seed, NOISE_OFFSET_SALT) % SEED_OFFSET_MODULUS) as f64;
        let noise = Fbm::<Perlin>::new(noise_seed)
            .set_octaves(config.noise_octaves.max(1) as usize)
            .set_persistence(0.5)
            .set_lacunarity(2.0);

        Self { seed, config, biomes, noise, offset }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn biomes(&self) -> &BiomeTable {
        &self.biomes
    }

    /// Normalized noise value in [0, 1] at a tile.
    pub fn noise_at(&self, at: IVec2) -> f64 {
        let s = self.offset;
        let nx = (at.x as f64 + s * self.config.seed_offset_x) * self.config.noise_scale;
        let ny = (at.y as f64 - s * self.config.seed_offset_y) * self.config.noise_scale;
        ((self.noise.get([nx, ny]) + 1.0) * 0.5).clamp(0.0, 1.0)
    }

    /// Base biome of a tile: noise classification only, no neighbors, no
    /// config lookup. This is what neighbor queries use.
    pub fn classify(&self, at: IVec2) -> BiomeId {
        band_for(&self.config.bands, self.noise_at(at))
            .cloned()
            .unwrap_or_else(|| self.biomes.default_biome.clone())
    }

    /// Base biome mapped onto the configured set: unknown ids become the
    /// default biome so masks compare like with like. Silent; the center
    /// tile's lookup reports the anomaly.
    fn neighbor_biome(&self, at: IVec2) -> BiomeId {
        let biome = self.classify(at);
        if self.biomes.get(&biome).is_some() {
            biome
        } else {
            self.biomes.default_biome.clone()
        }
    }

    /// Generate the full descriptor of a tile.
    pub fn generate(&self, at: IVec2) -> TileDescriptor {
        let mut rng = TileRng::for_tile(self.seed, at.x, at.y);

        let base = self.classify(at);
        let (biome, config) = match self.biomes.resolve(&base) {
            Some((id, config)) => (id.clone(), config.clone()),
            None => {
                log::warn!("Biome table has no default biome; tile {} uses placeholder config", at);
                (base.clone(), BiomeConfig::new(1.0, 0.0, 0.0, 0.0, ""))
            }
        };

        // One sample per neighbor, shared by mask and influence.
        let ring = Direction::ALL.map(|dir| self.neighbor_biome(at + dir.offset()));
        let lookup = |p: IVec2| {
            let offset = p - at;
            Direction::ALL
                .iter()
                .position(|dir| dir.offset() == offset)
                .map(|i| ring[i].clone())
                .unwrap_or_else(|| self.neighbor_biome(p))
        };

        let edge_mask = EdgeMask::compute(at, &biome, lookup);
        let dominant_neighbor = resolve_influence(&biome, at, &self.config.power, lookup);
        let blend_layers = dominant_neighbor
            .as_ref()
            .map(|neighbor| self.blend_layers(at, neighbor))
            .unwrap_or_default();

        let jitter = rng.range_f64(self.config.jitter_min as f64, self.config.jitter_max as f64) as f32;
        let move_cost = config.move_cost.max(0.0) * jitter;
        let event_chance = (config.event_chance * jitter).clamp(0.0, 1.0);
        let good_event_chance = (config.good_chance * jitter).clamp(0.0, 1.0);
        let bad_event_chance = (config.bad_chance * jitter).clamp(0.0, 1.0);

        let sub_biome = pick_sub_biome(&config, &mut rng);
        let color = self.color_hint(&biome, &config, sub_biome.as_ref());
        let variant = BiomeVariant::from_index(rng.range_u32(0, BiomeVariant::ALL.len() as u32 - 1));

        TileDescriptor {
            position: at,
            biome,
            sub_biome,
            variant,
            dominant_neighbor,
            edge_mask,
            blend_layers,
            move_cost,
            event_chance,
            good_event_chance,
            bad_event_chance,
            color,
        }
    }

    /// Primary edge layer plus randomized falloff rings.
    fn blend_layers(&self, at: IVec2, neighbor: &BiomeId) -> Vec<String> {
        let mut layers = vec![format!("{}_edge", neighbor)];
        let mut rng = TileRng::new(hash(self.seed ^ BLEND_SALT, combine_xy(at.x, at.y)));

        let radius = rng.range_u32(self.config.blend_min_radius, self.config.blend_max_radius);
        for ring in 1..=radius {
            let falloff = 1.0 - (ring - 1) as f64 / radius as f64;
            if rng.chance(self.config.blend_density * falloff) {
                layers.push(format!("{}_blend_{}", neighbor, ring));
            }
        }
        layers
    }

    fn color_hint(&self, biome: &BiomeId, config: &BiomeConfig, sub_biome: Option<&BiomeId>) -> Rgb {
        let sub_color = sub_biome
            .and_then(|id| config.sub_biomes.iter().find(|s| s.id == *id))
            .and_then(|s| s.map_color.as_deref());

        let (source, hex) = match sub_color {
            Some(hex) => (sub_biome.unwrap_or(biome), hex),
            None => (biome, config.map_color.as_str()),
        };

        parse_hex_color(hex).unwrap_or_else(|| {
            log::warn!("Malformed map color '{}' for '{}', using magenta", hex, source);
            Rgb::MAGENTA
        })
    }
}

/// Weighted pick among a biome's sub-biomes; `None` if it has none.
fn pick_sub_biome(config: &BiomeConfig, rng: &mut TileRng) -> Option<BiomeId> {
    let total: f64 = config.sub_biomes.iter().map(|s| s.weight.max(0.0) as f64).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.next_f64() * total;
    for sub in &config.sub_biomes {
        let weight = sub.weight.max(0.0) as f64;
        if roll < weight {
            return Some(sub.id.clone());
        }
        roll -= weight;
    }
    config.sub_biomes.iter().rev().find(|s| s.weight > 0.0).map(|s| s.id.clone())
}
