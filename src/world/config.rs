//! Biome configuration table and tile generation parameters.
//!
//! Both are loaded once at startup (JSON) or built from `Default`. Missing
//! or malformed entries never abort generation: lookups fall back to the
//! default biome and colors fall back to [`Rgb::MAGENTA`], with a warning.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use super::biome::{default_bands, BiomeBand, BiomeId, BiomePowerTable};

/// 8-bit RGB color used as a minimap hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Sentinel for missing or malformed colors: loud enough to spot on a map.
    pub const MAGENTA: Rgb = Rgb(255, 0, 255);
}

/// Parse `#RRGGBB` (leading `#` optional). Anything else yields `None`.
pub fn parse_hex_color(s: &str) -> Option<Rgb> {
    let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
}

/// Decorative sub-biome (e.g. "oasis" inside desert).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubBiomeConfig {
    pub id: BiomeId,
    /// Overrides the parent biome color when present and well-formed.
    #[serde(default)]
    pub map_color: Option<String>,
    /// Relative selection weight; zero or negative never selected.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

/// Per-biome gameplay parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeConfig {
    /// Base cost to cross one tile. Non-positive = impassable.
    pub move_cost: f32,
    pub event_chance: f32,
    pub good_chance: f32,
    pub bad_chance: f32,
    /// `#RRGGBB`
    pub map_color: String,
    #[serde(default)]
    pub sub_biomes: Vec<SubBiomeConfig>,
}

impl BiomeConfig {
    pub fn new(move_cost: f32, event_chance: f32, good_chance: f32, bad_chance: f32, map_color: &str) -> Self {
        Self {
            move_cost,
            event_chance,
            good_chance,
            bad_chance,
            map_color: map_color.to_string(),
            sub_biomes: Vec::new(),
        }
    }

    pub fn with_sub_biome(mut self, id: &str, map_color: Option<&str>, weight: f32) -> Self {
        self.sub_biomes.push(SubBiomeConfig {
            id: BiomeId::from(id),
            map_color: map_color.map(str::to_string),
            weight,
        });
        self
    }

    pub fn is_passable(&self) -> bool {
        self.move_cost > 0.0
    }
}

/// Biome configuration table keyed by biome id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeTable {
    /// Used whenever a biome id has no entry.
    pub default_biome: BiomeId,
    pub biomes: BTreeMap<BiomeId, BiomeConfig>,
}

impl BiomeTable {
    /// Look up a biome. Missing entries resolve to the default biome.
    ///
    /// Returns the id actually resolved together with its config, or `None`
    /// only if the default biome is missing too (rejected by [`validate`]).
    ///
    /// [`validate`]: BiomeTable::validate
    pub fn resolve<'a>(&'a self, biome: &'a BiomeId) -> Option<(&'a BiomeId, &'a BiomeConfig)> {
        if let Some(config) = self.biomes.get(biome) {
            return Some((biome, config));
        }
        log::warn!("No config for biome '{}', falling back to '{}'", biome, self.default_biome);
        self.biomes.get(&self.default_biome).map(|config| (&self.default_biome, config))
    }

    pub fn get(&self, biome: &BiomeId) -> Option<&BiomeConfig> {
        self.biomes.get(biome)
    }

    pub fn insert(&mut self, biome: BiomeId, config: BiomeConfig) {
        self.biomes.insert(biome, config);
    }

    /// Startup check: the fallback biome must exist.
    pub fn validate(&self) -> Result<()> {
        if !self.biomes.contains_key(&self.default_biome) {
            return Err(Error::Config(format!(
                "default biome '{}' has no entry in the biome table",
                self.default_biome
            )));
        }
        for (id, config) in &self.biomes {
            if parse_hex_color(&config.map_color).is_none() {
                log::warn!("Biome '{}' has malformed map color '{}'", id, config.map_color);
            }
        }
        Ok(())
    }

    /// Smallest positive base move cost in the table (1.0 if none).
    pub fn min_move_cost(&self) -> f32 {
        self.biomes
            .values()
            .map(|c| c.move_cost)
            .filter(|&c| c > 0.0)
            .fold(None, |acc: Option<f32>, c| Some(acc.map_or(c, |a| a.min(c))))
            .unwrap_or(1.0)
    }

    /// Parse a table from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a table from a JSON file.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for BiomeTable {
    fn default() -> Self {
        let biomes = [
            ("desert", BiomeConfig::new(1.6, 0.10, 0.3, 0.5, "#E3C16F")
                .with_sub_biome("dunes", None, 3.0)
                .with_sub_biome("oasis", Some("#5FB37A"), 0.25)),
            ("plains", BiomeConfig::new(1.0, 0.08, 0.5, 0.2, "#9BC25B")
                .with_sub_biome("meadow", None, 2.0)
                .with_sub_biome("farmland", Some("#C9B25A"), 1.0)),
            ("forest", BiomeConfig::new(1.4, 0.12, 0.4, 0.35, "#2E7D32")
                .with_sub_biome("woods", None, 3.0)
                .with_sub_biome("grove", Some("#3F9A45"), 1.0)),
            ("mountains", BiomeConfig::new(2.5, 0.15, 0.3, 0.5, "#8D8D8D")
                .with_sub_biome("foothills", Some("#A1927D"), 2.0)
                .with_sub_biome("peaks", Some("#DADADA"), 1.0)),
            ("tundra", BiomeConfig::new(1.8, 0.07, 0.25, 0.45, "#CFE3E8")
                .with_sub_biome("permafrost", None, 1.0)),
            ("cave", BiomeConfig::new(2.2, 0.20, 0.35, 0.55, "#3B3542")),
        ]
        .into_iter()
        .map(|(id, config)| (BiomeId::from(id), config))
        .collect();

        Self {
            default_biome: BiomeId::from("plains"),
            biomes,
        }
    }
}

/// Parameters of the tile generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Noise frequency in tiles⁻¹ (smaller = larger biomes).
    pub noise_scale: f64,
    pub noise_octaves: u32,
    /// Per-seed noise offsets along x and y.
    pub seed_offset_x: f64,
    pub seed_offset_y: f64,
    /// Ordered by ascending noise value.
    pub bands: Vec<BiomeBand>,
    pub power: BiomePowerTable,
    /// Blend ring radius bounds (inclusive).
    pub blend_min_radius: u32,
    pub blend_max_radius: u32,
    /// Probability of the innermost blend ring; outer rings fall off linearly.
    pub blend_density: f64,
    /// Per-tile jitter applied to move cost and event chances.
    pub jitter_min: f32,
    pub jitter_max: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            noise_scale: 0.035,
            noise_octaves: 4,
            seed_offset_x: 17.31,
            seed_offset_y: 11.07,
            bands: default_bands(),
            power: BiomePowerTable::default(),
            blend_min_radius: 2,
            blend_max_radius: 3,
            blend_density: 0.85,
            jitter_min: 0.8,
            jitter_max: 1.2,
        }
    }
}

impl GenerationConfig {
    /// Startup check. Clamps recoverable values (with a warning) and rejects
    /// configs that cannot classify any tile.
    pub fn validate(&mut self) -> Result<()> {
        if self.bands.is_empty() {
            return Err(Error::Config("generation config has no biome bands".into()));
        }
        if self.blend_max_radius < self.blend_min_radius {
            log::warn!(
                "blend_max_radius {} < blend_min_radius {}, clamping",
                self.blend_max_radius, self.blend_min_radius
            );
            self.blend_max_radius = self.blend_min_radius;
        }
        if !(self.jitter_min > 0.0 && self.jitter_min <= self.jitter_max) {
            log::warn!(
                "invalid jitter range [{}, {}], using [0.8, 1.2]",
                self.jitter_min, self.jitter_max
            );
            self.jitter_min = 0.8;
            self.jitter_max = 1.2;
        }
        self.blend_density = self.blend_density.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
