//! Placement definition table: what can be placed where, and how far apart.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, IVec2, Result};
use crate::world::BiomeId;
use super::PlacementKind;

/// Default candidate budget per placement index.
pub const MAX_ATTEMPTS: u32 = 48;

fn default_attempts() -> u32 {
    MAX_ATTEMPTS
}

fn default_weight() -> f32 {
    1.0
}

fn default_stride() -> i32 {
    1
}

/// One placeable type (e.g. "village", "ruined_tower").
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementDef {
    pub id: String,
    pub allowed_biomes: Vec<BiomeId>,
    /// Inclusive bounds of the kind's scalar (population or rarity).
    pub min_value: u32,
    pub max_value: u32,
    #[serde(default = "default_attempts")]
    pub max_attempts: u32,
    /// Relative selection weight.
    #[serde(default = "default_weight")]
    pub weight: f32,
}

impl PlacementDef {
    pub fn new(id: &str, allowed_biomes: &[&str], min_value: u32, max_value: u32) -> Self {
        Self {
            id: id.to_string(),
            allowed_biomes: allowed_biomes.iter().map(|&b| BiomeId::from(b)).collect(),
            min_value,
            max_value,
            max_attempts: MAX_ATTEMPTS,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight;
        self
    }

    pub fn allows(&self, biome: &BiomeId) -> bool {
        self.allowed_biomes.contains(biome)
    }
}

/// Where candidate coordinates are drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum SearchArea {
    /// Symmetric square `center ± half_extent`.
    Square { center: IVec2, half_extent: i32 },
    /// Inclusive working range.
    Range { min: IVec2, max: IVec2 },
}

/// Minimum distance to keep from records of another kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    pub kind: PlacementKind,
    pub distance: f32,
}

/// Per-kind placement rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementRules {
    pub target_count: u32,
    /// Minimum Euclidean distance between two records of this kind.
    pub min_separation: f32,
    #[serde(default)]
    pub keep_clear_of: Vec<Separation>,
    pub search: SearchArea,
    /// Step between tested cells of the fallback spiral.
    #[serde(default = "default_stride")]
    pub fallback_stride: i32,
}

/// All placement definitions, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementDefTable {
    pub settlements: Vec<PlacementDef>,
    pub landmarks: Vec<PlacementDef>,
    pub settlement_rules: PlacementRules,
    pub landmark_rules: PlacementRules,
}

impl PlacementDefTable {
    pub fn definitions(&self, kind: PlacementKind) -> &[PlacementDef] {
        match kind {
            PlacementKind::Settlement => &self.settlements,
            PlacementKind::Landmark => &self.landmarks,
        }
    }

    pub fn rules(&self, kind: PlacementKind) -> &PlacementRules {
        match kind {
            PlacementKind::Settlement => &self.settlement_rules,
            PlacementKind::Landmark => &self.landmark_rules,
        }
    }

    /// Startup check. A kind with a non-zero target and no definitions is
    /// fatal; inverted value bounds and unreachable definitions are repaired
    /// or reported.
    pub fn validate(&mut self) -> Result<()> {
        for kind in [PlacementKind::Landmark, PlacementKind::Settlement] {
            if self.rules(kind).target_count > 0 && self.definitions(kind).is_empty() {
                return Err(Error::MissingDefinitions(kind));
            }
            let rules = match kind {
                PlacementKind::Settlement => &mut self.settlement_rules,
                PlacementKind::Landmark => &mut self.landmark_rules,
            };
            if rules.fallback_stride < 1 {
                log::warn!("{:?} fallback_stride {} < 1, using 1", kind, rules.fallback_stride);
                rules.fallback_stride = 1;
            }
        }

        for def in self.settlements.iter_mut().chain(self.landmarks.iter_mut()) {
            if def.min_value > def.max_value {
                log::warn!(
                    "Placement def '{}' has min_value {} > max_value {}, swapping",
                    def.id, def.min_value, def.max_value
                );
                std::mem::swap(&mut def.min_value, &mut def.max_value);
            }
            if def.allowed_biomes.is_empty() {
                log::warn!("Placement def '{}' allows no biomes and can never be placed", def.id);
            }
        }
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

impl Default for PlacementDefTable {
    fn default() -> Self {
        Self {
            settlements: vec![
                PlacementDef::new("hamlet", &["plains", "forest"], 20, 80).with_weight(3.0),
                PlacementDef::new("village", &["plains", "forest", "desert"], 80, 300).with_weight(2.0),
                PlacementDef::new("town", &["plains"], 300, 1200).with_weight(0.75),
                PlacementDef::new("outpost", &["tundra", "mountains"], 10, 40),
                PlacementDef::new("oasis_camp", &["desert"], 15, 60).with_weight(0.5),
            ],
            landmarks: vec![
                PlacementDef::new("standing_stones", &["plains", "tundra"], 1, 3).with_weight(2.0),
                PlacementDef::new("ruined_tower", &["forest", "plains", "mountains"], 2, 4).with_weight(2.0),
                PlacementDef::new("ancient_tree", &["forest"], 1, 3),
                PlacementDef::new("sunken_temple", &["desert"], 3, 5),
                PlacementDef::new("frozen_shrine", &["tundra"], 2, 4),
                PlacementDef::new("crystal_grotto", &["cave"], 3, 5),
                PlacementDef::new("dragon_lair", &["mountains", "cave"], 4, 5).with_weight(0.3),
            ],
            settlement_rules: PlacementRules {
                target_count: 8,
                min_separation: 24.0,
                keep_clear_of: vec![Separation { kind: PlacementKind::Landmark, distance: 12.0 }],
                search: SearchArea::Square { center: IVec2::ZERO, half_extent: 96 },
                fallback_stride: 1,
            },
            landmark_rules: PlacementRules {
                target_count: 50,
                min_separation: 10.0,
                keep_clear_of: Vec::new(),
                search: SearchArea::Range { min: IVec2::splat(-160), max: IVec2::splat(160) },
                fallback_stride: 2,
            },
        }
    }
}
