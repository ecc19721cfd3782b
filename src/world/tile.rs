//! Tile descriptor: the only object handed to renderers and game systems.

use serde::{Deserialize, Serialize};

use crate::core::IVec2;
use super::biome::{BiomeId, BiomeVariant};
use super::config::Rgb;
use super::mask::EdgeMask;

/// Everything known about one tile. Immutable by convention: game logic that
/// changes a tile stores a modified copy as an override in the world cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDescriptor {
    pub position: IVec2,
    pub biome: BiomeId,
    pub sub_biome: Option<BiomeId>,
    pub variant: BiomeVariant,
    /// Foreign biome bleeding into this tile's edges.
    pub dominant_neighbor: Option<BiomeId>,
    pub edge_mask: EdgeMask,
    /// Decoration layer ids, innermost first.
    pub blend_layers: Vec<String>,
    /// Cost to enter this tile. Non-positive = impassable.
    pub move_cost: f32,
    pub event_chance: f32,
    pub good_event_chance: f32,
    pub bad_event_chance: f32,
    pub color: Rgb,
}

impl TileDescriptor {
    /// Bare tile of a biome at a position, with no transitions. Mostly used
    /// to build overrides and test fixtures.
    pub fn plain(position: IVec2, biome: impl Into<BiomeId>, move_cost: f32) -> Self {
        Self {
            position,
            biome: biome.into(),
            sub_biome: None,
            variant: BiomeVariant::Plain,
            dominant_neighbor: None,
            edge_mask: EdgeMask::FULL,
            blend_layers: Vec::new(),
            move_cost,
            event_chance: 0.0,
            good_event_chance: 0.0,
            bad_event_chance: 0.0,
            color: Rgb::MAGENTA,
        }
    }

    pub fn is_passable(&self) -> bool {
        self.move_cost > 0.0
    }

    /// Copy of this tile with a different move cost (e.g. a built road or a
    /// collapsed bridge).
    pub fn with_move_cost(&self, move_cost: f32) -> Self {
        Self { move_cost, ..self.clone() }
    }

    pub fn with_biome(&self, biome: impl Into<BiomeId>) -> Self {
        Self { biome: biome.into(), ..self.clone() }
    }

    pub fn is_border(&self) -> bool {
        self.dominant_neighbor.is_some()
    }
}
