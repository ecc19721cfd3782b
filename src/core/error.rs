//! Error types for the overland world core

use thiserror::Error;

use crate::placement::PlacementKind;

/// Main error type for the world core.
///
/// Only startup work (loading and validating configuration) produces these.
/// Tile generation, caching, placement and pathfinding recover locally.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("No placement definitions for {0:?} but its target count is non-zero")]
    MissingDefinitions(PlacementKind),
}
