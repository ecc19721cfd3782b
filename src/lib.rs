//! Overland - a deterministic procedural tile world
//!
//! Biome classification from layered noise, biome transitions (edge masks,
//! dominant-neighbor blending), a memoizing tile cache with player
//! overrides, settlement and landmark placement, and A* pathfinding over
//! generated movement cost.

pub mod core;
pub mod world;
pub mod placement;
pub mod pathfinding;
