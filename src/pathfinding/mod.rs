//! Pathfinding over generated movement cost.
//!
//! Searches read tile costs through [`CostMap`], implemented by the world
//! cache and by plain closures. "No route" is an ordinary `None`, not an
//! error.

pub mod astar;

pub use astar::{CostMap, Path, Pathfinder};
