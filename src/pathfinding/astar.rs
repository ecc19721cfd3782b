//! 4-directional A* over per-tile movement cost.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::{manhattan, IVec2};
use crate::world::mask::Direction;
use crate::world::{BiomeTable, GenerationConfig, WorldCache};

/// Anything that can report the cost of entering a tile.
/// Non-positive (or NaN) cost means impassable.
pub trait CostMap {
    fn move_cost(&mut self, at: IVec2) -> f32;

    /// Lower bound on every positive cost this map can return, if known.
    /// The search never scales its heuristic above it.
    fn cost_floor(&self) -> Option<f32> {
        None
    }
}

impl CostMap for WorldCache {
    fn move_cost(&mut self, at: IVec2) -> f32 {
        WorldCache::move_cost(self, at)
    }

    fn cost_floor(&self) -> Option<f32> {
        Some(WorldCache::cost_floor(self))
    }
}

impl<F: FnMut(IVec2) -> f32> CostMap for F {
    fn move_cost(&mut self, at: IVec2) -> f32 {
        self(at)
    }
}

/// A route from start to goal, both included.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub steps: Vec<IVec2>,
    /// Sum of the costs of every entered tile (start excluded).
    pub cost: f32,
}

impl Path {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn start(&self) -> Option<IVec2> {
        self.steps.first().copied()
    }

    pub fn goal(&self) -> Option<IVec2> {
        self.steps.last().copied()
    }
}

/// Open-set entry. Ordered so the max-heap pops the lowest `f` first and,
/// among equal `f`, the earliest pushed.
#[derive(Clone, Copy, Debug)]
struct OpenNode {
    f: f32,
    g: f32,
    seq: u64,
    pos: IVec2,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search settings. The world is unbounded, so every search is limited
/// by an expansion budget and optionally by a bounding rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Pathfinder {
    /// Multiplier on Manhattan distance. Must not exceed the cheapest
    /// possible step cost or paths may come out suboptimal.
    pub heuristic_scale: f32,
    /// Closed-set size at which the search gives up.
    pub max_expanded: usize,
    /// Inclusive rectangle the path must stay inside.
    pub bounds: Option<(IVec2, IVec2)>,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self {
            heuristic_scale: 1.0,
            max_expanded: 200_000,
            bounds: None,
        }
    }
}

impl Pathfinder {
    /// Heuristic calibrated to the cheapest jittered step the table can
    /// produce, so Manhattan distance stays a lower bound.
    pub fn for_table(biomes: &BiomeTable, config: &GenerationConfig) -> Self {
        Self {
            heuristic_scale: biomes.min_move_cost() * config.jitter_min,
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, min: IVec2, max: IVec2) -> Self {
        self.bounds = Some((min.min(max), min.max(max)));
        self
    }

    pub fn with_max_expanded(mut self, max_expanded: usize) -> Self {
        self.max_expanded = max_expanded;
        self
    }

    fn in_bounds(&self, p: IVec2) -> bool {
        match self.bounds {
            Some((min, max)) => p.cmpge(min).all() && p.cmple(max).all(),
            None => true,
        }
    }

    /// Heuristic scale for a search over `map`: the configured scale,
    /// lowered to the map's cost floor when that is smaller.
    fn scale_for(&self, map: &impl CostMap) -> f32 {
        let scale = self.heuristic_scale.max(0.0);
        match map.cost_floor() {
            Some(floor) if floor < scale => floor.max(0.0),
            _ => scale,
        }
    }

    /// Cheapest 4-directional route from `start` to `goal`, or `None` when
    /// no route exists inside the bounds and expansion budget.
    pub fn find_path(&self, map: &mut impl CostMap, start: IVec2, goal: IVec2) -> Option<Path> {
        if !self.in_bounds(start) || !self.in_bounds(goal) {
            return None;
        }
        if !(map.move_cost(start) > 0.0 && map.move_cost(goal) > 0.0) {
            return None;
        }
        if start == goal {
            return Some(Path { steps: vec![start], cost: 0.0 });
        }

        let scale = self.scale_for(&*map);
        let heuristic = |from: IVec2| manhattan(from, goal) as f32 * scale;

        let mut open = BinaryHeap::new();
        let mut g_score: HashMap<IVec2, f32> = HashMap::new();
        let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
        let mut closed: HashSet<IVec2> = HashSet::new();
        let mut seq = 0u64;

        g_score.insert(start, 0.0);
        open.push(OpenNode { f: heuristic(start), g: 0.0, seq, pos: start });

        while let Some(OpenNode { g, pos, .. }) = open.pop() {
            if pos == goal {
                return Some(Path { steps: reconstruct(&came_from, goal), cost: g });
            }
            if !closed.insert(pos) {
                continue;
            }
            if closed.len() > self.max_expanded {
                log::debug!(
                    "Path search {} -> {} hit expansion budget {}",
                    start, goal, self.max_expanded
                );
                return None;
            }

            for dir in Direction::ORTHOGONAL {
                let next = pos + dir.offset();
                if closed.contains(&next) || !self.in_bounds(next) {
                    continue;
                }
                let cost = map.move_cost(next);
                if !(cost > 0.0) {
                    continue;
                }
                let tentative = g + cost;
                if tentative < g_score.get(&next).copied().unwrap_or(f32::INFINITY) {
                    g_score.insert(next, tentative);
                    came_from.insert(next, pos);
                    seq += 1;
                    open.push(OpenNode {
                        f: tentative + heuristic(next),
                        g: tentative,
                        seq,
                        pos: next,
                    });
                }
            }
        }
        None
    }
}

fn reconstruct(came_from: &HashMap<IVec2, IVec2>, goal: IVec2) -> Vec<IVec2> {
    let mut steps = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        steps.push(prev);
        current = prev;
    }
    steps.reverse();
    steps
}
