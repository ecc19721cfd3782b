//! Constrained site search shared by all placement generators.
//!
//! For each placement index: up to `max_attempts` hashed candidates from the
//! search area, then a spiral sweep outward from the area's origin. A site
//! must lie on an allowed biome and keep its distance from records of the
//! same kind and from any kinds listed in `keep_clear_of`.

use crate::core::{tile_distance, IVec2};
use crate::world::hash::{combine, hash, hash_unit};
use crate::world::{BiomeId, WorldCache};
use super::definitions::{PlacementDef, PlacementRules, SearchArea};
use super::{PlacementDetails, PlacementKind, PlacementRecord};

const DEFINITION_SALT: u64 = 0xDEF0;
const VALUE_SALT: u64 = 0x7A1E;

impl SearchArea {
    /// Deterministic candidate for `(seed, kind, index, attempt)`.
    pub fn candidate(&self, seed: u64, kind: PlacementKind, index: u32, attempt: u32) -> IVec2 {
        let salt = combine(&[kind.salt(), index as u64, attempt as u64]);
        let hx = hash(seed, salt);
        let hy = hash(hx, salt);
        let (min, max) = self.bounds();
        IVec2::new(
            pick_in(hx, min.x as i64, max.x as i64) as i32,
            pick_in(hy, min.y as i64, max.y as i64) as i32,
        )
    }

    /// Inclusive bounding rectangle.
    pub fn bounds(&self) -> (IVec2, IVec2) {
        match *self {
            SearchArea::Square { center, half_extent } => {
                let h = IVec2::splat(half_extent.max(0));
                (center - h, center + h)
            }
            SearchArea::Range { min, max } => (min.min(max), min.max(max)),
        }
    }

    pub fn contains(&self, p: IVec2) -> bool {
        let (min, max) = self.bounds();
        p.cmpge(min).all() && p.cmple(max).all()
    }

    /// Where the fallback spiral starts.
    pub fn origin(&self) -> IVec2 {
        match *self {
            SearchArea::Square { center, .. } => center,
            SearchArea::Range { .. } => {
                let (min, max) = self.bounds();
                (min + max) / 2
            }
        }
    }

    /// Spiral radius that covers the whole area from [`origin`](Self::origin).
    pub fn max_radius(&self) -> i32 {
        let (min, max) = self.bounds();
        let o = self.origin();
        (o - min).max(max - o).max_element()
    }
}

/// Uniform-ish integer in `[lo, hi]` from a hash. Wide enough for both
/// `i32` coordinates and `u32` values.
fn pick_in(h: u64, lo: i64, hi: i64) -> i64 {
    let span = (hi - lo + 1).max(1) as u64;
    lo + (h % span) as i64
}

/// Cells on the square ring at Chebyshev distance `r` around `center`,
/// clockwise from the top-left corner. `r == 0` yields the center.
pub fn ring(center: IVec2, r: i32) -> Vec<IVec2> {
    if r == 0 {
        return vec![center];
    }
    let mut cells = Vec::with_capacity(8 * r as usize);
    for x in -r..r {
        cells.push(center + IVec2::new(x, -r));
    }
    for y in -r..r {
        cells.push(center + IVec2::new(r, y));
    }
    for x in (-r + 1..=r).rev() {
        cells.push(center + IVec2::new(x, r));
    }
    for y in (-r + 1..=r).rev() {
        cells.push(center + IVec2::new(-r, y));
    }
    cells
}

/// Everything needed to judge one candidate site.
pub struct SiteQuery<'a> {
    pub kind: PlacementKind,
    pub index: u32,
    pub definition: &'a PlacementDef,
    pub rules: &'a PlacementRules,
    /// Records from generators that ran earlier.
    pub prior: &'a [PlacementRecord],
    /// Records this generator already accepted.
    pub accepted: &'a [PlacementRecord],
}

impl SiteQuery<'_> {
    /// Distance constraints only (no tile lookup).
    pub fn is_separated(&self, p: IVec2) -> bool {
        let same_kind_ok = self
            .prior
            .iter()
            .chain(self.accepted)
            .filter(|r| r.kind == self.kind)
            .all(|r| tile_distance(r.position, p) >= self.rules.min_separation);
        if !same_kind_ok {
            return false;
        }
        self.rules.keep_clear_of.iter().all(|sep| {
            self.prior
                .iter()
                .chain(self.accepted)
                .filter(|r| r.kind == sep.kind && sep.kind != self.kind)
                .all(|r| tile_distance(r.position, p) >= sep.distance)
        })
    }

    /// Full check: separation first, then the tile's biome.
    pub fn accepts(&self, cache: &mut WorldCache, p: IVec2) -> bool {
        self.is_separated(p) && self.definition.allows(&cache.get_tile(p).biome)
    }

    /// Hashed attempts, then the spiral fallback. `None` if the area holds
    /// no valid site.
    pub fn find_site(&self, seed: u64, cache: &mut WorldCache) -> Option<IVec2> {
        let area = &self.rules.search;
        for attempt in 0..self.definition.max_attempts {
            let p = area.candidate(seed, self.kind, self.index, attempt);
            if self.accepts(cache, p) {
                return Some(p);
            }
        }

        log::debug!(
            "{:?} #{} ('{}'): {} attempts failed, spiral search from {}",
            self.kind, self.index, self.definition.id, self.definition.max_attempts, area.origin()
        );

        let origin = area.origin();
        let stride = self.rules.fallback_stride.max(1);
        for r in (0..=area.max_radius()).step_by(stride as usize) {
            for p in ring(origin, r).into_iter().step_by(stride as usize) {
                if area.contains(p) && self.accepts(cache, p) {
                    return Some(p);
                }
            }
        }
        None
    }
}

/// Weighted, deterministic choice of the definition for an index.
pub fn choose_definition(seed: u64, kind: PlacementKind, index: u32, defs: &[PlacementDef]) -> Option<&PlacementDef> {
    let total: f64 = defs.iter().map(|d| d.weight.max(0.0) as f64).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = hash_unit(seed, combine(&[kind.salt(), index as u64, DEFINITION_SALT])) * total;
    for def in defs {
        let weight = def.weight.max(0.0) as f64;
        if roll < weight {
            return Some(def);
        }
        roll -= weight;
    }
    defs.iter().rev().find(|d| d.weight > 0.0)
}

/// Run the shared scatter loop for one kind.
///
/// `details` builds the kind-specific fields from the chosen definition, the
/// hashed scalar value in `[min_value, max_value]`, and a spare hash for any
/// further derived fields.
pub fn scatter(
    kind: PlacementKind,
    seed: u64,
    cache: &mut WorldCache,
    prior: &[PlacementRecord],
    defs: &[PlacementDef],
    rules: &PlacementRules,
    details: impl Fn(&PlacementDef, u32, u64) -> PlacementDetails,
) -> Vec<PlacementRecord> {
    let mut accepted: Vec<PlacementRecord> = Vec::new();
    let mut skipped = 0u32;

    for index in 0..rules.target_count {
        let Some(definition) = choose_definition(seed, kind, index, defs) else {
            log::warn!("No selectable {:?} definition for index {}, skipping", kind, index);
            skipped += 1;
            continue;
        };

        let query = SiteQuery { kind, index, definition, rules, prior, accepted: &accepted };
        let Some(position) = query.find_site(seed, cache) else {
            log::warn!(
                "No valid site for {:?} #{} ('{}', biomes {:?}) in {:?}; skipping",
                kind, index, definition.id, definition.allowed_biomes, rules.search
            );
            skipped += 1;
            continue;
        };

        let biome: BiomeId = cache.get_tile(position).biome.clone();
        let value_hash = hash(seed, combine(&[kind.salt(), index as u64, VALUE_SALT]));
        let value = pick_in(value_hash, definition.min_value as i64, definition.max_value as i64) as u32;

        accepted.push(PlacementRecord {
            id: format!("{}_{}_{}", kind.prefix(), index, biome),
            kind,
            definition: definition.id.clone(),
            position,
            biome,
            discovered: false,
            visited_day: None,
            details: details(definition, value, hash(value_hash, VALUE_SALT)),
        });
    }

    log::info!(
        "Placed {}/{} {:?} sites ({} skipped)",
        accepted.len(), rules.target_count, kind, skipped
    );
    accepted
}
