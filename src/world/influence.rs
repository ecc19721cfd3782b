//! Biome influence resolver: which foreign biome pushes into a tile's edge.
//!
//! Each neighbor that differs from the center adds its biome's power to that
//! biome's score; the highest summed score wins. Summing (rather than taking
//! the strongest single neighbor) makes a biome that wraps around a tile win
//! over one that merely touches a corner.

use std::collections::BTreeMap;

use crate::core::IVec2;
use super::biome::{BiomeId, BiomePowerTable};
use super::mask::Direction;

/// Resolve the dominant foreign neighbor of `at`, or `None` if all eight
/// neighbors share `center`.
///
/// Ties on score go to the higher-power biome, then to the lexically smaller
/// id, so the result never depends on neighbor visiting order.
pub fn resolve_influence(
    center: &BiomeId,
    at: IVec2,
    power: &BiomePowerTable,
    mut lookup: impl FnMut(IVec2) -> BiomeId,
) -> Option<BiomeId> {
    let mut scores: BTreeMap<BiomeId, u32> = BTreeMap::new();
    for dir in Direction::ALL {
        let neighbor = lookup(at + dir.offset());
        if neighbor != *center {
            // Zero-power biomes still register presence.
            let weight = power.power(&neighbor).max(1);
            *scores.entry(neighbor).or_insert(0) += weight;
        }
    }

    scores
        .into_iter()
        .max_by(|(id_a, score_a), (id_b, score_b)| {
            score_a
                .cmp(score_b)
                .then_with(|| power.power(id_a).cmp(&power.power(id_b)))
                .then_with(|| id_b.cmp(id_a))
        })
        .map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: [[&'static str; 3]; 3]) -> impl FnMut(IVec2) -> BiomeId {
        move |p: IVec2| BiomeId::from(rows[(p.y + 1) as usize][(p.x + 1) as usize])
    }

    #[test]
    fn test_no_influence_when_surrounded() {
        let power = BiomePowerTable::default();
        let result = resolve_influence(&"forest".into(), IVec2::ZERO, &power, |_| "forest".into());
        assert_eq!(result, None);
    }

    #[test]
    fn test_summed_score_beats_single_strong_neighbor() {
        // One mountains tile (power 6) vs three desert tiles (3 each = 9).
        let power = BiomePowerTable::default();
        let lookup = grid([
            ["mountains", "plains", "plains"],
            ["plains", "plains", "desert"],
            ["plains", "desert", "desert"],
        ]);
        let result = resolve_influence(&"plains".into(), IVec2::ZERO, &power, lookup);
        assert_eq!(result, Some("desert".into()));
    }

    #[test]
    fn test_tie_broken_by_power() {
        // forest ×3 = 12, mountains ×2 = 12 → mountains has higher power.
        let power = BiomePowerTable::default();
        let lookup = grid([
            ["forest", "forest", "forest"],
            ["plains", "plains", "plains"],
            ["mountains", "plains", "mountains"],
        ]);
        let result = resolve_influence(&"plains".into(), IVec2::ZERO, &power, lookup);
        assert_eq!(result, Some("mountains".into()));
    }

    #[test]
    fn test_tie_broken_by_id_when_power_equal() {
        let power = BiomePowerTable::new(Vec::<(BiomeId, u32)>::new());
        let lookup = grid([
            ["zeta", "c", "c"],
            ["c", "c", "c"],
            ["c", "c", "alpha"],
        ]);
        let result = resolve_influence(&"c".into(), IVec2::ZERO, &power, lookup);
        assert_eq!(result, Some("alpha".into()));
    }

    #[test]
    fn test_offsets_relative_to_position() {
        let power = BiomePowerTable::default();
        let at = IVec2::new(100, -50);
        let result = resolve_influence(&"plains".into(), at, &power, |p| {
            if p == at + IVec2::new(0, 1) { "tundra".into() } else { "plains".into() }
        });
        assert_eq!(result, Some("tundra".into()));
    }
}
