//! Edge mask calculator: 8-neighbor similarity bits for autotile lookup.

use serde::{Deserialize, Serialize};

use crate::core::IVec2;
use super::biome::BiomeId;

/// Compass direction of a neighbor. `y` grows southward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// Clockwise from north; index = bit position in [`EdgeMask`].
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    pub const ORTHOGONAL: [Direction; 4] = [Direction::N, Direction::E, Direction::S, Direction::W];

    pub fn bit(self) -> u8 {
        1 << self as u8
    }

    pub fn offset(self) -> IVec2 {
        match self {
            Direction::N => IVec2::new(0, -1),
            Direction::NE => IVec2::new(1, -1),
            Direction::E => IVec2::new(1, 0),
            Direction::SE => IVec2::new(1, 1),
            Direction::S => IVec2::new(0, 1),
            Direction::SW => IVec2::new(-1, 1),
            Direction::W => IVec2::new(-1, 0),
            Direction::NW => IVec2::new(-1, -1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(self, Direction::NE | Direction::SE | Direction::SW | Direction::NW)
    }

    /// The two orthogonal directions flanking a diagonal (None for orthogonals).
    fn flanks(self) -> Option<(Direction, Direction)> {
        match self {
            Direction::NE => Some((Direction::N, Direction::E)),
            Direction::SE => Some((Direction::S, Direction::E)),
            Direction::SW => Some((Direction::S, Direction::W)),
            Direction::NW => Some((Direction::N, Direction::W)),
            _ => None,
        }
    }
}

/// Bit set = neighbor shares the target biome; clear = foreign biome edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeMask(pub u8);

impl EdgeMask {
    pub const NONE: Self = Self(0);
    pub const FULL: Self = Self(0xFF);
    /// N | E | S | W
    pub const ORTHOGONAL: Self = Self(0b0101_0101);

    /// Test each compass neighbor of `at` against `target`.
    pub fn compute(at: IVec2, target: &BiomeId, mut lookup: impl FnMut(IVec2) -> BiomeId) -> Self {
        let mut bits = 0u8;
        for dir in Direction::ALL {
            if lookup(at + dir.offset()) == *target {
                bits |= dir.bit();
            }
        }
        Self(bits)
    }

    pub fn has(self, dir: Direction) -> bool {
        self.0 & dir.bit() != 0
    }

    /// Only the N/E/S/W bits.
    pub fn orthogonal(self) -> Self {
        Self(self.0 & Self::ORTHOGONAL.0)
    }

    /// Every neighbor matches: no transition sprite needed.
    pub fn is_interior(self) -> bool {
        self == Self::FULL
    }

    /// Canonical 47-tile reduction: a diagonal bit only counts when both
    /// flanking orthogonal bits are set. 256 raw masks collapse to 47 values.
    pub fn blob_reduced(self) -> Self {
        let mut bits = self.0;
        for dir in Direction::ALL {
            if let Some((a, b)) = dir.flanks() {
                if !(self.has(a) && self.has(b)) {
                    bits &= !dir.bit();
                }
            }
        }
        Self(bits)
    }
}
