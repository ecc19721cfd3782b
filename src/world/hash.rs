//! Deterministic hashing, the root of all reproducible randomness.
//!
//! Everything random in the world is derived from `hash(seed, salt)`. No
//! input other than seed and salt is ever mixed in, so the same seed always
//! yields the same world.

/// Mix a seed and a salt into a well-distributed 64-bit value.
///
/// SplitMix64 finalizer applied to the combined input.
pub fn hash(seed: u64, salt: u64) -> u64 {
    let mut z = seed
        .wrapping_add(salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(0x6A09_E667_F3BC_C909);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Fold a tile coordinate into a single salt.
///
/// Changing this changes every tile of every saved world.
pub fn combine_xy(x: i32, y: i32) -> u64 {
    ((x as u32 as u64) << 32) | (y as u32 as u64)
}

/// Fold several small integers into one salt (e.g. index + attempt + kind).
pub fn combine(parts: &[u64]) -> u64 {
    parts.iter().fold(0xCBF2_9CE4_8422_2325, |acc, &p| hash(acc, p))
}

/// Hash to a float in [0, 1).
pub fn hash_unit(seed: u64, salt: u64) -> f64 {
    (hash(seed, salt) >> 11) as f64 / (1u64 << 53) as f64
}

/// Small deterministic random stream seeded from a hash.
///
/// Used for per-tile decisions: every draw advances the state, so the order
/// of draws inside a generator is part of the world format.
#[derive(Clone, Debug)]
pub struct TileRng {
    state: u64,
}

impl TileRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Stream for a tile: `hash(seed, combine_xy(x, y))`.
    pub fn for_tile(seed: u64, x: i32, y: i32) -> Self {
        Self::new(hash(seed, combine_xy(x, y)))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        hash(self.state, 0)
    }

    /// Float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Float in [lo, hi).
    pub fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Integer in [lo, hi] (inclusive). Returns `lo` when `hi <= lo`.
    pub fn range_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as u32
    }

    /// True with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}
