//! Core type aliases and re-exports

pub use glam::IVec2;

/// Standard Result type for the world core
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Euclidean distance between two tile coordinates.
pub fn tile_distance(a: IVec2, b: IVec2) -> f32 {
    a.as_vec2().distance(b.as_vec2())
}

/// Manhattan distance between two tile coordinates.
pub fn manhattan(a: IVec2, b: IVec2) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_distance() {
        assert_eq!(tile_distance(IVec2::ZERO, IVec2::new(3, 4)), 5.0);
        assert_eq!(tile_distance(IVec2::new(-2, -2), IVec2::new(-2, -2)), 0.0);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(IVec2::ZERO, IVec2::new(3, 4)), 7);
        assert_eq!(manhattan(IVec2::new(-3, 2), IVec2::new(3, -2)), 10);
    }
}
