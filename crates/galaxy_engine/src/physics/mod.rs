//! 2D collision primitives
//!
//! Hit tests are brute-force distance checks between sprite centers.

use crate::foundation::math::Vec2;

/// A bounding circle for collision detection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCircle {
    /// Center in world space
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl BoundingCircle {
    /// Creates a new bounding circle with the given center and radius
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether a point lies strictly inside the circle
    pub fn contains(&self, point: &Vec2) -> bool {
        (point - self.center).norm() < self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_strict() {
        let circle = BoundingCircle::new(Vec2::zeros(), 0.2);
        assert!(circle.contains(&Vec2::new(0.1, 0.1)));
        assert!(!circle.contains(&Vec2::new(0.25, 0.0)));
        assert!(!circle.contains(&Vec2::new(0.0, 0.5)));
    }
}
