//! Math utilities and types
//!
//! Provides the 2D math used by sprites and the camera. Matrices follow the
//! row-vector convention: a point is the row `[x y 0 1]` multiplied on the
//! left, so transforms compose left to right (`S * R * T * V`).

pub use nalgebra::{Matrix4, RowVector4, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

/// Non-uniform scaling matrix in the xy plane
pub fn scaling(scale: &Vec2) -> Mat4 {
    Mat4::new(
        scale.x, 0.0, 0.0, 0.0,
        0.0, scale.y, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Rotation about the z axis, angle given in degrees
pub fn rotation_deg(degrees: f32) -> Mat4 {
    let (sin, cos) = utils::deg_to_rad(degrees).sin_cos();
    Mat4::new(
        cos, sin, 0.0, 0.0,
        -sin, cos, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Translation matrix; the offset lives in the fourth row
pub fn translation(offset: &Vec2) -> Mat4 {
    Mat4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        offset.x, offset.y, 0.0, 1.0,
    )
}

/// Compose a sprite's model-view matrix: scale, rotate, translate, then view
pub fn model_view(scale: &Vec2, orientation_deg: f32, position: &Vec2, view: &Mat4) -> Mat4 {
    scaling(scale) * rotation_deg(orientation_deg) * translation(position) * view
}

/// Transform a 2D point by a row-vector matrix
pub fn transform_point(point: &Vec2, matrix: &Mat4) -> Vec2 {
    let row = RowVector4::new(point.x, point.y, 0.0, 1.0) * matrix;
    Vec2::new(row.x / row.w, row.y / row.w)
}

/// Sprite heading for a unit travel direction
///
/// Sprites in the atlas point along different axes, so the caller passes the
/// heading that corresponds to "straight up". The quadrant is taken from the
/// sign of the x component; a purely vertical direction yields `None` and the
/// caller keeps its previous heading.
pub fn heading_from_direction(direction: &Vec2, base_deg: f32) -> Option<f32> {
    let angle = utils::rad_to_deg(direction.y.clamp(-1.0, 1.0).acos());
    if direction.x < 0.0 {
        Some(base_deg + angle)
    } else if direction.x > 0.0 {
        Some(base_deg - angle)
    } else {
        None
    }
}

/// Normalize a vector, returning `None` for zero length
pub fn try_normalize(vector: &Vec2) -> Option<Vec2> {
    let length = vector.norm();
    if length > f32::EPSILON {
        Some(vector / length)
    } else {
        None
    }
}
