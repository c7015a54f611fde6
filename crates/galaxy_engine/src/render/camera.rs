//! 2D camera
//!
//! An orthographic view described by a center and half extents. The view
//! matrix uses the row-vector convention of [`crate::foundation::math`].

use crate::foundation::math::{transform_point, Mat4, Vec2};
use crate::input::{InputState, KeyCode};

/// Shake frequency while quaking
const SHAKE_FREQUENCY: f64 = 100.0;

/// Shake amplitude divisor
const SHAKE_DIVISOR: f32 = 400.0;

/// Orthographic 2D camera with pan and shake
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    center: Vec2,
    rest_center: Vec2,
    half_extents: Vec2,
    pan_speed: f32,
}

impl Camera2D {
    /// Camera looking at `center`, showing `half_extents` in each direction
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self { center, rest_center: center, half_extents, pan_speed: 1.0 }
    }

    /// Set pan speed in world units per second
    pub fn with_pan_speed(mut self, pan_speed: f32) -> Self {
        self.pan_speed = pan_speed;
        self
    }

    /// Current center, including shake
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// Center without shake
    pub fn rest_center(&self) -> Vec2 {
        self.rest_center
    }

    /// Half extents of the view
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// World to normalized device coordinates
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::new(
            1.0 / self.half_extents.x, 0.0, 0.0, 0.0,
            0.0, 1.0 / self.half_extents.y, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            -self.center.x, -self.center.y, 0.0, 1.0,
        )
    }

    /// Normalized device coordinates back to world space
    pub fn ndc_to_world(&self, point: &Vec2) -> Vec2 {
        match self.view_matrix().try_inverse() {
            Some(inverse) => transform_point(point, &inverse),
            None => *point,
        }
    }

    /// Pan with i/j/k/l and shake while q is held
    ///
    /// Panning moves the resting center. Shaking offsets the live center by
    /// `sin(100 t) / 400` on both axes every frame; the offset accumulates
    /// until q is released, then the view snaps back to the resting center.
    pub fn update(&mut self, input: &InputState, dt: f32, time: f64) {
        let step = self.pan_speed * dt;
        let mut pan = Vec2::zeros();
        if input.is_key_down(KeyCode::I) {
            pan.y += step;
        }
        if input.is_key_down(KeyCode::K) {
            pan.y -= step;
        }
        if input.is_key_down(KeyCode::L) {
            pan.x += step;
        }
        if input.is_key_down(KeyCode::J) {
            pan.x -= step;
        }
        self.rest_center += pan;

        if input.is_key_down(KeyCode::Q) {
            let offset = (SHAKE_FREQUENCY * time).sin() as f32 / SHAKE_DIVISOR;
            self.center += pan + Vec2::new(offset, offset);
        } else {
            self.center = self.rest_center;
        }
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(Vec2::zeros(), Vec2::new(1.5, 1.5))
    }
}
