//! Motion rules for each entity kind
//!
//! Closed-form paths are pure functions of scene time. Integrated motion
//! (thrust, gravity) takes the state it mutates explicitly.

use bitflags::bitflags;
use galaxy_engine::foundation::math::{try_normalize, Vec2};

/// Avatar speed at rest
pub const AVATAR_BASE_VELOCITY: f32 = 0.3;
/// Avatar inverse mass
pub const AVATAR_INV_MASS: f32 = 0.3;
/// Avatar force at rest
pub const AVATAR_REST_FORCE: f32 = 1.0;
/// Force growth per second while a direction key is held
pub const AVATAR_THRUST_RATE: f32 = 2.0;
/// Force growth per second while coasting
pub const AVATAR_BRAKE_RATE: f32 = 4.0;
/// Coasting stops once velocity falls below this
pub const AVATAR_REST_THRESHOLD: f32 = 0.4;

/// Forward shot speed
pub const PROJECTILE_SPEED: f32 = 2.0;
/// Distance a forward shot travels before expiring
pub const PROJECTILE_RANGE: f32 = 1.0;
/// Aimed shot speed
pub const FIREBALL_SPEED: f32 = 2.0;
/// Half size of the box around the spawn point an aimed shot may travel in
pub const FIREBALL_RANGE: f32 = 1.5;

/// Gravity well mass
pub const WELL_MASS: f32 = 40.0;
/// Asteroid mass
pub const ASTEROID_MASS: f32 = 0.5;
/// Gravitational constant
pub const GRAVITY: f32 = 9.81;
/// Distance scale applied before the force law
pub const DISTANCE_SCALE: f32 = 100.0;
/// Velocity to displacement scale
pub const DISPLACEMENT_SCALE: f32 = 1000.0;
/// Asteroid velocity at spawn
pub const ASTEROID_INITIAL_VELOCITY: f32 = 0.0001;

/// Seeker stops closing within this distance on both axes
pub const SEEKER_DEADBAND: f32 = 0.1;
/// Seeker closing speed
pub const SEEKER_SPEED: f32 = 0.4;

bitflags! {
    /// Directions the avatar is moving in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Thrust: u8 {
        /// -x
        const LEFT = 1 << 0;
        /// +x
        const RIGHT = 1 << 1;
        /// +y
        const UP = 1 << 2;
        /// -y
        const DOWN = 1 << 3;
    }
}

impl Thrust {
    /// Unit step per set direction; opposite directions cancel
    pub fn axis(self) -> Vec2 {
        let mut axis = Vec2::zeros();
        if self.contains(Self::LEFT) {
            axis.x -= 1.0;
        }
        if self.contains(Self::RIGHT) {
            axis.x += 1.0;
        }
        if self.contains(Self::UP) {
            axis.y += 1.0;
        }
        if self.contains(Self::DOWN) {
            axis.y -= 1.0;
        }
        axis
    }
}

/// Player ship drive state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarDrive {
    /// Current speed
    pub velocity: f32,
    /// Last computed acceleration
    pub acceleration: f32,
    /// Accumulated force
    pub force: f32,
    /// Directions still coasting after release
    pub coasting: Thrust,
}

impl Default for AvatarDrive {
    fn default() -> Self {
        Self {
            velocity: AVATAR_BASE_VELOCITY,
            acceleration: 0.0,
            force: AVATAR_REST_FORCE,
            coasting: Thrust::empty(),
        }
    }
}

impl AvatarDrive {
    /// Advance one frame and return the displacement
    ///
    /// Holding any direction accelerates; once released the ship keeps
    /// moving in the last held directions while braking, and settles back
    /// to rest when slow enough.
    pub fn step(&mut self, held: Thrust, dt: f32) -> Vec2 {
        if held.is_empty() {
            self.force += AVATAR_BRAKE_RATE * dt;
            self.acceleration = self.force * AVATAR_INV_MASS;
            self.velocity -= self.acceleration * dt;
            let displacement = self.coasting.axis() * (self.velocity * dt);
            if self.velocity < AVATAR_REST_THRESHOLD {
                *self = Self::default();
            }
            displacement
        } else {
            self.force += AVATAR_THRUST_RATE * dt;
            self.acceleration = self.force * AVATAR_INV_MASS;
            self.velocity += self.acceleration * dt;
            self.coasting |= held;
            held.axis() * (self.velocity * dt)
        }
    }
}

/// Heart curve position for scene time `elapsed`
pub fn heart_position(elapsed: f32) -> Vec2 {
    let t = elapsed / 2.0;
    let scale = 15.0;
    Vec2::new(
        16.0 * t.sin().powi(3) / scale,
        (13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos()) / scale,
    )
}

/// Four-petal rose position for scene time `elapsed`
pub fn egg_position(elapsed: f32) -> Vec2 {
    let t = elapsed / 2.0;
    let k = 2.0;
    let radius = (k * t).cos();
    Vec2::new(radius * t.cos(), radius * t.sin())
}

/// Displacement of an asteroid pulled towards a gravity well
///
/// Updates `velocity` in place. The force term is `g * (m1 * m2) / r * r`
/// evaluated left to right, which cancels `r`. The step never carries the
/// asteroid past the well.
pub fn gravity_step(position: &Vec2, well: &Vec2, velocity: &mut f32, dt: f32) -> Vec2 {
    let path = well - position;
    let distance = path.norm();
    let Some(direction) = try_normalize(&path) else {
        return Vec2::zeros();
    };

    let r = distance * DISTANCE_SCALE;
    let force = GRAVITY * ((WELL_MASS * ASTEROID_MASS) / r * r);
    let acceleration = force * (1.0 / ASTEROID_MASS);
    *velocity += acceleration * dt;

    let step = *velocity * (dt / DISPLACEMENT_SCALE);
    if step >= distance {
        path
    } else {
        direction * step
    }
}

/// Seeker displacement towards `target`, or `None` inside the deadband
pub fn seek_step(position: &Vec2, target: &Vec2, dt: f32) -> Option<(Vec2, Vec2)> {
    let path = target - position;
    if path.x.abs() <= SEEKER_DEADBAND && path.y.abs() <= SEEKER_DEADBAND {
        return None;
    }
    let direction = try_normalize(&path)?;
    Some((direction, direction * (dt / 5.0) * 2.0))
}

/// Whether a forward shot has flown past its range
pub fn projectile_expired(position: &Vec2, origin: &Vec2) -> bool {
    position.y > origin.y + PROJECTILE_RANGE
}

/// Whether an aimed shot has left the box around its spawn point
pub fn fireball_expired(position: &Vec2, origin: &Vec2) -> bool {
    position.y > origin.y + FIREBALL_RANGE
        || position.y < origin.y - FIREBALL_RANGE
        || position.x > origin.x + FIREBALL_RANGE
        || position.x < origin.x - FIREBALL_RANGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_thrust_accelerates() {
        let mut drive = AvatarDrive::default();
        let step = drive.step(Thrust::RIGHT, 0.1);
        // force 1.2, acceleration 0.36, velocity 0.336
        assert_relative_eq!(drive.velocity, 0.336, epsilon = 1e-6);
        assert_relative_eq!(step, Vec2::new(0.0336, 0.0), epsilon = 1e-6);
        assert_eq!(drive.coasting, Thrust::RIGHT);
    }

    #[test]
    fn test_coast_settles_to_rest() {
        let mut drive = AvatarDrive::default();
        for _ in 0..30 {
            drive.step(Thrust::UP | Thrust::LEFT, 1.0 / 60.0);
        }
        assert!(drive.velocity > AVATAR_REST_THRESHOLD);

        let mut frames = 0;
        while drive != AvatarDrive::default() {
            let step = drive.step(Thrust::empty(), 1.0 / 60.0);
            assert!(step.y >= 0.0 && step.x <= 0.0);
            frames += 1;
            assert!(frames < 600);
        }
        assert_relative_eq!(drive.velocity, AVATAR_BASE_VELOCITY);
        assert_relative_eq!(drive.force, AVATAR_REST_FORCE);

        // Rest state is stable.
        drive.step(Thrust::empty(), 1.0 / 60.0);
        assert_eq!(drive, AvatarDrive::default());
    }

    #[test]
    fn test_heart_curve_known_points() {
        assert_relative_eq!(heart_position(0.0), Vec2::new(0.0, 5.0 / 15.0), epsilon = 1e-6);
        let top = heart_position(std::f32::consts::PI);
        assert_relative_eq!(top.x, 16.0 / 15.0, epsilon = 1e-5);
    }

    #[test]
    fn test_egg_curve_passes_origin() {
        let p = egg_position(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(p, Vec2::zeros(), epsilon = 1e-6);
        assert_relative_eq!(egg_position(0.0), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_gravity_pulls_towards_well() {
        let mut velocity = ASTEROID_INITIAL_VELOCITY;
        let position = Vec2::new(1.0, 0.4);
        let well = Vec2::new(0.0, 0.4);
        let step = gravity_step(&position, &well, &mut velocity, 1.0 / 60.0);
        assert!(step.x < 0.0);
        assert_relative_eq!(step.y, 0.0);
        assert!(velocity > ASTEROID_INITIAL_VELOCITY);
    }

    #[test]
    fn test_gravity_never_overshoots() {
        let mut velocity = 1.0e6;
        let position = Vec2::new(0.01, 0.4);
        let well = Vec2::new(0.0, 0.4);
        let step = gravity_step(&position, &well, &mut velocity, 1.0);
        assert_relative_eq!(position + step, well, epsilon = 1e-6);
        assert_eq!(gravity_step(&well, &well, &mut velocity, 1.0), Vec2::zeros());
    }

    #[test]
    fn test_seeker_deadband() {
        assert!(seek_step(&Vec2::zeros(), &Vec2::new(0.05, -0.08), 0.1).is_none());
        let (direction, step) = seek_step(&Vec2::zeros(), &Vec2::new(0.0, -1.0), 0.5).unwrap();
        assert_relative_eq!(direction, Vec2::new(0.0, -1.0));
        assert_relative_eq!(step.norm(), SEEKER_SPEED * 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_shot_ranges() {
        let origin = Vec2::new(0.0, -0.65);
        assert!(!projectile_expired(&Vec2::new(0.0, 0.3), &origin));
        assert!(projectile_expired(&Vec2::new(0.0, 0.36), &origin));
        assert!(fireball_expired(&Vec2::new(-1.6, -0.65), &origin));
        assert!(!fireball_expired(&Vec2::new(1.4, 0.8), &origin));
    }
}
