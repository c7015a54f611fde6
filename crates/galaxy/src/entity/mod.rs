//! Game entities
//!
//! One [`Entity`] type covers every game object. Kind-specific state lives in
//! [`EntityKind`]; which behaviors a kind takes part in is declared once in
//! [`EntityKind::capabilities`]. Each behavior checks its capability before
//! reading the kind-specific state.

pub mod motion;

use bitflags::bitflags;
use galaxy_engine::foundation::collections::new_key_type;
use galaxy_engine::foundation::math::{heading_from_direction, model_view, try_normalize, Mat4, Vec2};
use galaxy_engine::physics::BoundingCircle;
use galaxy_engine::render::shader::animation_frame;
use galaxy_engine::render::{Mesh, RenderBackend, RenderResult, ShaderKind, ShaderLibrary};

use crate::session::SimulationContext;
use motion::{AvatarDrive, Thrust};

new_key_type! {
    /// Stable handle to an entity in a scene
    pub struct EntityKey;
}

/// Radius of the shot-versus-enemy hit test
pub const HIT_RADIUS: f32 = 0.2;
/// Asteroids below this scale on either axis are removed
pub const MIN_ASTEROID_SCALE: f32 = 0.01;
/// Scale lost per frame during the dramatic exit
pub const DRAMATIC_SHRINK: f32 = 0.0001;
/// Degrees turned per frame during the dramatic exit
pub const DRAMATIC_SPIN: f32 = 60.0;
/// Explosions are removed after this much scene time
pub const EXPLOSION_LIFETIME: f32 = 3.4;
/// Explosion sprite-sheet plays faster than scene time
pub const EXPLOSION_TIME_SCALE: f32 = 1.5;
/// Heading of the egg sprite when travelling straight up
pub const EGG_BASE_HEADING: f32 = 180.0;
/// Heading of the seeker sprite when travelling straight up
pub const SEEKER_BASE_HEADING: f32 = 270.0;

bitflags! {
    /// Behaviors an entity kind takes part in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u16 {
        /// Position changes during update
        const MOVES = 1 << 0;
        /// Hit-tests every other entity after moving
        const INITIATES_COLLISION = 1 << 1;
        /// Can be destroyed by a shot
        const HITTABLE = 1 << 2;
        /// Explodes when destroyed
        const ENEMY = 1 << 3;
        /// Receives the scene clock for sprite animation
        const TIME_AWARE = 1 << 4;
        /// Removed when its animation has played out
        const EXPLODES_ON_TIMER = 1 << 5;
        /// Can start the shrink-and-spin exit
        const DRAMATIC = 1 << 6;
        /// Marks the gravity well
        const BLACK_HOLE = 1 << 7;
    }
}

/// Position, scale and heading of a sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World position
    pub position: Vec2,
    /// Per-axis scale
    pub scale: Vec2,
    /// Heading in degrees
    pub orientation: f32,
}

impl Transform {
    /// Uniformly scaled transform
    pub fn new(position: Vec2, scale: f32, orientation: f32) -> Self {
        Self { position, scale: Vec2::new(scale, scale), orientation }
    }

    /// Model-view matrix under a camera view
    pub fn matrix(&self, view: &Mat4) -> Mat4 {
        model_view(&self.scale, self.orientation, &self.position, view)
    }
}

/// Asteroid state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidState {
    /// Speed towards the gravity well
    pub velocity: f32,
    /// Whether the dramatic exit has started
    pub dramatic: bool,
    /// Cleared when the dramatic exit starts, so the asteroid leaves quietly
    pub enemy: bool,
}

impl Default for AsteroidState {
    fn default() -> Self {
        Self { velocity: motion::ASTEROID_INITIAL_VELOCITY, dramatic: false, enemy: true }
    }
}

/// Kind-specific entity state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityKind {
    /// Player ship
    Avatar(AvatarDrive),
    /// Forward shot
    Projectile {
        /// Spawn point
        origin: Vec2,
    },
    /// Aimed shot
    Fireball {
        /// Spawn point
        origin: Vec2,
        /// Unit travel direction
        direction: Vec2,
    },
    /// Grid asteroid
    Asteroid(AsteroidState),
    /// Enemy tracing a heart curve
    Heart,
    /// Enemy tracing a four-petal rose
    Egg,
    /// Enemy homing on another entity
    Seeker {
        /// Entity being chased
        target: Option<EntityKey>,
    },
    /// Explosion animation
    Explosion {
        /// Scene time at spawn
        spawned_at: f32,
    },
    /// Gravity well marker
    BlackHole,
}

impl EntityKind {
    /// Behaviors this kind takes part in
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Self::Avatar(_) => Capabilities::MOVES,
            Self::Projectile { .. } | Self::Fireball { .. } => {
                Capabilities::MOVES | Capabilities::INITIATES_COLLISION
            }
            Self::Asteroid(_) => {
                Capabilities::MOVES | Capabilities::HITTABLE | Capabilities::ENEMY | Capabilities::DRAMATIC
            }
            Self::Heart => {
                Capabilities::MOVES | Capabilities::HITTABLE | Capabilities::ENEMY | Capabilities::TIME_AWARE
            }
            Self::Egg | Self::Seeker { .. } => Capabilities::MOVES | Capabilities::HITTABLE | Capabilities::ENEMY,
            Self::Explosion { .. } => Capabilities::TIME_AWARE | Capabilities::EXPLODES_ON_TIMER,
            Self::BlackHole => Capabilities::BLACK_HOLE,
        }
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Avatar(_) => "avatar",
            Self::Projectile { .. } => "projectile",
            Self::Fireball { .. } => "fireball",
            Self::Asteroid(_) => "asteroid",
            Self::Heart => "heart",
            Self::Egg => "egg",
            Self::Seeker { .. } => "seeker",
            Self::Explosion { .. } => "explosion",
            Self::BlackHole => "black hole",
        }
    }
}

/// A game object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Placement
    pub transform: Transform,
    /// Kind-specific state
    pub kind: EntityKind,
    /// What to draw
    pub mesh: Mesh,
    /// Which shared program draws it
    pub shader: ShaderKind,
    deleted: bool,
}

impl Entity {
    /// Create a live entity
    pub fn new(kind: EntityKind, transform: Transform, mesh: Mesh, shader: ShaderKind) -> Self {
        Self { transform, kind, mesh, shader, deleted: false }
    }

    /// Behaviors of this entity's kind
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// World position
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Whether the entity has been marked for removal
    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Upload the model-view matrix to the entity's program
    pub fn upload_transform(&self, backend: &mut dyn RenderBackend, shaders: &ShaderLibrary, view: &Mat4) {
        shaders.get(self.shader).upload_transform(backend, &self.transform.matrix(view));
    }

    /// Select the program, upload the transform and draw the mesh
    pub fn draw(&self, backend: &mut dyn RenderBackend, shaders: &ShaderLibrary, view: &Mat4) -> RenderResult<()> {
        let program = shaders.get(self.shader);
        program.bind(backend);
        self.upload_transform(backend, shaders, view);
        self.mesh.draw(backend, program)
    }

    /// Forward the scene clock to the sprite animation
    ///
    /// Only sprite-sheet kinds (`TIME_AWARE`) take part; explosions play
    /// their sheet [`EXPLOSION_TIME_SCALE`] times faster.
    pub fn set_time(&self, backend: &mut dyn RenderBackend, shaders: &ShaderLibrary, time: f32) {
        let capabilities = self.capabilities();
        if !capabilities.contains(Capabilities::TIME_AWARE) {
            return;
        }
        let time = if capabilities.contains(Capabilities::EXPLODES_ON_TIMER) {
            time * EXPLOSION_TIME_SCALE
        } else {
            time
        };
        let program = shaders.get(self.shader);
        program.bind(backend);
        program.upload_time(backend, time);
    }

    /// Advance kind-specific motion by one frame
    ///
    /// `target` is the current position of the entity a seeker chases.
    pub fn advance(&mut self, ctx: &SimulationContext<'_>, target: Option<Vec2>) {
        if !self.capabilities().contains(Capabilities::MOVES) {
            return;
        }
        let transform = &mut self.transform;
        match &mut self.kind {
            EntityKind::Avatar(drive) => {
                transform.position += drive.step(ctx.thrust(), ctx.dt);
            }
            EntityKind::Projectile { origin } => {
                transform.position.y += ctx.dt * motion::PROJECTILE_SPEED;
                if motion::projectile_expired(&transform.position, origin) {
                    self.deleted = true;
                }
            }
            EntityKind::Fireball { origin, direction } => {
                transform.position += *direction * ctx.dt * motion::FIREBALL_SPEED;
                if motion::fireball_expired(&transform.position, origin) {
                    self.deleted = true;
                }
            }
            EntityKind::Asteroid(state) => {
                if let Some(well) = ctx.gravity_well {
                    transform.position += motion::gravity_step(&transform.position, &well, &mut state.velocity, ctx.dt);
                }
            }
            EntityKind::Heart => {
                transform.position = motion::heart_position(ctx.elapsed);
            }
            EntityKind::Egg => {
                let next = motion::egg_position(ctx.elapsed);
                if let Some(direction) = try_normalize(&(next - transform.position)) {
                    if let Some(heading) = heading_from_direction(&direction, EGG_BASE_HEADING) {
                        transform.orientation = heading;
                    }
                }
                transform.position = next;
            }
            EntityKind::Seeker { .. } => {
                if let Some((direction, step)) =
                    target.and_then(|target| motion::seek_step(&transform.position, &target, ctx.dt))
                {
                    if let Some(heading) = heading_from_direction(&direction, SEEKER_BASE_HEADING) {
                        transform.orientation = heading;
                    }
                    transform.position += step;
                }
            }
            EntityKind::Explosion { .. } | EntityKind::BlackHole => {}
        }
    }

    /// Hit test against a shot at `aggressor`; on a hit this entity is marked deleted
    ///
    /// Returns whether the shot connected, so the caller can tell the
    /// aggressor through [`Entity::target_hit`].
    pub fn hit_by_projectile(&mut self, aggressor: &Vec2) -> bool {
        if self.deleted || !self.capabilities().contains(Capabilities::HITTABLE) {
            return false;
        }
        if BoundingCircle::new(self.transform.position, HIT_RADIUS).contains(aggressor) {
            self.deleted = true;
            true
        } else {
            false
        }
    }

    /// A shot fired by this entity connected
    pub fn target_hit(&mut self) {
        match self.kind {
            EntityKind::Projectile { .. } | EntityKind::Fireball { .. } => self.deleted = true,
            EntityKind::Avatar(_)
            | EntityKind::Asteroid(_)
            | EntityKind::Heart
            | EntityKind::Egg
            | EntityKind::Seeker { .. }
            | EntityKind::Explosion { .. }
            | EntityKind::BlackHole => {}
        }
    }

    /// Whether the entity should be removed; shrunken asteroids are marked here
    pub fn should_be_deleted(&mut self) -> bool {
        if let EntityKind::Asteroid(_) = self.kind {
            if self.transform.scale.x < MIN_ASTEROID_SCALE || self.transform.scale.y < MIN_ASTEROID_SCALE {
                self.deleted = true;
            }
        }
        self.deleted
    }

    /// Whether an explosion has finished playing at scene time `elapsed`
    ///
    /// Done once the animation reaches the frame before the one it started
    /// on, or after [`EXPLOSION_LIFETIME`].
    pub fn done_exploding(&self, elapsed: f32) -> bool {
        if !self.capabilities().contains(Capabilities::EXPLODES_ON_TIMER) {
            return false;
        }
        let EntityKind::Explosion { spawned_at } = self.kind else {
            return false;
        };
        let start = animation_frame(spawned_at);
        let current = animation_frame(elapsed);
        (start - 1).rem_euclid(galaxy_engine::render::shader::ANIMATION_FRAMES) == current
            || elapsed - spawned_at > EXPLOSION_LIFETIME
    }

    /// Whether destroying this entity spawns an explosion
    pub fn is_enemy(&self) -> bool {
        match self.kind {
            EntityKind::Asteroid(state) => state.enemy,
            _ => self.capabilities().contains(Capabilities::ENEMY),
        }
    }

    /// Whether this entity marks the gravity well
    pub fn is_black_hole(&self) -> bool {
        self.capabilities().contains(Capabilities::BLACK_HOLE)
    }

    /// Start the shrink-and-spin exit
    pub fn set_dramatic(&mut self) {
        if !self.capabilities().contains(Capabilities::DRAMATIC) {
            return;
        }
        if let EntityKind::Asteroid(state) = &mut self.kind {
            state.dramatic = true;
            state.enemy = false;
        }
    }

    /// One frame of the shrink-and-spin exit, if it has started
    pub fn dramatic_exit(&mut self) {
        let started = matches!(self.kind, EntityKind::Asteroid(AsteroidState { dramatic: true, .. }));
        if started && self.capabilities().contains(Capabilities::DRAMATIC) {
            self.transform.scale -= Vec2::new(DRAMATIC_SHRINK, DRAMATIC_SHRINK);
            self.transform.orientation += DRAMATIC_SPIN;
        }
    }
}

impl From<&galaxy_engine::input::InputState> for Thrust {
    fn from(input: &galaxy_engine::input::InputState) -> Self {
        use galaxy_engine::input::KeyCode;

        let mut thrust = Self::empty();
        thrust.set(Self::LEFT, input.is_key_down(KeyCode::A));
        thrust.set(Self::RIGHT, input.is_key_down(KeyCode::D));
        thrust.set(Self::UP, input.is_key_down(KeyCode::W));
        thrust.set(Self::DOWN, input.is_key_down(KeyCode::S));
        thrust
    }
}
