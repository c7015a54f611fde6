//! Simulation session
//!
//! A [`Session`] owns everything one running game needs: the scene, the
//! camera, the input state and the shot cooldown. It is the only writer of
//! that state; each frame runs the fixed pipeline in [`Session::frame`].

use galaxy_engine::foundation::math::Vec2;
use galaxy_engine::foundation::time::Cooldown;
use galaxy_engine::input::{InputEvent, InputState, KeyCode};
use galaxy_engine::render::{Camera2D, RenderBackend, RenderResult};
use galaxy_engine::{AppError, Application};

use crate::config::GameConfig;
use crate::entity::motion::Thrust;
use crate::entity::EntityKey;
use crate::scene::Scene;

/// Per-frame inputs to entity motion
#[derive(Debug, Clone, Copy)]
pub struct SimulationContext<'a> {
    /// Frame step in seconds
    pub dt: f32,
    /// Scene time
    pub elapsed: f32,
    /// Gravity well position, if one is placed
    pub gravity_well: Option<Vec2>,
    /// Keyboard and pointer state
    pub input: &'a InputState,
}

impl<'a> SimulationContext<'a> {
    /// Bundle the inputs for one update pass
    pub fn new(dt: f32, elapsed: f32, gravity_well: Option<Vec2>, input: &'a InputState) -> Self {
        Self { dt, elapsed, gravity_well, input }
    }

    /// Directions the player is holding
    pub fn thrust(&self) -> Thrust {
        Thrust::from(self.input)
    }
}

/// One running game
#[derive(Debug)]
pub struct Session {
    scene: Scene,
    camera: Camera2D,
    input: InputState,
    cooldown: Cooldown,
    config: GameConfig,
}

impl Session {
    /// Session for a configuration; call [`Session::initialize`] before the first frame
    pub fn new(config: GameConfig) -> Self {
        let camera = Camera2D::new(Vec2::from(config.camera.center), Vec2::from(config.camera.half_extents))
            .with_pan_speed(config.camera.pan_speed);
        Self {
            scene: Scene::new(config.assets.clone(), config.gameplay.clone()),
            camera,
            input: InputState::new(config.window.width, config.window.height),
            cooldown: Cooldown::ready_now(),
            config,
        }
    }

    /// Build the scene; shader failures are returned
    pub fn initialize(&mut self, backend: &mut dyn RenderBackend) -> RenderResult<()> {
        self.scene.initialize(backend)
    }

    /// Apply a window event
    ///
    /// Releasing space fires a forward shot; releasing b toggles the black hole.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match self.input.handle_event(event) {
            Some(KeyCode::SPACE) => {
                self.shoot_projectile();
            }
            Some(KeyCode::B) => self.scene.toggle_black_hole(),
            _ => {}
        }
    }

    /// Fire a forward shot if the cooldown allows
    pub fn shoot_projectile(&mut self) -> Option<EntityKey> {
        if self.cooldown.try_trigger(self.config.gameplay.projectile_cooldown) {
            self.scene.spawn_projectile()
        } else {
            log::debug!("Projectile on cooldown");
            None
        }
    }

    /// Run one frame at wall-clock time `t` after a step of `dt`
    pub fn frame(&mut self, backend: &mut dyn RenderBackend, dt: f32, t: f64) -> RenderResult<()> {
        self.camera.update(&self.input, dt, t);
        self.cooldown.advance(dt);

        let scene_time = (t * self.config.gameplay.time_scale) as f32;
        self.scene.set_time(backend, scene_time);
        let ctx = SimulationContext::new(dt, scene_time, self.scene.gravity_well(), &self.input);
        self.scene.update(&ctx);

        if self.input.mouse_down() && !self.input.is_key_down(KeyCode::B) {
            let target = self.camera.ndc_to_world(&self.input.pointer());
            self.scene.spawn_fireball(target);
        }
        if self.input.is_key_down(KeyCode::Q) {
            self.scene.asteroid_disappear();
        }

        backend.clear(self.config.window.clear_color);
        self.scene.draw(backend, &self.camera)
    }

    /// The scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, for scripted setups
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The camera
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// The input state
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// The configuration the session was built from
    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

impl Application for Session {
    fn initialize(&mut self, backend: &mut dyn RenderBackend) -> Result<(), AppError> {
        Ok(Session::initialize(self, backend)?)
    }

    fn handle_event(&mut self, event: &InputEvent) -> Result<(), AppError> {
        Session::handle_event(self, event);
        Ok(())
    }

    fn frame(&mut self, backend: &mut dyn RenderBackend, delta_time: f32, total_time: f64) -> Result<(), AppError> {
        Ok(Session::frame(self, backend, delta_time, total_time)?)
    }

    fn cleanup(&mut self) {
        log::info!(
            "Session ended with {} entities, {} asteroids, {} explosions",
            self.scene.len(),
            self.scene.asteroid_count(),
            self.scene.explosions_spawned()
        );
    }
}
