//! Game configuration
//!
//! Everything here has a sensible default, so a missing or partial
//! `galaxy.toml` still runs the stock level. Physics constants are not
//! configurable; they live with the entity kinds.

use galaxy_engine::config::Config;
use galaxy_engine::input::{InputEvent, KeyCode, MouseButton};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    /// Window settings
    pub window: WindowConfig,

    /// Camera settings
    pub camera: CameraConfig,

    /// Texture locations
    pub assets: AssetConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Headless session settings
    pub session: SessionConfig,
}

impl Config for GameConfig {}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in pixels
    pub width: u32,

    /// Window height in pixels
    pub height: u32,

    /// Background color
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: 512, height: 512, clear_color: [0.07, 0.01, 0.16, 1.0] }
    }
}

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial view center
    pub center: [f32; 2],

    /// Half the visible width and height
    pub half_extents: [f32; 2],

    /// Pan speed in world units per second
    pub pan_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { center: [0.0, 0.0], half_extents: [1.5, 1.5], pan_speed: 1.0 }
    }
}

/// Texture file names, relative to `texture_dir`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding every texture
    pub texture_dir: String,
    /// Player ship
    pub spaceship: String,
    /// Heart-path enemy sprite-sheet
    pub orb: String,
    /// Egg-path enemy
    pub rocket: String,
    /// Seeker enemy
    pub fish: String,
    /// Asteroid variants, picked at random per grid cell
    pub asteroids: Vec<String>,
    /// Forward shot
    pub bullet: String,
    /// Aimed shot
    pub fireball: String,
    /// Explosion sprite-sheet
    pub boom: String,
    /// Gravity well marker
    pub black_hole: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            texture_dir: "resources/textures".to_string(),
            spaceship: "spaceship.png".to_string(),
            orb: "orb.png".to_string(),
            rocket: "rocket.png".to_string(),
            fish: "fish.png".to_string(),
            asteroids: vec![
                "asteroid.png".to_string(),
                "asteroid1.png".to_string(),
                "asteroid2.png".to_string(),
                "asteroid3.png".to_string(),
            ],
            bullet: "bullet.png".to_string(),
            fireball: "fireball.png".to_string(),
            boom: "boom.png".to_string(),
            black_hole: "blackhole.png".to_string(),
        }
    }
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Asteroid grid is `grid_size x grid_size`
    pub grid_size: usize,

    /// Position of grid cell (0, 0)
    pub grid_origin: [f32; 2],

    /// Distance between neighboring cells
    pub grid_spacing: f32,

    /// Chance per cell per frame of starting the dramatic exit while q is held
    pub dramatic_exit_chance: f64,

    /// Seconds between forward shots
    pub projectile_cooldown: f32,

    /// Multiplier from wall-clock seconds to scene time
    pub time_scale: f64,

    /// Seed for the asteroid layout and exit rolls; wall-clock when absent
    pub seed: Option<u64>,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            grid_size: 6,
            grid_origin: [-0.75, -0.4],
            grid_spacing: 0.3,
            dramatic_exit_chance: 0.001,
            projectile_cooldown: 1.0,
            time_scale: 2.0,
            seed: None,
        }
    }
}

impl GameplayConfig {
    /// Dramatic-exit chance as a probability; non-finite values disable the exit
    pub fn exit_probability(&self) -> f64 {
        if self.dramatic_exit_chance.is_finite() {
            self.dramatic_exit_chance.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// One scripted input action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptedAction {
    /// Press a key
    KeyDown {
        /// Key character
        key: char,
    },
    /// Release a key
    KeyUp {
        /// Key character
        key: char,
    },
    /// Press the left button at a pixel position
    MouseDown {
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
    /// Release the left button at a pixel position
    MouseUp {
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
    /// Move the pointer
    MouseMove {
        /// Pointer x in pixels
        x: f32,
        /// Pointer y in pixels
        y: f32,
    },
}

impl ScriptedAction {
    /// Window event for this action
    pub fn to_event(self) -> InputEvent {
        match self {
            Self::KeyDown { key } => InputEvent::KeyPressed(KeyCode::from_char(key)),
            Self::KeyUp { key } => InputEvent::KeyReleased(KeyCode::from_char(key)),
            Self::MouseDown { x, y } => InputEvent::MouseButton { button: MouseButton::Left, pressed: true, x, y },
            Self::MouseUp { x, y } => InputEvent::MouseButton { button: MouseButton::Left, pressed: false, x, y },
            Self::MouseMove { x, y } => InputEvent::MouseMoved { x, y },
        }
    }
}

/// An action fired at a point in wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Seconds since the session started
    pub at: f64,
    /// What happens
    #[serde(flatten)]
    pub action: ScriptedAction,
}

/// Headless session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames to simulate
    pub frames: u64,

    /// Fixed frame step in seconds
    pub dt: f32,

    /// `env_logger` filter; `RUST_LOG` applies when absent
    pub log_filter: Option<String>,

    /// Input replayed during the run, ordered by time
    pub timeline: Vec<ScriptedInput>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let at = |at, action| ScriptedInput { at, action };
        Self {
            frames: 600,
            dt: 1.0 / 60.0,
            log_filter: None,
            timeline: vec![
                at(0.5, ScriptedAction::KeyDown { key: ' ' }),
                at(0.55, ScriptedAction::KeyUp { key: ' ' }),
                at(1.0, ScriptedAction::KeyDown { key: 'a' }),
                at(1.4, ScriptedAction::KeyUp { key: 'a' }),
                at(2.0, ScriptedAction::MouseDown { x: 200.0, y: 180.0 }),
                at(2.3, ScriptedAction::MouseUp { x: 200.0, y: 180.0 }),
                at(3.0, ScriptedAction::KeyDown { key: 'b' }),
                at(3.05, ScriptedAction::KeyUp { key: 'b' }),
                at(4.0, ScriptedAction::KeyDown { key: 'q' }),
                at(6.0, ScriptedAction::KeyUp { key: 'q' }),
                at(7.0, ScriptedAction::KeyDown { key: 'b' }),
                at(7.05, ScriptedAction::KeyUp { key: 'b' }),
                at(8.0, ScriptedAction::KeyDown { key: ' ' }),
                at(8.05, ScriptedAction::KeyUp { key: ' ' }),
            ],
        }
    }
}
