//! # Galaxy Engine
//!
//! The sprite engine layer under the Galaxy arcade shooter.
//!
//! ## Features
//!
//! - **Sprite Rendering**: textured and sprite-sheet quads behind a backend trait
//! - **Headless Backend**: records draw calls for tests and scripted runs
//! - **Asset Management**: PNG decoding and a per-file texture cache
//! - **Input State**: pressed-key table and normalized pointer
//! - **Configuration**: TOML/RON settings over serde
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use galaxy_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, backend: &mut dyn RenderBackend) -> Result<(), AppError> {
//!         ShaderLibrary::compile(backend)?;
//!         Ok(())
//!     }
//!
//!     fn frame(&mut self, backend: &mut dyn RenderBackend, dt: f32, t: f64) -> Result<(), AppError> {
//!         backend.clear([0.0, 0.0, 0.0, 1.0]);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     let mut backend = HeadlessBackend::new();
//!     run_fixed_steps(&mut MyApp, &mut backend, 60, 1.0 / 60.0, |_, _| Vec::new())?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod input;
pub mod physics;

mod application;

pub use application::{run_fixed_steps, AppError, Application};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        run_fixed_steps, AppError, Application,
        assets::{AssetError, ImageData, TextureCache},
        config::{Config, ConfigError, ConfigFormat},
        foundation::{
            collections::{Key, RemovalQueue, SlotMap},
            math::{Mat4, Vec2},
            time::{Cooldown, Stopwatch, Timer},
        },
        input::{InputEvent, InputState, KeyCode, MouseButton},
        physics::BoundingCircle,
        render::{
            Camera2D, Geometry, GeometryKind, HeadlessBackend, Material, Mesh, RenderBackend,
            RenderError, RenderResult, ShaderKind, ShaderLibrary, ShaderProgram, TextureHandle,
        },
    };
}
