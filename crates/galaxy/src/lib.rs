//! # Galaxy
//!
//! A small 2D arcade shooter on top of `galaxy_engine`.
//!
//! The player ship sits at the bottom of the field below a grid of
//! asteroids while three scripted enemies fly their own paths. Forward shots
//! and aimed fireballs destroy whatever they touch; a toggleable black hole
//! pulls the asteroid field into itself.
//!
//! ## Controls
//!
//! - `w` `a` `s` `d`: thrust
//! - space (on release): forward shot, once per cooldown
//! - left mouse (held): aimed fireball every frame, unless `b` is held
//! - `b` (on release): place or remove the black hole
//! - `q` (held): camera shake, and asteroids may start their dramatic exit
//! - `i` `j` `k` `l`: pan the camera

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod entity;
pub mod scene;
pub mod session;

#[cfg(test)]
mod tests;

pub use config::GameConfig;
pub use scene::Scene;
pub use session::{Session, SimulationContext};
