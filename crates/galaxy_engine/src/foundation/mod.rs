//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and row-vector transform builders
//! - Collections for generational handles and deferred removal
//! - Frame timing and cooldowns
//! - Logging setup

pub mod math;
pub mod collections;
pub mod time;
pub mod logging;
