//! Time management utilities

use std::time::Instant;

/// Frame clock driven by an external time source
///
/// The windowing layer reports absolute elapsed seconds; the clock turns that
/// into a per-frame step. Steps are always non-negative, even if the source
/// jumps backwards.
#[derive(Debug, Clone)]
pub struct Timer {
    last_time: f64,
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer starting at time zero
    pub fn new() -> Self {
        Self {
            last_time: 0.0,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the given absolute time (seconds) and return the step
    pub fn tick(&mut self, now: f64) -> f32 {
        self.delta_time = (now - self.last_time).abs() as f32;
        self.last_time = now;
        self.total_time = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Advance by a fixed step and return the new absolute time
    pub fn advance(&mut self, step: f32) -> f64 {
        let now = self.last_time + f64::from(step);
        self.tick(now);
        now
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the absolute time of the last tick
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average simulated FPS since the timer was created
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            (self.frame_count as f64 / self.total_time) as f32
        } else {
            0.0
        }
    }
}

/// Rate limiter for repeated actions
///
/// The cooldown is ready while its accumulator is non-negative. Triggering it
/// pushes the accumulator to `-duration`; every frame step counts back up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooldown {
    accumulator: f32,
}

impl Default for Cooldown {
    fn default() -> Self {
        Self::ready_now()
    }
}

impl Cooldown {
    /// A cooldown that is ready immediately
    pub fn ready_now() -> Self {
        Self { accumulator: 0.0 }
    }

    /// Count a frame step towards readiness
    pub fn advance(&mut self, dt: f32) {
        self.accumulator += dt;
    }

    /// Whether the action may fire
    pub fn ready(&self) -> bool {
        self.accumulator >= 0.0
    }

    /// Fire the action if ready, starting a new cooldown of `duration` seconds
    pub fn try_trigger(&mut self, duration: f32) -> bool {
        if self.ready() {
            self.accumulator = -duration;
            true
        } else {
            false
        }
    }
}

/// Wall-clock stopwatch for measuring real elapsed time
pub struct Stopwatch {
    start: Instant,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start_new()
    }
}

impl Stopwatch {
    /// Create a stopwatch and start it immediately
    pub fn start_new() -> Self {
        Self { start: Instant::now() }
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.start.elapsed().as_secs_f32() * 1000.0
    }
}
