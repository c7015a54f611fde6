//! Application trait and lifecycle management

use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;
use crate::foundation::time::Timer;
use crate::input::InputEvent;
use crate::render::{RenderBackend, RenderError};

/// Application lifecycle trait
///
/// Implement this trait to drive a game from a frame loop. The loop owns the
/// clock and the backend; the application owns everything else.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Load assets and build the initial
    /// scene here.
    fn initialize(&mut self, backend: &mut dyn RenderBackend) -> Result<(), AppError>;

    /// Handle an input event delivered before the next frame
    fn handle_event(&mut self, event: &InputEvent) -> Result<(), AppError> {
        let _ = event;
        Ok(())
    }

    /// Advance and draw one frame
    ///
    /// # Arguments
    /// * `backend` - Render backend to draw into
    /// * `delta_time` - Time since last frame in seconds
    /// * `total_time` - Time since the loop started in seconds
    fn frame(&mut self, backend: &mut dyn RenderBackend, delta_time: f32, total_time: f64) -> Result<(), AppError>;

    /// Cleanup the application
    fn cleanup(&mut self) {}
}

/// Run an application for a fixed number of equal steps
///
/// `events` is asked for the input of each frame (by frame index and the
/// time at which the frame starts) before the frame runs. Returns the timer
/// so callers can report frame statistics.
pub fn run_fixed_steps<A, F>(
    app: &mut A,
    backend: &mut dyn RenderBackend,
    frames: u64,
    step: f32,
    mut events: F,
) -> Result<Timer, AppError>
where
    A: Application + ?Sized,
    F: FnMut(u64, f64) -> Vec<InputEvent>,
{
    app.initialize(backend)?;

    let mut timer = Timer::new();
    for frame in 0..frames {
        for event in events(frame, timer.total_time()) {
            app.handle_event(&event)?;
        }
        let total = timer.advance(step);
        if let Err(err) = app.frame(backend, timer.delta_time(), total) {
            app.cleanup();
            return Err(err);
        }
    }

    app.cleanup();
    log::info!(
        "Ran {} frames in {:.2}s of simulated time",
        timer.frame_count(),
        timer.total_time()
    );
    Ok(timer)
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Rendering error propagated to application level
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;
    use crate::render::HeadlessBackend;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Recorder {
        initialized: bool,
        events: usize,
        frames: Vec<(f32, f64)>,
        cleaned: bool,
        fail_at: Option<usize>,
    }

    impl Application for Recorder {
        fn initialize(&mut self, _backend: &mut dyn RenderBackend) -> Result<(), AppError> {
            self.initialized = true;
            Ok(())
        }

        fn handle_event(&mut self, _event: &InputEvent) -> Result<(), AppError> {
            self.events += 1;
            Ok(())
        }

        fn frame(&mut self, _backend: &mut dyn RenderBackend, dt: f32, total: f64) -> Result<(), AppError> {
            if self.fail_at == Some(self.frames.len()) {
                return Err(AppError::Custom("stop".to_string()));
            }
            self.frames.push((dt, total));
            Ok(())
        }

        fn cleanup(&mut self) {
            self.cleaned = true;
        }
    }

    #[test]
    fn test_fixed_steps_drive_lifecycle() {
        let mut app = Recorder::default();
        let mut backend = HeadlessBackend::new();
        let timer = run_fixed_steps(&mut app, &mut backend, 4, 0.25, |frame, _| {
            if frame == 1 {
                vec![InputEvent::KeyPressed(KeyCode::W)]
            } else {
                Vec::new()
            }
        })
        .unwrap();

        assert!(app.initialized && app.cleaned);
        assert_eq!(app.events, 1);
        assert_eq!(app.frames.len(), 4);
        assert_relative_eq!(app.frames[3].1, 1.0);
        assert_eq!(timer.frame_count(), 4);
    }

    #[test]
    fn test_frame_error_stops_loop() {
        let mut app = Recorder { fail_at: Some(2), ..Recorder::default() };
        let mut backend = HeadlessBackend::new();
        let result = run_fixed_steps(&mut app, &mut backend, 10, 0.1, |_, _| Vec::new());
        assert!(result.is_err());
        assert_eq!(app.frames.len(), 2);
        assert!(app.cleaned);
    }
}
