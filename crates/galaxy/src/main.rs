//! Galaxy headless runner
//!
//! Loads `galaxy.toml` (or the path given as the first argument), replays the
//! configured input timeline against the headless backend and reports what
//! happened.

use galaxy::config::ScriptedInput;
use galaxy::{GameConfig, Session};
use galaxy_engine::config::Config;
use galaxy_engine::foundation::logging;
use galaxy_engine::foundation::time::Stopwatch;
use galaxy_engine::input::InputEvent;
use galaxy_engine::render::HeadlessBackend;
use galaxy_engine::{run_fixed_steps, AppError};

const DEFAULT_CONFIG_PATH: &str = "galaxy.toml";

/// Events from `timeline` due at or before `time`, advancing `cursor` past them
fn due_events(timeline: &[ScriptedInput], cursor: &mut usize, time: f64) -> Vec<InputEvent> {
    let mut events = Vec::new();
    while let Some(input) = timeline.get(*cursor).filter(|input| input.at <= time) {
        events.push(input.action.to_event());
        *cursor += 1;
    }
    events
}

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = match GameConfig::load_or_default(&path) {
        Ok(config) => config,
        Err(err) => {
            logging::init(None);
            log::error!("Failed to load {}: {}", path, err);
            std::process::exit(1);
        }
    };
    logging::init(config.session.log_filter.as_deref());
    log::info!("Starting Galaxy with configuration from {}", path);

    let mut timeline = config.session.timeline.clone();
    timeline.sort_by(|a, b| a.at.total_cmp(&b.at));
    let frames = config.session.frames;
    let dt = config.session.dt;

    let mut backend = HeadlessBackend::new();
    let mut session = Session::new(config);
    let stopwatch = Stopwatch::start_new();

    let mut cursor = 0;
    let result = run_fixed_steps(&mut session, &mut backend, frames, dt, |_, time| {
        due_events(&timeline, &mut cursor, time)
    });

    match result {
        Ok(timer) => {
            log::info!(
                "Simulated {} frames ({:.1} fps average) in {:.1}ms",
                timer.frame_count(),
                timer.average_fps(),
                stopwatch.elapsed_millis()
            );
            log::info!(
                "Final scene: {} entities, {} asteroids, {} explosions, {} draw calls recorded",
                session.scene().len(),
                session.scene().asteroid_count(),
                session.scene().explosions_spawned(),
                backend.draw_calls().len()
            );
        }
        Err(AppError::Render(err)) if err.is_fatal() => {
            log::error!("Fatal render error: {}", err);
            std::process::exit(1);
        }
        Err(err) => {
            log::error!("Galaxy stopped: {}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galaxy::config::ScriptedAction;
    use galaxy_engine::input::KeyCode;

    #[test]
    fn test_timeline_cursor_releases_events_once() {
        let timeline = vec![
            ScriptedInput { at: 0.1, action: ScriptedAction::KeyDown { key: 'b' } },
            ScriptedInput { at: 0.2, action: ScriptedAction::KeyUp { key: 'b' } },
        ];
        let mut cursor = 0;
        assert!(due_events(&timeline, &mut cursor, 0.05).is_empty());
        assert_eq!(due_events(&timeline, &mut cursor, 0.25).len(), 2);
        assert!(due_events(&timeline, &mut cursor, 0.3).is_empty());

        let mut cursor = 0;
        assert_eq!(due_events(&timeline, &mut cursor, 0.1), vec![InputEvent::KeyPressed(KeyCode::B)]);
    }
}
