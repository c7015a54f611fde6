//! Logging utilities and structured logging support

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// `filter` follows the `env_logger` filter syntax (e.g. "info" or
/// "galaxy=debug,galaxy_engine=warn"). Without one, `RUST_LOG` is used, and
/// without that the level defaults to info. Later calls are ignored.
pub fn init(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        // A test harness may have installed a logger already.
        if builder.try_init().is_err() {
            log::debug!("logger already installed");
        }
    });
}
