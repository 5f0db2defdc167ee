//! Logging utilities

use crate::core::config::LoggingConfig;

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system.
///
/// `RUST_LOG` overrides the configured level. Calls after the first are
/// ignored.
pub fn init(config: &LoggingConfig) {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
