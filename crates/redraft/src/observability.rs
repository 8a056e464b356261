//! Tracing subscriber setup for the binary.

use crate::{LogFormat, RedraftConfig};
use redraft_error::ConfigError;
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter. Events go to
/// stderr so command output on stdout stays machine-readable.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(config: &RedraftConfig) -> Result<(), ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(config.log_filter()).map_err(|e| {
            ConfigError::new(format!("Invalid log filter '{}': {}", config.log_filter(), e))
        })?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = match config.log_format() {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ConfigError::new(format!("Failed to initialize tracing: {}", e)))
}
