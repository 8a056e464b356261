//! Runtime configuration.

use derive_getters::Getters;
use redraft_database::{Dispatcher, DispatcherBuilder};
use redraft_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "REDRAFT";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Settings for the write-back core and its binary.
///
/// Loaded from an optional TOML file, then from `REDRAFT_*` environment
/// variables (`REDRAFT_STATEMENT_TIMEOUT_SECS`, `REDRAFT_LOG_FORMAT`,
/// `REDRAFT_LOG_FILTER`), later sources winning.
///
/// # Examples
///
/// ```
/// use redraft::{LogFormat, RedraftConfigBuilder};
///
/// let config = RedraftConfigBuilder::default()
///     .statement_timeout_secs(Some(30))
///     .log_format(LogFormat::Json)
///     .build()
///     .unwrap();
/// assert_eq!(config.log_filter(), "info");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct RedraftConfig {
    /// Execution timeout in seconds; elapsing cancels the statement
    statement_timeout_secs: Option<u64>,
    /// Log output format
    log_format: LogFormat,
    /// `tracing` filter directives used when `RUST_LOG` is unset
    log_filter: String,
}

impl Default for RedraftConfig {
    fn default() -> Self {
        Self {
            statement_timeout_secs: None,
            log_format: LogFormat::Pretty,
            log_filter: "info".to_string(),
        }
    }
}

impl RedraftConfig {
    /// Load settings from `path` (if given) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a setting has the
    /// wrong type.
    #[tracing::instrument(name = "config.load", skip_all, fields(path = ?path))]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to read config: {}", e)))?
            .try_deserialize::<Self>()
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        tracing::debug!(
            statement_timeout_secs = ?config.statement_timeout_secs,
            log_format = ?config.log_format,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Execution timeout, if one is configured.
    pub fn statement_timeout(&self) -> Option<Duration> {
        self.statement_timeout_secs.map(Duration::from_secs)
    }

    /// Dispatcher honouring the configured timeout.
    pub fn dispatcher(&self) -> Dispatcher {
        let mut builder = DispatcherBuilder::default();
        if let Some(timeout) = self.statement_timeout() {
            builder.statement_timeout(timeout);
        }
        builder.build().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RedraftConfig::default();
        assert_eq!(config.statement_timeout(), None);
        assert_eq!(config.log_format(), &LogFormat::Pretty);
        assert_eq!(config.dispatcher().statement_timeout(), &None);
    }

    #[test]
    fn test_dispatcher_carries_timeout() {
        let config = RedraftConfigBuilder::default()
            .statement_timeout_secs(Some(5))
            .build()
            .unwrap();
        assert_eq!(
            config.dispatcher().statement_timeout(),
            &Some(Duration::from_secs(5))
        );
    }
}
