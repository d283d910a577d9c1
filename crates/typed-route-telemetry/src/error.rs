//! Telemetry error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a configuration file.
    #[error("Failed to read configuration file {path}")]
    ReadConfig {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("Failed to parse JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

impl TelemetryError {
    /// Creates an invalid configuration error for an environment variable.
    #[must_use]
    pub fn invalid_env(var: &str, reason: &str) -> Self {
        Self::InvalidConfig(format!("{var}: {reason}"))
    }
}
