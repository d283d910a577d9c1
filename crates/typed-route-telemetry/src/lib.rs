//! Logging for typed route handlers.
//!
//! This crate provides:
//!
//! - **Request logging**: the [`RequestLog`] trait used by the handler
//!   wrapper, and [`TracingRequestLog`], which emits `tracing` events
//! - **Logging setup**: a `tracing-subscriber` registry writing structured
//!   output to stderr
//! - **Configuration**: layered loading from defaults, a TOML/JSON file,
//!   `.env` and `TYPED_ROUTE_*` environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use typed_route_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::load()?;
//! let request_log = init_telemetry(&config)?;
//! # Ok::<(), typed_route_telemetry::TelemetryError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/typed-route-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
mod error;
pub mod logging;
pub mod request_log;

pub use config::{ConfigLoader, TelemetryConfig, TelemetryConfigBuilder};
pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use request_log::{RequestLog, TracingRequestLog};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Initializes logging and returns a request log tagged with the service name.
///
/// # Errors
///
/// Returns `TelemetryError` if the subscriber cannot be installed.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<TracingRequestLog> {
    init_logging(&config.logging)?;
    Ok(TracingRequestLog::new().with_service_name(config.service_name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_telemetry_disabled() {
        let config = TelemetryConfig::builder()
            .service_name("quiet")
            .logging(LogConfig {
                enabled: false,
                ..LogConfig::default()
            })
            .build();

        let log = init_telemetry(&config).unwrap();
        log.request_started("GET", "/");
    }
}
