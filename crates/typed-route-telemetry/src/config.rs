//! Telemetry configuration and its layered loader.
//!
//! Configuration is applied in layers, later layers overriding earlier ones:
//!
//! 1. Default values
//! 2. Configuration file (TOML or JSON)
//! 3. `.env` file
//! 4. Environment variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TYPED_ROUTE_SERVICE_NAME` | `service_name` |
//! | `TYPED_ROUTE_LOG_ENABLED` | `logging.enabled` |
//! | `TYPED_ROUTE_LOG_LEVEL` | `logging.level` |
//! | `TYPED_ROUTE_LOG_FORMAT` | `logging.format` |

use crate::error::TelemetryError;
use crate::logging::{LogConfig, LogFormat};
use crate::TelemetryResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "TYPED_ROUTE";

/// Default configuration file looked up by [`TelemetryConfig::load`].
pub const DEFAULT_CONFIG_FILE: &str = "typed-route.toml";

/// Configuration for telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Service name attached to log events.
    pub service_name: String,

    /// Logging configuration.
    pub logging: LogConfig,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "typed-route-service".to_string(),
            logging: LogConfig::default(),
        }
    }
}

impl TelemetryConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> TelemetryConfigBuilder {
        TelemetryConfigBuilder::new()
    }

    /// Loads configuration from all layers: defaults, the optional
    /// `typed-route.toml`, `.env`, then `TYPED_ROUTE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is invalid or an environment variable
    /// holds a value of the wrong kind.
    pub fn load() -> TelemetryResult<Self> {
        ConfigLoader::new()
            .with_optional_file(DEFAULT_CONFIG_FILE)?
            .with_dotenv()
            .with_env_prefix(ENV_PREFIX)
            .load()
    }
}

/// Builder for [`TelemetryConfig`].
#[derive(Debug, Default)]
pub struct TelemetryConfigBuilder {
    service_name: Option<String>,
    logging: Option<LogConfig>,
}

impl TelemetryConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the service name.
    #[must_use]
    pub fn service_name(mut self, name: &str) -> Self {
        self.service_name = Some(name.to_string());
        self
    }

    /// Sets the logging configuration.
    #[must_use]
    pub fn logging(mut self, config: LogConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// Sets the log level.
    #[must_use]
    pub fn log_level(mut self, level: &str) -> Self {
        let config = self.logging.take().unwrap_or_default();
        self.logging = Some(LogConfig {
            level: level.to_string(),
            ..config
        });
        self
    }

    /// Sets the log format.
    #[must_use]
    pub fn log_format(mut self, format: LogFormat) -> Self {
        let config = self.logging.take().unwrap_or_default();
        self.logging = Some(LogConfig { format, ..config });
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> TelemetryConfig {
        let defaults = TelemetryConfig::default();
        TelemetryConfig {
            service_name: self.service_name.unwrap_or(defaults.service_name),
            logging: self.logging.unwrap_or(defaults.logging),
        }
    }
}

/// Layered configuration loader.
///
/// # Example
///
/// ```
/// use typed_route_telemetry::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_string(r#"service_name = "billing""#, "toml")
///     .unwrap()
///     .load()
///     .unwrap();
///
/// assert_eq!(config.service_name, "billing");
/// ```
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config: TelemetryConfig,
    env_prefix: Option<String>,
}

impl ConfigLoader {
    /// Creates a loader starting from default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file; the format follows the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> TelemetryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| TelemetryError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("toml");
        self.with_string(&content, format)
    }

    /// Loads configuration from a file if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> TelemetryResult<Self> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the given format (`toml` or `json`).
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the format is unsupported.
    pub fn with_string(mut self, content: &str, format: &str) -> TelemetryResult<Self> {
        self.config = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => {
                return Err(TelemetryError::InvalidConfig(format!(
                    "unsupported configuration format: {other}"
                )))
            }
        };
        Ok(self)
    }

    /// Loads a `.env` file into the process environment, if present.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, "Ignoring unreadable .env file");
            }
        }
        self
    }

    /// Enables environment variable overrides with the given prefix.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Applies overrides from the given variables instead of the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::InvalidConfig` naming the offending variable.
    pub fn with_vars<I, K, V>(mut self, prefix: &str, vars: I) -> TelemetryResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let prefix = prefix.to_uppercase();
        for (key, value) in vars {
            self.apply_env_var(&prefix, key.as_ref(), value.as_ref())?;
        }
        Ok(self)
    }

    /// Finalizes the configuration, applying environment overrides if a
    /// prefix was set.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is invalid or the final
    /// log filter does not parse.
    pub fn load(self) -> TelemetryResult<TelemetryConfig> {
        let loader = match self.env_prefix.clone() {
            Some(prefix) => self.with_vars(&prefix, std::env::vars())?,
            None => self,
        };
        crate::logging::create_env_filter(&loader.config.logging.level).map_err(|_| {
            TelemetryError::InvalidConfig(format!(
                "invalid log level '{}'",
                loader.config.logging.level
            ))
        })?;
        Ok(loader.config)
    }

    fn apply_env_var(&mut self, prefix: &str, key: &str, value: &str) -> TelemetryResult<()> {
        let Some(name) = key
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            return Ok(());
        };

        match name {
            "SERVICE_NAME" => self.config.service_name = value.to_string(),
            "LOG_ENABLED" => {
                self.config.logging.enabled = parse_bool(value)
                    .ok_or_else(|| TelemetryError::invalid_env(key, "expected boolean"))?;
            }
            "LOG_LEVEL" => self.config.logging.level = value.to_string(),
            "LOG_FORMAT" => {
                self.config.logging.format = value.parse().map_err(|_| {
                    TelemetryError::invalid_env(key, "expected 'json', 'pretty' or 'compact'")
                })?;
            }
            _ => {}
        }
        Ok(())
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "typed-route-service");
        assert!(config.logging.enabled);
    }

    #[test]
    fn test_builder() {
        let config = TelemetryConfig::builder()
            .service_name("orders")
            .log_level("debug")
            .log_format(LogFormat::Compact)
            .build();

        assert_eq!(config.service_name, "orders");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_loader_with_string_toml() {
        let toml = r#"
            service_name = "billing"

            [logging]
            level = "warn"
            format = "pretty"
        "#;
        let config = ConfigLoader::new()
            .with_string(toml, "toml")
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.service_name, "billing");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_loader_with_string_json() {
        let json = r#"{"logging": {"enabled": false}}"#;
        let config = ConfigLoader::new()
            .with_string(json, "json")
            .unwrap()
            .load()
            .unwrap();
        assert!(!config.logging.enabled);
    }

    #[test]
    fn test_loader_rejects_unknown_fields() {
        let result = ConfigLoader::new().with_string("metrics = true", "toml");
        assert!(matches!(result, Err(TelemetryError::Toml(_))));
    }

    #[test]
    fn test_loader_unsupported_format() {
        let result = ConfigLoader::new().with_string("", "yaml");
        assert!(matches!(result, Err(TelemetryError::InvalidConfig(_))));
    }

    #[test]
    fn test_loader_with_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"service_name = "from-file""#).unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.service_name, "from-file");
    }

    #[test]
    fn test_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");

        assert!(matches!(
            ConfigLoader::new().with_file(&missing),
            Err(TelemetryError::ReadConfig { .. })
        ));
        assert!(ConfigLoader::new().with_optional_file(&missing).is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars = [
            ("TYPED_ROUTE_SERVICE_NAME", "from-env"),
            ("TYPED_ROUTE_LOG_ENABLED", "off"),
            ("TYPED_ROUTE_LOG_LEVEL", "debug"),
            ("TYPED_ROUTE_LOG_FORMAT", "compact"),
            ("UNRELATED", "x"),
        ];
        let config = ConfigLoader::new()
            .with_vars(ENV_PREFIX, vars)
            .unwrap()
            .load()
            .unwrap();

        assert_eq!(config.service_name, "from-env");
        assert!(!config.logging.enabled);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_invalid_env_value_names_variable() {
        let err = ConfigLoader::new()
            .with_vars(ENV_PREFIX, [("TYPED_ROUTE_LOG_ENABLED", "maybe")])
            .unwrap_err();
        assert!(err.to_string().contains("TYPED_ROUTE_LOG_ENABLED"));
    }

    #[test]
    fn test_invalid_level_rejected_on_load() {
        let result = ConfigLoader::new()
            .with_vars(ENV_PREFIX, [("TYPED_ROUTE_LOG_LEVEL", "app=loud")])
            .unwrap()
            .load();
        assert!(matches!(result, Err(TelemetryError::InvalidConfig(_))));
    }
}
