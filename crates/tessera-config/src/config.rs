//! Root configuration type.

use serde::{Deserialize, Serialize};
use tessera_core::ExecutionMode;

use crate::{ConfigError, DocsConfig, LogFormat, LoggingConfig};

/// Complete Tessera configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// ```
/// use tessera_config::TesseraConfig;
/// use tessera_core::ExecutionMode;
///
/// let config = TesseraConfig::default();
/// assert_eq!(config.mode, ExecutionMode::Development);
/// assert_eq!(config.docs.version, "1.0.0");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct TesseraConfig {
    /// Execution mode handed to the error boundary and response contracts.
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Documentation settings.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TesseraConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the documentation title or
    /// version is blank, a server URL is blank, or the log level is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.docs.title.trim().is_empty() {
            return Err(ConfigError::invalid_value("docs.title", "must not be empty"));
        }
        if self.docs.version.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "docs.version",
                "must not be empty",
            ));
        }
        if let Some(index) = self
            .docs
            .servers
            .iter()
            .position(|server| server.url.trim().is_empty())
        {
            return Err(ConfigError::invalid_value(
                format!("docs.servers[{index}].url"),
                "must not be empty",
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.level",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Development preset: debug level, pretty logs.
    ///
    /// ```
    /// use tessera_config::{LogFormat, TesseraConfig};
    ///
    /// let config = TesseraConfig::development();
    /// assert_eq!(config.logging.format, LogFormat::Pretty);
    /// ```
    #[must_use]
    pub fn development() -> Self {
        Self {
            mode: ExecutionMode::Development,
            docs: DocsConfig::default(),
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }

    /// Production preset: info level, JSON logs.
    #[must_use]
    pub fn production() -> Self {
        Self {
            mode: ExecutionMode::Production,
            docs: DocsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Json,
            },
        }
    }
}
