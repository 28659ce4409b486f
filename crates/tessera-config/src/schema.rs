//! Configuration sections.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A server advertised in the generated document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerEntry {
    /// Base URL of the server.
    pub url: String,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Documentation settings.
///
/// These seed the `info` and `servers` sections of the generated OpenAPI
/// document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// API title.
    #[serde(default = "default_title")]
    pub title: String,

    /// API version.
    #[serde(default = "default_version")]
    pub version: String,

    /// API description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Servers listed in the document.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<ServerEntry>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: None,
            servers: Vec::new(),
        }
    }
}

impl DocsConfig {
    /// Builds the partial document handed to the documentation generator.
    ///
    /// ```
    /// use tessera_config::DocsConfig;
    ///
    /// let partial = DocsConfig::default().to_partial_document();
    /// assert_eq!(partial["info"]["title"], "Tessera API");
    /// assert!(partial.get("servers").is_none());
    /// ```
    #[must_use]
    pub fn to_partial_document(&self) -> Value {
        let mut info = Map::new();
        info.insert("title".into(), Value::String(self.title.clone()));
        info.insert("version".into(), Value::String(self.version.clone()));
        if let Some(description) = &self.description {
            info.insert("description".into(), Value::String(description.clone()));
        }

        let mut document = Map::new();
        document.insert("info".into(), Value::Object(info));
        if !self.servers.is_empty() {
            let servers = self
                .servers
                .iter()
                .map(|server| match &server.description {
                    Some(description) => json!({"url": server.url, "description": description}),
                    None => json!({"url": server.url}),
                })
                .collect();
            document.insert("servers".into(), Value::Array(servers));
        }
        Value::Object(document)
    }
}

fn default_title() -> String {
    "Tessera API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level or filter directive (`info`, `tessera=debug,warn`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
