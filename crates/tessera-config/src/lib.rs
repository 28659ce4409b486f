//! Typed configuration for Tessera services.
//!
//! Configuration is layered: defaults or a preset, then an optional TOML or
//! JSON file, then `PREFIX__SECTION__KEY` environment variables.
//!
//! - [`TesseraConfig`] - the root type
//! - [`DocsConfig`] - `info` and `servers` of the generated document
//! - [`LoggingConfig`] - log level and format
//!
//! # Example
//!
//! ```no_run
//! use tessera_config::ConfigLoader;
//!
//! # fn main() -> Result<(), tessera_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_optional_file("tessera.toml")?
//!     .with_env_prefix("TESSERA")
//!     .load()?;
//!
//! let partial = config.docs.to_partial_document();
//! # let _ = partial;
//! # Ok(())
//! # }
//! ```
//!
//! # File Format
//!
//! ```toml
//! mode = "production"
//!
//! [docs]
//! title = "Users API"
//! version = "1.0.0"
//! description = "Manage users."
//!
//! [[docs.servers]]
//! url = "https://api.example.com"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::TesseraConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DocsConfig, LogFormat, LoggingConfig, ServerEntry};
