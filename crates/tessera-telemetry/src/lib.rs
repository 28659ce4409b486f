//! # Tessera Telemetry
//!
//! Logging setup for services built on Tessera. Units log through `tracing`;
//! this crate installs the subscriber that formats those events.
//!
//! ```no_run
//! use tessera_config::TesseraConfig;
//! use tessera_telemetry::{init_logging, LogConfig};
//!
//! let config = TesseraConfig::production();
//! init_logging(&LogConfig::from(&config.logging))?;
//! # Ok::<(), tessera_telemetry::TelemetryError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
