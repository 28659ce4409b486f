//! # Tessera Core
//!
//! Core types shared by every Tessera crate.
//!
//! This crate provides:
//!
//! - [`ValidationError`] - Raised by validators when a raw value cannot be converted
//! - [`TesseraError`] - Typed request errors (invalid parameter, invalid body, not found, ...)
//! - [`ErrorKind`] - Static status/code/description of each typed error, used for documentation
//! - [`DefinitionError`] - Contract violations detected while declaring routes
//! - [`ExecutionMode`] - Development/production switch injected into units that need it
//! - [`RequestId`] - UUID v7 request identifier
//! - [`BoxFuture`] - Boxed future returned by validators and middleware

#![doc(html_root_url = "https://docs.rs/tessera-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod mode;
mod request_id;

pub use error::{
    DefinitionError, ErrorBody, ErrorKind, ErrorResponse, ParameterLocation, TesseraError,
    TesseraResult, ValidationError,
};
pub use mode::ExecutionMode;
pub use request_id::RequestId;

/// A boxed future, used wherever validators and middleware suspend.
pub type BoxFuture<'a, T> = std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;
