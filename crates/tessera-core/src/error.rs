//! Error types for Tessera.
//!
//! Tessera distinguishes three families of errors:
//!
//! | Type | Raised by | Surfaces as |
//! |---|---|---|
//! | [`ValidationError`] | validators | always wrapped by the calling parameter/body unit |
//! | [`TesseraError`] | units and handlers, per request | HTTP error envelope via the error boundary |
//! | [`DefinitionError`] | unit constructors, at route-definition time | returned to the code declaring the route |
//!
//! Every typed request error has a static [`ErrorKind`] describing its status,
//! code and description. The same descriptor feeds the generated documentation
//! through `throws`.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`TesseraError`].
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Raised when a raw value cannot be converted by a validator.
///
/// The message is human-readable and ends up verbatim in the
/// `InvalidParameter` error message.
///
/// # Example
///
/// ```
/// use tessera_core::ValidationError;
///
/// let err = ValidationError::new("Expected an integer but received: 'abc'");
/// assert_eq!(err.to_string(), "Expected an integer but received: 'abc'");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a validation error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Where a request parameter was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// URL query string.
    Query,
    /// Path segment captured by the route template.
    Path,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Path => write!(f, "path"),
        }
    }
}

/// Static descriptor of a typed error.
///
/// Used both to build the runtime envelope and to declare, in documentation,
/// that an operation may fail with this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path or query parameter failed validation.
    InvalidParameter,
    /// The request body failed schema validation.
    InvalidRequestBody,
    /// The requested resource does not exist.
    NotFound,
    /// Anything not covered by a typed error.
    Unhandled,
}

impl ErrorKind {
    /// Returns the HTTP status for this kind.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        match self {
            Self::InvalidParameter | Self::InvalidRequestBody => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unhandled => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidParameter => "InvalidParameter",
            Self::InvalidRequestBody => "InvalidRequestBody",
            Self::NotFound => "NotFound",
            Self::Unhandled => "UnhandledError",
        }
    }

    /// Returns the description used in generated documentation.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidParameter => {
                "One of the parameters is invalid. See message for more information."
            }
            Self::InvalidRequestBody => {
                "The body of the request is invalid. See message for more information."
            }
            Self::NotFound => "The resource has not been found.",
            Self::Unhandled => "An unknown error occurred.",
        }
    }
}

/// Typed request errors.
///
/// Units convert validator failures into one of these at their own boundary;
/// after that the error travels up the composed pipeline unchanged.
///
/// # Example
///
/// ```
/// use tessera_core::{ParameterLocation, TesseraError, ValidationError};
/// use http::StatusCode;
///
/// let err = TesseraError::invalid_parameter(
///     "limit",
///     ParameterLocation::Query,
///     ValidationError::new("Expected an integer but received: 'ten'"),
/// );
/// assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
/// assert_eq!(
///     err.to_string(),
///     "Invalid query parameter 'limit'. Expected an integer but received: 'ten'"
/// );
/// ```
#[derive(Error, Debug)]
pub enum TesseraError {
    /// A path or query parameter failed validation.
    #[error("Invalid {location} parameter '{name}'. {source}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Where the parameter was read from.
        location: ParameterLocation,
        /// The validator failure.
        #[source]
        source: ValidationError,
    },

    /// The request body failed schema validation.
    #[error("Invalid request body. {errors}")]
    InvalidRequestBody {
        /// Aggregated schema validator output.
        errors: String,
    },

    /// The requested resource does not exist.
    #[error("{message}")]
    NotFound {
        /// Human-readable error message.
        message: String,
    },

    /// A unit invoked its continuation more than once.
    #[error("next() called multiple times")]
    NextCalledMultipleTimes,

    /// Any other failure.
    #[error("{message}")]
    Internal {
        /// Human-readable error message.
        message: String,
        /// The underlying error (only exposed in development mode).
        #[source]
        source: Option<anyhow::Error>,
    },
}

impl TesseraError {
    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(
        name: impl Into<String>,
        location: ParameterLocation,
        source: ValidationError,
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            location,
            source,
        }
    }

    /// Creates an invalid request body error.
    #[must_use]
    pub fn invalid_request_body(errors: impl Into<String>) -> Self {
        Self::InvalidRequestBody {
            errors: errors.into(),
        }
    }

    /// Creates a not found error with the standard message.
    #[must_use]
    pub fn not_found() -> Self {
        Self::NotFound {
            message: "The resource has not been found".to_string(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an internal error with a source error.
    pub fn internal_with_source(
        message: impl Into<String>,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the static descriptor of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::InvalidRequestBody { .. } => ErrorKind::InvalidRequestBody,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NextCalledMultipleTimes | Self::Internal { .. } => ErrorKind::Unhandled,
        }
    }

    /// Returns `true` if this error has a declared envelope.
    ///
    /// Untyped errors are reported as `UnhandledError` and have their detail
    /// hidden in production.
    #[must_use]
    pub const fn is_typed(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Unhandled)
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind().status()
    }

    /// Returns the machine-readable code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Converts this error into its response envelope.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            id: None,
            error: ErrorBody {
                status: self.status_code().as_u16(),
                code: self.code().to_string(),
                message: self.to_string(),
                stack: None,
            },
        }
    }
}

/// Serializable error envelope: `{"error": {"status", "code", "message"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Correlation id, only set for unhandled errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The error details.
    pub error: ErrorBody,
}

/// Error detail within an [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// HTTP status.
    pub status: u16,
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Debug detail, development mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Contract violations detected while declaring routes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A sortable field name is not a dotted sequence of word segments.
    #[error("Invalid field name '{field}' in sortable middleware")]
    InvalidSortField {
        /// The rejected field name.
        field: String,
    },

    /// A sortable unit was declared without fields.
    #[error("Sortable middleware requires at least one field")]
    NoSortFields,

    /// The default sorting does not parse against the declared fields.
    #[error("Invalid default sorting '{value}': {reason}")]
    InvalidSortDefault {
        /// The rejected default.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_message() {
        let error = TesseraError::invalid_parameter(
            "userId",
            ParameterLocation::Path,
            ValidationError::new("Expected a valid RFC 4122 UUID but received: 'x'"),
        );
        assert_eq!(error.kind(), ErrorKind::InvalidParameter);
        assert_eq!(error.code(), "InvalidParameter");
        assert_eq!(
            error.to_string(),
            "Invalid path parameter 'userId'. Expected a valid RFC 4122 UUID but received: 'x'"
        );
    }

    #[test]
    fn test_invalid_request_body() {
        let error = TesseraError::invalid_request_body("\"email\" is a required property");
        assert_eq!(error.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(error.to_string().starts_with("Invalid request body. "));
    }

    #[test]
    fn test_not_found() {
        let error = TesseraError::not_found();
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "The resource has not been found");
        assert!(error.is_typed());
    }

    #[test]
    fn test_untyped_errors() {
        assert!(!TesseraError::NextCalledMultipleTimes.is_typed());
        assert!(!TesseraError::internal("boom").is_typed());
        assert_eq!(
            TesseraError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            TesseraError::NextCalledMultipleTimes.to_string(),
            "next() called multiple times"
        );
    }

    #[test]
    fn test_internal_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let error = TesseraError::internal_with_source("storage failed", io);
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_envelope_serialization() {
        let envelope = TesseraError::not_found().to_response();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "error": {
                    "status": 404,
                    "code": "NotFound",
                    "message": "The resource has not been found"
                }
            })
        );
    }

    #[test]
    fn test_kind_descriptions() {
        assert_eq!(ErrorKind::NotFound.description(), "The resource has not been found.");
        assert_eq!(ErrorKind::InvalidRequestBody.status().as_u16(), 422);
    }

    #[test]
    fn test_definition_error_messages() {
        let err = DefinitionError::InvalidSortField {
            field: "bad field".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid field name 'bad field' in sortable middleware"
        );
    }
}
