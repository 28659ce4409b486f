//! Error types for document generation and schema validation.

use thiserror::Error;

/// Errors that can occur while producing documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// Failed to convert between the typed document and JSON.
    #[error("Failed to serialize OpenAPI document: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The partial document could not be merged into the skeleton.
    #[error("Invalid partial document: {reason}")]
    InvalidPartial {
        /// Why the partial was rejected.
        reason: String,
    },

    /// A JSON Schema could not be compiled.
    #[error("Failed to compile schema: {reason}")]
    SchemaCompilation {
        /// The reason the compilation failed.
        reason: String,
    },

    /// An operation could not be placed in the document.
    #[error("Invalid operation '{operation_id}': {reason}")]
    InvalidOperation {
        /// The operation ID, empty when unnamed.
        operation_id: String,
        /// The reason the operation is invalid.
        reason: String,
    },
}

/// Result type for documentation operations.
pub type DocsResult<T> = Result<T, DocsError>;
