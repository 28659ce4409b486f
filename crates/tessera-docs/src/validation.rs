//! JSON Schema validation of request and response payloads.

use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

use crate::error::{DocsError, DocsResult};
use crate::openapi::Schema;

/// Outcome of validating a value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaValidation {
    /// The value conforms.
    Valid,
    /// The value does not conform.
    Invalid {
        /// One human readable message per violation.
        errors: Vec<String>,
    },
}

impl SchemaValidation {
    /// Returns `true` if the value conformed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Violation messages joined with `", "`, or `None` when valid.
    #[must_use]
    pub fn joined_errors(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::Invalid { errors } => Some(errors.join(", ")),
        }
    }
}

/// A schema that is compiled on first use and reused afterwards.
///
/// Compilation failures are remembered too, so a broken schema is reported
/// on every call without being recompiled.
pub struct SchemaValidator {
    schema: Schema,
    compiled: OnceLock<Result<Validator, String>>,
}

impl SchemaValidator {
    /// Wraps a schema without compiling it.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            compiled: OnceLock::new(),
        }
    }

    /// The wrapped schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn compiled(&self) -> DocsResult<&Validator> {
        let compiled = self.compiled.get_or_init(|| {
            let raw = serde_json::to_value(&self.schema).map_err(|e| e.to_string())?;
            jsonschema::validator_for(&raw).map_err(|e| e.to_string())
        });
        compiled
            .as_ref()
            .map_err(|reason| DocsError::SchemaCompilation {
                reason: reason.clone(),
            })
    }

    /// Validates `instance`, collecting every violation.
    pub fn validate(&self, instance: &Value) -> DocsResult<SchemaValidation> {
        let validator = self.compiled()?;
        let errors: Vec<String> = validator
            .iter_errors(instance)
            .map(|error| error.to_string())
            .collect();
        if errors.is_empty() {
            Ok(SchemaValidation::Valid)
        } else {
            Ok(SchemaValidation::Invalid { errors })
        }
    }
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("schema", &self.schema)
            .field("compiled", &self.compiled.get().is_some())
            .finish()
    }
}
