//! The validator capability.

use std::sync::Arc;

use tessera_core::{BoxFuture, ValidationError};
use tessera_docs::Schema;

/// Result of validating one raw value.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Converts a raw parameter string into a typed value and describes the
/// values it accepts.
///
/// Validators are built once when routes are declared and shared by every
/// request afterwards, so they must be `Send + Sync` and must not keep
/// per-call state.
///
/// # Example
///
/// ```
/// use tessera_core::{BoxFuture, ValidationError};
/// use tessera_docs::Schema;
/// use tessera_validators::ParameterValidator;
///
/// struct Flag;
///
/// impl ParameterValidator for Flag {
///     type Output = bool;
///
///     fn type_name(&self) -> String {
///         "boolean".to_string()
///     }
///
///     fn schema(&self) -> Schema {
///         Schema::boolean()
///     }
///
///     fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, Result<bool, ValidationError>> {
///         Box::pin(async move {
///             raw.parse()
///                 .map_err(|_| ValidationError::new(format!("Expected a boolean but received: '{raw}'")))
///         })
///     }
/// }
/// ```
pub trait ParameterValidator: Send + Sync {
    /// The typed value produced on success.
    type Output: Send + 'static;

    /// Human readable description of the accepted values.
    ///
    /// Computed on every call so that combinators reflect their children.
    fn type_name(&self) -> String;

    /// Schema fragment describing the accepted values.
    fn schema(&self) -> Schema;

    /// Converts `raw`, failing with a [`ValidationError`] when it is not acceptable.
    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<Self::Output>>;
}

/// A type-erased validator.
pub type BoxedValidator<T> = Box<dyn ParameterValidator<Output = T>>;

impl<V> ParameterValidator for Box<V>
where
    V: ParameterValidator + ?Sized,
{
    type Output = V::Output;

    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn schema(&self) -> Schema {
        (**self).schema()
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<Self::Output>> {
        (**self).validate(raw)
    }
}

impl<V> ParameterValidator for Arc<V>
where
    V: ParameterValidator + ?Sized,
{
    type Output = V::Output;

    fn type_name(&self) -> String {
        (**self).type_name()
    }

    fn schema(&self) -> Schema {
        (**self).schema()
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<Self::Output>> {
        (**self).validate(raw)
    }
}

/// Adapters available on every validator.
pub trait ValidatorExt: ParameterValidator + Sized + 'static {
    /// Erases the concrete validator type.
    fn boxed(self) -> BoxedValidator<Self::Output> {
        Box::new(self)
    }

    /// Transforms successful outputs, keeping type name and schema.
    fn map<T, F>(self, mapper: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> T + Send + Sync,
        T: Send + 'static,
    {
        Map {
            inner: self,
            mapper,
        }
    }
}

impl<V> ValidatorExt for V where V: ParameterValidator + Sized + 'static {}

/// Validator returned by [`ValidatorExt::map`].
pub struct Map<V, F> {
    inner: V,
    mapper: F,
}

impl<V, F, T> ParameterValidator for Map<V, F>
where
    V: ParameterValidator,
    F: Fn(V::Output) -> T + Send + Sync,
    T: Send + 'static,
{
    type Output = T;

    fn type_name(&self) -> String {
        self.inner.type_name()
    }

    fn schema(&self) -> Schema {
        self.inner.schema()
    }

    fn validate<'a>(&'a self, raw: &'a str) -> BoxFuture<'a, ValidationResult<T>> {
        Box::pin(async move {
            let value = self.inner.validate(raw).await?;
            Ok((self.mapper)(value))
        })
    }
}
