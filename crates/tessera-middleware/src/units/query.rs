//! Query parameter validation.
//!
//! Only the first occurrence of a repeated key is read. Resolution order:
//!
//! 1. a present value (non-empty, or empty with `ignore_empty` off) is validated
//! 2. a missing value fails when the parameter is `required`
//! 3. otherwise the default, if any, is stored without validation

use tessera_core::{
    BoxFuture, ErrorKind, ParameterLocation, TesseraError, TesseraResult, ValidationError,
};
use tessera_docs::{
    add_operation_parameter, add_parameter_component, parameter_ref, Parameter, ParameterIn,
    ReferenceOr,
};
use tessera_validators::ParameterValidator;

use crate::context::RequestContext;
use crate::middleware::{Middleware, Next};
use crate::unit::{compose, Unit};
use crate::units::throws::throws;

/// Options for [`query`].
#[derive(Debug, Clone)]
pub struct QueryOptions<T> {
    /// Description used in the generated documentation.
    pub description: Option<String>,
    /// Treat an empty value as if the parameter was not sent. Defaults to `true`.
    pub ignore_empty: bool,
    /// Register the parameter as a reusable component and reference it.
    pub store_as_component: bool,
    /// Fail when the parameter is missing. Defaults to `false`.
    pub required: bool,
    /// Value stored when the parameter is missing and not required.
    pub default: Option<T>,
}

impl<T> Default for QueryOptions<T> {
    fn default() -> Self {
        Self {
            description: None,
            ignore_empty: true,
            store_as_component: false,
            required: false,
            default: None,
        }
    }
}

impl<T> QueryOptions<T> {
    /// Options with a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }
}

struct QueryParameter<V: ParameterValidator> {
    name: String,
    validator: V,
    required: bool,
    ignore_empty: bool,
    default: Option<V::Output>,
}

impl<V: ParameterValidator> QueryParameter<V> {
    fn invalid(&self, error: ValidationError) -> TesseraError {
        TesseraError::invalid_parameter(self.name.clone(), ParameterLocation::Query, error)
    }
}

impl<V> Middleware for QueryParameter<V>
where
    V: ParameterValidator + 'static,
    V::Output: Clone + Sync,
{
    fn name(&self) -> &'static str {
        "query"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            let raw = ctx
                .query()
                .first(&self.name)
                .filter(|value| !(self.ignore_empty && value.is_empty()))
                .map(str::to_owned);

            match raw {
                Some(raw) => {
                    let value = self
                        .validator
                        .validate(&raw)
                        .await
                        .map_err(|e| self.invalid(e))?;
                    ctx.params_mut().insert(self.name.clone(), value);
                }
                None if self.required => {
                    return Err(self.invalid(ValidationError::new("Required parameter is missing.")));
                }
                None => {
                    if let Some(default) = &self.default {
                        ctx.params_mut().insert(self.name.clone(), default.clone());
                    }
                }
            }
            next.run(ctx).await
        })
    }
}

/// Validates the query parameter `name` and stores the result under that name.
///
/// ```
/// use tessera_middleware::{query, QueryOptions};
/// use tessera_validators::string_enum;
///
/// let role = query(
///     "role",
///     string_enum(["none", "admin"]),
///     QueryOptions {
///         required: true,
///         ..QueryOptions::described("Filter users by role.")
///     },
/// );
/// assert!(role.metadata().is_some());
/// ```
pub fn query<V>(name: impl Into<String>, validator: V, options: QueryOptions<V::Output>) -> Unit
where
    V: ParameterValidator + 'static,
    V::Output: Clone + Sync,
{
    let name = name.into();
    let QueryOptions {
        description,
        ignore_empty,
        store_as_component,
        required,
        default,
    } = options;

    let declaration = Parameter {
        name: name.clone(),
        location: ParameterIn::Query,
        description,
        required,
        deprecated: false,
        schema: Some(validator.schema()),
    };
    let metadata = if store_as_component {
        add_parameter_component(name.clone(), declaration).then(add_operation_parameter(
            ReferenceOr::reference(parameter_ref(&name)),
        ))
    } else {
        add_operation_parameter(ReferenceOr::Item(declaration))
    };

    let middleware = QueryParameter {
        name,
        validator,
        required,
        ignore_empty,
        default,
    };
    compose([
        Unit::new(middleware).with_metadata(metadata),
        throws(ErrorKind::InvalidParameter),
    ])
}
