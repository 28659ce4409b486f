//! Path parameter validation.

use tessera_core::{
    BoxFuture, ErrorKind, ParameterLocation, TesseraError, TesseraResult, ValidationError,
};
use tessera_docs::{update_path_parameter, ParameterPatch};
use tessera_validators::ParameterValidator;

use crate::context::RequestContext;
use crate::middleware::{Middleware, Next};
use crate::unit::{compose, Unit};
use crate::units::throws::throws;

/// Options for [`parameter`].
#[derive(Debug, Clone, Default)]
pub struct ParameterOptions {
    /// Description used in the generated documentation.
    pub description: Option<String>,
}

impl ParameterOptions {
    /// Options with a description.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
        }
    }
}

struct PathParameter<V> {
    name: String,
    validator: V,
}

impl<V> Middleware for PathParameter<V>
where
    V: ParameterValidator + 'static,
    V::Output: Sync,
{
    fn name(&self) -> &'static str {
        "parameter"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            let Some(raw) = ctx.path_params().get(&self.name).map(str::to_owned) else {
                return Err(TesseraError::invalid_parameter(
                    self.name.clone(),
                    ParameterLocation::Path,
                    ValidationError::new("Required parameter is missing."),
                ));
            };
            let value = self.validator.validate(&raw).await.map_err(|e| {
                TesseraError::invalid_parameter(self.name.clone(), ParameterLocation::Path, e)
            })?;
            ctx.params_mut().insert(self.name.clone(), value);
            next.run(ctx).await
        })
    }
}

/// Validates the path parameter `name` and stores the result under that name.
///
/// The route template must capture `name`; the generated documentation
/// patches the template's parameter with the validator schema.
///
/// ```
/// use tessera_middleware::{parameter, ParameterOptions};
/// use tessera_validators::uuid;
///
/// let unit = parameter("userId", uuid(), ParameterOptions::described("The ID of the user."));
/// assert_eq!(unit.name(), "compose");
/// ```
pub fn parameter<V>(name: impl Into<String>, validator: V, options: ParameterOptions) -> Unit
where
    V: ParameterValidator + 'static,
    V::Output: Sync,
{
    let name = name.into();
    let metadata = update_path_parameter(
        name.clone(),
        ParameterPatch {
            description: options.description,
            schema: Some(validator.schema()),
        },
    );
    compose([
        Unit::new(PathParameter { name, validator }).with_metadata(metadata),
        throws(ErrorKind::InvalidParameter),
    ])
}
