//! Response contract.
//!
//! Handlers record their result with
//! [`RequestContext::set_returns`](crate::RequestContext::set_returns).
//! After the handler runs, `returns` sets the declared status and moves the
//! recorded value into the response body. In development mode the value is
//! also checked against the declared schema; a mismatch is logged and never
//! changes the response.

use http::StatusCode;
use serde_json::Value;
use tessera_core::{BoxFuture, ExecutionMode, TesseraResult};
use tessera_docs::{
    add_operation_response, add_response_component, response_ref, MediaType, ReferenceOr,
    Response, Schema, SchemaValidation, SchemaValidator,
};

use crate::context::RequestContext;
use crate::middleware::{Middleware, Next};
use crate::unit::Unit;

/// The response an operation produces on success.
#[derive(Debug, Clone)]
pub struct ReturnsOptions {
    /// Status set after the handler runs.
    pub status: StatusCode,
    /// Schema of the body, if there is one.
    pub schema: Option<Schema>,
    /// Description used in the generated documentation.
    pub description: String,
    /// Documented content type. Defaults to `application/json`.
    pub content_type: String,
    /// Register the response as a reusable component under this name.
    pub store_as_component: Option<String>,
}

impl ReturnsOptions {
    /// A response with the given status and description.
    pub fn new(status: StatusCode, description: impl Into<String>) -> Self {
        Self {
            status,
            schema: None,
            description: description.into(),
            content_type: "application/json".to_string(),
            store_as_component: None,
        }
    }

    /// Sets the body schema.
    #[must_use]
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the documented content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Registers the response as a reusable component named `name`.
    #[must_use]
    pub fn stored_as(mut self, name: impl Into<String>) -> Self {
        self.store_as_component = Some(name.into());
        self
    }
}

/// `200 OK` with a body matching `schema`.
pub fn ok(schema: Schema) -> ReturnsOptions {
    ReturnsOptions::new(StatusCode::OK, "Successful operation").with_schema(schema)
}

/// `201 Created` with a body matching `schema`.
pub fn created(schema: Schema) -> ReturnsOptions {
    ReturnsOptions::new(StatusCode::CREATED, "Resource created").with_schema(schema)
}

/// `204 No Content`.
pub fn no_content() -> ReturnsOptions {
    ReturnsOptions::new(StatusCode::NO_CONTENT, "No content")
}

struct Returns {
    status: StatusCode,
    validator: Option<SchemaValidator>,
    mode: ExecutionMode,
}

impl Returns {
    fn check(&self, value: &Value) {
        let Some(validator) = &self.validator else {
            return;
        };
        match validator.validate(value) {
            Ok(SchemaValidation::Valid) => {}
            Ok(SchemaValidation::Invalid { errors }) => {
                tracing::warn!(
                    "The response is not valid according to the schema. {}",
                    errors.join(", ")
                );
            }
            Err(e) => tracing::warn!(error = %e, "Response schema could not be compiled"),
        }
    }
}

impl Middleware for Returns {
    fn name(&self) -> &'static str {
        "returns"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            next.run(ctx).await?;
            if self.mode.is_development() {
                self.check(ctx.returns().unwrap_or(&Value::Null));
            }
            ctx.set_status(self.status);
            if let Some(value) = ctx.take_returns() {
                ctx.set_response_body(value);
            }
            Ok(())
        })
    }
}

/// Applies the response contract described by `options`.
///
/// ```
/// use tessera_core::ExecutionMode;
/// use tessera_docs::Schema;
/// use tessera_middleware::{ok, returns};
///
/// let unit = returns(ok(Schema::array(Schema::string())), ExecutionMode::Production);
/// assert_eq!(unit.name(), "returns");
/// ```
pub fn returns(options: ReturnsOptions, mode: ExecutionMode) -> Unit {
    let ReturnsOptions {
        status,
        schema,
        description,
        content_type,
        store_as_component,
    } = options;

    let mut response = Response::new(description);
    if let Some(schema) = &schema {
        response = response.with_content(
            content_type,
            MediaType {
                schema: Some(schema.clone()),
                example: None,
            },
        );
    }
    let code = status.as_u16().to_string();
    let metadata = match store_as_component {
        Some(name) => add_response_component(name.clone(), response).then(
            add_operation_response(code, ReferenceOr::reference(response_ref(&name))),
        ),
        None => add_operation_response(code, ReferenceOr::Item(response)),
    };

    Unit::new(Returns {
        status,
        validator: schema.map(SchemaValidator::new),
        mode,
    })
    .with_metadata(metadata)
}
