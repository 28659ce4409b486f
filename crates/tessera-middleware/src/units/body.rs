//! Request body validation.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tessera_core::{BoxFuture, ErrorKind, TesseraError, TesseraResult};
use tessera_docs::{
    add_operation_request_body, add_request_body_component, request_body_ref, MediaType,
    ReferenceOr, RequestBody, Schema, SchemaValidation, SchemaValidator,
};

use crate::context::RequestContext;
use crate::middleware::{Middleware, Next};
use crate::unit::{compose, Unit};
use crate::units::throws::throws;

/// Options for [`body`].
#[derive(Debug, Clone)]
pub struct BodyOptions {
    /// Schema the whole body must satisfy.
    pub schema: Schema,
    /// Description used in the generated documentation.
    pub description: Option<String>,
    /// Documented content type. Defaults to `application/json`.
    pub content_type: String,
    /// Register the body as a reusable request body under this name.
    pub store_as_component: Option<String>,
}

impl BodyOptions {
    /// Options for a JSON body matching `schema`.
    #[must_use]
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            description: None,
            content_type: "application/json".to_string(),
            store_as_component: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the documented content type.
    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Registers the body as a reusable component named `name`.
    #[must_use]
    pub fn stored_as(mut self, name: impl Into<String>) -> Self {
        self.store_as_component = Some(name.into());
        self
    }
}

type Mapper<T> = dyn Fn(Value) -> TesseraResult<T> + Send + Sync;

struct BodyValidation<T> {
    validator: SchemaValidator,
    mapper: Arc<Mapper<T>>,
}

impl<T: Send + Sync + 'static> Middleware for BodyValidation<T> {
    fn name(&self) -> &'static str {
        "body"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            let body = ctx.body().cloned().unwrap_or(Value::Null);
            let outcome = self
                .validator
                .validate(&body)
                .map_err(|e| TesseraError::internal_with_source("Invalid body schema", e))?;
            if let SchemaValidation::Invalid { errors } = outcome {
                return Err(TesseraError::invalid_request_body(errors.join(", ")));
            }
            let value = (self.mapper)(body)?;
            ctx.set_validated_body(value);
            next.run(ctx).await
        })
    }
}

/// Validates the request body and stores it as a [`Value`].
///
/// Read it back with `ctx.validated_body::<Value>()`.
pub fn body(options: BodyOptions) -> Unit {
    body_with(options, Ok)
}

/// Validates the request body, then deserializes it into `T`.
///
/// A body that satisfies the schema but does not deserialize is reported as
/// an invalid request body.
pub fn body_as<T>(options: BodyOptions) -> Unit
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    body_with(options, |value| {
        serde_json::from_value::<T>(value)
            .map_err(|e| TesseraError::invalid_request_body(e.to_string()))
    })
}

/// Validates the request body, then transforms it with `mapper`.
///
/// ```
/// use serde_json::Value;
/// use tessera_docs::Schema;
/// use tessera_middleware::{body_with, BodyOptions};
///
/// let schema = Schema::object()
///     .property("email", Schema::string())
///     .required_property("email");
/// let unit = body_with(BodyOptions::new(schema), |value| {
///     Ok(value["email"].as_str().unwrap_or_default().to_lowercase())
/// });
/// assert!(unit.metadata().is_some());
/// ```
pub fn body_with<T, F>(options: BodyOptions, mapper: F) -> Unit
where
    T: Send + Sync + 'static,
    F: Fn(Value) -> TesseraResult<T> + Send + Sync + 'static,
{
    let BodyOptions {
        schema,
        description,
        content_type,
        store_as_component,
    } = options;

    let declaration = |schema: Schema| RequestBody {
        description: description.clone(),
        required: true,
        content: [(
            content_type.clone(),
            MediaType {
                schema: Some(schema),
                example: None,
            },
        )]
        .into_iter()
        .collect(),
    };
    let metadata = match &store_as_component {
        Some(name) => add_request_body_component(name.clone(), declaration(schema.clone()))
            .then(add_operation_request_body(ReferenceOr::reference(
                request_body_ref(name),
            ))),
        None => add_operation_request_body(ReferenceOr::Item(declaration(schema.clone()))),
    };

    let middleware = BodyValidation {
        validator: SchemaValidator::new(schema),
        mapper: Arc::new(mapper),
    };
    compose([
        Unit::new(middleware).with_metadata(metadata),
        throws(ErrorKind::InvalidRequestBody),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde::Deserialize;
    use serde_json::json;
    use tessera_docs::{generate_documentation, RouteDescriptor};

    fn create_user() -> Schema {
        Schema::object()
            .property("email", Schema::string())
            .property("firstName", Schema::string())
            .required_property("email")
    }

    fn request(body: Value) -> RequestContext {
        RequestContext::new(Method::POST, "/users").with_body(body)
    }

    #[tokio::test]
    async fn test_valid_body_is_stored() {
        let unit = body(BodyOptions::new(create_user()));
        let mut ctx = request(json!({"email": "morty@c137.com"}));
        unit.process(&mut ctx, Next::end()).await.unwrap();
        assert_eq!(
            ctx.validated_body::<Value>(),
            Some(&json!({"email": "morty@c137.com"}))
        );
    }

    #[tokio::test]
    async fn test_invalid_body_is_rejected() {
        let unit = body(BodyOptions::new(create_user()));
        let mut ctx = request(json!({"firstName": 42}));
        let err = unit.process(&mut ctx, Next::end()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidRequestBody);
        let message = err.to_string();
        assert!(message.starts_with("Invalid request body. "));
        assert!(message.contains("email"));
        assert!(ctx.validated_body::<Value>().is_none());
    }

    #[tokio::test]
    async fn test_missing_body_is_null() {
        let unit = body(BodyOptions::new(create_user()));
        let mut ctx = RequestContext::new(Method::POST, "/users");
        let err = unit.process(&mut ctx, Next::end()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequestBody);
    }

    #[tokio::test]
    async fn test_typed_body() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct CreateUser {
            email: String,
            first_name: Option<String>,
        }

        let unit = body_as::<CreateUser>(BodyOptions::new(create_user()));
        let mut ctx = request(json!({"email": "a@b.c", "firstName": "Rick"}));
        unit.process(&mut ctx, Next::end()).await.unwrap();
        assert_eq!(
            ctx.validated_body::<CreateUser>(),
            Some(&CreateUser {
                email: "a@b.c".to_string(),
                first_name: Some("Rick".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_mapper_runs_after_validation() {
        let unit = body_with(BodyOptions::new(create_user()), |value| {
            Ok(value["email"].as_str().unwrap_or_default().len())
        });
        let mut ctx = request(json!({"email": "abc"}));
        unit.process(&mut ctx, Next::end()).await.unwrap();
        assert_eq!(ctx.validated_body::<usize>(), Some(&3));
    }

    fn document(unit: &Unit) -> Value {
        let methods = [Method::POST];
        let api = generate_documentation(
            [RouteDescriptor {
                methods: &methods,
                path: "/users",
                name: None,
                metadata: unit.metadata(),
            }],
            &Value::Null,
        )
        .unwrap();
        serde_json::to_value(api).unwrap()
    }

    #[test]
    fn test_documents_inline_body() {
        let doc = document(&body(
            BodyOptions::new(create_user()).described("The user to be created"),
        ));
        let operation = &doc["paths"]["/users"]["post"];
        assert_eq!(
            operation["requestBody"]["description"],
            "The user to be created"
        );
        assert_eq!(
            operation["requestBody"]["content"]["application/json"]["schema"]["required"],
            json!(["email"])
        );
        assert_eq!(
            operation["responses"]["422"]["$ref"],
            "#/components/responses/InvalidRequestBody"
        );
    }

    #[test]
    fn test_documents_component_body() {
        let doc = document(&body(
            BodyOptions::new(create_user())
                .content_type("application/vnd.api+json")
                .stored_as("CreateUser"),
        ));
        assert_eq!(
            doc["paths"]["/users"]["post"]["requestBody"],
            json!({"$ref": "#/components/requestBodies/CreateUser"})
        );
        assert!(doc["components"]["requestBodies"]["CreateUser"]["content"]
            ["application/vnd.api+json"]["schema"]
            .is_object());
    }
}
