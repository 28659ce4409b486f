//! Error response declarations.
//!
//! `throws` has no runtime effect. In documentation it registers the shared
//! `Error` schema, a response component named after the error code, and a
//! reference to that component under the error's status.

use http::StatusCode;
use serde_json::json;
use tessera_core::ErrorKind;
use tessera_docs::{
    add_operation_response, add_response_component, add_schema_component, response_ref,
    schema_ref, MediaType, ReferenceOr, Response, Schema,
};

use crate::unit::Unit;

/// Name of the shared error schema component.
const ERROR_SCHEMA: &str = "Error";

/// An error response an operation may produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrowsOptions {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Machine-readable error code, also the response component name.
    pub code: String,
    /// Description of the error.
    pub description: String,
}

impl From<ErrorKind> for ThrowsOptions {
    fn from(kind: ErrorKind) -> Self {
        Self {
            status: kind.status(),
            code: kind.code().to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// Schema of the error envelope: `{"error": {"status", "code", "message"}}`.
pub fn error_schema() -> Schema {
    let detail = Schema::object()
        .property("status", Schema::integer())
        .property("code", Schema::string())
        .property("message", Schema::string())
        .required_property("status")
        .required_property("code")
        .required_property("message");
    Schema::object()
        .property("error", detail)
        .required_property("error")
}

/// Declares that the operation can fail with the given error.
///
/// ```
/// use tessera_core::ErrorKind;
/// use tessera_middleware::throws;
///
/// let unit = throws(ErrorKind::NotFound);
/// assert!(unit.metadata().is_some());
/// ```
pub fn throws(options: impl Into<ThrowsOptions>) -> Unit {
    let ThrowsOptions {
        status,
        code,
        description,
    } = options.into();

    let example = json!({
        "error": {
            "status": status.as_u16(),
            "code": code,
            "message": "This is a description of the error.",
        }
    });
    let response = Response::new(description).with_content(
        "application/json",
        MediaType {
            schema: Some(Schema::reference(schema_ref(ERROR_SCHEMA))),
            example: Some(example),
        },
    );

    let contribution = add_schema_component(ERROR_SCHEMA, error_schema())
        .then(add_response_component(code.clone(), response))
        .then(add_operation_response(
            status.as_u16().to_string(),
            ReferenceOr::reference(response_ref(&code)),
        ));
    Unit::metadata_only(contribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::Value;
    use tessera_docs::{generate_documentation, RouteDescriptor};

    use crate::context::RequestContext;
    use crate::middleware::Next;

    fn document(unit: &Unit) -> Value {
        let methods = [Method::GET];
        let api = generate_documentation(
            [RouteDescriptor {
                methods: &methods,
                path: "/users/:userId",
                name: None,
                metadata: unit.metadata(),
            }],
            &Value::Null,
        )
        .unwrap();
        serde_json::to_value(api).unwrap()
    }

    #[test]
    fn test_from_error_kind() {
        let options = ThrowsOptions::from(ErrorKind::InvalidParameter);
        assert_eq!(options.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(options.code, "InvalidParameter");
        assert!(options.description.starts_with("One of the parameters is invalid."));
    }

    #[test]
    fn test_registers_components_and_reference() {
        let doc = document(&throws(ErrorKind::NotFound));

        assert_eq!(
            doc["paths"]["/users/{userId}"]["get"]["responses"]["404"],
            json!({"$ref": "#/components/responses/NotFound"})
        );
        let response = &doc["components"]["responses"]["NotFound"];
        assert_eq!(response["description"], "The resource has not been found.");
        assert_eq!(
            response["content"]["application/json"]["schema"],
            json!({"$ref": "#/components/schemas/Error"})
        );
        assert_eq!(
            response["content"]["application/json"]["example"]["error"]["status"],
            404
        );
        assert_eq!(
            doc["components"]["schemas"]["Error"]["required"],
            json!(["error"])
        );
        assert_eq!(
            doc["components"]["schemas"]["Error"]["properties"]["error"]["required"],
            json!(["status", "code", "message"])
        );
    }

    #[test]
    fn test_custom_error() {
        let doc = document(&throws(ThrowsOptions {
            status: StatusCode::CONFLICT,
            code: "EmailTaken".to_string(),
            description: "The email is already registered.".to_string(),
        }));
        assert_eq!(
            doc["paths"]["/users/{userId}"]["get"]["responses"]["409"]["$ref"],
            "#/components/responses/EmailTaken"
        );
    }

    #[tokio::test]
    async fn test_runtime_is_passthrough() {
        let unit = throws(ErrorKind::NotFound);
        let mut ctx = RequestContext::new(Method::GET, "/");
        let next = Next::handler(|ctx| {
            ctx.set_status(StatusCode::ACCEPTED);
            Box::pin(std::future::ready(Ok(())))
        });
        unit.process(&mut ctx, next).await.unwrap();
        assert_eq!(ctx.status(), StatusCode::ACCEPTED);
    }
}
