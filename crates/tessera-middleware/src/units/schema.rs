//! Serving the generated OpenAPI document.

use std::sync::Weak;

use parking_lot::RwLock;
use serde_json::Value;
use tessera_core::{BoxFuture, TesseraError, TesseraResult};
use tessera_docs::{
    add_operation_response, update_operation, MediaType, OperationPatch, ReferenceOr, Response,
    Schema,
};

use crate::context::RequestContext;
use crate::middleware::{Middleware, Next};
use crate::router::{document, RouteTable, Router};
use crate::unit::Unit;

/// JSON Schema of an OpenAPI 3.0 document.
const OPENAPI_SCHEMA_URL: &str =
    "https://rawgit.com/OAI/OpenAPI-Specification/master/schemas/v3.0/schema.json";

const DESCRIPTION: &str = "OpenAPI specification";

struct ServeSchema {
    routes: Weak<RouteTable>,
    partial: Value,
    cache: RwLock<Option<Value>>,
}

impl ServeSchema {
    fn generate(&self) -> TesseraResult<Value> {
        let routes = self
            .routes
            .upgrade()
            .ok_or_else(|| TesseraError::internal("The router of this document was dropped"))?;
        let api = document(&routes, &self.partial).map_err(|e| {
            TesseraError::internal_with_source("Failed to generate the OpenAPI document", e)
        })?;
        serde_json::to_value(&api).map_err(|e| {
            TesseraError::internal_with_source("Failed to serialize the OpenAPI document", e)
        })
    }

    fn document(&self) -> TesseraResult<Value> {
        if let Some(cached) = self.cache.read().as_ref() {
            return Ok(cached.clone());
        }
        let generated = self.generate()?;
        let paths = generated["paths"].as_object().map_or(0, serde_json::Map::len);
        tracing::info!(paths, "Generated OpenAPI document");
        Ok(self.cache.write().get_or_insert(generated).clone())
    }
}

impl Middleware for ServeSchema {
    fn name(&self) -> &'static str {
        "serve_schema"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        _next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            let document = self.document()?;
            ctx.set_status(http::StatusCode::OK);
            ctx.set_response_body(document);
            Ok(())
        })
    }
}

/// Serves the OpenAPI document of every route of `router`.
///
/// The document is generated on the first request, starting from `partial`
/// (for example `{"info": {"title": "Users API", "version": "1.0.0"}}`), and
/// the same document is returned afterwards. Routes added after the first
/// request do not appear in it.
///
/// ```
/// use serde_json::json;
/// use tessera_middleware::{serve_schema, Router};
///
/// let mut router = Router::new();
/// router.get(
///     "/schema",
///     serve_schema(&router, json!({"info": {"title": "Users API", "version": "1.0.0"}})),
/// );
/// ```
pub fn serve_schema(router: &Router, partial: Value) -> Unit {
    let response = Response::new(DESCRIPTION).with_content(
        "application/json",
        MediaType {
            schema: Some(Schema::reference(OPENAPI_SCHEMA_URL)),
            example: None,
        },
    );
    let metadata = update_operation(OperationPatch {
        description: Some(DESCRIPTION.to_string()),
        ..Default::default()
    })
    .then(add_operation_response("200", ReferenceOr::Item(response)));

    Unit::new(ServeSchema {
        routes: router.table(),
        partial,
        cache: RwLock::new(None),
    })
    .with_metadata(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use serde_json::json;

    use crate::units::describe::description;

    async fn fetch(unit: &Unit) -> TesseraResult<Value> {
        let mut ctx = RequestContext::new(Method::GET, "/schema");
        unit.process(&mut ctx, Next::end()).await?;
        Ok(ctx.response_body().cloned().unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_serves_cached_document() {
        let mut router = Router::new();
        router.get("/users", description("List users."));
        let unit = serve_schema(
            &router,
            json!({"info": {"title": "Users API", "version": "2.0.0"}}),
        );
        router.get("/schema", unit.clone());

        let first = fetch(&unit).await.unwrap();
        assert_eq!(first["openapi"], "3.0.0");
        assert_eq!(first["info"]["title"], "Users API");
        assert_eq!(first["paths"]["/users"]["get"]["description"], "List users.");
        assert_eq!(
            first["paths"]["/schema"]["get"]["description"],
            "OpenAPI specification"
        );

        router.get("/late", description("Added after the first request."));
        let second = fetch(&unit).await.unwrap();
        assert_eq!(first, second);
        assert!(second["paths"].get("/late").is_none());
    }

    #[tokio::test]
    async fn test_dropped_router_is_internal_error() {
        let unit = {
            let router = Router::new();
            serve_schema(&router, Value::Null)
        };
        let err = fetch(&unit).await.unwrap_err();
        assert!(!err.is_typed());
    }

    #[tokio::test]
    async fn test_invalid_partial_is_internal_error() {
        let router = Router::new();
        let unit = serve_schema(&router, json!(["not", "an", "object"]));
        assert!(fetch(&unit).await.is_err());
    }
}
