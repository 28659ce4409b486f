//! Per-request state shared by the units of a pipeline.
//!
//! The [`RequestContext`] carries the raw request (path and query
//! parameters, parsed body), the values validated so far, and the response
//! being built.

use std::any::Any;

use bytes::Bytes;
use http::{header, Method, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use serde_json::Value;
use tessera_core::{RequestId, TesseraError, TesseraResult};

use crate::params::{ParamBag, PathParams, QueryParams};

/// Context that flows through a composed pipeline.
///
/// # Example
///
/// ```
/// use tessera_middleware::RequestContext;
/// use http::Method;
///
/// let mut ctx = RequestContext::new(Method::GET, "/users");
/// ctx.params_mut().insert("limit", 10_i64);
///
/// assert_eq!(ctx.params().get::<i64>("limit"), Some(&10));
/// ```
#[derive(Debug)]
pub struct RequestContext {
    request_id: RequestId,
    method: Method,
    path: String,
    path_params: PathParams,
    query: QueryParams,
    body: Option<Value>,
    params: ParamBag,
    validated_body: Option<Box<dyn Any + Send + Sync>>,
    returns: Option<Value>,
    status: StatusCode,
    response_body: Option<Value>,
}

impl RequestContext {
    /// Creates a context with a fresh request ID and no parameters.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            path: path.into(),
            path_params: PathParams::new(),
            query: QueryParams::new(),
            body: None,
            params: ParamBag::new(),
            validated_body: None,
            returns: None,
            status: StatusCode::OK,
            response_body: None,
        }
    }

    /// Sets the captured path parameters.
    #[must_use]
    pub fn with_path_params(mut self, path_params: PathParams) -> Self {
        self.path_params = path_params;
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Sets the parsed request body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw path parameters.
    #[must_use]
    pub fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Returns the raw query parameters.
    #[must_use]
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Returns the parsed request body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the validated parameters.
    #[must_use]
    pub fn params(&self) -> &ParamBag {
        &self.params
    }

    /// Returns the validated parameters for writing.
    pub fn params_mut(&mut self) -> &mut ParamBag {
        &mut self.params
    }

    /// Stores the validated request body.
    pub fn set_validated_body<T: Send + Sync + 'static>(&mut self, body: T) {
        self.validated_body = Some(Box::new(body));
    }

    /// Returns the validated request body if it has type `T`.
    #[must_use]
    pub fn validated_body<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.validated_body
            .as_ref()
            .and_then(|body| body.downcast_ref())
    }

    /// Records the value a handler returns.
    ///
    /// The enclosing `returns` unit checks it and turns it into the response body.
    pub fn set_returns<T: Serialize>(&mut self, value: &T) -> TesseraResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| TesseraError::internal_with_source("Failed to serialize response", e))?;
        self.returns = Some(value);
        Ok(())
    }

    /// Returns the value recorded by [`set_returns`](Self::set_returns).
    #[must_use]
    pub fn returns(&self) -> Option<&Value> {
        self.returns.as_ref()
    }

    /// Takes the value recorded by [`set_returns`](Self::set_returns).
    pub fn take_returns(&mut self) -> Option<Value> {
        self.returns.take()
    }

    /// Returns the response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Sets the response status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Returns the response body.
    #[must_use]
    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }

    /// Sets the response body.
    pub fn set_response_body(&mut self, body: Value) {
        self.response_body = Some(body);
    }

    /// Converts the response state into an HTTP response.
    ///
    /// Bodies are JSON encoded; without a body the response is empty.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self.status;
        if let Some(body) = self.response_body {
            // Serializing a `Value` cannot fail.
            let bytes = serde_json::to_vec(&body).unwrap_or_default();
            *response.body_mut() = Full::new(Bytes::from(bytes));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            );
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::json;

    #[test]
    fn test_builder_sets_raw_request() {
        let mut path_params = PathParams::new();
        path_params.push("userId", "abc");
        let ctx = RequestContext::new(Method::POST, "/users/abc")
            .with_path_params(path_params)
            .with_query(QueryParams::parse("dryRun=true").unwrap())
            .with_body(json!({"name": "Ada"}));

        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.path(), "/users/abc");
        assert_eq!(ctx.path_params().get("userId"), Some("abc"));
        assert_eq!(ctx.query().first("dryRun"), Some("true"));
        assert_eq!(ctx.body(), Some(&json!({"name": "Ada"})));
    }

    #[test]
    fn test_validated_body_is_typed() {
        #[derive(Debug, PartialEq)]
        struct NewUser {
            name: String,
        }

        let mut ctx = RequestContext::new(Method::POST, "/users");
        ctx.set_validated_body(NewUser {
            name: "Ada".to_string(),
        });
        assert_eq!(ctx.validated_body::<NewUser>().unwrap().name, "Ada");
        assert!(ctx.validated_body::<String>().is_none());
    }

    #[test]
    fn test_returns_slot() {
        let mut ctx = RequestContext::new(Method::GET, "/users");
        assert!(ctx.returns().is_none());
        ctx.set_returns(&vec!["a", "b"]).unwrap();
        assert_eq!(ctx.take_returns(), Some(json!(["a", "b"])));
        assert!(ctx.returns().is_none());
    }

    #[tokio::test]
    async fn test_into_response() {
        let mut ctx = RequestContext::new(Method::GET, "/users");
        ctx.set_status(StatusCode::CREATED);
        ctx.set_response_body(json!({"id": 1}));

        let response = ctx.into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(br#"{"id":1}"#));
    }

    #[test]
    fn test_empty_response() {
        let mut ctx = RequestContext::new(Method::DELETE, "/users/1");
        ctx.set_status(StatusCode::NO_CONTENT);
        let response = ctx.into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
