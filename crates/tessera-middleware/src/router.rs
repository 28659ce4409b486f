//! Route table and request dispatch.
//!
//! A minimal HTTP layer for composed units. Routes use colon-style templates
//! (`/users/:userId`) and are matched in registration order; the first route
//! whose method and template match handles the request.
//!
//! # Example
//!
//! ```
//! use tessera_core::ExecutionMode;
//! use tessera_middleware::{compose, description, handler, Router};
//!
//! let mut router = Router::new().with_mode(ExecutionMode::Production);
//! router
//!     .get(
//!         "/health",
//!         compose![
//!             description("Liveness probe."),
//!             handler(|ctx| Box::pin(async move { ctx.set_returns(&"ok") })),
//!         ],
//!     )
//!     .named("health");
//! assert_eq!(router.len(), 1);
//! ```

use std::sync::{Arc, Weak};

use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use parking_lot::RwLock;
use percent_encoding::percent_decode_str;
use serde_json::Value;
use tessera_core::{ExecutionMode, TesseraError};
use tessera_docs::{generate_documentation, DocsResult, OpenApi, RouteDescriptor};

use crate::context::RequestContext;
use crate::middleware::Next;
use crate::params::{PathParams, QueryParams};
use crate::unit::Unit;
use crate::units::boundary::write_error;

/// Shared route storage.
pub(crate) type RouteTable = RwLock<Vec<Route>>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    methods: Vec<Method>,
    path: String,
    segments: Vec<Segment>,
    name: Option<String>,
    unit: Unit,
}

impl Route {
    fn new(methods: Vec<Method>, path: &str, unit: Unit) -> Self {
        let segments = split(path)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(segment.to_string()),
            })
            .collect();
        Self {
            methods,
            path: path.to_string(),
            segments,
            name: None,
            unit,
        }
    }

    /// Methods served by this route.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Colon-style path template.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Operation id, if named.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The unit run for matching requests.
    #[must_use]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    fn descriptor(&self) -> RouteDescriptor<'_> {
        RouteDescriptor {
            methods: &self.methods,
            path: &self.path,
            name: self.name.as_deref(),
            metadata: self.unit.metadata(),
        }
    }

    /// Captures percent-decoded path parameters if `method` and `path` match
    /// this route.
    fn matches(&self, method: &Method, path: &str) -> Option<PathParams> {
        if !self.methods.contains(method) {
            return None;
        }
        let mut params = PathParams::new();
        let mut segments = self.segments.iter();
        for part in split(path) {
            match segments.next()? {
                Segment::Literal(literal) if literal == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    // Segments that do not decode to UTF-8 match no route.
                    let value = percent_decode_str(part).decode_utf8().ok()?;
                    params.push(name.clone(), value);
                }
                _ => return None,
            }
        }
        segments.next().is_none().then_some(params)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.trim_matches('/').split('/')
}

/// Generates the document for every route in `table`.
pub(crate) fn document(table: &RouteTable, partial: &Value) -> DocsResult<OpenApi> {
    let routes = table.read();
    generate_documentation(routes.iter().map(Route::descriptor), partial)
}

/// An ordered set of routes.
#[derive(Debug, Default)]
pub struct Router {
    routes: Arc<RouteTable>,
    mode: ExecutionMode,
}

impl Router {
    /// Creates an empty router in development mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the mode used to render errors no unit caught.
    #[must_use]
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Registers `unit` for `methods` on `path`.
    pub fn route<I>(&mut self, methods: I, path: &str, unit: impl Into<Unit>) -> &mut Self
    where
        I: IntoIterator<Item = Method>,
    {
        let route = Route::new(methods.into_iter().collect(), path, unit.into());
        tracing::debug!(path, methods = ?route.methods, "Registered route");
        self.routes.write().push(route);
        self
    }

    /// Registers a `GET` route, which also answers `HEAD`.
    pub fn get(&mut self, path: &str, unit: impl Into<Unit>) -> &mut Self {
        self.route([Method::GET, Method::HEAD], path, unit)
    }

    /// Registers a `POST` route.
    pub fn post(&mut self, path: &str, unit: impl Into<Unit>) -> &mut Self {
        self.route([Method::POST], path, unit)
    }

    /// Registers a `PUT` route.
    pub fn put(&mut self, path: &str, unit: impl Into<Unit>) -> &mut Self {
        self.route([Method::PUT], path, unit)
    }

    /// Registers a `PATCH` route.
    pub fn patch(&mut self, path: &str, unit: impl Into<Unit>) -> &mut Self {
        self.route([Method::PATCH], path, unit)
    }

    /// Registers a `DELETE` route.
    pub fn delete(&mut self, path: &str, unit: impl Into<Unit>) -> &mut Self {
        self.route([Method::DELETE], path, unit)
    }

    /// Names the most recently registered route.
    ///
    /// The name becomes the operation id in the generated document.
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        if let Some(route) = self.routes.write().last_mut() {
            route.name = Some(name.into());
        }
        self
    }

    /// Returns the number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.read().len()
    }

    /// Returns true if no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.read().is_empty()
    }

    /// Snapshot of the registered routes.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.routes.read().clone()
    }

    /// Generates the OpenAPI document for the current routes.
    ///
    /// # Errors
    ///
    /// Fails when `partial` is neither null nor an object, or when an
    /// operation is declared for a method the document cannot hold.
    pub fn documentation(&self, partial: &Value) -> DocsResult<OpenApi> {
        document(&self.routes, partial)
    }

    pub(crate) fn table(&self) -> Weak<RouteTable> {
        Arc::downgrade(&self.routes)
    }

    /// Handles one request.
    ///
    /// Errors that no unit caught are rendered as envelopes, unmatched
    /// requests as `404 NotFound`.
    pub async fn handle(&self, request: Request<Bytes>) -> Response<Full<Bytes>> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path().to_string();
        let query = QueryParams::parse(parts.uri.query().unwrap_or_default()).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "Ignoring malformed query string");
            QueryParams::new()
        });

        let matched = {
            let routes = self.routes.read();
            routes.iter().find_map(|route| {
                route
                    .matches(&parts.method, &path)
                    .map(|params| (route.unit.clone(), params))
            })
        };

        let mut ctx = RequestContext::new(parts.method.clone(), path).with_query(query);
        let result = match matched {
            Some((unit, params)) => {
                ctx = ctx.with_path_params(params);
                match parse_body(&body) {
                    Ok(Some(value)) => {
                        ctx = ctx.with_body(value);
                        unit.process(&mut ctx, Next::end()).await
                    }
                    Ok(None) => unit.process(&mut ctx, Next::end()).await,
                    Err(error) => Err(error),
                }
            }
            None => {
                tracing::debug!(method = %parts.method, path = ctx.path(), "No route matched");
                Err(TesseraError::not_found())
            }
        };
        if let Err(error) = result {
            write_error(&mut ctx, &error, self.mode);
        }

        let mut response = ctx.into_response();
        if parts.method == Method::HEAD {
            *response.body_mut() = Full::new(Bytes::new());
        }
        response
    }
}

fn parse_body(body: &Bytes) -> Result<Option<Value>, TesseraError> {
    if body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| TesseraError::invalid_request_body(format!("Body is not valid JSON: {e}")))
}
