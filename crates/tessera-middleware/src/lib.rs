//! # Tessera Middleware
//!
//! Composable request-validation units that document themselves.
//!
//! A [`Unit`] is a middleware paired with an optional documentation
//! contribution. Units are chained with [`compose`]; the composed unit runs
//! its parts in order at request time and applies their contributions in the
//! same order when the OpenAPI document is generated.
//!
//! ## Units
//!
//! | Unit | Runtime effect | Documentation |
//! |---|---|---|
//! | [`parameter`] | validates a path parameter | path parameter schema |
//! | [`query`] | validates a query parameter | query parameter, inline or component |
//! | [`paginated`] | `offset` and `limit` | two parameter components |
//! | [`sortable`] | `sort` over declared fields | `sort` parameter |
//! | [`body`] | checks the JSON body against a schema | request body |
//! | [`returns`] | sets status and body | success response |
//! | [`throws`] | none | error response |
//! | [`description`], [`summary`], [`tags`] | none | operation text |
//! | [`serve_schema`] | serves the generated document | the endpoint itself |
//! | [`error_boundary`] | renders errors as envelopes | none |
//!
//! ## Example
//!
//! ```
//! use tessera_core::ExecutionMode;
//! use tessera_docs::Schema;
//! use tessera_middleware::{
//!     compose, description, error_boundary, handler, ok, paginated, returns,
//!     PaginationOptions, Router,
//! };
//!
//! let mode = ExecutionMode::Development;
//! let mut router = Router::new().with_mode(mode);
//! router.get(
//!     "/users",
//!     compose![
//!         error_boundary(mode),
//!         description("Fetch a paginated list of users."),
//!         paginated(PaginationOptions::default()),
//!         returns(ok(Schema::array(Schema::string())), mode),
//!         handler(|ctx| {
//!             Box::pin(async move {
//!                 let limit = ctx.params().get::<i64>("limit").copied().unwrap_or(10);
//!                 let users: Vec<String> = (0..limit.min(2)).map(|i| format!("user-{i}")).collect();
//!                 ctx.set_returns(&users)
//!             })
//!         }),
//!     ],
//! );
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod params;
pub mod router;
pub mod unit;
pub mod units;

pub use context::RequestContext;
pub use middleware::{FnMiddleware, HandlerFn, Middleware, Next, Passthrough};
pub use params::{ParamBag, PathParams, QueryParams};
pub use router::{Route, Router};
pub use tessera_core::BoxFuture;
pub use unit::{compose, handler, Unit};
pub use units::{
    body, body_as, body_with, created, description, error_boundary, error_schema, no_content, ok,
    paginated, parameter, query, render_error, returns, serve_schema, sortable, summary, tags,
    throws, BodyOptions, ErrorBoundary, PaginationOptions, ParameterOptions, QueryOptions,
    ReturnsOptions, SortDirection, SortableOptions, Sorting, ThrowsOptions,
};
