//! Validation and documentation units.
//!
//! Every constructor here returns a [`Unit`](crate::Unit) ready to be
//! composed. Units that validate input are themselves compositions of the
//! validating step and a [`throws`] declaration for the error they raise.
//!
//! ## Request input
//!
//! - [`parameter`] - Path parameter
//! - [`query`] - Query parameter with `required`/default/empty handling
//! - [`paginated`] - `offset` and `limit` query parameters
//! - [`sortable`] - `sort` query parameter over a closed set of fields
//! - [`body`] - JSON request body checked against a schema
//!
//! ## Response and documentation
//!
//! - [`returns`] - Response status, body and contract check
//! - [`throws`] - Declares an error response
//! - [`description`], [`summary`], [`tags`] - Operation text
//! - [`serve_schema`] - Serves the generated OpenAPI document
//! - [`error_boundary`] - Turns errors into envelopes

pub mod body;
pub mod boundary;
pub mod describe;
pub mod pagination;
pub mod parameter;
pub mod query;
pub mod returns;
pub mod schema;
pub mod sortable;
pub mod throws;

pub use body::{body, body_as, body_with, BodyOptions};
pub use boundary::{error_boundary, render_error, ErrorBoundary};
pub use describe::{description, summary, tags};
pub use pagination::{paginated, PaginationOptions};
pub use parameter::{parameter, ParameterOptions};
pub use query::{query, QueryOptions};
pub use returns::{created, no_content, ok, returns, ReturnsOptions};
pub use schema::serve_schema;
pub use sortable::{sortable, SortDirection, SortableOptions, Sorting};
pub use throws::{error_schema, throws, ThrowsOptions};
