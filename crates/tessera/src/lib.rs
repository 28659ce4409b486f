//! # Tessera
//!
//! Declarative request validation that documents itself.
//!
//! Routes are built from small units (path and query parameters, request
//! bodies, responses, pagination, sorting) chained with [`compose!`]. The
//! same chain validates requests at runtime and produces the route's share
//! of an OpenAPI 3.0 document.
//!
//! ## Quick Start
//!
//! ```
//! use tessera::prelude::*;
//!
//! let config = TesseraConfig::production();
//! let mode = config.mode;
//!
//! let mut router = Router::new().with_mode(mode);
//! router.get(
//!     "/users/:userId",
//!     compose![
//!         error_boundary(mode),
//!         description("Fetch user by ID."),
//!         parameter("userId", uuid(), ParameterOptions::described("The ID of the user.")),
//!         throws(ErrorKind::NotFound),
//!         returns(ok(Schema::object()), mode),
//!         handler(|_ctx| Box::pin(async { Err(TesseraError::not_found()) })),
//!     ],
//! );
//! router.get("/schema", serve_schema(&router, config.docs.to_partial_document()));
//!
//! let api = router.documentation(&config.docs.to_partial_document()).unwrap();
//! assert_eq!(api.info.title, "Tessera API");
//! ```
//!
//! ## Crates
//!
//! | Module | Contents |
//! |---|---|
//! | [`core`] | errors, execution mode, request ids |
//! | [`config`] | layered configuration |
//! | [`telemetry`] | logging setup |
//! | [`docs`] | OpenAPI types, schema validation, document generation |
//! | [`validators`] | parameter validators |
//! | [`middleware`] | units, composition, router |

#![doc(html_root_url = "https://docs.rs/tessera/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use tessera_config as config;
pub use tessera_core as core;
pub use tessera_docs as docs;
pub use tessera_middleware as middleware;
pub use tessera_telemetry as telemetry;
pub use tessera_validators as validators;

pub use tessera_middleware::compose;

/// Prelude module for convenient imports.
///
/// ```
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use tessera_config::{ConfigLoader, DocsConfig, LogFormat, LoggingConfig, TesseraConfig};
    pub use tessera_core::{
        DefinitionError, ErrorKind, ExecutionMode, ParameterLocation, RequestId, TesseraError,
        TesseraResult, ValidationError,
    };
    pub use tessera_docs::{OpenApi, Schema};
    pub use tessera_middleware::{
        body, body_as, body_with, compose, created, description, error_boundary, handler,
        no_content, ok, paginated, parameter, query, returns, serve_schema, sortable, summary,
        tags, throws, BodyOptions, Middleware, Next, PaginationOptions, ParameterOptions,
        QueryOptions, RequestContext, ReturnsOptions, Router, SortDirection, SortableOptions,
        Sorting, ThrowsOptions, Unit,
    };
    pub use tessera_telemetry::{init_logging, LogConfig};
    pub use tessera_validators::{
        array_of, date, integer, one_of, regex, string_enum, uuid, ParameterValidator,
        ValidatorExt,
    };
}
