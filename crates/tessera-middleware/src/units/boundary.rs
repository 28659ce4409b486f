//! Error boundary.
//!
//! Catches every error raised by the rest of the pipeline and turns it into
//! an error envelope on the context.
//!
//! Typed errors keep their own status and message:
//!
//! ```json
//! {"error": {"status": 422, "code": "InvalidParameter", "message": "..."}}
//! ```
//!
//! Anything else becomes a 500 carrying the request id. The message and the
//! debug detail are only exposed in development mode:
//!
//! ```json
//! {"id": "...", "error": {"status": 500, "code": "UnhandledError", "message": "An unknown error occurred"}}
//! ```

use http::StatusCode;
use tessera_core::{
    BoxFuture, ErrorBody, ErrorKind, ErrorResponse, ExecutionMode, RequestId, TesseraError,
    TesseraResult,
};

use crate::context::RequestContext;
use crate::middleware::{Middleware, Next};
use crate::unit::Unit;

/// Message used for unexpected errors outside development mode.
const HIDDEN_MESSAGE: &str = "An unknown error occurred";

/// Middleware that renders errors as envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorBoundary {
    mode: ExecutionMode,
}

impl ErrorBoundary {
    /// Creates a boundary for the given mode.
    #[must_use]
    pub const fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }
}

impl Middleware for ErrorBoundary {
    fn name(&self) -> &'static str {
        "error_boundary"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            if let Err(error) = next.run(ctx).await {
                write_error(ctx, &error, self.mode);
            }
            Ok(())
        })
    }
}

/// Builds the status and envelope for an error.
///
/// Unexpected errors are logged with the request id.
pub fn render_error(
    error: &TesseraError,
    request_id: RequestId,
    mode: ExecutionMode,
) -> (StatusCode, ErrorResponse) {
    if error.is_typed() {
        return (error.status_code(), error.to_response());
    }

    tracing::error!(request_id = %request_id, error = ?error, "Unhandled error");
    let kind = ErrorKind::Unhandled;
    let envelope = ErrorResponse {
        id: Some(request_id.to_string()),
        error: ErrorBody {
            status: kind.status().as_u16(),
            code: kind.code().to_string(),
            message: if mode.is_development() {
                error.to_string()
            } else {
                HIDDEN_MESSAGE.to_string()
            },
            stack: mode.is_development().then(|| format!("{error:?}")),
        },
    };
    (kind.status(), envelope)
}

/// Writes the envelope for `error` into the context's response.
pub(crate) fn write_error(ctx: &mut RequestContext, error: &TesseraError, mode: ExecutionMode) {
    let (status, envelope) = render_error(error, ctx.request_id(), mode);
    ctx.set_status(status);
    match serde_json::to_value(envelope) {
        Ok(body) => ctx.set_response_body(body),
        Err(e) => tracing::error!(error = %e, "Failed to serialize error envelope"),
    }
}

/// A unit that catches errors from everything after it.
///
/// Put it first in the outermost composition.
pub fn error_boundary(mode: ExecutionMode) -> Unit {
    Unit::new(ErrorBoundary::new(mode))
}
