//! Core middleware trait and continuation type.
//!
//! A [`Middleware`] receives the request context and a [`Next`] continuation.
//! It may run work before and after calling `next.run(ctx)`, or skip the call
//! entirely to short-circuit the rest of the pipeline.
//!
//! # Example
//!
//! ```
//! use tessera_middleware::{BoxFuture, Middleware, Next, RequestContext};
//! use tessera_core::TesseraResult;
//!
//! struct Trace;
//!
//! impl Middleware for Trace {
//!     fn name(&self) -> &'static str {
//!         "trace"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut RequestContext,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, TesseraResult<()>> {
//!         Box::pin(async move {
//!             tracing::debug!(path = ctx.path(), "before");
//!             next.run(ctx).await?;
//!             tracing::debug!(status = %ctx.status(), "after");
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use std::future::ready;
use std::sync::Arc;

use tessera_core::{BoxFuture, TesseraResult};

use crate::context::RequestContext;
use crate::unit::Dispatch;

/// A request-processing step.
///
/// # Invariants
///
/// - Errors returned by `next.run()` SHOULD be propagated unchanged unless
///   the middleware exists to translate them
/// - `next.run()` may be called at most once; a second call fails with
///   `TesseraError::NextCalledMultipleTimes`
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request.
    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>>;
}

/// A terminal continuation function.
pub type HandlerFn<'a> =
    dyn for<'c> Fn(&'c mut RequestContext) -> BoxFuture<'c, TesseraResult<()>> + Send + Sync + 'a;

/// Continuation that runs the rest of the pipeline.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    /// Continue with the unit at `index` of a composed pipeline.
    Step {
        dispatch: Arc<Dispatch<'a>>,
        index: usize,
    },
    /// Run a terminal function.
    Handler(Arc<HandlerFn<'a>>),
    /// Nothing left to run.
    End,
}

impl<'a> Next<'a> {
    pub(crate) fn step(dispatch: Arc<Dispatch<'a>>, index: usize) -> Self {
        Self {
            inner: NextInner::Step { dispatch, index },
        }
    }

    /// A continuation that does nothing.
    #[must_use]
    pub fn end() -> Self {
        Self {
            inner: NextInner::End,
        }
    }

    /// A continuation that runs `handler`.
    pub fn handler<F>(handler: F) -> Self
    where
        F: for<'c> Fn(&'c mut RequestContext) -> BoxFuture<'c, TesseraResult<()>>
            + Send
            + Sync
            + 'a,
    {
        Self {
            inner: NextInner::Handler(Arc::new(handler)),
        }
    }

    /// Runs the rest of the pipeline.
    pub fn run<'b>(&'b self, ctx: &'b mut RequestContext) -> BoxFuture<'b, TesseraResult<()>> {
        match &self.inner {
            NextInner::Step { dispatch, index } => Arc::clone(dispatch).dispatch(*index, ctx),
            NextInner::Handler(handler) => handler(ctx),
            NextInner::End => Box::pin(ready(Ok(()))),
        }
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            NextInner::Step { index, .. } => format!("step {index}"),
            NextInner::Handler(_) => "handler".to_string(),
            NextInner::End => "end".to_string(),
        };
        f.debug_tuple("Next").field(&kind).finish()
    }
}

/// A middleware defined by a function.
///
/// # Example
///
/// ```
/// use tessera_middleware::FnMiddleware;
///
/// let greet = FnMiddleware::new("greet", |ctx, next| {
///     Box::pin(async move {
///         ctx.set_response_body(serde_json::json!("hello"));
///         next.run(ctx).await
///     })
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, TesseraResult<()>>
        + Send
        + Sync
        + 'static,
{
    /// Creates a new function-based middleware.
    pub fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, TesseraResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        (self.func)(ctx, next)
    }
}

/// Middleware that only continues.
///
/// Backs units whose whole effect is documentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Middleware for Passthrough {
    fn name(&self) -> &'static str {
        "passthrough"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move { next.run(ctx).await })
    }
}
