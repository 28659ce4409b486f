//! Pipeline units and their composition.
//!
//! A [`Unit`] pairs a middleware with an optional documentation
//! [`Contribution`]. [`compose`] chains units into one unit: at runtime the
//! units run in order, each deciding whether to continue; in documentation
//! their contributions apply in the same order.
//!
//! ```text
//! compose([a, b, c]).process(ctx, outer)
//!
//!   a ──next──▶ b ──next──▶ c ──next──▶ outer
//!   ◀──────────◀──────────◀────────────┘ results propagate unchanged
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tessera_core::{BoxFuture, TesseraError, TesseraResult};
use tessera_docs::Contribution;

use crate::context::RequestContext;
use crate::middleware::{FnMiddleware, Middleware, Next, Passthrough};

/// An executable step plus its documentation effect.
#[derive(Clone)]
pub struct Unit {
    middleware: Arc<dyn Middleware>,
    metadata: Option<Contribution>,
}

impl Unit {
    /// Wraps a middleware with no documentation effect.
    pub fn new<M: Middleware>(middleware: M) -> Self {
        Self {
            middleware: Arc::new(middleware),
            metadata: None,
        }
    }

    /// A unit that only continues and only documents.
    pub fn metadata_only(contribution: Contribution) -> Self {
        Self::new(Passthrough).with_metadata(contribution)
    }

    /// A unit defined by a function.
    ///
    /// ```
    /// use tessera_middleware::Unit;
    /// use http::StatusCode;
    ///
    /// let accepted = Unit::from_fn("accepted", |ctx, next| {
    ///     Box::pin(async move {
    ///         next.run(ctx).await?;
    ///         ctx.set_status(StatusCode::ACCEPTED);
    ///         Ok(())
    ///     })
    /// });
    /// assert!(accepted.metadata().is_none());
    /// ```
    pub fn from_fn<F>(name: &'static str, func: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestContext, Next<'a>) -> BoxFuture<'a, TesseraResult<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(FnMiddleware::new(name, func))
    }

    /// Attaches a contribution, replacing any previous one.
    #[must_use]
    pub fn with_metadata(mut self, contribution: Contribution) -> Self {
        self.metadata = Some(contribution);
        self
    }

    /// Returns the attached contribution.
    pub fn metadata(&self) -> Option<&Contribution> {
        self.metadata.as_ref()
    }

    /// Returns the middleware name.
    pub fn name(&self) -> &'static str {
        self.middleware.name()
    }

    /// Runs the unit.
    pub fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        self.middleware.process(ctx, next)
    }
}

impl std::fmt::Debug for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unit")
            .field("name", &self.name())
            .field("metadata", &self.metadata.is_some())
            .finish()
    }
}

/// Shared state of one run through a composed pipeline.
pub(crate) struct Dispatch<'a> {
    units: &'a [Unit],
    /// One past the highest index dispatched so far.
    dispatched: AtomicUsize,
    outer: Next<'a>,
}

impl<'a> Dispatch<'a> {
    pub(crate) fn dispatch<'b>(
        self: Arc<Self>,
        index: usize,
        ctx: &'b mut RequestContext,
    ) -> BoxFuture<'b, TesseraResult<()>>
    where
        'a: 'b,
    {
        Box::pin(async move {
            let seen = self.dispatched.fetch_max(index + 1, Ordering::SeqCst);
            if index < seen {
                return Err(TesseraError::NextCalledMultipleTimes);
            }
            match self.units.get(index) {
                Some(unit) => {
                    tracing::trace!(unit = unit.name(), index, "Dispatching unit");
                    let next = Next::step(Arc::clone(&self), index + 1);
                    unit.process(ctx, next).await
                }
                None => self.outer.run(ctx).await,
            }
        })
    }
}

struct Composed {
    units: Vec<Unit>,
}

impl Middleware for Composed {
    fn name(&self) -> &'static str {
        "compose"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        let dispatch = Arc::new(Dispatch {
            units: &self.units,
            dispatched: AtomicUsize::new(0),
            outer: next,
        });
        dispatch.dispatch(0, ctx)
    }
}

/// Chains units into one.
///
/// The result runs the units in order and continues with its own caller's
/// continuation after the last one. Its contribution is the ordered
/// combination of the units' contributions; units without one are skipped.
pub fn compose<I>(units: I) -> Unit
where
    I: IntoIterator<Item = Unit>,
{
    let units: Vec<Unit> = units.into_iter().collect();
    let metadata = Contribution::combine(units.iter().filter_map(|u| u.metadata.clone()));
    Unit {
        middleware: Arc::new(Composed { units }),
        metadata,
    }
}

/// A unit running a route handler, then whatever follows it.
///
/// ```
/// use tessera_middleware::handler;
///
/// let list_users = handler(|ctx| {
///     Box::pin(async move { ctx.set_returns(&Vec::<String>::new()) })
/// });
/// assert_eq!(list_users.name(), "handler");
/// ```
pub fn handler<F>(func: F) -> Unit
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, TesseraResult<()>>
        + Send
        + Sync
        + 'static,
{
    Unit::new(Handler { func })
}

struct Handler<F> {
    func: F,
}

impl<F> Middleware for Handler<F>
where
    F: for<'a> Fn(&'a mut RequestContext) -> BoxFuture<'a, TesseraResult<()>>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        "handler"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        next: Next<'a>,
    ) -> BoxFuture<'a, TesseraResult<()>> {
        Box::pin(async move {
            (self.func)(&mut *ctx).await?;
            next.run(ctx).await
        })
    }
}

/// Chains units into one, see [`compose`].
///
/// ```
/// use tessera_middleware::{compose, description, summary};
///
/// let unit = compose![summary("List users"), description("Returns every user.")];
/// assert!(unit.metadata().is_some());
/// ```
#[macro_export]
macro_rules! compose {
    ($($unit:expr),* $(,)?) => {
        $crate::compose([$($crate::Unit::from($unit)),*])
    };
}
