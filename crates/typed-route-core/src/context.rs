//! Per-request route context.
//!
//! The host framework hands every route handler a context whose params are
//! resolved asynchronously. [`RouteContext`] stores them as a shared future
//! so the handler, the parameter parser and any helper can each await the
//! same resolution without re-running it.

use crate::params::RouteParams;
use futures_util::future::{self, BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// Shared, cloneable future resolving to the route params.
pub type ParamsFuture<P> = Shared<BoxFuture<'static, Result<P, ParamsError>>>;

/// Error raised when the host framework fails to resolve route params.
///
/// This is not a validation failure; it is surfaced to handlers as an
/// unhandled error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to resolve route params: {message}")]
pub struct ParamsError {
    message: String,
}

impl ParamsError {
    /// Creates a params resolution error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Context passed to a route handler alongside the request.
///
/// `P` defaults to the raw [`RouteParams`]; hand-written handlers may use an
/// already-typed params struct instead.
///
/// # Example
///
/// ```rust
/// use typed_route_core::{RouteContext, RouteParams};
///
/// # tokio_test::block_on(async {
/// let context = RouteContext::new([("id", "123")].into_iter().collect::<RouteParams>());
///
/// let first = context.params().await.unwrap();
/// let second = context.params().await.unwrap();
/// assert_eq!(first, second);
/// assert_eq!(first.get_str("id"), Some("123"));
/// # });
/// ```
pub struct RouteContext<P = RouteParams> {
    params: ParamsFuture<P>,
}

impl<P> RouteContext<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Creates a context with already-resolved params.
    #[must_use]
    pub fn new(params: P) -> Self {
        Self {
            params: future::ready(Ok(params)).boxed().shared(),
        }
    }

    /// Creates a context whose params resolve from the given future.
    ///
    /// The future runs at most once, the first time the params are awaited.
    #[must_use]
    pub fn deferred<F>(params: F) -> Self
    where
        F: Future<Output = Result<P, ParamsError>> + Send + 'static,
    {
        Self {
            params: params.boxed().shared(),
        }
    }

    /// Creates a context whose params fail to resolve.
    #[must_use]
    pub fn rejected(error: ParamsError) -> Self {
        Self {
            params: future::ready(Err(error)).boxed().shared(),
        }
    }

    /// Returns a future resolving to the params.
    ///
    /// May be awaited any number of times; every await yields the same value.
    #[must_use]
    pub fn params(&self) -> ParamsFuture<P> {
        self.params.clone()
    }

    /// Returns true once the params have resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.params.peek().is_some()
    }
}

impl<P> Clone for RouteContext<P> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
        }
    }
}

impl Default for RouteContext<RouteParams> {
    fn default() -> Self {
        Self::new(RouteParams::new())
    }
}

impl From<RouteParams> for RouteContext<RouteParams> {
    fn from(params: RouteParams) -> Self {
        Self::new(params)
    }
}

impl<P> fmt::Debug for RouteContext<P>
where
    P: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteContext")
            .field("params", &self.params.peek())
            .finish()
    }
}
