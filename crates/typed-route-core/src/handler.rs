//! Route handler and request traits.
//!
//! A route handler is an async function taking the incoming request and the
//! [`RouteContext`], and returning a typed response or a [`RouteError`].
//! Any such closure or function implements [`RouteHandler`] automatically.

use crate::context::RouteContext;
use crate::error::RouteResult;
use crate::response::ApiResponse;
use http::{Request, Response};
use std::future::Future;

/// The parts of an incoming request the handler wrapper needs to log.
pub trait RouteRequest: Send + 'static {
    /// HTTP method, e.g. `GET`.
    fn method(&self) -> &str;

    /// Request path without the query string.
    fn path(&self) -> &str;
}

impl<B: Send + 'static> RouteRequest for Request<B> {
    fn method(&self) -> &str {
        Request::method(self).as_str()
    }

    fn path(&self) -> &str {
        self.uri().path()
    }
}

/// A typed route handler.
///
/// # Type Parameters
///
/// - `Req`: the request type supplied by the host framework
/// - `P`: the route params type carried by the context
/// - `T`: the success payload type
///
/// # Example
///
/// ```rust
/// use typed_route_core::{response::json, RouteContext, RouteHandler, RouteResult};
/// use typed_route_core::response::ApiResponse;
/// use http::{Request, Response};
///
/// async fn hello(
///     _req: Request<()>,
///     _ctx: RouteContext,
/// ) -> RouteResult<Response<ApiResponse<&'static str>>> {
///     Ok(json("hello"))
/// }
///
/// fn assert_handler<H: RouteHandler<Request<()>, typed_route_core::RouteParams, &'static str>>(_: &H) {}
/// assert_handler(&hello);
/// ```
pub trait RouteHandler<Req, P, T>: Send + Sync + 'static {
    /// Handles one request.
    fn handle(
        &self,
        request: Req,
        context: RouteContext<P>,
    ) -> impl Future<Output = RouteResult<Response<ApiResponse<T>>>> + Send;
}

impl<F, Fut, Req, P, T> RouteHandler<Req, P, T> for F
where
    F: Fn(Req, RouteContext<P>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RouteResult<Response<ApiResponse<T>>>> + Send,
{
    fn handle(
        &self,
        request: Req,
        context: RouteContext<P>,
    ) -> impl Future<Output = RouteResult<Response<ApiResponse<T>>>> + Send {
        (self)(request, context)
    }
}
