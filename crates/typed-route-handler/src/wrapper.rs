//! Handler wrapper.
//!
//! [`handler`] wraps a route handler so that every invocation:
//!
//! 1. records its start time and logs the entry line
//! 2. runs the handler with the original request and context
//! 3. converts any error through [`build_error_response`]
//! 4. logs the exit line with status and elapsed milliseconds
//!
//! The exit line is written exactly once per call, including when the
//! handler returns a framework signal.

use crate::error_response::{build_error_response, internal_error, OnError};
use bytes::Bytes;
use http::Response;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;
use typed_route_core::response::{into_http_response, ApiResponse};
use typed_route_core::{FrameworkSignal, RouteContext, RouteHandler, RouteParams, RouteRequest};
use typed_route_telemetry::{RequestLog, TracingRequestLog};

/// Wraps a route handler with request logging and error conversion.
///
/// # Example
///
/// ```rust
/// use http::{Request, StatusCode};
/// use typed_route_core::response::json;
/// use typed_route_core::{forbidden, RouteContext, RouteError};
/// use typed_route_handler::handler;
///
/// let admin_only = handler(|_req: Request<()>, _ctx: RouteContext| async move {
///     forbidden::<()>(None)?;
///     Ok::<_, RouteError>(json("secret"))
/// });
///
/// # tokio_test::block_on(async {
/// let request = Request::get("/admin").body(()).unwrap();
/// let response = admin_only.call(request, RouteContext::default()).await.unwrap();
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// # });
/// ```
pub fn handler<H, Req, P, T>(route_handler: H) -> TypedHandler<H, Req, P, T> {
    TypedHandler {
        handler: route_handler,
        on_error: None,
        log: Arc::new(TracingRequestLog::new()),
        _marker: PhantomData,
    }
}

/// A wrapped route handler, created by [`handler`].
///
/// Holds no per-request state; one instance serves every request of a route.
pub struct TypedHandler<H, Req, P = RouteParams, T = ()> {
    handler: H,
    on_error: Option<Arc<dyn OnError>>,
    log: Arc<dyn RequestLog>,
    _marker: PhantomData<fn(Req, P) -> T>,
}

impl<H, Req, P, T> TypedHandler<H, Req, P, T> {
    /// Sets the callback invoked with every error before it is converted.
    #[must_use]
    pub fn on_error<E>(mut self, callback: E) -> Self
    where
        E: OnError + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Replaces the request log, [`TracingRequestLog`] by default.
    #[must_use]
    pub fn request_log(mut self, log: Arc<dyn RequestLog>) -> Self {
        self.log = log;
        self
    }

    /// Returns the wrapped handler.
    pub fn inner(&self) -> &H {
        &self.handler
    }
}

impl<H, Req, P, T> TypedHandler<H, Req, P, T>
where
    H: RouteHandler<Req, P, T>,
    Req: RouteRequest,
{
    /// Handles one request.
    ///
    /// Returns the handler's response, or the error response built from its
    /// failure. Framework signals are returned as `Err` for the host.
    pub async fn call(
        &self,
        request: Req,
        context: RouteContext<P>,
    ) -> Result<Response<ApiResponse<T>>, FrameworkSignal> {
        let started = Instant::now();
        let method = request.method().to_string();
        let path = request.path().to_string();
        self.log.request_started(&method, &path);

        let result = match self.handler.handle(request, context).await {
            Ok(response) => Ok(response),
            Err(error) => build_error_response(error, self.on_error.as_deref(), &*self.log),
        };

        let status = match &result {
            Ok(response) => response.status(),
            Err(signal) => signal.status(),
        };
        self.log
            .request_finished(&method, &path, status, elapsed_ms(started));
        result
    }

    /// Handles one request and serializes the outcome for the wire.
    ///
    /// Framework signals become their plain HTTP response. A body that fails
    /// to serialize is logged and answered with the generic 500 response.
    pub async fn respond(&self, request: Req, context: RouteContext<P>) -> Response<Bytes>
    where
        T: Serialize,
    {
        match self.call(request, context).await {
            Ok(response) => into_http_response(response).unwrap_or_else(|err| {
                tracing::error!(error = %err, "Failed to serialize response body");
                fallback_response()
            }),
            Err(signal) => signal.into_response(),
        }
    }
}

fn fallback_response() -> Response<Bytes> {
    into_http_response(internal_error::<()>()).unwrap_or_else(|_| {
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = http::StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl<H: Clone, Req, P, T> Clone for TypedHandler<H, Req, P, T> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            on_error: self.on_error.clone(),
            log: Arc::clone(&self.log),
            _marker: PhantomData,
        }
    }
}

impl<H, Req, P, T> fmt::Debug for TypedHandler<H, Req, P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedHandler")
            .field("handler", &std::any::type_name::<H>())
            .field("on_error", &self.on_error.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{header, Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use typed_route_core::response::{empty, json};
    use typed_route_core::{not_found, RouteError};
    use typed_route_test::{LogEvent, RecordingLog};

    fn get(path: &str) -> Request<()> {
        Request::get(path).body(()).unwrap()
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let log = Arc::new(RecordingLog::new());
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Ok::<_, RouteError>(empty::<()>(StatusCode::NO_CONTENT))
        })
        .request_log(log.clone());

        let response = wrapped.call(get("/ping"), RouteContext::default()).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(log.entries(), 1);
        assert_eq!(log.exits(), 1);
        assert_eq!(log.lines()[0], "→ [GET] /ping");
        assert!(log.lines()[1].starts_with("✓ [GET] /ping (204) took "));
    }

    #[tokio::test]
    async fn test_error_converted_and_logged() {
        let log = Arc::new(RecordingLog::new());
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            not_found::<Response<ApiResponse<()>>>(Some("No such post"))
        })
        .request_log(log.clone());

        let response = wrapped.call(get("/posts/9"), RouteContext::default()).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().error().unwrap().error, "No such post");
        assert_eq!(log.last_status(), Some(StatusCode::NOT_FOUND));
        assert!(log.lines()[1].starts_with("× [GET] /posts/9 (404)"));
    }

    #[tokio::test]
    async fn test_params_failure_is_internal_error() {
        let log = Arc::new(RecordingLog::new());
        let wrapped = handler(|_req: Request<()>, ctx: RouteContext| async move {
            let params = ctx.params().await?;
            Ok::<_, RouteError>(json(params.len()))
        })
        .request_log(log.clone());

        let context = RouteContext::rejected(typed_route_core::ParamsError::new("gone"));
        let response = wrapped.call(get("/"), context).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(log.unhandled(), 1);
    }

    #[tokio::test]
    async fn test_framework_signal_logged_and_returned() {
        let log = Arc::new(RecordingLog::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Err::<Response<ApiResponse<()>>, _>(RouteError::from(FrameworkSignal::redirect(
                "/login",
            )))
        })
        .on_error(move |_: &RouteError| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .request_log(log.clone());

        let signal = wrapped
            .call(get("/account"), RouteContext::default())
            .await
            .unwrap_err();

        assert_eq!(signal, FrameworkSignal::redirect("/login"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(log.exits(), 1);
        assert_eq!(log.last_status(), Some(StatusCode::TEMPORARY_REDIRECT));
    }

    #[tokio::test]
    async fn test_on_error_sees_original_error() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = seen.clone();
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Err::<Response<ApiResponse<()>>, _>(RouteError::unhandled(anyhow::anyhow!("db down")))
        })
        .on_error(move |err: &RouteError| sink.lock().unwrap().push(err.to_string()))
        .request_log(Arc::new(RecordingLog::new()));

        let response = wrapped.call(get("/"), RouteContext::default()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(*seen.lock().unwrap(), vec!["db down".to_string()]);
    }

    #[tokio::test]
    async fn test_respond_serializes() {
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Ok::<_, RouteError>(json(serde_json::json!({"ok": true})))
        })
        .request_log(Arc::new(RecordingLog::new()));

        let response = wrapped.respond(get("/"), RouteContext::default()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(response.body(), &Bytes::from_static(br#"{"ok":true}"#));
    }

    #[tokio::test]
    async fn test_respond_framework_signal() {
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Err::<Response<ApiResponse<()>>, _>(RouteError::from(FrameworkSignal::NotFound))
        })
        .request_log(Arc::new(RecordingLog::new()));

        let response = wrapped.respond(get("/"), RouteContext::default()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.body().is_empty());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_default_log_uses_tracing() {
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Ok::<_, RouteError>(json(1_u8))
        });

        wrapped.call(get("/traced"), RouteContext::default()).await.unwrap();

        assert!(logs_contain("→ [GET] /traced"));
        assert!(logs_contain("✓ [GET] /traced (200)"));
    }

    #[tokio::test]
    async fn test_events_recorded_in_order() {
        let log = Arc::new(RecordingLog::new());
        let wrapped = handler(|_req: Request<()>, _ctx: RouteContext| async move {
            Ok::<_, RouteError>(json(1_u8))
        })
        .request_log(log.clone());

        wrapped.call(get("/a"), RouteContext::default()).await.unwrap();
        wrapped.call(get("/b"), RouteContext::default()).await.unwrap();

        let events = log.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], LogEvent::Started { path, .. } if path == "/a"));
        assert!(matches!(&events[1], LogEvent::Finished { path, .. } if path == "/a"));
        assert!(matches!(&events[2], LogEvent::Started { path, .. } if path == "/b"));
    }
}
