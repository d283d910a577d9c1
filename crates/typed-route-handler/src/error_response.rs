//! Error response builder.
//!
//! Converts a [`RouteError`] into the JSON error envelope. Resolution order:
//!
//! | Error | Result |
//! |-------|--------|
//! | `Framework` | returned as `Err` untouched, `on_error` not called |
//! | `Validation` | 400, `{"error": "Validation Error", "issues": [...]}` |
//! | `Api` | its status, `{"error": message}` |
//! | `Unhandled` | logged, then 500 `{"error": "Internal server error"}` |
//!
//! Every error except a framework signal is first passed to the `on_error`
//! callback, if one is set.

use http::{Response, StatusCode};
use typed_route_core::response::{error_response, ApiResponse, ApiResponseError};
use typed_route_core::{ApiIssue, FrameworkSignal, RouteError};
use typed_route_telemetry::RequestLog;

/// Body message for validation failures.
pub const VALIDATION_ERROR: &str = "Validation Error";

/// Body message for unrecognized failures.
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Callback invoked with every error a handler returns.
///
/// Runs synchronously before the error is converted. Panics are not caught.
pub trait OnError: Send + Sync {
    /// Observes the error.
    fn on_error(&self, error: &RouteError);
}

impl<F> OnError for F
where
    F: Fn(&RouteError) + Send + Sync,
{
    fn on_error(&self, error: &RouteError) {
        self(error);
    }
}

/// Converts a handler error into a response.
///
/// Framework signals are handed back as `Err` so the host can act on them.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use typed_route_core::{ApiError, ApiErrorKind, RouteError};
/// use typed_route_handler::build_error_response;
/// use typed_route_telemetry::TracingRequestLog;
///
/// let err = RouteError::from(ApiError::new(ApiErrorKind::Forbidden));
/// let response = build_error_response::<()>(err, None, &TracingRequestLog::new()).unwrap();
///
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// assert_eq!(response.body().error().unwrap().error, "Forbidden");
/// ```
pub fn build_error_response<T>(
    error: RouteError,
    on_error: Option<&dyn OnError>,
    log: &dyn RequestLog,
) -> Result<Response<ApiResponse<T>>, FrameworkSignal> {
    if !error.is_framework_signal() {
        if let Some(callback) = on_error {
            callback.on_error(&error);
        }
    }

    let response = match error {
        RouteError::Framework(signal) => return Err(signal),
        RouteError::Validation(validation) => {
            let issues = validation.issues().iter().map(ApiIssue::from).collect();
            error_response(
                ApiResponseError::with_issues(VALIDATION_ERROR, issues),
                StatusCode::BAD_REQUEST,
            )
        }
        RouteError::Api(api) => error_response(ApiResponseError::new(api.message()), api.status()),
        unhandled @ RouteError::Unhandled(_) => {
            log.unhandled_error(&unhandled);
            internal_error()
        }
    };
    Ok(response)
}

/// The 500 response sent for unrecognized failures.
#[must_use]
pub fn internal_error<T>() -> Response<ApiResponse<T>> {
    error_response(
        ApiResponseError::new(INTERNAL_SERVER_ERROR),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use typed_route_core::{
        forbidden, ApiError, ApiErrorKind, Issue, PathSegment, ValidationError,
    };
    use typed_route_test::RecordingLog;

    fn build(error: RouteError, log: &RecordingLog) -> Response<ApiResponse<()>> {
        build_error_response(error, None, log).unwrap()
    }

    #[test]
    fn test_api_error() {
        let log = RecordingLog::new();
        let response = build(forbidden::<()>(None).unwrap_err(), &log);

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.body().error(),
            Some(&ApiResponseError::new("Forbidden"))
        );
        assert_eq!(log.unhandled(), 0);
    }

    #[test]
    fn test_validation_error() {
        let log = RecordingLog::new();
        let err = ValidationError::new(
            "serde",
            vec![
                Issue::at(["id"], "Expected integer"),
                Issue::at([PathSegment::from("tags"), PathSegment::from(2)], "Too short"),
            ],
        );
        let response = build(err.into(), &log);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response.body().error().unwrap();
        assert_eq!(body.error, VALIDATION_ERROR);
        let issues = body.issues.as_ref().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].path, vec!["tags".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_unhandled_error_is_hidden() {
        let log = RecordingLog::new();
        let err = RouteError::unhandled(anyhow::anyhow!("password=hunter2"));
        let response = build(err, &log);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.body().error(),
            Some(&ApiResponseError::new(INTERNAL_SERVER_ERROR))
        );
        assert_eq!(log.unhandled(), 1);
    }

    #[test]
    fn test_server_error_kind_keeps_message() {
        let log = RecordingLog::new();
        let err = ApiError::with_message(ApiErrorKind::ServerError, "maintenance");
        let response = build(err.into(), &log);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.body().error().unwrap().error, "maintenance");
        assert_eq!(log.unhandled(), 0);
    }

    #[test]
    fn test_framework_signal_passes_through() {
        let calls = AtomicUsize::new(0);
        let callback = |_: &RouteError| {
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let log = RecordingLog::new();

        let result = build_error_response::<()>(
            FrameworkSignal::redirect("/login").into(),
            Some(&callback),
            &log,
        );

        assert_eq!(result.unwrap_err(), FrameworkSignal::redirect("/login"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_not_found_signal_is_not_internal_error() {
        let log = RecordingLog::new();

        let result = build_error_response::<()>(FrameworkSignal::NotFound.into(), None, &log);

        assert_eq!(result.unwrap_err(), FrameworkSignal::NotFound);
        assert_eq!(log.unhandled(), 0);
    }

    #[test]
    fn test_on_error_called_once() {
        let calls = AtomicUsize::new(0);
        let callback = |err: &RouteError| {
            assert_eq!(err.category(), "unhandled");
            calls.fetch_add(1, Ordering::SeqCst);
        };
        let log = RecordingLog::new();

        let response = build_error_response::<()>(
            RouteError::unhandled(anyhow::anyhow!("boom")),
            Some(&callback),
            &log,
        )
        .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
