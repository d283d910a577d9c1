//! Request entry/exit logging.
//!
//! The handler wrapper reports every invocation through a [`RequestLog`]:
//! one line when the request arrives and one when the response leaves.
//! Elapsed time is measured by the caller and passed in.
//!
//! | Event | Line |
//! |-------|------|
//! | entry | `→ [GET] /users/42` |
//! | exit, 2xx | `✓ [GET] /users/42 (200) took 3ms` |
//! | exit, other | `× [GET] /users/42 (403) took 3ms` |
//!
//! [`TracingRequestLog`] attaches structured fields named as in
//! [`fields`](crate::logging::fields).

use http::StatusCode;
use std::error::Error as StdError;
use std::fmt;
use typed_route_core::RouteError;

/// Sink for request lifecycle events.
pub trait RequestLog: Send + Sync {
    /// Records that a request arrived.
    fn request_started(&self, method: &str, path: &str);

    /// Records that a response is being returned.
    fn request_finished(&self, method: &str, path: &str, status: StatusCode, elapsed_ms: u64);

    /// Records an unrecognized failure that was hidden from the client.
    fn unhandled_error(&self, error: &RouteError);
}

impl fmt::Debug for dyn RequestLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestLog")
    }
}

/// Formats the request entry line.
#[must_use]
pub fn format_entry(method: &str, path: &str) -> String {
    format!("→ [{method}] {path}")
}

/// Formats the response exit line.
#[must_use]
pub fn format_exit(method: &str, path: &str, status: StatusCode, elapsed_ms: u64) -> String {
    let marker = if status.is_success() { '✓' } else { '×' };
    format!(
        "{marker} [{method}] {path} ({}) took {elapsed_ms}ms",
        status.as_u16()
    )
}

/// Renders an error and its sources as `outer: inner: root`.
#[must_use]
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

/// [`RequestLog`] that emits `tracing` events.
///
/// Exit lines for server errors are emitted at `warn`, everything else at
/// `info`. Unhandled errors are emitted at `error` with their cause chain.
#[derive(Debug, Clone, Default)]
pub struct TracingRequestLog {
    service_name: Option<String>,
}

impl TracingRequestLog {
    /// Creates a request log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a service name to every event.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    fn service(&self) -> &str {
        self.service_name.as_deref().unwrap_or_default()
    }
}

impl RequestLog for TracingRequestLog {
    fn request_started(&self, method: &str, path: &str) {
        tracing::info!(
            service.name = self.service(),
            http.method = method,
            http.path = path,
            "{}",
            format_entry(method, path)
        );
    }

    fn request_finished(&self, method: &str, path: &str, status: StatusCode, elapsed_ms: u64) {
        let line = format_exit(method, path, status, elapsed_ms);
        if status.is_server_error() {
            tracing::warn!(
                service.name = self.service(),
                http.method = method,
                http.path = path,
                http.status_code = status.as_u16(),
                duration_ms = elapsed_ms,
                "{line}"
            );
        } else {
            tracing::info!(
                service.name = self.service(),
                http.method = method,
                http.path = path,
                http.status_code = status.as_u16(),
                duration_ms = elapsed_ms,
                "{line}"
            );
        }
    }

    fn unhandled_error(&self, error: &RouteError) {
        tracing::error!(
            service.name = self.service(),
            error = %error,
            error.chain = %error_chain(error),
            "Unhandled API Error"
        );
    }
}
