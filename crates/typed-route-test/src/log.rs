//! In-memory request log.

use http::StatusCode;
use std::sync::{Mutex, MutexGuard, PoisonError};
use typed_route_core::RouteError;
use typed_route_telemetry::request_log::{format_entry, format_exit, RequestLog};

/// One recorded request log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// Request entry.
    Started {
        /// HTTP method.
        method: String,
        /// Request path.
        path: String,
    },
    /// Response exit.
    Finished {
        /// HTTP method.
        method: String,
        /// Request path.
        path: String,
        /// Response status.
        status: StatusCode,
        /// Elapsed milliseconds.
        elapsed_ms: u64,
    },
    /// Unrecognized failure.
    Unhandled {
        /// Error message shown to the operator.
        message: String,
    },
}

impl LogEvent {
    /// Renders the event the way the request log prints it.
    #[must_use]
    pub fn line(&self) -> String {
        match self {
            Self::Started { method, path } => format_entry(method, path),
            Self::Finished {
                method,
                path,
                status,
                elapsed_ms,
            } => format_exit(method, path, *status, *elapsed_ms),
            Self::Unhandled { message } => format!("Unhandled API Error: {message}"),
        }
    }
}

/// A [`RequestLog`] that records every event for later assertions.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use typed_route_telemetry::RequestLog;
/// use typed_route_test::RecordingLog;
///
/// let log = RecordingLog::new();
/// log.request_started("GET", "/users/42");
/// log.request_finished("GET", "/users/42", StatusCode::OK, 3);
///
/// assert_eq!(log.entries(), 1);
/// assert_eq!(log.exits(), 1);
/// assert_eq!(log.lines()[1], "✓ [GET] /users/42 (200) took 3ms");
/// ```
#[derive(Debug, Default)]
pub struct RecordingLog {
    events: Mutex<Vec<LogEvent>>,
}

impl RecordingLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LogEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().clone()
    }

    /// Returns the recorded events rendered as lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(LogEvent::line).collect()
    }

    /// Number of entry events.
    #[must_use]
    pub fn entries(&self) -> usize {
        self.count(|event| matches!(event, LogEvent::Started { .. }))
    }

    /// Number of exit events.
    #[must_use]
    pub fn exits(&self) -> usize {
        self.count(|event| matches!(event, LogEvent::Finished { .. }))
    }

    /// Number of unhandled error events.
    #[must_use]
    pub fn unhandled(&self) -> usize {
        self.count(|event| matches!(event, LogEvent::Unhandled { .. }))
    }

    /// Status of the last exit event.
    #[must_use]
    pub fn last_status(&self) -> Option<StatusCode> {
        self.lock().iter().rev().find_map(|event| match event {
            LogEvent::Finished { status, .. } => Some(*status),
            _ => None,
        })
    }

    /// Removes all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn count(&self, predicate: impl Fn(&LogEvent) -> bool) -> usize {
        self.lock().iter().filter(|event| predicate(event)).count()
    }

    fn record(&self, event: LogEvent) {
        self.lock().push(event);
    }
}

impl RequestLog for RecordingLog {
    fn request_started(&self, method: &str, path: &str) {
        self.record(LogEvent::Started {
            method: method.to_string(),
            path: path.to_string(),
        });
    }

    fn request_finished(&self, method: &str, path: &str, status: StatusCode, elapsed_ms: u64) {
        self.record(LogEvent::Finished {
            method: method.to_string(),
            path: path.to_string(),
            status,
            elapsed_ms,
        });
    }

    fn unhandled_error(&self, error: &RouteError) {
        self.record(LogEvent::Unhandled {
            message: error.to_string(),
        });
    }
}
