//! Host framework control signals.
//!
//! Some outcomes are not errors at all: a redirect or a "render the not
//! found page" request must reach the host framework untouched. Handlers
//! return a [`FrameworkSignal`] for these and the wrapper passes it through
//! without converting it into a JSON body.

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use thiserror::Error;

/// A control-flow signal for the host framework.
///
/// # Example
///
/// ```rust
/// use typed_route_core::{FrameworkSignal, RouteResult};
/// use http::StatusCode;
///
/// fn legacy() -> RouteResult<()> {
///     Err(FrameworkSignal::redirect("/dashboard").into())
/// }
///
/// let signal = FrameworkSignal::permanent_redirect("/new");
/// assert_eq!(signal.status(), StatusCode::PERMANENT_REDIRECT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameworkSignal {
    /// Redirect the client elsewhere.
    #[error("redirect to {location} ({status})")]
    Redirect {
        /// Target URL.
        location: String,
        /// Redirect status code.
        status: StatusCode,
    },
    /// Render the framework's not-found page.
    #[error("not found page")]
    NotFound,
}

impl FrameworkSignal {
    /// Temporary redirect (307).
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            status: StatusCode::TEMPORARY_REDIRECT,
        }
    }

    /// Permanent redirect (308).
    #[must_use]
    pub fn permanent_redirect(location: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            status: StatusCode::PERMANENT_REDIRECT,
        }
    }

    /// Render the not-found page.
    #[must_use]
    pub const fn not_found_page() -> Self {
        Self::NotFound
    }

    /// Returns the status code the host framework will answer with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Redirect { status, .. } => *status,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Builds a plain HTTP response for hosts that do not handle signals
    /// themselves.
    ///
    /// A redirect location that is not a valid header value is omitted.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status();
        let mut response = Response::new(Bytes::new());
        *response.status_mut() = status;
        if let Self::Redirect { location, .. } = self {
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
        }
        response
    }
}
