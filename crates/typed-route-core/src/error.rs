//! Error types for typed route handlers.
//!
//! This module provides the [`ApiError`] taxonomy used by handler authors to
//! signal a specific HTTP failure, and [`RouteError`], the single error type a
//! route handler returns.
//!
//! # `RouteError` categories
//!
//! | Variant | Meaning | Converted to |
//! |---|---|---|
//! | `Api` | Intentional, typed application error | its own status, `{error: message}` |
//! | `Validation` | Params failed a schema | 400, `{error: "Validation Error", issues}` |
//! | `Framework` | Host framework control signal | passed through untouched |
//! | `Unhandled` | Anything else | 500, `{error: "Internal server error"}` |

use crate::signal::FrameworkSignal;
use crate::validation::ValidationError;
use crate::ParamsError;
use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Result type alias using [`RouteError`].
pub type RouteResult<T> = Result<T, RouteError>;

/// The closed set of application error kinds.
///
/// Every kind has a fixed status code and a default message. Consumers that
/// need a kind outside this list use [`ApiErrorKind::Custom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// HTTP 400 Bad Request.
    BadRequest,
    /// HTTP 401 Unauthorized.
    Unauthorized,
    /// HTTP 403 Forbidden.
    Forbidden,
    /// HTTP 404 Not Found.
    NotFound,
    /// HTTP 409 Conflict.
    Conflict,
    /// HTTP 429 Too Many Requests.
    TooManyRequests,
    /// HTTP 500 Internal Server Error.
    ServerError,
    /// A consumer-defined kind with an arbitrary status.
    Custom(StatusCode),
}

impl ApiErrorKind {
    /// Returns the HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Custom(status) => *status,
        }
    }

    /// Returns the message used when none is supplied.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::TooManyRequests => "Too Many Requests",
            Self::ServerError => "Internal Server Error",
            Self::Custom(status) => status.canonical_reason().unwrap_or("Error"),
        }
    }
}

/// A typed, status-carrying application error.
///
/// Returning one of these from a handler is the sanctioned way to
/// short-circuit and answer with a specific HTTP failure.
///
/// # Example
///
/// ```
/// use typed_route_core::{ApiError, ApiErrorKind};
/// use http::StatusCode;
///
/// let err = ApiError::new(ApiErrorKind::Forbidden);
/// assert_eq!(err.status(), StatusCode::FORBIDDEN);
/// assert_eq!(err.message(), "Forbidden");
///
/// let err = ApiError::with_message(ApiErrorKind::Unauthorized, "token expired");
/// assert_eq!(err.message(), "token expired");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
}

impl ApiError {
    /// Creates an error with the kind's default message.
    #[must_use]
    pub fn new(kind: ApiErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
        }
    }

    /// Creates an error with a custom message.
    #[must_use]
    pub fn with_message(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an error from an optional message, falling back to the default.
    #[must_use]
    pub fn from_optional(kind: ApiErrorKind, message: Option<&str>) -> Self {
        match message {
            Some(message) => Self::with_message(kind, message),
            None => Self::new(kind),
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.kind.status_code()
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error returned by route handlers.
///
/// Every failure a handler can produce falls into exactly one variant, so the
/// error response builder can match exhaustively.
#[derive(Debug, Error)]
pub enum RouteError {
    /// Intentional application error.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Route params failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Host framework control flow; never converted into a response body.
    #[error(transparent)]
    Framework(#[from] FrameworkSignal),

    /// Any other failure. Details are only shown to the operator.
    #[error(transparent)]
    Unhandled(#[from] anyhow::Error),
}

impl RouteError {
    /// Wraps an arbitrary error as an unhandled failure.
    pub fn unhandled(error: impl Into<anyhow::Error>) -> Self {
        Self::Unhandled(error.into())
    }

    /// Returns `true` if this is a host framework control signal.
    #[must_use]
    pub const fn is_framework_signal(&self) -> bool {
        matches!(self, Self::Framework(_))
    }

    /// Returns a short label for the error category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Api(_) => "api",
            Self::Validation(_) => "validation",
            Self::Framework(_) => "framework",
            Self::Unhandled(_) => "unhandled",
        }
    }
}

impl From<ParamsError> for RouteError {
    fn from(err: ParamsError) -> Self {
        Self::Unhandled(err.into())
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Unhandled(err.into())
    }
}

impl From<std::io::Error> for RouteError {
    fn from(err: std::io::Error) -> Self {
        Self::Unhandled(err.into())
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status_code().as_u16(), self.default_message())
    }
}

/// Fails with HTTP 400 Bad Request.
pub fn bad_request<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::BadRequest, message).into())
}

/// Fails with HTTP 401 Unauthorized.
pub fn unauthorized<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::Unauthorized, message).into())
}

/// Fails with HTTP 403 Forbidden.
///
/// ```
/// use typed_route_core::{forbidden, RouteError, RouteResult};
///
/// fn check(admin: bool) -> RouteResult<()> {
///     if !admin {
///         return forbidden(None);
///     }
///     Ok(())
/// }
///
/// match check(false) {
///     Err(RouteError::Api(err)) => assert_eq!(err.message(), "Forbidden"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub fn forbidden<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::Forbidden, message).into())
}

/// Fails with HTTP 404 Not Found.
pub fn not_found<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::NotFound, message).into())
}

/// Fails with HTTP 409 Conflict.
pub fn conflict<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::Conflict, message).into())
}

/// Fails with HTTP 429 Too Many Requests.
pub fn too_many_requests<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::TooManyRequests, message).into())
}

/// Fails with HTTP 500 Internal Server Error.
pub fn server_error<T>(message: Option<&str>) -> RouteResult<T> {
    Err(ApiError::from_optional(ApiErrorKind::ServerError, message).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Issue;

    #[test]
    fn test_default_messages() {
        assert_eq!(ApiError::new(ApiErrorKind::Forbidden).message(), "Forbidden");
        assert_eq!(
            ApiError::new(ApiErrorKind::ServerError).message(),
            "Internal Server Error"
        );
        assert_eq!(
            ApiError::new(ApiErrorKind::Unauthorized).message(),
            "Unauthorized"
        );
    }

    #[test]
    fn test_custom_message() {
        let err = ApiError::with_message(ApiErrorKind::Conflict, "already exists");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "already exists");
        assert_eq!(err.to_string(), "already exists");
    }

    #[test]
    fn test_custom_kind() {
        let kind = ApiErrorKind::Custom(StatusCode::IM_A_TEAPOT);
        let err = ApiError::new(kind);
        assert_eq!(err.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(err.message(), "I'm a teapot");
    }

    #[test]
    fn test_all_kinds_map_to_error_status() {
        let kinds = [
            ApiErrorKind::BadRequest,
            ApiErrorKind::Unauthorized,
            ApiErrorKind::Forbidden,
            ApiErrorKind::NotFound,
            ApiErrorKind::Conflict,
            ApiErrorKind::TooManyRequests,
            ApiErrorKind::ServerError,
        ];

        for kind in kinds {
            let status = kind.status_code();
            assert!(
                status.is_client_error() || status.is_server_error(),
                "Kind {:?} should map to error status code, got {}",
                kind,
                status
            );
        }
    }

    #[test]
    fn test_throwers() {
        let err = forbidden::<()>(None).unwrap_err();
        match err {
            RouteError::Api(api) => {
                assert_eq!(api.status(), StatusCode::FORBIDDEN);
                assert_eq!(api.message(), "Forbidden");
            }
            other => panic!("expected api error, got {other:?}"),
        }

        let err = server_error::<()>(Some("database offline")).unwrap_err();
        match err {
            RouteError::Api(api) => {
                assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(api.message(), "database offline");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_route_error_conversions() {
        let err: RouteError = ValidationError::new("test", vec![Issue::new("bad")]).into();
        assert_eq!(err.category(), "validation");

        let err: RouteError = FrameworkSignal::NotFound.into();
        assert!(err.is_framework_signal());

        let err: RouteError = ParamsError::new("aborted").into();
        assert_eq!(err.category(), "unhandled");

        let err = RouteError::unhandled(std::io::Error::other("disk"));
        assert_eq!(err.category(), "unhandled");
        assert!(err.to_string().contains("disk"));
    }

    proptest::proptest! {
        #[test]
        fn proptest_custom_status_and_message_preserved(
            code in 400u16..600,
            message in ".{0,40}",
        ) {
            let status = StatusCode::from_u16(code).unwrap();
            let err = ApiError::with_message(ApiErrorKind::Custom(status), message.clone());
            proptest::prop_assert_eq!(err.status(), status);
            proptest::prop_assert_eq!(err.message(), message.as_str());
        }
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ApiErrorKind::Forbidden.to_string(), "403 Forbidden");
    }
}
