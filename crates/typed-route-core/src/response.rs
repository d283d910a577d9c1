//! Response body types for typed route handlers.
//!
//! A handler answers with an `http::Response<ApiResponse<T>>`: the data on
//! success, or the error envelope produced by the error response builder.
//!
//! # Bodies
//!
//! | Variant | JSON |
//! |---------|------|
//! | `Data(T)` | `T` serialized as-is |
//! | `Error(ApiResponseError)` | `{"error": "...", "issues": [...]}` |
//! | `Empty` | no body |
//!
//! # Example
//!
//! ```rust
//! use typed_route_core::response::{json, json_with_status, ApiResponse};
//! use http::StatusCode;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u64,
//! }
//!
//! let ok = json(User { id: 1 });
//! assert_eq!(ok.status(), StatusCode::OK);
//!
//! let created = json_with_status(User { id: 2 }, StatusCode::CREATED);
//! assert_eq!(created.status(), StatusCode::CREATED);
//! ```

use crate::validation::Issue;
use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Content type of every JSON body.
pub const APPLICATION_JSON: &str = "application/json";

/// One validation issue as exposed to clients.
///
/// Path segments are rendered as strings so the shape is stable across
/// validation libraries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiIssue {
    /// Human-readable description.
    pub message: String,
    /// Location of the offending value.
    pub path: Vec<String>,
}

impl From<&Issue> for ApiIssue {
    fn from(issue: &Issue) -> Self {
        Self {
            message: issue.message.clone(),
            path: issue.path.iter().map(ToString::to_string).collect(),
        }
    }
}

/// The JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponseError {
    /// Error message.
    pub error: String,
    /// Validation issues, present only for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<ApiIssue>>,
}

impl ApiResponseError {
    /// Creates an envelope without issues.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            issues: None,
        }
    }

    /// Creates an envelope carrying validation issues.
    #[must_use]
    pub fn with_issues(error: impl Into<String>, issues: Vec<ApiIssue>) -> Self {
        Self {
            error: error.into(),
            issues: Some(issues),
        }
    }
}

/// A handler response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    /// Successful payload.
    Data(T),
    /// Error envelope.
    Error(ApiResponseError),
    /// No body.
    Empty,
}

impl<T> ApiResponse<T> {
    /// Returns the payload, if any.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the error envelope, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ApiResponseError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Returns true if there is no body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Responds 200 OK with a JSON payload.
#[must_use]
pub fn json<T>(data: T) -> Response<ApiResponse<T>> {
    json_with_status(data, StatusCode::OK)
}

/// Responds with a JSON payload and the given status.
#[must_use]
pub fn json_with_status<T>(data: T, status: StatusCode) -> Response<ApiResponse<T>> {
    with_status(ApiResponse::Data(data), status)
}

/// Responds with no body, e.g. `204 No Content`.
#[must_use]
pub fn empty<T>(status: StatusCode) -> Response<ApiResponse<T>> {
    with_status(ApiResponse::Empty, status)
}

/// Responds with an error envelope.
#[must_use]
pub fn error_response<T>(error: ApiResponseError, status: StatusCode) -> Response<ApiResponse<T>> {
    with_status(ApiResponse::Error(error), status)
}

fn with_status<T>(body: ApiResponse<T>, status: StatusCode) -> Response<ApiResponse<T>> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
}

/// Serializes a typed response for the wire.
///
/// JSON bodies get `Content-Type: application/json`; an empty body is sent
/// without content type. Existing headers are kept.
pub fn into_http_response<T: Serialize>(
    response: Response<ApiResponse<T>>,
) -> Result<Response<Bytes>, serde_json::Error> {
    let (mut parts, body) = response.into_parts();
    let bytes = if body.is_empty() {
        Bytes::new()
    } else {
        parts
            .headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        Bytes::from(serde_json::to_vec(&body)?)
    };
    Ok(Response::from_parts(parts, bytes))
}
