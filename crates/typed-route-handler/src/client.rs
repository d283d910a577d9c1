//! Typed JSON client for routes built with this crate.
//!
//! Decoding follows the error envelope: a non-2xx response fails with the
//! body's `error` message, or the status reason when the body has none.

use http::StatusCode;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use typed_route_core::response::APPLICATION_JSON;

/// Errors returned by the typed client.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The response body is not valid JSON or not the expected shape.
    #[error("Invalid JSON response")]
    InvalidJson(#[source] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// Response status.
        status: StatusCode,
        /// Message from the error envelope or the status reason.
        message: String,
    },

    /// The request could not be sent or the body could not be read.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl FetchError {
    /// Returns the response status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Request(err) => err.status(),
            Self::InvalidJson(_) => None,
        }
    }
}

/// Sends a GET request and decodes the JSON response as `T`.
pub async fn typed_fetch<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    send(client, client.get(url)).await
}

/// Sends a prepared request and decodes the JSON response as `T`.
///
/// `Content-Type: application/json` is added unless the request sets its own.
pub async fn send<T: DeserializeOwned>(
    client: &Client,
    request: RequestBuilder,
) -> Result<T, FetchError> {
    let mut request = request.build()?;
    request
        .headers_mut()
        .entry(CONTENT_TYPE)
        .or_insert(HeaderValue::from_static(APPLICATION_JSON));

    let response = client.execute(request).await?;
    let status = response.status();
    let body = response.bytes().await?;
    decode_response(status, &body)
}

/// Decodes a response body received with `status`.
///
/// # Example
///
/// ```rust
/// use http::StatusCode;
/// use typed_route_handler::client::{decode_response, FetchError};
///
/// let err = decode_response::<()>(StatusCode::FORBIDDEN, br#"{"error":"Forbidden"}"#).unwrap_err();
/// assert_eq!(err.to_string(), "Forbidden");
/// ```
pub fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T, FetchError> {
    let value: Value = serde_json::from_slice(body).map_err(FetchError::InvalidJson)?;

    if !status.is_success() {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(
                || status.canonical_reason().unwrap_or("Request failed").to_string(),
                str::to_string,
            );
        return Err(FetchError::Api { status, message });
    }

    serde_json::from_value(value).map_err(FetchError::InvalidJson)
}
