//! Test response wrapper.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use typed_route_core::response::{into_http_response, ApiResponse, ApiResponseError};

/// A serialized handler response with helper methods for assertions.
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Serializes a typed handler response the way it goes on the wire.
    pub fn from_response<T: Serialize>(
        response: Response<ApiResponse<T>>,
    ) -> Result<Self, TestError> {
        let (parts, body) = into_http_response(response)?.into_parts();
        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Creates a test response from raw parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Deserializes the body as a JSON Value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Deserializes the body as an error envelope.
    pub fn error_body(&self) -> Result<ApiResponseError, TestError> {
        self.json()
    }

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}",
            expected, self.status
        );
        self
    }

    /// Asserts that the JSON body matches the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or doesn't match.
    pub fn assert_json_eq(&self, expected: &serde_json::Value) -> &Self {
        let actual = self.json_value().expect("Body should be valid JSON");
        assert_eq!(&actual, expected, "JSON body mismatch");
        self
    }

    /// Asserts that the body is an error envelope with the given message.
    ///
    /// # Panics
    ///
    /// Panics if the body is not an error envelope or the message differs.
    pub fn assert_error(&self, expected: &str) -> &Self {
        let body = self.error_body().expect("Body should be an error envelope");
        assert_eq!(body.error, expected, "Error message mismatch");
        self
    }

    /// Asserts that the error envelope carries exactly `count` issues.
    ///
    /// # Panics
    ///
    /// Panics if the body has no issues list or its length differs.
    pub fn assert_issue_count(&self, count: usize) -> &Self {
        let body = self.error_body().expect("Body should be an error envelope");
        let issues = body.issues.expect("Error envelope should carry issues");
        assert_eq!(issues.len(), count, "Issue count mismatch: {issues:?}");
        self
    }

    /// Asserts that the response has no body.
    ///
    /// # Panics
    ///
    /// Panics if the body is not empty.
    pub fn assert_empty(&self) -> &Self {
        assert!(
            self.body.is_empty(),
            "Expected empty body, got {} bytes",
            self.body.len()
        );
        self
    }
}

impl fmt::Debug for TestResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body_len", &self.body.len())
            .finish()
    }
}
