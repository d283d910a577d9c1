//! Test request building.
//!
//! A [`TestRequest`] produces the two inputs a wrapped handler receives: an
//! `http::Request` and the [`RouteContext`] carrying the route params.

use crate::error::TestError;
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method, Request};
use typed_route_core::{ParamValue, ParamsError, RouteContext, RouteParams};

/// Entry point for building test requests.
pub struct TestRequest;

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }
}

/// How the context hands out its params.
#[derive(Debug, Clone)]
enum Resolution {
    Ready,
    Deferred,
    Rejected(String),
}

/// Builder for constructing test requests.
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    params: RouteParams,
    resolution: Resolution,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
            params: RouteParams::new(),
            resolution: Resolution::Ready,
        }
    }

    /// Sets a header on the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds a route param.
    ///
    /// # Example
    ///
    /// ```
    /// use typed_route_test::TestRequest;
    ///
    /// let (request, _context) = TestRequest::get("/users/42")
    ///     .param("id", "42")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(request.uri().path(), "/users/42");
    /// ```
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name, value);
        self
    }

    /// Replaces all route params.
    pub fn params(mut self, params: RouteParams) -> Self {
        self.params = params;
        self
    }

    /// Resolves the params only when first awaited.
    pub fn deferred(mut self) -> Self {
        self.resolution = Resolution::Deferred;
        self
    }

    /// Makes resolving the params fail with the given message.
    pub fn reject_params(mut self, message: impl Into<String>) -> Self {
        self.resolution = Resolution::Rejected(message.into());
        self
    }

    /// Builds the request and its route context.
    ///
    /// # Errors
    ///
    /// Returns `TestError::RequestBuild` if the URI or a header is invalid.
    pub fn build(self) -> Result<(Request<Bytes>, RouteContext), TestError> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (name, value) in &self.headers {
            let name = HeaderName::try_from(name.as_str())
                .map_err(|e| TestError::RequestBuild(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::try_from(value.as_str())
                .map_err(|e| TestError::RequestBuild(format!("header value '{value}': {e}")))?;
            builder = builder.header(name, value);
        }
        let request = builder.body(self.body)?;

        let params = self.params;
        let context = match self.resolution {
            Resolution::Ready => RouteContext::new(params),
            Resolution::Deferred => RouteContext::deferred(async move { Ok(params) }),
            Resolution::Rejected(message) => RouteContext::rejected(ParamsError::new(message)),
        };
        Ok((request, context))
    }
}
