//! # Typed Route Test
//!
//! Test utilities for typed route handlers. Handlers are plain async
//! functions, so tests call them directly without a server:
//!
//! - [`TestRequest`]: builds the `http::Request` and the [`RouteContext`]
//!   a handler receives, with ready, deferred or failing params
//! - [`TestResponse`]: serializes a handler response and offers assertions
//! - [`RecordingLog`]: a request log that keeps every line in memory
//!
//! ## Example
//!
//! ```
//! use http::StatusCode;
//! use typed_route_core::response::json;
//! use typed_route_test::{TestRequest, TestResponse};
//!
//! let (_request, _context) = TestRequest::get("/users/1").param("id", "1").build().unwrap();
//!
//! let response = TestResponse::from_response(json(serde_json::json!({"id": 1}))).unwrap();
//! response.assert_status(StatusCode::OK);
//! ```
//!
//! [`RouteContext`]: typed_route_core::RouteContext

#![doc(html_root_url = "https://docs.rs/typed-route-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod log;
mod request;
mod response;

pub use error::TestError;
pub use log::{LogEvent, RecordingLog};
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;
