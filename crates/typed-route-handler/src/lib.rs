//! # Typed Route Handler
//!
//! **Typed route handlers with uniform error responses**
//!
//! - **Uniform signature**: a handler is an async function of the request and
//!   a [`RouteContext`](typed_route_core::RouteContext)
//! - **Error taxonomy**: return `forbidden(None)`, `not_found(..)` and friends
//!   instead of building error responses by hand
//! - **Params validation**: parse route params through serde, JSON Schema,
//!   `validator` or the built-in [`Shape`](typed_route_schema::Shape) with one API
//! - **Request logging**: one entry and one exit line per request
//!
//! ## Quick Start
//!
//! ```rust
//! use http::{Request, StatusCode};
//! use serde::{Deserialize, Serialize};
//! use typed_route_handler::prelude::*;
//!
//! #[derive(Deserialize)]
//! struct Params {
//!     id: u64,
//! }
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: u64,
//! }
//!
//! let get_user = handler(|_req: Request<()>, ctx: RouteContext| async move {
//!     let params: Params = standard::parse_params(&ctx).await?;
//!     if params.id == 0 {
//!         return forbidden(None);
//!     }
//!     Ok::<_, RouteError>(json(User { id: params.id }))
//! });
//!
//! # tokio_test::block_on(async {
//! let request = Request::get("/users/banana").body(()).unwrap();
//! let context = RouteContext::new([("id", "banana")].into_iter().collect::<RouteParams>());
//! let response = get_user.call(request, context).await.unwrap();
//! assert_eq!(response.status(), StatusCode::BAD_REQUEST);
//! # });
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! Request → log entry → handler → Ok(response) ───────────────┐
//!                          │                                   ↓
//!                          └→ Err(RouteError) → error response → log exit → Response
//! ```

#![doc(html_root_url = "https://docs.rs/typed-route-handler/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
mod error_response;
mod wrapper;

pub use error_response::{
    build_error_response, internal_error, OnError, INTERNAL_SERVER_ERROR, VALIDATION_ERROR,
};
pub use wrapper::{handler, TypedHandler};

// Re-export core types
pub use typed_route_core as core;

// Re-export validation bindings
pub use typed_route_schema as schema;

// Re-export logging
pub use typed_route_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use typed_route_handler::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{build_error_response, handler, OnError, TypedHandler};

    pub use typed_route_core::{
        bad_request, conflict, forbidden, not_found, server_error, too_many_requests,
        unauthorized, ApiError, ApiErrorKind, FrameworkSignal, Issue, ParamsSchema, RouteContext,
        RouteError, RouteParams, RouteResult, SafeParseResult, ValidationError,
    };

    // Re-export response builders
    pub use typed_route_core::response::{empty, json, json_with_status, ApiResponse};

    // Re-export validation bindings
    pub use typed_route_schema::{shape, standard, Shape, Standard};

    #[cfg(feature = "json-schema")]
    pub use typed_route_schema::{json_schema, JsonSchema};

    #[cfg(feature = "validator")]
    pub use typed_route_schema::{validator, Validated};

    #[cfg(feature = "validator")]
    pub use ::validator::Validate;

    // Re-export request logging
    pub use typed_route_telemetry::{RequestLog, TracingRequestLog};
}
