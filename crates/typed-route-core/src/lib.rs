//! # Typed Route Core
//!
//! Core types and traits for typed route handlers.
//!
//! This crate provides the foundational types used throughout the workspace:
//!
//! - [`ApiError`] / [`RouteError`] - Error taxonomy and the handler error type
//! - [`RouteParams`] / [`RouteContext`] - Raw route params and the per-request context
//! - [`ParamsSchema`] - Adapter protocol implemented by validation library bindings
//! - [`parse_params`] / [`safe_parse_params`] - Parameter parser
//! - [`ApiResponse`] - Typed response bodies
//! - [`FrameworkSignal`] - Host framework control signals
//! - [`RouteHandler`] - Core handler trait

#![doc(html_root_url = "https://docs.rs/typed-route-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
pub mod de;
mod error;
mod handler;
mod params;
mod parser;
pub mod response;
mod schema;
mod signal;
mod validation;

pub use context::{ParamsError, ParamsFuture, RouteContext};
pub use error::{
    bad_request, conflict, forbidden, not_found, server_error, too_many_requests, unauthorized,
    ApiError, ApiErrorKind, RouteError, RouteResult,
};
pub use handler::{RouteHandler, RouteRequest};
pub use params::{ParamValue, RouteParams};
pub use parser::{parse_params, safe_parse_params};
pub use response::{ApiIssue, ApiResponse, ApiResponseError};
pub use schema::{ParamsSchema, SafeParseResult};
pub use signal::FrameworkSignal;
pub use validation::{Issue, PathSegment, ValidationError, DEFAULT_ISSUE_MESSAGE};
