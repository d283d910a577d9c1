//! # Typed Route Schema
//!
//! Validation library bindings implementing
//! [`ParamsSchema`](typed_route_core::ParamsSchema).
//!
//! | Module | Library | Output |
//! |--------|---------|--------|
//! | [`standard`] | serde | any `T: DeserializeOwned` |
//! | [`json_schema`] | `jsonschema` (feature `json-schema`) | `serde_json::Value` or `T` |
//! | [`validator`] | `validator` (feature `validator`) | `T: DeserializeOwned + Validate` |
//! | [`shape`] | built in | `serde_json::Value` |
//!
//! Every binding fails a strict parse with the shared
//! [`ValidationError`](typed_route_core::ValidationError), so the handler
//! wrapper answers 400 with the issue list whichever library is used.
//! Each module also offers `parse_params` / `safe_parse_params` shortcuts.

#![doc(html_root_url = "https://docs.rs/typed-route-schema/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
#[cfg(feature = "json-schema")]
pub mod json_schema;
pub mod shape;
pub mod standard;
#[cfg(feature = "validator")]
pub mod validator;

pub use error::SchemaError;
#[cfg(feature = "json-schema")]
pub use json_schema::JsonSchema;
pub use shape::Shape;
pub use standard::Standard;
#[cfg(feature = "validator")]
pub use crate::validator::Validated;
