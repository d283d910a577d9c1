//! Errors raised while building schemas.

use thiserror::Error;

/// Error raised when a schema definition itself is invalid.
///
/// Validation failures of params are never reported through this type; they
/// are [`ValidationError`](typed_route_core::ValidationError)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The JSON Schema document failed to compile.
    #[error("invalid JSON schema: {0}")]
    InvalidJsonSchema(String),
}
