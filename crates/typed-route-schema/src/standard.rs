//! Serde binding.
//!
//! Any `T: DeserializeOwned` is a params schema: the raw params are
//! coerced through [`ParamsDeserializer`](typed_route_core::de::ParamsDeserializer)
//! and the first deserialization error becomes the single issue.
//!
//! # Example
//!
//! ```rust
//! use serde::Deserialize;
//! use typed_route_core::{RouteContext, RouteParams};
//! use typed_route_schema::standard;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct Params {
//!     id: u64,
//! }
//!
//! # tokio_test::block_on(async {
//! let context = RouteContext::new([("id", "123")].into_iter().collect::<RouteParams>());
//! let params: Params = standard::parse_params(&context).await.unwrap();
//! assert_eq!(params, Params { id: 123 });
//! # });
//! ```

use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use typed_route_core::de::from_params;
use typed_route_core::{
    ParamsError, ParamsSchema, RouteContext, RouteParams, RouteResult, SafeParseResult,
    ValidationError,
};

/// Library name reported in validation errors.
pub const LIBRARY: &str = "serde";

/// A params schema backed by a serde `Deserialize` impl.
pub struct Standard<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Standard<T> {
    /// Creates the schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Standard<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Standard<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Standard<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Standard")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> ParamsSchema for Standard<T>
where
    T: DeserializeOwned + Send,
{
    type Output = T;

    fn library(&self) -> &'static str {
        LIBRARY
    }

    async fn parse(&self, input: &RouteParams) -> Result<T, ValidationError> {
        from_params(input).map_err(|err| ValidationError::new(LIBRARY, vec![err.into_issue()]))
    }
}

/// Parses the context params into `T`, failing on invalid input.
pub async fn parse_params<T>(context: &RouteContext) -> RouteResult<T>
where
    T: DeserializeOwned + Send,
{
    typed_route_core::parse_params(context, &Standard::<T>::new()).await
}

/// Parses the context params into `T`, returning the outcome as a value.
pub async fn safe_parse_params<T>(
    context: &RouteContext,
) -> Result<SafeParseResult<T>, ParamsError>
where
    T: DeserializeOwned + Send,
{
    typed_route_core::safe_parse_params(context, &Standard::<T>::new()).await
}
