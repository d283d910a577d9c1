//! Parameter parser.
//!
//! Awaits the route params from the context and runs them through a schema.
//! [`parse_params`] fails on invalid input; [`safe_parse_params`] reports the
//! outcome as a value.

use crate::context::{ParamsError, RouteContext};
use crate::error::RouteResult;
use crate::schema::{ParamsSchema, SafeParseResult};

/// Resolves the params and validates them strictly.
///
/// A schema failure becomes [`RouteError::Validation`](crate::RouteError::Validation),
/// which the handler wrapper turns into a 400 response. A failure to resolve
/// the params at all becomes [`RouteError::Unhandled`](crate::RouteError::Unhandled).
///
/// # Example
///
/// ```rust
/// use typed_route_core::{parse_params, Issue, ParamsSchema, RouteContext, RouteError, RouteParams, ValidationError};
///
/// struct Id;
///
/// impl ParamsSchema for Id {
///     type Output = u64;
///
///     fn library(&self) -> &'static str {
///         "id"
///     }
///
///     async fn parse(&self, input: &RouteParams) -> Result<u64, ValidationError> {
///         input
///             .get_str("id")
///             .and_then(|id| id.parse().ok())
///             .ok_or_else(|| ValidationError::new("id", vec![Issue::at(["id"], "Expected number")]))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let context = RouteContext::new([("id", "123")].into_iter().collect::<RouteParams>());
/// assert_eq!(parse_params(&context, &Id).await.unwrap(), 123);
///
/// let context = RouteContext::new([("id", "banana")].into_iter().collect::<RouteParams>());
/// assert!(matches!(parse_params(&context, &Id).await, Err(RouteError::Validation(_))));
/// # });
/// ```
pub async fn parse_params<S>(context: &RouteContext, schema: &S) -> RouteResult<S::Output>
where
    S: ParamsSchema,
{
    let params = context.params().await?;
    let output = schema.parse(&params).await?;
    Ok(output)
}

/// Resolves the params and validates them, returning the outcome as a value.
///
/// Invalid input is a [`SafeParseResult::Failure`], never an `Err`. Only a
/// failure to resolve the params is returned as an error.
pub async fn safe_parse_params<S>(
    context: &RouteContext,
    schema: &S,
) -> Result<SafeParseResult<S::Output>, ParamsError>
where
    S: ParamsSchema,
{
    let params = context.params().await?;
    Ok(schema.safe_parse(&params).await)
}
