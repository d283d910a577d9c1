//! The schema adapter protocol.
//!
//! Validation libraries disagree on how they report failure: some return an
//! error, some a result object, some are async. [`ParamsSchema`] is the one
//! contract the parameter parser relies on. Concrete bindings live in the
//! `typed-route-schema` crate.

use crate::params::RouteParams;
use crate::validation::{Issue, ValidationError};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::future::Future;

/// A schema that can validate raw route params into a typed output.
///
/// Implementations must not mutate anything observable; calling `parse` or
/// `safe_parse` twice on the same input yields the same outcome.
///
/// # Example
///
/// ```rust
/// use typed_route_core::{Issue, ParamsSchema, RouteParams, ValidationError};
///
/// struct NonEmpty;
///
/// impl ParamsSchema for NonEmpty {
///     type Output = usize;
///
///     fn library(&self) -> &'static str {
///         "non-empty"
///     }
///
///     async fn parse(&self, input: &RouteParams) -> Result<usize, ValidationError> {
///         if input.is_empty() {
///             return Err(ValidationError::new("non-empty", vec![Issue::new("No params")]));
///         }
///         Ok(input.len())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let result = NonEmpty.safe_parse(&RouteParams::new()).await;
/// assert!(!result.is_success());
/// # });
/// ```
pub trait ParamsSchema: Send + Sync {
    /// The validated params type.
    type Output: Send;

    /// Name of the underlying validation library, used in diagnostics.
    fn library(&self) -> &'static str;

    /// Validates the input, failing with every issue found.
    fn parse(
        &self,
        input: &RouteParams,
    ) -> impl Future<Output = Result<Self::Output, ValidationError>> + Send;

    /// Validates the input, returning the outcome as a value.
    fn safe_parse(
        &self,
        input: &RouteParams,
    ) -> impl Future<Output = SafeParseResult<Self::Output>> + Send {
        async move { self.parse(input).await.into() }
    }
}

/// Outcome of a safe parse.
///
/// Serializes as `{"success": true, "output": ...}` or
/// `{"success": false, "issues": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParseResult<T> {
    /// The input was valid.
    Success {
        /// The validated value.
        output: T,
    },
    /// The input was invalid.
    Failure {
        /// Every issue found; never empty.
        issues: Vec<Issue>,
    },
}

impl<T> SafeParseResult<T> {
    /// Creates a failure, substituting a default issue for an empty list.
    #[must_use]
    pub fn failure(library: &'static str, issues: Vec<Issue>) -> Self {
        Self::Failure {
            issues: ValidationError::new(library, issues).into_issues(),
        }
    }

    /// Returns true on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the output on success.
    #[must_use]
    pub fn output(&self) -> Option<&T> {
        match self {
            Self::Success { output } => Some(output),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the issues on failure, or an empty slice on success.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        match self {
            Self::Success { .. } => &[],
            Self::Failure { issues } => issues,
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<T, Vec<Issue>> {
        match self {
            Self::Success { output } => Ok(output),
            Self::Failure { issues } => Err(issues),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for SafeParseResult<T> {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(output) => Self::Success { output },
            Err(err) => Self::Failure {
                issues: err.into_issues(),
            },
        }
    }
}

impl<T: Serialize> Serialize for SafeParseResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SafeParseResult", 2)?;
        match self {
            Self::Success { output } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("output", output)?;
            }
            Self::Failure { issues } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("issues", issues)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct IdLength;

    impl ParamsSchema for IdLength {
        type Output = usize;

        fn library(&self) -> &'static str {
            "id-length"
        }

        async fn parse(&self, input: &RouteParams) -> Result<usize, ValidationError> {
            input
                .get_str("id")
                .map(str::len)
                .ok_or_else(|| ValidationError::new("id-length", vec![Issue::at(["id"], "Required")]))
        }
    }

    #[tokio::test]
    async fn test_default_safe_parse() {
        let mut params = RouteParams::new();
        params.insert("id", "abc");

        let ok = IdLength.safe_parse(&params).await;
        assert!(ok.is_success());
        assert_eq!(ok.output(), Some(&3));
        assert!(ok.issues().is_empty());

        let failed = IdLength.safe_parse(&RouteParams::new()).await;
        assert!(!failed.is_success());
        assert_eq!(failed.issues().len(), 1);
        assert_eq!(failed.issues()[0].path_string(), "id");
    }

    #[tokio::test]
    async fn test_safe_parse_is_idempotent() {
        let params = RouteParams::new();
        let first = IdLength.safe_parse(&params).await;
        let second = IdLength.safe_parse(&params).await;
        assert_eq!(first, second);
    }

    #[test]
    fn test_failure_never_empty() {
        let result = SafeParseResult::<()>::failure("test", Vec::new());
        assert_eq!(result.issues().len(), 1);
    }

    #[test]
    fn test_serialization() {
        let ok = SafeParseResult::Success { output: json!({"id": 1}) };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"success": true, "output": {"id": 1}})
        );

        let failed = SafeParseResult::<()>::Failure {
            issues: vec![Issue::at(["id"], "Expected number")],
        };
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            json!({
                "success": false,
                "issues": [{"message": "Expected number", "path": ["id"]}]
            })
        );
    }

    #[test]
    fn test_into_result() {
        let ok: SafeParseResult<u8> = Ok(1).into();
        assert_eq!(ok.into_result(), Ok(1));

        let failed: SafeParseResult<u8> =
            Err(ValidationError::new("test", vec![Issue::new("bad")])).into();
        assert_eq!(failed.into_result().unwrap_err().len(), 1);
    }
}
