//! `validator` crate binding.
//!
//! Deserializes the params into `T` and then runs its derived
//! [`Validate`](::validator::Validate) rules. Nested struct and list errors
//! are flattened into issues carrying the full path.
//!
//! # Example
//!
//! ```rust
//! use serde::Deserialize;
//! use typed_route_core::{ParamsSchema, RouteParams};
//! use typed_route_schema::validator::Validated;
//! use validator::Validate;
//!
//! #[derive(Debug, Deserialize, Validate)]
//! struct Params {
//!     #[validate(range(min = 1))]
//!     id: u64,
//! }
//!
//! # tokio_test::block_on(async {
//! let params: RouteParams = [("id", "0")].into_iter().collect();
//! let result = Validated::<Params>::new().safe_parse(&params).await;
//! assert_eq!(result.issues()[0].path_string(), "id");
//! # });
//! ```

use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use typed_route_core::de::from_params;
use typed_route_core::{
    Issue, ParamsError, ParamsSchema, PathSegment, RouteContext, RouteParams, RouteResult,
    SafeParseResult, ValidationError,
};

/// Library name reported in validation errors.
pub const LIBRARY: &str = "validator";

/// A params schema backed by a `Deserialize + Validate` type.
pub struct Validated<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Validated<T> {
    /// Creates the schema.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Validated<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Validated<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validated")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

/// Flattens `validator` errors into issues, sorted by path.
#[must_use]
pub fn flatten_errors(errors: &ValidationErrors) -> Vec<Issue> {
    let mut issues = Vec::new();
    collect(errors, &[], &mut issues);
    issues.sort_by_key(Issue::path_string);
    issues
}

fn collect(errors: &ValidationErrors, prefix: &[PathSegment], issues: &mut Vec<Issue>) {
    for (field, kind) in errors.errors() {
        let mut path = prefix.to_vec();
        path.push(PathSegment::Key(field.to_string()));
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("Invalid value ({})", error.code),
                    };
                    issues.push(Issue::at(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, issues),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let mut item_path = path.clone();
                    item_path.push(PathSegment::Index(*index));
                    collect(nested, &item_path, issues);
                }
            }
        }
    }
}

impl<T> ParamsSchema for Validated<T>
where
    T: DeserializeOwned + Validate + Send,
{
    type Output = T;

    fn library(&self) -> &'static str {
        LIBRARY
    }

    async fn parse(&self, input: &RouteParams) -> Result<T, ValidationError> {
        let value: T = from_params(input)
            .map_err(|err| ValidationError::new(LIBRARY, vec![err.into_issue()]))?;
        value
            .validate()
            .map_err(|errors| ValidationError::new(LIBRARY, flatten_errors(&errors)))?;
        Ok(value)
    }
}

/// Parses and validates the context params into `T`, failing on invalid input.
pub async fn parse_params<T>(context: &RouteContext) -> RouteResult<T>
where
    T: DeserializeOwned + Validate + Send,
{
    typed_route_core::parse_params(context, &Validated::<T>::new()).await
}

/// Parses and validates the context params into `T`, returning the outcome as a value.
pub async fn safe_parse_params<T>(
    context: &RouteContext,
) -> Result<SafeParseResult<T>, ParamsError>
where
    T: DeserializeOwned + Validate + Send,
{
    typed_route_core::safe_parse_params(context, &Validated::<T>::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::validator::Validate;
    use serde::Deserialize;
    use typed_route_core::RouteError;

    #[derive(Debug, Deserialize, Validate)]
    struct PostParams {
        #[validate(length(min = 3, message = "Slug too short"))]
        slug: String,
        #[validate(range(min = 1, max = 100))]
        page: u32,
    }

    fn context(pairs: &[(&str, &str)]) -> RouteContext {
        RouteContext::new(pairs.iter().copied().collect())
    }

    #[tokio::test]
    async fn test_valid() {
        let params: PostParams = parse_params(&context(&[("slug", "intro"), ("page", "2")]))
            .await
            .unwrap();
        assert_eq!(params.slug, "intro");
        assert_eq!(params.page, 2);
    }

    #[tokio::test]
    async fn test_collects_every_rule_failure() {
        let err = parse_params::<PostParams>(&context(&[("slug", "ab"), ("page", "0")]))
            .await
            .unwrap_err();
        let RouteError::Validation(validation) = err else {
            panic!("expected validation error");
        };
        assert_eq!(validation.library(), LIBRARY);
        let issues = validation.issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path_string(), "page");
        assert_eq!(issues[0].message, "Invalid value (range)");
        assert_eq!(issues[1].path_string(), "slug");
        assert_eq!(issues[1].message, "Slug too short");
    }

    #[tokio::test]
    async fn test_blank_rule_message_replaced() {
        #[derive(Debug, Deserialize, Validate)]
        struct Tag {
            #[validate(length(min = 2, message = ""))]
            #[allow(dead_code)]
            tag: String,
        }

        let err = parse_params::<Tag>(&context(&[("tag", "x")]))
            .await
            .unwrap_err();
        let RouteError::Validation(validation) = err else {
            panic!("expected validation error");
        };
        assert_eq!(validation.issues()[0].path_string(), "tag");
        assert_eq!(
            validation.issues()[0].message,
            typed_route_core::DEFAULT_ISSUE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_deserialize_failure_reported() {
        let result = safe_parse_params::<PostParams>(&context(&[("slug", "intro"), ("page", "x")]))
            .await
            .unwrap();
        assert_eq!(result.issues().len(), 1);
        assert_eq!(result.issues()[0].path_string(), "page");
    }

    #[test]
    fn test_flatten_nested() {
        #[derive(Validate)]
        struct Inner {
            #[validate(length(min = 1))]
            name: String,
        }

        #[derive(Validate)]
        struct Outer {
            #[validate(nested)]
            items: Vec<Inner>,
        }

        let outer = Outer {
            items: vec![
                Inner { name: "ok".into() },
                Inner {
                    name: String::new(),
                },
            ],
        };
        let errors = outer.validate().unwrap_err();
        let issues = flatten_errors(&errors);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path_string(), "items.1.name");
    }
}
