//! Built-in fluent schema builder.
//!
//! [`Shape`] describes params without any external validation library.
//! Scalars coerce from the raw strings, unknown keys are dropped, and
//! validation reports every issue it finds instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use typed_route_core::{ParamsSchema, RouteParams};
//! use typed_route_schema::shape::Shape;
//!
//! let schema = Shape::object([
//!     ("id", Shape::integer().minimum(1.0).required()),
//!     ("slug", Shape::array(Shape::string().min_length(1))),
//! ]);
//!
//! # tokio_test::block_on(async {
//! let mut params = RouteParams::new();
//! params.insert("id", "123");
//! params.insert("slug", vec!["docs", "intro"]);
//!
//! let output = schema.parse(&params).await.unwrap();
//! assert_eq!(output, json!({"id": 123, "slug": ["docs", "intro"]}));
//! # });
//! ```

use regex::Regex;
use serde_json::{Map, Number, Value};
use typed_route_core::de::REQUIRED_MESSAGE;
use typed_route_core::{
    Issue, ParamsError, ParamsSchema, PathSegment, RouteContext, RouteParams, RouteResult,
    SafeParseResult, ValidationError,
};

/// Library name reported in validation errors.
pub const LIBRARY: &str = "shape";

#[derive(Debug, Clone)]
enum Kind {
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
        pattern: Option<Regex>,
    },
    Integer {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    Array {
        items: Box<Shape>,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
    Object {
        properties: Vec<(String, Shape)>,
    },
    OneOf(Vec<String>),
}

/// A params schema built fluently.
///
/// Constraint methods that do not apply to the shape's kind are ignored,
/// e.g. `Shape::boolean().min_length(3)` is just a boolean.
#[derive(Debug, Clone)]
pub struct Shape {
    kind: Kind,
    required: bool,
}

impl Shape {
    fn of(kind: Kind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    /// Creates a string shape.
    #[must_use]
    pub fn string() -> Self {
        Self::of(Kind::String {
            min_length: None,
            max_length: None,
            pattern: None,
        })
    }

    /// Creates an integer shape.
    #[must_use]
    pub fn integer() -> Self {
        Self::of(Kind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    /// Creates a number shape.
    #[must_use]
    pub fn number() -> Self {
        Self::of(Kind::Number {
            minimum: None,
            maximum: None,
        })
    }

    /// Creates a boolean shape.
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(Kind::Boolean)
    }

    /// Creates an array shape.
    #[must_use]
    pub fn array(items: Shape) -> Self {
        Self::of(Kind::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        })
    }

    /// Creates an object shape from (name, shape) pairs.
    #[must_use]
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, Shape)>,
        K: Into<String>,
    {
        Self::of(Kind::Object {
            properties: properties
                .into_iter()
                .map(|(name, shape)| (name.into(), shape))
                .collect(),
        })
    }

    /// Creates a shape accepting one of the given string literals.
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(Kind::OneOf(values.into_iter().map(Into::into).collect()))
    }

    /// Marks this shape as required.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns whether this shape is marked as required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Sets the minimum length for string shapes, in characters.
    #[must_use]
    pub fn min_length(mut self, len: usize) -> Self {
        if let Kind::String { min_length, .. } = &mut self.kind {
            *min_length = Some(len);
        }
        self
    }

    /// Sets the maximum length for string shapes, in characters.
    #[must_use]
    pub fn max_length(mut self, len: usize) -> Self {
        if let Kind::String { max_length, .. } = &mut self.kind {
            *max_length = Some(len);
        }
        self
    }

    /// Sets a pattern string shapes must match.
    #[must_use]
    pub fn pattern(mut self, regex: Regex) -> Self {
        if let Kind::String { pattern, .. } = &mut self.kind {
            *pattern = Some(regex);
        }
        self
    }

    /// Sets the inclusive minimum for integer and number shapes.
    #[must_use]
    pub fn minimum(mut self, min: f64) -> Self {
        if let Kind::Integer { minimum, .. } | Kind::Number { minimum, .. } = &mut self.kind {
            *minimum = Some(min);
        }
        self
    }

    /// Sets the inclusive maximum for integer and number shapes.
    #[must_use]
    pub fn maximum(mut self, max: f64) -> Self {
        if let Kind::Integer { maximum, .. } | Kind::Number { maximum, .. } = &mut self.kind {
            *maximum = Some(max);
        }
        self
    }

    /// Sets the minimum number of items for array shapes.
    #[must_use]
    pub fn min_items(mut self, min: usize) -> Self {
        if let Kind::Array { min_items, .. } = &mut self.kind {
            *min_items = Some(min);
        }
        self
    }

    /// Sets the maximum number of items for array shapes.
    #[must_use]
    pub fn max_items(mut self, max: usize) -> Self {
        if let Kind::Array { max_items, .. } = &mut self.kind {
            *max_items = Some(max);
        }
        self
    }

    /// Coerces and validates a JSON value, collecting every issue.
    ///
    /// Returns the coerced value, or `None` if any issue was recorded for it.
    pub fn validate(&self, value: &Value, issues: &mut Vec<Issue>) -> Option<Value> {
        let before = issues.len();
        let output = self.validate_at_path(value, &[], issues);
        if issues.len() > before {
            None
        } else {
            Some(output)
        }
    }

    fn validate_at_path(
        &self,
        value: &Value,
        path: &[PathSegment],
        issues: &mut Vec<Issue>,
    ) -> Value {
        let mut report = |message: String| issues.push(Issue::at(path.to_vec(), message));

        match &self.kind {
            Kind::String {
                min_length,
                max_length,
                pattern,
            } => {
                let Some(s) = value.as_str() else {
                    report(expected("string", value));
                    return value.clone();
                };
                let len = s.chars().count();
                if let Some(min) = min_length {
                    if len < *min {
                        report(format!("String must contain at least {min} character(s)"));
                    }
                }
                if let Some(max) = max_length {
                    if len > *max {
                        report(format!("String must contain at most {max} character(s)"));
                    }
                }
                if let Some(pattern) = pattern {
                    if !pattern.is_match(s) {
                        report(format!("String must match pattern {}", pattern.as_str()));
                    }
                }
                value.clone()
            }

            Kind::Integer { minimum, maximum } => {
                let Some(n) = coerce_integer(value) else {
                    report(expected("integer", value));
                    return value.clone();
                };
                check_range(n as f64, *minimum, *maximum, &mut report);
                Value::Number(n.into())
            }

            Kind::Number { minimum, maximum } => {
                let Some(n) = coerce_number(value) else {
                    report(expected("number", value));
                    return value.clone();
                };
                check_range(n, *minimum, *maximum, &mut report);
                Number::from_f64(n).map_or_else(|| value.clone(), Value::Number)
            }

            Kind::Boolean => match value {
                Value::Bool(b) => Value::Bool(*b),
                Value::String(s) if s == "true" => Value::Bool(true),
                Value::String(s) if s == "false" => Value::Bool(false),
                other => {
                    report(expected("boolean", other));
                    other.clone()
                }
            },

            Kind::OneOf(options) => {
                match value.as_str() {
                    Some(s) if options.iter().any(|o| o == s) => {}
                    _ => report(format!(
                        "Expected one of {}, received {}",
                        options
                            .iter()
                            .map(|o| format!("\"{o}\""))
                            .collect::<Vec<_>>()
                            .join(" | "),
                        describe(value)
                    )),
                }
                value.clone()
            }

            Kind::Array {
                items,
                min_items,
                max_items,
            } => {
                let elements: Vec<Value> = match value {
                    Value::Array(elements) => elements.clone(),
                    Value::String(_) => vec![value.clone()],
                    other => {
                        report(expected("array", other));
                        return other.clone();
                    }
                };
                if let Some(min) = min_items {
                    if elements.len() < *min {
                        report(format!("Array must contain at least {min} element(s)"));
                    }
                }
                if let Some(max) = max_items {
                    if elements.len() > *max {
                        report(format!("Array must contain at most {max} element(s)"));
                    }
                }
                let output = elements
                    .iter()
                    .enumerate()
                    .map(|(index, element)| {
                        let mut item_path = path.to_vec();
                        item_path.push(PathSegment::Index(index));
                        items.validate_at_path(element, &item_path, issues)
                    })
                    .collect();
                Value::Array(output)
            }

            Kind::Object { properties } => {
                let Some(object) = value.as_object() else {
                    report(expected("object", value));
                    return value.clone();
                };
                let mut output = Map::new();
                for (name, shape) in properties {
                    let mut property_path = path.to_vec();
                    property_path.push(PathSegment::Key(name.clone()));
                    match object.get(name) {
                        Some(property) => {
                            let coerced = shape.validate_at_path(property, &property_path, issues);
                            output.insert(name.clone(), coerced);
                        }
                        None if shape.required => {
                            issues.push(Issue::at(property_path, REQUIRED_MESSAGE));
                        }
                        None => {}
                    }
                }
                Value::Object(output)
            }
        }
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

fn check_range(
    n: f64,
    minimum: Option<f64>,
    maximum: Option<f64>,
    report: &mut impl FnMut(String),
) {
    if let Some(min) = minimum {
        if n < min {
            report(format!("Number must be greater than or equal to {min}"));
        }
    }
    if let Some(max) = maximum {
        if n > max {
            report(format!("Number must be less than or equal to {max}"));
        }
    }
}

fn expected(kind: &str, value: &Value) -> String {
    format!("Expected {kind}, received {}", describe(value))
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

impl ParamsSchema for Shape {
    type Output = Value;

    fn library(&self) -> &'static str {
        LIBRARY
    }

    async fn parse(&self, input: &RouteParams) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        match self.validate(&input.to_json(), &mut issues) {
            Some(output) => Ok(output),
            None => Err(ValidationError::new(LIBRARY, issues)),
        }
    }
}

/// Validates the context params against a shape, failing on invalid input.
pub async fn parse_params(context: &RouteContext, schema: &Shape) -> RouteResult<Value> {
    typed_route_core::parse_params(context, schema).await
}

/// Validates the context params against a shape, returning the outcome as a value.
pub async fn safe_parse_params(
    context: &RouteContext,
    schema: &Shape,
) -> Result<SafeParseResult<Value>, ParamsError> {
    typed_route_core::safe_parse_params(context, schema).await
}
