//! JSON Schema binding.
//!
//! Validates params against a JSON Schema document using the `jsonschema`
//! crate. Every validation error is reported, each at its instance path.
//!
//! Route params are strings, so before validation each top-level property is
//! coerced according to the `type` its schema declares: `integer`, `number`
//! and `boolean` strings become JSON scalars, and a single segment declared
//! as `array` becomes a one-element array. Values that cannot be coerced are
//! left as strings and fail validation normally.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use typed_route_core::{ParamsSchema, RouteParams};
//! use typed_route_schema::json_schema::JsonSchema;
//!
//! let schema: JsonSchema = JsonSchema::new(&json!({
//!     "type": "object",
//!     "properties": { "id": { "type": "integer", "minimum": 1 } },
//!     "required": ["id"]
//! }))
//! .unwrap();
//!
//! # tokio_test::block_on(async {
//! let params: RouteParams = [("id", "123")].into_iter().collect();
//! assert_eq!(schema.parse(&params).await.unwrap(), json!({"id": 123}));
//! # });
//! ```

use crate::error::SchemaError;
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};
use std::marker::PhantomData;
use typed_route_core::{
    Issue, ParamsError, ParamsSchema, PathSegment, RouteContext, RouteParams, RouteResult,
    SafeParseResult, ValidationError,
};

/// Library name reported in validation errors.
pub const LIBRARY: &str = "jsonschema";

/// A params schema compiled from a JSON Schema document.
///
/// `T` is the output type, `serde_json::Value` by default.
pub struct JsonSchema<T = Value> {
    document: Value,
    validator: Validator,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonSchema<T> {
    /// Compiles a schema document.
    pub fn new(document: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::validator_for(document)
            .map_err(|err| SchemaError::InvalidJsonSchema(err.to_string()))?;
        Ok(Self {
            document: document.clone(),
            validator,
            _marker: PhantomData,
        })
    }

    /// Returns the schema document.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Converts raw params into the JSON instance that gets validated.
    #[must_use]
    pub fn coerce(&self, input: &RouteParams) -> Value {
        let properties = self.document.get("properties").and_then(Value::as_object);
        let instance: Map<String, Value> = input
            .iter()
            .map(|(key, value)| {
                let raw = value.to_json();
                let coerced = match properties.and_then(|props| props.get(key)) {
                    Some(property) => coerce_value(raw, property),
                    None => raw,
                };
                (key.to_string(), coerced)
            })
            .collect();
        Value::Object(instance)
    }

    fn issues(&self, instance: &Value) -> Vec<Issue> {
        self.validator
            .iter_errors(instance)
            .map(|error| {
                let mut path = pointer_segments(&error.instance_path.to_string());
                let message = match &error.kind {
                    ValidationErrorKind::Required { property } => {
                        if let Some(name) = property.as_str() {
                            path.push(PathSegment::from(name));
                        }
                        typed_route_core::de::REQUIRED_MESSAGE.to_string()
                    }
                    _ => error.to_string(),
                };
                Issue::at(path, message)
            })
            .collect()
    }
}

impl<T> std::fmt::Debug for JsonSchema<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

fn declared_types(schema: &Value) -> Vec<&str> {
    match schema.get("type") {
        Some(Value::String(ty)) => vec![ty.as_str()],
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

fn coerce_value(value: Value, schema: &Value) -> Value {
    let types = declared_types(schema);
    match value {
        Value::String(raw) => {
            if types.contains(&"array") {
                let items = schema.get("items").unwrap_or(&Value::Null);
                return Value::Array(vec![coerce_value(Value::String(raw), items)]);
            }
            coerce_scalar(raw, &types)
        }
        Value::Array(values) => {
            let items = schema.get("items").unwrap_or(&Value::Null);
            Value::Array(values.into_iter().map(|v| coerce_value(v, items)).collect())
        }
        other => other,
    }
}

fn coerce_scalar(raw: String, types: &[&str]) -> Value {
    if types.contains(&"string") {
        return Value::String(raw);
    }
    if types.contains(&"integer") {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Number(n.into());
        }
    }
    if types.contains(&"number") {
        if let Some(n) = raw.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }
    if types.contains(&"boolean") {
        match raw.as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            _ => {}
        }
    }
    Value::String(raw)
}

fn pointer_segments(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| {
            let segment = segment.replace("~1", "/").replace("~0", "~");
            match segment.parse::<usize>() {
                Ok(index) => PathSegment::Index(index),
                Err(_) => PathSegment::Key(segment),
            }
        })
        .collect()
}

impl<T> ParamsSchema for JsonSchema<T>
where
    T: DeserializeOwned + Send,
{
    type Output = T;

    fn library(&self) -> &'static str {
        LIBRARY
    }

    async fn parse(&self, input: &RouteParams) -> Result<T, ValidationError> {
        let instance = self.coerce(input);
        let issues = self.issues(&instance);
        if !issues.is_empty() {
            return Err(ValidationError::new(LIBRARY, issues));
        }
        serde_json::from_value(instance)
            .map_err(|err| ValidationError::new(LIBRARY, vec![Issue::new(err.to_string())]))
    }
}

/// Validates the context params against a JSON Schema, failing on invalid input.
pub async fn parse_params<T>(context: &RouteContext, schema: &JsonSchema<T>) -> RouteResult<T>
where
    T: DeserializeOwned + Send,
{
    typed_route_core::parse_params(context, schema).await
}

/// Validates the context params against a JSON Schema, returning the outcome as a value.
pub async fn safe_parse_params<T>(
    context: &RouteContext,
    schema: &JsonSchema<T>,
) -> Result<SafeParseResult<T>, ParamsError>
where
    T: DeserializeOwned + Send,
{
    typed_route_core::safe_parse_params(context, schema).await
}
