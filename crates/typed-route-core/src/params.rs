//! Raw route parameter storage.
//!
//! Route parameters arrive from the host framework as strings: a plain
//! dynamic segment yields one value, a catch-all segment yields a list.
//! [`RouteParams`] keeps them in insertion order using a small-vector
//! optimization, since most routes carry only a handful of parameters.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// A raw route parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// A single dynamic segment, e.g. `[id]`.
    Single(String),
    /// A catch-all segment, e.g. `[...slug]`.
    Multiple(Vec<String>),
}

impl ParamValue {
    /// Returns the value if this is a single segment.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the values as a slice; a single segment is a one-element slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    /// Converts the value to JSON: a string or an array of strings.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(value) => Value::String(value.clone()),
            Self::Multiple(values) => {
                Value::Array(values.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Raw route parameters.
///
/// Keys are unique; inserting an existing key replaces its value in place.
/// An absent optional segment is represented by the key not being present.
///
/// # Example
///
/// ```rust
/// use typed_route_core::{ParamValue, RouteParams};
///
/// let mut params = RouteParams::new();
/// params.insert("id", "123");
/// params.insert("slug", vec!["docs", "intro"]);
///
/// assert_eq!(params.get_str("id"), Some("123"));
/// assert_eq!(
///     params.get("slug"),
///     Some(&ParamValue::Multiple(vec!["docs".into(), "intro".into()]))
/// );
/// assert_eq!(params.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteParams {
    inner: SmallVec<[(String, ParamValue); INLINE_PARAMS]>,
}

impl RouteParams {
    /// Creates a new empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a params set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Inserts a parameter, replacing any existing value for the key.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Inserts or removes a parameter depending on whether a value is present.
    pub fn set(&mut self, name: impl Into<String>, value: Option<impl Into<ParamValue>>) {
        let name = name.into();
        match value {
            Some(value) => self.insert(name, value),
            None => {
                self.remove(&name);
            }
        }
    }

    /// Appends a value, promoting an existing single value to a list.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => match existing {
                ParamValue::Multiple(values) => values.push(value),
                ParamValue::Single(first) => {
                    let first = std::mem::take(first);
                    *existing = ParamValue::Multiple(vec![first, value]);
                }
            },
            None => self.inner.push((name, ParamValue::Single(value))),
        }
    }

    /// Returns the value for a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Returns the value for a single-segment parameter by name.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_str)
    }

    /// Removes a parameter, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let index = self.inner.iter().position(|(n, _)| n == name)?;
        Some(self.inner.remove(index).1)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn entries(&self) -> &[(String, ParamValue)] {
        &self.inner
    }

    /// Returns the parameters as a JSON object of strings and string arrays.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .inner
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl Serialize for RouteParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.inner.len()))?;
        for (name, value) in &self.inner {
            match value {
                ParamValue::Single(v) => map.serialize_entry(name, v)?,
                ParamValue::Multiple(vs) => map.serialize_entry(name, vs)?,
            }
        }
        map.end()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
