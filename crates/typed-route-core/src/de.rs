//! Serde deserializer over raw route parameters.
//!
//! Every route parameter is a string, but handlers want typed values. The
//! [`ParamsDeserializer`] coerces on demand: a field declared as `u64` is
//! parsed from its string, a `Vec<String>` accepts a catch-all segment, and
//! a missing `Option` is `None`.
//!
//! # Coercion rules
//!
//! | Target | Accepted input |
//! |---|---|
//! | integers | decimal string that fits the type |
//! | `f32` / `f64` | finite decimal string |
//! | `bool` | `"true"` or `"false"` |
//! | `char` | string of exactly one character |
//! | `Vec<_>` | catch-all list, or a single segment as a one-element list |
//! | unit enum | string naming the variant |
//!
//! # Example
//!
//! ```rust
//! use serde::Deserialize;
//! use typed_route_core::{de::from_params, RouteParams};
//!
//! #[derive(Deserialize)]
//! struct Params {
//!     id: u64,
//!     slug: Vec<String>,
//!     draft: Option<bool>,
//! }
//!
//! let mut raw = RouteParams::new();
//! raw.insert("id", "123");
//! raw.insert("slug", vec!["docs", "intro"]);
//!
//! let params: Params = from_params(&raw).unwrap();
//! assert_eq!(params.id, 123);
//! assert_eq!(params.slug, vec!["docs", "intro"]);
//! assert_eq!(params.draft, None);
//! ```

use crate::params::{ParamValue, RouteParams};
use crate::validation::{Issue, PathSegment};
use serde::de::value::{BorrowedStrDeserializer, StrDeserializer};
use serde::de::{
    self, Deserialize, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use std::fmt;
use thiserror::Error;

/// Message for a required key that is not present.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Deserializes `T` from raw route parameters.
pub fn from_params<'de, T: Deserialize<'de>>(params: &'de RouteParams) -> Result<T, DeError> {
    T::deserialize(ParamsDeserializer::new(params))
}

/// Error produced while deserializing route parameters.
///
/// Carries the path of the offending key and, for catch-all segments, the
/// index of the offending element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DeError(Issue);

impl DeError {
    fn new(message: impl Into<String>) -> Self {
        Self(Issue::new(message))
    }

    fn invalid(received: &str, expected: &str) -> Self {
        Self::new(format!("Expected {expected}, received \"{received}\""))
    }

    fn prefixed(self, segment: impl Into<PathSegment>) -> Self {
        Self(self.0.prefixed(segment))
    }

    /// Returns the underlying issue.
    #[must_use]
    pub fn issue(&self) -> &Issue {
        &self.0
    }

    /// Converts the error into a validation issue.
    #[must_use]
    pub fn into_issue(self) -> Issue {
        self.0
    }
}

impl de::Error for DeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::new(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        Self(Issue::at([field], REQUIRED_MESSAGE))
    }

    fn unknown_field(field: &str, _expected: &'static [&'static str]) -> Self {
        Self(Issue::at([field], format!("Unrecognized key \"{field}\"")))
    }
}

/// Deserializer for a whole [`RouteParams`] set, presented as a map.
#[derive(Debug, Clone, Copy)]
pub struct ParamsDeserializer<'de> {
    params: &'de RouteParams,
}

impl<'de> ParamsDeserializer<'de> {
    /// Creates a deserializer over the given params.
    #[must_use]
    pub fn new(params: &'de RouteParams) -> Self {
        Self { params }
    }
}

impl<'de> de::Deserializer<'de> for ParamsDeserializer<'de> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_map(Entries::new(self.params.entries()))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit_struct seq tuple tuple_struct map struct enum
        identifier ignored_any
    }
}

struct Entries<'de> {
    iter: std::slice::Iter<'de, (String, ParamValue)>,
    pending: Option<(&'de str, &'de ParamValue)>,
}

impl<'de> Entries<'de> {
    fn new(entries: &'de [(String, ParamValue)]) -> Self {
        Self {
            iter: entries.iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for Entries<'de> {
    type Error = DeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DeError> {
        match self.iter.next() {
            Some((key, value)) => {
                self.pending = Some((key.as_str(), value));
                seed.deserialize(BorrowedStrDeserializer::new(key.as_str()))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DeError> {
        let (key, value) = self
            .pending
            .take()
            .ok_or_else(|| DeError::new("value requested before key"))?;
        seed.deserialize(ValueDeserializer { value })
            .map_err(|e| e.prefixed(key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct Elements<'de, I> {
    iter: I,
    index: usize,
    _marker: std::marker::PhantomData<&'de str>,
}

impl<'de, I: Iterator<Item = &'de str>> Elements<'de, I> {
    fn new(iter: I) -> Self {
        Self {
            iter,
            index: 0,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<'de, I: Iterator<Item = &'de str>> SeqAccess<'de> for Elements<'de, I> {
    type Error = DeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DeError> {
        match self.iter.next() {
            Some(value) => {
                let index = self.index;
                self.index += 1;
                seed.deserialize(ScalarDeserializer { value })
                    .map(Some)
                    .map_err(|e| e.prefixed(index))
            }
            None => Ok(None),
        }
    }
}

struct ValueDeserializer<'de> {
    value: &'de ParamValue,
}

macro_rules! single_only {
    ($($method:ident)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
            match self.value {
                ParamValue::Single(value) => ScalarDeserializer { value }.$method(visitor),
                ParamValue::Multiple(_) => {
                    Err(DeError::new("Expected a single value, received a list"))
                }
            }
        }
    )*};
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.value {
            ParamValue::Single(value) => visitor.visit_borrowed_str(value),
            ParamValue::Multiple(values) => {
                visitor.visit_seq(Elements::new(values.iter().map(String::as_str)))
            }
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_seq(Elements::new(
            self.value.as_slice().iter().map(String::as_str),
        ))
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self.value {
            ParamValue::Single(value) => {
                ScalarDeserializer { value }.deserialize_enum(name, variants, visitor)
            }
            ParamValue::Multiple(_) => {
                Err(DeError::new("Expected a single value, received a list"))
            }
        }
    }

    single_only! {
        deserialize_bool
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
        deserialize_f32 deserialize_f64 deserialize_char
        deserialize_str deserialize_string deserialize_identifier
    }

    forward_to_deserialize_any! {
        bytes byte_buf unit unit_struct tuple tuple_struct map struct ignored_any
    }
}

struct ScalarDeserializer<'de> {
    value: &'de str,
}

impl ScalarDeserializer<'_> {
    fn parse_float(&self) -> Result<f64, DeError> {
        self.value
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| DeError::invalid(self.value, "number"))
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident: $ty:ty;)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
            match self.value.parse::<$ty>() {
                Ok(n) => visitor.$visit(n),
                Err(_) => Err(DeError::invalid(self.value, "integer")),
            }
        }
    )*};
}

impl<'de> de::Deserializer<'de> for ScalarDeserializer<'de> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.value {
            "true" => visitor.visit_bool(true),
            "false" => visitor.visit_bool(false),
            other => Err(DeError::invalid(other, "boolean")),
        }
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8: i8;
        deserialize_i16 => visit_i16: i16;
        deserialize_i32 => visit_i32: i32;
        deserialize_i64 => visit_i64: i64;
        deserialize_i128 => visit_i128: i128;
        deserialize_u8 => visit_u8: u8;
        deserialize_u16 => visit_u16: u16;
        deserialize_u32 => visit_u32: u32;
        deserialize_u64 => visit_u64: u64;
        deserialize_u128 => visit_u128: u128;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let n = self.parse_float()?;
        visitor.visit_f32(n as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let n = self.parse_float()?;
        visitor.visit_f64(n)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(DeError::invalid(self.value, "single character")),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_borrowed_bytes(self.value.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_seq(Elements::new(std::iter::once(self.value)))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        let variant: StrDeserializer<'_, DeError> = self.value.into_deserializer();
        visitor.visit_enum(variant)
    }

    forward_to_deserialize_any! {
        str string identifier unit_struct tuple tuple_struct map struct ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Deserialize, PartialEq)]
    struct ById {
        id: u64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Sort {
        Asc,
        Desc,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listing {
        page: Option<u32>,
        sort: Sort,
        slug: Vec<String>,
        ratio: f64,
        published: bool,
    }

    fn params(pairs: &[(&str, ParamValue)]) -> RouteParams {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_coerces_integer() {
        let raw = params(&[("id", "123".into())]);
        let parsed: ById = from_params(&raw).unwrap();
        assert_eq!(parsed, ById { id: 123 });
    }

    #[test]
    fn test_rejects_non_numeric() {
        let raw = params(&[("id", "banana".into())]);
        let err = from_params::<ById>(&raw).unwrap_err();
        assert_eq!(err.issue().path, vec![PathSegment::from("id")]);
        assert_eq!(err.issue().message, "Expected integer, received \"banana\"");
    }

    #[test]
    fn test_missing_required_field() {
        let raw = RouteParams::new();
        let err = from_params::<ById>(&raw).unwrap_err();
        assert_eq!(err.issue().path, vec![PathSegment::from("id")]);
        assert_eq!(err.issue().message, REQUIRED_MESSAGE);
    }

    #[test]
    fn test_mixed_struct() {
        let raw = params(&[
            ("sort", "desc".into()),
            ("slug", vec!["a", "b"].into()),
            ("ratio", "0.5".into()),
            ("published", "true".into()),
        ]);
        let parsed: Listing = from_params(&raw).unwrap();
        assert_eq!(
            parsed,
            Listing {
                page: None,
                sort: Sort::Desc,
                slug: vec!["a".into(), "b".into()],
                ratio: 0.5,
                published: true,
            }
        );
    }

    #[test]
    fn test_single_segment_as_list() {
        #[derive(Deserialize)]
        struct Slug {
            slug: Vec<String>,
        }
        let raw = params(&[("slug", "intro".into())]);
        let parsed: Slug = from_params(&raw).unwrap();
        assert_eq!(parsed.slug, vec!["intro"]);
    }

    #[test]
    fn test_list_element_error_has_index() {
        #[derive(Debug, Deserialize)]
        struct Ids {
            #[allow(dead_code)]
            ids: Vec<u32>,
        }
        let raw = params(&[("ids", vec!["1", "x"].into())]);
        let err = from_params::<Ids>(&raw).unwrap_err();
        assert_eq!(
            err.issue().path,
            vec![PathSegment::from("ids"), PathSegment::from(1)]
        );
    }

    #[test]
    fn test_list_for_scalar_rejected() {
        let raw = params(&[("id", vec!["1", "2"].into())]);
        let err = from_params::<ById>(&raw).unwrap_err();
        assert_eq!(err.issue().path_string(), "id");
    }

    #[test]
    fn test_rejects_non_finite_float() {
        #[derive(Debug, Deserialize)]
        struct Ratio {
            #[allow(dead_code)]
            ratio: f64,
        }
        let raw = params(&[("ratio", "NaN".into())]);
        assert!(from_params::<Ratio>(&raw).is_err());
    }

    #[test]
    fn test_unknown_field_denied() {
        #[derive(Debug, Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Strict {
            #[allow(dead_code)]
            id: String,
        }
        let raw = params(&[("id", "1".into()), ("extra", "2".into())]);
        let err = from_params::<Strict>(&raw).unwrap_err();
        assert_eq!(err.issue().path_string(), "extra");
    }

    proptest::proptest! {
        #[test]
        fn proptest_integer_coercion(id in proptest::prelude::any::<u64>()) {
            let raw = params(&[("id", id.to_string().into())]);
            let parsed: ById = from_params(&raw).unwrap();
            proptest::prop_assert_eq!(parsed.id, id);
        }

        #[test]
        fn proptest_non_numeric_rejected_at_key(word in "[a-z]{1,12}") {
            let raw = params(&[("id", word.as_str().into())]);
            let err = from_params::<ById>(&raw).unwrap_err();
            proptest::prop_assert_eq!(err.issue().path_string(), "id");
        }
    }

    #[test]
    fn test_into_json_value() {
        let raw = params(&[("id", "1".into()), ("slug", vec!["a", "b"].into())]);
        let value: Value = from_params(&raw).unwrap();
        assert_eq!(value, json!({"id": "1", "slug": ["a", "b"]}));
        assert_eq!(value, raw.to_json());
    }
}
