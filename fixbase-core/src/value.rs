//! fixbase value
//!
//! `Value` is the atomic unit of data. It is an explicitly tagged scalar: the
//! caller (or a token-inference helper for stringly-typed inputs such as CSV
//! cells) decides the variant, and the SQL layer renders each variant without
//! any further guessing.

use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// token mapping to a server-side current-UTC-timestamp expression (any letter case)
const NOW_TOKEN: &str = "now";
/// token mapping to an unquoted SQL null (exact match)
const NULL_TOKEN: &str = "null";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
    /// server-side current UTC timestamp, rendered per dialect
    Now,
    /// verbatim pass-through, never quoted
    Raw(String),
    Null,
}

impl Value {
    /// Token-aware coercion for stringly-typed inputs.
    ///
    /// Rules, in order: an integer parse wins; `"now"` (case-insensitive)
    /// becomes [`Value::Now`]; `"null"` (exact) becomes [`Value::Null`];
    /// anything else is text.
    pub fn infer(s: &str) -> Value {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Int(i);
        }
        if s.eq_ignore_ascii_case(NOW_TOKEN) {
            return Value::Now;
        }
        if s == NULL_TOKEN {
            return Value::Null;
        }
        Value::Text(s.to_owned())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v}"),
            Value::DateTime(v) => write!(f, "{v}"),
            Value::Now => write!(f, "now"),
            Value::Raw(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

/// string conversions run through token inference
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::infer(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::infer(&v)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod value_tests {
    use super::*;

    #[test]
    fn infer_parses_integers_first() {
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer("-7"), Value::Int(-7));
        // not an i64, falls through to text
        assert_eq!(Value::infer("42x"), Value::Text("42x".to_string()));
    }

    #[test]
    fn infer_now_token_is_case_insensitive() {
        assert_eq!(Value::infer("now"), Value::Now);
        assert_eq!(Value::infer("NOW"), Value::Now);
        assert_eq!(Value::infer("Now"), Value::Now);
        assert_eq!(Value::infer("nowhere"), Value::Text("nowhere".to_string()));
    }

    #[test]
    fn infer_null_token_is_exact() {
        assert_eq!(Value::infer("null"), Value::Null);
        // only the lower-case marker is recognised
        assert_eq!(Value::infer("NULL"), Value::Text("NULL".to_string()));
    }

    #[test]
    fn from_impls() {
        assert_eq!(Value::from(1i64), Value::Int(1));
        assert_eq!(Value::from("now"), Value::Now);
        assert_eq!(Value::from(Option::<i64>::None), Value::Null);
    }
}
