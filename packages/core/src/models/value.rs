//! Scalar Cell Values
//!
//! A `Value` is the runtime-typed content of a single table cell. Geometry
//! values travel as Well-Known Text inside the `String` variant; the escaping
//! layer detects the WKT prefix and renders a geometry literal instead of a
//! plain quoted string.

use serde::{Deserialize, Serialize};

/// Scalar value of one table cell.
///
/// Deserialization is untagged, so externally produced JSON datasets map
/// directly: numbers become `Integer` or `Float`, `true`/`false` become
/// `Boolean`, `null` becomes `Null` and everything else a `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Null,
    String(String),
}

impl Value {
    /// Whether this is the SQL NULL marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Borrow the inner string, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Coerce booleans to their integer literal form (`true` -> 1,
    /// `false` -> 0); every other kind passes through unchanged.
    ///
    /// Identifier comparisons and range predicates compare booleans as
    /// integers, so `true` and `1` are the same filter value.
    pub fn coerce_bool(self) -> Value {
        match self {
            Value::Boolean(b) => Value::Integer(i64::from(b)),
            other => other,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
