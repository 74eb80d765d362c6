//! Coercion of loosely typed input into safe defaults.
//!
//! Lenient entry points accept arbitrary [`serde_json::Value`]s. Every
//! external field passes through [`coerce`] (or one of the typed helpers)
//! so that a wrong type degrades to a neutral value instead of failing.

use serde_json::Value;

/// The kind of value a field is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A finite number; defaults to `0`.
    Number,
    /// A string; defaults to `""`.
    String,
    /// An array; defaults to `[]`.
    Array,
    /// A boolean; defaults to `false`.
    Boolean,
}

impl ValueKind {
    /// The neutral value of this kind.
    pub fn default_value(self) -> Value {
        match self {
            Self::Number => Value::from(0),
            Self::String => Value::String(String::new()),
            Self::Array => Value::Array(Vec::new()),
            Self::Boolean => Value::Bool(false),
        }
    }

    /// Whether `value` already conforms to this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Number => value.as_f64().is_some_and(f64::is_finite),
            Self::String => value.is_string(),
            Self::Array => value.is_array(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

/// Return `value` unchanged if it is of the expected kind, otherwise the
/// kind's neutral default.
pub fn coerce(kind: ValueKind, value: &Value) -> Value {
    if kind.matches(value) {
        value.clone()
    } else {
        kind.default_value()
    }
}

/// Coerce to a finite `f64`, defaulting to `0.0`.
pub fn number(value: &Value) -> f64 {
    coerce(ValueKind::Number, value).as_f64().unwrap_or(0.0)
}

/// Coerce to an owned string, defaulting to empty.
pub fn string(value: &Value) -> String {
    match coerce(ValueKind::String, value) {
        Value::String(s) => s,
        _ => String::new(),
    }
}

/// Coerce to a list of values, defaulting to empty.
pub fn array(value: &Value) -> Vec<Value> {
    match coerce(ValueKind::Array, value) {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Look up `key` on an object-like value, yielding `Null` when absent.
pub fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}
