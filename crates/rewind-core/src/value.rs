//! Structured values captured from live session state

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A structured value that can represent any captured state
///
/// Values form trees: no cycles, and depth is bounded by whatever shape the
/// capturing collaborator produces.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum Value {
    /// No value / null
    #[default]
    Null,
    /// Explicit "field absent / not applicable", distinct from `Null`
    Undefined,
    /// Boolean value
    Bool(bool),
    /// Numeric value (integers are stored as whole floats)
    Number(f64),
    /// String value
    String(String),
    /// Ordered list of values
    Array(Vec<Value>),
    /// Map of string keys to values
    Object(ValueMap),
}

/// A map of string keys to structured values
///
/// Uses IndexMap to preserve insertion order (required for deterministic encoding)
pub type ValueMap = IndexMap<String, Value>;

impl Value {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if this value is the explicit absent marker
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Try to get this value as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get this value as an integer
    ///
    /// Only whole numbers inside the `i64` range convert.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9.2e18 => Some(*n as i64),
            _ => None,
        }
    }

    /// Try to get this value as a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get this value as an object
    pub fn as_object(&self) -> Option<&ValueMap> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is an object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Deep structural equality
    ///
    /// Arrays compare length, then elementwise. Objects compare key count,
    /// then every key of `self` against the same key in `other`; a key
    /// missing from `other` fails. Key order is irrelevant.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.is_equal(y))
            }
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, x)| b.get(key).is_some_and(|y| x.is_equal(y)))
            }
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.is_equal(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::encode(self))
    }
}

// Convenient From implementations
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Number(i as f64)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Number(i as f64)
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Number(i as f64)
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Value::Number(i as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(vec: Vec<T>) -> Self {
        Value::Array(vec.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: &[(&str, Value)]) -> Value {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_value_accessors() {
        assert!(Value::Null.is_null());
        assert!(Value::Undefined.is_undefined());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Number(3.5).as_f64(), Some(3.5));
        assert_eq!(Value::Number(42.0).as_i64(), Some(42));
        assert_eq!(Value::Number(4.2).as_i64(), None);
        assert_eq!(Value::from("hello").as_str(), Some("hello"));
        assert_eq!(obj(&[("a", 1.into())]).get("a"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn test_null_and_undefined_differ() {
        assert!(!Value::Null.is_equal(&Value::Undefined));
        assert_ne!(Value::Null, Value::Undefined);
    }

    #[test]
    fn test_array_equality_checks_length_and_order() {
        let a = Value::from(vec![1, 2, 3]);
        assert!(a.is_equal(&Value::from(vec![1, 2, 3])));
        assert!(!a.is_equal(&Value::from(vec![1, 2])));
        assert!(!a.is_equal(&Value::from(vec![3, 2, 1])));
    }

    #[test]
    fn test_object_equality_ignores_key_order() {
        let a = obj(&[("x", 1.into()), ("y", "two".into())]);
        let b = obj(&[("y", "two".into()), ("x", 1.into())]);
        assert!(a.is_equal(&b));
    }

    #[test]
    fn test_object_equality_missing_key_fails() {
        let a = obj(&[("x", 1.into()), ("y", 2.into())]);
        let b = obj(&[("x", 1.into()), ("z", 2.into())]);
        assert!(!a.is_equal(&b));
        assert!(!a.is_equal(&obj(&[("x", 1.into())])));
    }

    #[test]
    fn test_option_maps_none_to_undefined() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Undefined);
        assert_eq!(Value::from(Some(7i64)), Value::Number(7.0));
    }

    #[test]
    fn test_serde_ron_round_trip() {
        let v = obj(&[
            ("units", Value::from(vec!["Alm", "Celica"])),
            ("gone", Value::Undefined),
        ]);
        let text = ron::to_string(&v).unwrap();
        let back: Value = ron::from_str(&text).unwrap();
        assert_eq!(back, v);
    }
}
