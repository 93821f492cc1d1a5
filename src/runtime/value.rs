use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::runtime::types::{FloatKind, IntKind, Kind, TypeDescriptor};

/// String-keyed mapping as produced by decoding a JSON object.
pub type Map = BTreeMap<String, Value>;

/// Loosely-typed input value, usually the output of a generic decode step.
///
/// The set of variants is closed so the coercion ladder is a total function
/// over it. Values are plain owned data: they are `Send + Sync` and can be
/// handed to callables running on any thread.
///
/// Serde support is untagged, so a JSON document maps onto the variants
/// directly (`null`, booleans, numbers, strings, arrays, objects). Integral
/// JSON numbers deserialize as [`Value::Int`]; use
/// [`Value::from_json_loose`] to get the all-floats behaviour of a generic
/// decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// UTF-8 string value.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// String-keyed mapping.
    Map(Map),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "\"{}\"", v),
            Value::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            Value::Map(pairs) => {
                let items: Vec<String> = pairs
                    .iter()
                    .map(|(k, v)| format!("\"{}\": {}", k, v))
                    .collect();
                write!(f, "{{{}}}", items.join(", "))
            }
        }
    }
}

impl Value {
    /// Returns the runtime type label used in diagnostics.
    ///
    /// These labels match the descriptor names of the natural Rust type of
    /// each variant and are expected to remain stable.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "i64",
            Value::Float(_) => "f64",
            Value::String(_) => "String",
            Value::Array(_) => "Vec<Value>",
            Value::Map(_) => "Map",
        }
    }

    /// Returns the descriptor of this value's runtime type.
    pub fn descriptor(&self) -> TypeDescriptor {
        let kind = match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int(IntKind::I64),
            Value::Float(_) => Kind::Float(FloatKind::F64),
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Sequence,
            Value::Map(_) => Kind::Mapping,
        };
        TypeDescriptor::new(self.type_name(), kind)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Converts a value to plain text.
    ///
    /// Unlike [`std::fmt::Display`], strings are returned without quotes.
    /// Forwarded callable errors are surfaced through this form.
    pub fn to_string_value(&self) -> String {
        match self {
            Value::String(v) => v.clone(),
            other => other.to_string(),
        }
    }

    /// Converts a decoded JSON document, keeping integral numbers as `Int`.
    pub fn from_json(json: serde_json::Value) -> Value {
        Self::convert_json(json, false)
    }

    /// Converts a decoded JSON document, turning every number into `Float`.
    ///
    /// This is what a generic decoder that has no integer type hands over,
    /// and is the input the integral-float collapse step exists for.
    pub fn from_json_loose(json: serde_json::Value) -> Value {
        Self::convert_json(json, true)
    }

    fn convert_json(json: serde_json::Value, loose: bool) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) if !loose => Value::Int(v),
                _ => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| Self::convert_json(item, loose))
                    .collect(),
            ),
            serde_json::Value::Object(pairs) => Value::Map(
                pairs
                    .into_iter()
                    .map(|(k, v)| (k, Self::convert_json(v, loose)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
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

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        Value::from_json(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::Array(vec![Value::Int(1), Value::String("a".into())]).to_string(),
            "[1, \"a\"]"
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Int(1).type_name(), "i64");
        assert_eq!(Value::Float(1.0).type_name(), "f64");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::String("x".into()).type_name(), "String");
        assert_eq!(Value::Array(vec![]).type_name(), "Vec<Value>");
        assert_eq!(Value::Map(Map::new()).type_name(), "Map");
    }

    #[test]
    fn test_descriptor_matches_type_name() {
        let value = Value::Float(2.0);
        let descriptor = value.descriptor();
        assert_eq!(descriptor.name(), "f64");
        assert_eq!(descriptor.kind(), Kind::Float(FloatKind::F64));
        assert!(!descriptor.has_converter());
    }

    #[test]
    fn test_to_string_value() {
        assert_eq!(Value::String("hello".into()).to_string_value(), "hello");
        assert_eq!(Value::Int(7).to_string_value(), "7");
        assert_eq!(
            Value::Array(vec![Value::String("a".into()), Value::Int(2)]).to_string_value(),
            "[\"a\", 2]"
        );
    }

    #[test]
    fn test_from_json_keeps_integers() {
        let json = serde_json::json!([1, 2.5, "x", null, {"k": [true]}]);
        let value = Value::from_json(json);
        let mut inner = Map::new();
        inner.insert("k".to_string(), Value::Array(vec![Value::Bool(true)]));
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Int(1),
                Value::Float(2.5),
                Value::String("x".into()),
                Value::Null,
                Value::Map(inner),
            ])
        );
    }

    #[test]
    fn test_from_json_loose_turns_numbers_into_floats() {
        let json = serde_json::json!({"n": 3, "nested": [4]});
        let value = Value::from_json_loose(json);
        let map = value.as_map().expect("map");
        assert_eq!(map["n"], Value::Float(3.0));
        assert_eq!(map["nested"], Value::Array(vec![Value::Float(4.0)]));
    }

    #[test]
    fn test_untagged_serde_round_trip_shape() {
        let value: Value = serde_json::from_str(r#"[1, 1.5, "s", false, null]"#).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Int(1),
                Value::Float(1.5),
                Value::String("s".into()),
                Value::Bool(false),
                Value::Null,
            ])
        );
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"[1,1.5,"s",false,null]"#
        );
    }
}
