//! Parameter and return values carried by trace events.
//!
//! Traces record arbitrary Ruby values serialized as JSON. They are read into
//! a closed set of variants so formatting can match on every case.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A recorded Ruby value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum TraceValue {
    Nil,
    Bool(bool),
    Number(Number),
    String(String),
    /// Symbol name without the leading colon
    Symbol(String),
    Array(Vec<TraceValue>),
    /// Key order is the order recorded in the trace
    Hash(Vec<(String, TraceValue)>),
}

impl TraceValue {
    pub fn is_nil(&self) -> bool {
        matches!(self, TraceValue::Nil)
    }
}

/// Returns the symbol name if `s` is written as a Ruby symbol literal
/// (`:name`, `:empty?`, `:save!`, `:value=`).
pub fn symbol_name(s: &str) -> Option<&str> {
    let name = s.strip_prefix(':')?;
    let body = name
        .strip_suffix(|c: char| matches!(c, '?' | '!' | '='))
        .unwrap_or(name);

    let mut chars = body.chars();
    let first = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some(name)
    } else {
        None
    }
}

impl From<Value> for TraceValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => TraceValue::Nil,
            Value::Bool(b) => TraceValue::Bool(b),
            Value::Number(n) => TraceValue::Number(n),
            Value::String(s) => match symbol_name(&s) {
                Some(name) => TraceValue::Symbol(name.to_string()),
                None => TraceValue::String(s),
            },
            Value::Array(items) => {
                TraceValue::Array(items.into_iter().map(TraceValue::from).collect())
            }
            Value::Object(map) => TraceValue::Hash(
                map.into_iter()
                    .map(|(k, v)| (k, TraceValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<TraceValue> for Value {
    fn from(value: TraceValue) -> Self {
        match value {
            TraceValue::Nil => Value::Null,
            TraceValue::Bool(b) => Value::Bool(b),
            TraceValue::Number(n) => Value::Number(n),
            TraceValue::String(s) => Value::String(s),
            TraceValue::Symbol(name) => Value::String(format!(":{}", name)),
            TraceValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            TraceValue::Hash(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k, Value::from(v));
                }
                Value::Object(map)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_symbol_detection() {
        assert_eq!(symbol_name(":foo"), Some("foo"));
        assert_eq!(symbol_name(":empty?"), Some("empty?"));
        assert_eq!(symbol_name(":_private"), Some("_private"));
        assert_eq!(symbol_name("foo"), None);
        assert_eq!(symbol_name(":"), None);
        assert_eq!(symbol_name(":1abc"), None);
        assert_eq!(symbol_name(":two words"), None);
    }

    #[test]
    fn test_hash_keeps_key_order() {
        let value = TraceValue::from(json!({"zeta": 1, "alpha": [true, null]}));
        match value {
            TraceValue::Hash(entries) => {
                assert_eq!(entries[0].0, "zeta");
                assert_eq!(entries[1].0, "alpha");
                assert_eq!(
                    entries[1].1,
                    TraceValue::Array(vec![TraceValue::Bool(true), TraceValue::Nil])
                );
            }
            other => panic!("expected hash, got {:?}", other),
        }
    }

    #[test]
    fn test_symbol_serializes_with_colon() {
        let json = serde_json::to_value(TraceValue::Symbol("ok".to_string())).unwrap();
        assert_eq!(json, json!(":ok"));
    }
}
