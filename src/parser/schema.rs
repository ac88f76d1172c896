//! Trace document schema definitions.
//!
//! This module defines the structure of trace files produced by the Ruby
//! tracer: a versioned envelope around a time-ordered list of events.

use super::value::TraceValue;
use serde::{Deserialize, Serialize};

/// Kind of trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Method entered; a matching `return` may follow
    Call,
    /// Method returned
    Return,
    /// Method entered and returned with no nested calls
    CallReturn,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Call => "call",
            EventKind::Return => "return",
            EventKind::CallReturn => "call_return",
        }
    }
}

/// How a parameter is bound (mirrors Ruby's `Method#parameters`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Req,
    Opt,
    Keyreq,
    Key,
    Rest,
    Keyrest,
    Block,
}

/// A single recorded parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub kind: ParamKind,

    /// Empty for anonymous parameters (`*`, `**`, `&`)
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub value: Option<TraceValue>,
}

/// One element of the trace event stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub event: EventKind,

    pub method_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defined_class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,

    /// Absent and `null` both mean nil
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<TraceValue>,

    /// Call-stack depth at the time of the event
    pub depth: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,

    /// Seconds; usually absent on `call` events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl TraceEvent {
    /// Bare event with only the required fields set
    pub fn new(event: EventKind, method_name: impl Into<String>, depth: u32) -> Self {
        Self {
            event,
            method_name: method_name.into(),
            defined_class: None,
            parameters: None,
            return_value: None,
            depth,
            path: None,
            lineno: None,
            start_time: None,
            end_time: None,
            duration: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.defined_class = Some(class.into());
        self
    }

    pub fn with_return_value(mut self, value: TraceValue) -> Self {
        self.return_value = Some(value);
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// A loaded trace file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDocument {
    pub version: String,

    pub timestamp: String,

    pub events: Vec<TraceEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_deserialization() {
        let event: TraceEvent = serde_json::from_value(json!({
            "event": "call_return",
            "method_name": "to_s",
            "defined_class": "Integer",
            "parameters": [{"type": "opt", "name": "base", "value": 10}],
            "return_value": "42",
            "depth": 2,
            "duration": 0.001
        }))
        .unwrap();

        assert_eq!(event.event, EventKind::CallReturn);
        assert_eq!(event.depth, 2);
        assert_eq!(event.defined_class.as_deref(), Some("Integer"));
        let params = event.parameters.unwrap();
        assert_eq!(params[0].kind, ParamKind::Opt);
        assert_eq!(params[0].name, "base");
        assert_eq!(event.return_value, Some(TraceValue::String("42".to_string())));
    }

    #[test]
    fn test_null_return_value_is_absent() {
        let event: TraceEvent = serde_json::from_value(json!({
            "event": "return",
            "method_name": "save",
            "return_value": null,
            "depth": 0
        }))
        .unwrap();
        assert!(event.return_value.is_none());
    }

    #[test]
    fn test_unknown_param_kind_rejected() {
        let result: Result<Parameter, _> =
            serde_json::from_value(json!({"type": "nokey", "name": "x"}));
        assert!(result.is_err());
    }
}
