//! Ruby-flavoured rendering of recorded values.

use crate::parser::value::symbol_name;
use crate::parser::TraceValue;
use crate::utils::config::MAX_VALUE_DEPTH;

/// Rendering mode for values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    /// Single line, at most `max_len` characters
    Compact { max_len: usize },
    /// Multi-line, nested containers indented by two spaces
    Full,
}

/// Render an optional value; absent renders as `nil`
pub fn format_value(value: Option<&TraceValue>, mode: ValueFormat) -> String {
    let value = match value {
        Some(v) => v,
        None => return "nil".to_string(),
    };

    match mode {
        ValueFormat::Compact { max_len } => {
            let mut out = String::new();
            write_compact(&mut out, value, 0);
            truncate_chars(&out, max_len)
        }
        ValueFormat::Full => {
            let mut out = String::new();
            write_full(&mut out, value, 0, 0);
            out
        }
    }
}

/// Shorten `s` to at most `max_len` characters, ending with `...` when cut
///
/// Limits below the marker length keep only as many dots as fit.
pub fn truncate_chars(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return ".".repeat(max_len);
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

fn write_scalar(out: &mut String, value: &TraceValue) -> bool {
    match value {
        TraceValue::Nil => out.push_str("nil"),
        TraceValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        TraceValue::Number(n) => out.push_str(&n.to_string()),
        TraceValue::String(s) => out.push_str(&quote(s)),
        TraceValue::Symbol(name) => {
            out.push(':');
            out.push_str(name);
        }
        TraceValue::Array(_) | TraceValue::Hash(_) => return false,
    }
    true
}

fn write_compact(out: &mut String, value: &TraceValue, depth: usize) {
    if write_scalar(out, value) {
        return;
    }
    match value {
        TraceValue::Array(items) => {
            if depth >= MAX_VALUE_DEPTH {
                out.push_str("[...]");
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_compact(out, item, depth + 1);
            }
            out.push(']');
        }
        TraceValue::Hash(entries) => {
            if depth >= MAX_VALUE_DEPTH {
                out.push_str("{...}");
                return;
            }
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&hash_key(key));
                write_compact(out, item, depth + 1);
            }
            out.push('}');
        }
        _ => {}
    }
}

fn write_full(out: &mut String, value: &TraceValue, indent: usize, depth: usize) {
    if write_scalar(out, value) {
        return;
    }
    match value {
        TraceValue::Array(items) if items.is_empty() => out.push_str("[]"),
        TraceValue::Hash(entries) if entries.is_empty() => out.push_str("{}"),
        TraceValue::Array(_) if depth >= MAX_VALUE_DEPTH => out.push_str("[...]"),
        TraceValue::Hash(_) if depth >= MAX_VALUE_DEPTH => out.push_str("{...}"),
        TraceValue::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                push_indent(out, indent + 2);
                write_full(out, item, indent + 2, depth + 1);
                if i + 1 < items.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, indent);
            out.push(']');
        }
        TraceValue::Hash(entries) => {
            out.push_str("{\n");
            for (i, (key, item)) in entries.iter().enumerate() {
                push_indent(out, indent + 2);
                out.push_str(&hash_key(key));
                write_full(out, item, indent + 2, depth + 1);
                if i + 1 < entries.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            push_indent(out, indent);
            out.push('}');
        }
        _ => {}
    }
}

fn push_indent(out: &mut String, width: usize) {
    out.extend(std::iter::repeat(' ').take(width));
}

/// Identifier keys render as `key: `, anything else as `"key" => `
fn hash_key(key: &str) -> String {
    let as_symbol = format!(":{}", key);
    if symbol_name(&as_symbol).is_some() {
        format!("{}: ", key)
    } else {
        format!("{} => ", quote(key))
    }
}

fn quote(s: &str) -> String {
    format!("{:?}", s)
}
