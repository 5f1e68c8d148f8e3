//! Conversion of typed configuration values into DRL literal text.
use itertools::Itertools;
use serde_json::Value;

/// Formats a configuration value as a DRL literal.
///
/// Arrays are rendered as a bare comma-separated list (no brackets) so the
/// result can be dropped straight into an argument list. Objects fall back to
/// their JSON text.
pub fn format_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{}\"", escape_string(s)),
        Value::Array(items) => format_argument_list(items),
        Value::Object(_) => value.to_string(),
    }
}

/// Formats a list of values as a comma-separated argument list.
pub fn format_argument_list(values: &[Value]) -> String {
    values.iter().map(format_literal).join(", ")
}

/// Escapes backslashes, double quotes and control whitespace for a
/// double-quoted string literal.
pub fn escape_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Returns `true` for values that count as "not provided" in a node
/// configuration: null, empty strings and empty arrays.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
