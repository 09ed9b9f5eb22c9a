//! Rendering and comparison of [`Answer`] values.
//!
//! Answers start life as strings but validators may turn them into numbers
//! or booleans. Choice matching has to treat `"1"` and `1` as the same
//! answer, and error messages have to show values the way a user typed them
//! (no JSON quoting).

use serde_json::Value;

use crate::Answer;

/// Render an answer for display in messages.
///
/// Strings are shown verbatim, numbers without a trailing `.0`, and
/// compound values as compact JSON.
pub fn render(value: &Answer) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Compare two answers with loose, cross-type equality.
///
/// - values of the same kind compare directly (numbers numerically)
/// - a string and a number are equal when the string parses to that number
/// - booleans compare as `1` and `0` against numbers and strings
/// - `null` only equals `null`
pub fn loosely_equal(a: &Answer, b: &Answer) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            match (n.as_f64(), string_to_number(s)) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            }
        }
        (Value::Bool(flag), other) | (other, Value::Bool(flag)) => {
            loosely_equal(&Value::from(u8::from(*flag)), other)
        }
        (Value::Array(_), _) | (Value::Object(_), _) => a == b,
        (_, Value::Array(_)) | (_, Value::Object(_)) => false,
    }
}

/// Numeric reading of a string: surrounding whitespace is ignored and an
/// empty string reads as zero. Non-finite spellings are rejected.
fn string_to_number(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let lower = s.to_ascii_lowercase();
    if lower.contains("inf") || lower.contains("nan") {
        return None;
    }

    s.parse::<f64>().ok()
}
