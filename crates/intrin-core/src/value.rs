//! Dynamic runtime values and the comparison rules used by constraints.
//!
//! Arguments, constants and generator parameters are all carried as
//! [`serde_json::Value`]. Comparisons follow dynamically-typed host rules:
//! numbers compare numerically regardless of integer/float representation,
//! booleans count as `0`/`1`, strings and arrays compare lexicographically,
//! and `null`/objects only support equality.

use std::cmp::Ordering;

pub use serde_json::Value;

#[derive(Debug, Clone, Copy)]
enum Numeric {
    Int(i128),
    Float(f64),
}

fn numeric(value: &Value) -> Option<Numeric> {
    match value {
        Value::Bool(flag) => Some(Numeric::Int(i128::from(*flag))),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Some(Numeric::Int(i128::from(int)))
            } else if let Some(uint) = number.as_u64() {
                Some(Numeric::Int(i128::from(uint)))
            } else {
                number.as_f64().map(Numeric::Float)
            }
        }
        _ => None,
    }
}

fn compare_numeric(lhs: Numeric, rhs: Numeric) -> Option<Ordering> {
    match (lhs, rhs) {
        (Numeric::Int(a), Numeric::Int(b)) => Some(a.cmp(&b)),
        (Numeric::Int(a), Numeric::Float(b)) => compare_int_float(a, b),
        (Numeric::Float(a), Numeric::Int(b)) => compare_int_float(b, a).map(Ordering::reverse),
        (Numeric::Float(a), Numeric::Float(b)) => a.partial_cmp(&b),
    }
}

// Exact: the integer is never rounded to f64, it is compared against the
// float's floor instead.
fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    let bound = 2f64.powi(127);
    let floor = float.floor();
    if floor >= bound {
        return Some(Ordering::Less);
    }
    if floor < -bound {
        return Some(Ordering::Greater);
    }
    let whole = floor as i128;
    Some(match int.cmp(&whole) {
        Ordering::Equal if floor < float => Ordering::Less,
        ordering => ordering,
    })
}

/// Host equality between two runtime values. Never fails: unrelated kinds are
/// simply unequal.
pub fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    if let (Some(a), Some(b)) = (numeric(lhs), numeric(rhs)) {
        return compare_numeric(a, b) == Some(Ordering::Equal);
    }
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| values_equal(x, y)))
        }
        _ => false,
    }
}

/// Host ordering between two runtime values, or `None` when the kinds cannot
/// be ordered against each other.
pub fn compare_values(lhs: &Value, rhs: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (numeric(lhs), numeric(rhs)) {
        return compare_numeric(a, b);
    }
    match (lhs, rhs) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Array(a), Value::Array(b)) => {
            // first unequal element decides; otherwise the shorter array sorts first
            for (x, y) in a.iter().zip(b) {
                if !values_equal(x, y) {
                    return compare_values(x, y);
                }
            }
            Some(a.len().cmp(&b.len()))
        }
        _ => None,
    }
}

/// Host truthiness: `false`, `null`, zero, and empty strings/arrays/objects
/// are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Short name of the value's kind, used in diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Human readable rendering: strings appear without quotes, everything else
/// as compact JSON.
pub fn value_label(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Rendering used inside generated declaration names. Never contains `_`,
/// so labels joined with `_` split back unambiguously, and distinct values
/// always get distinct labels.
///
/// Plain strings and numbers read as in [`value_label`]. Inside a label `$`
/// is written `$$` and `_` is written `$u`. A string whose text would also
/// parse as a non-string value (`"1"`, `"true"`, `"[2]"`) is prefixed with
/// `$s`.
pub fn name_label(value: &Value) -> String {
    match value {
        Value::String(text) => {
            let escaped = escape_name(text);
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) if !parsed.is_string() => format!("$s{escaped}"),
                _ => escaped,
            }
        }
        other => escape_name(&other.to_string()),
    }
}

fn escape_name(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '$' => out.push_str("$$"),
            '_' => out.push_str("$u"),
            other => out.push(other),
        }
    }
    out
}

/// Interprets a value as a non-negative integer count.
pub fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        _ => None,
    }
}
