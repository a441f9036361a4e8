//! Loose conversions between JSON values used by the rule evaluator.
//!
//! Pipeline output is mostly text, so numbers, booleans and dates are
//! accepted in their string forms as well.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Placeholder written by upstream genomic pipelines for missing data.
pub const MISSING_SENTINEL: &str = ".";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// Collapse absent fields, JSON null and the `.` sentinel into `None`.
pub fn normalize_missing(data: Option<&Value>) -> Option<&Value> {
    match data {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s == MISSING_SENTINEL => None,
        Some(value) => Some(value),
    }
}

pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(num) => num.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            s.parse::<f64>().ok().filter(|n| !n.is_nan())
        }
        _ => None,
    }
}

pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(num) => num.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Milliseconds since the Unix epoch. Numbers are taken as epoch millis;
/// strings may be RFC 3339, ISO-like date-times (UTC) or plain dates
/// (midnight UTC).
pub fn as_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(num) => num.as_f64().map(|n| n as i64),
        Value::String(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

fn parse_timestamp(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Plain string form of a value; `None` renders as an empty string.
pub fn as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| as_text(Some(item)))
            .collect::<Vec<_>>()
            .join(","),
        Some(other) => other.to_string(),
    }
}

/// Equality used for list membership: numbers compare by value so that
/// `1` and `1.0` match, everything else structurally.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(num) => num.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
