//! # Rows
//!
//! A row is a flat JSON object. This module holds the helpers every
//! layer shares: building rows from inputs, loose equality, sort keys
//! and timestamps.
//!
//! ## Ordering
//! Sort keys compare like a browser's `localeCompare`: letters first
//! without regard to case, so `Apple, banana, cherry, Zeta`; when two
//! keys differ only in case the lowercase one comes first.
//!
//! ## Loose Equality
//! ```text
//! stored      wanted     equal?
//! ─────────   ────────   ──────
//! 5           "5"        yes    (numeric text compares as a number)
//! "5"         5          yes
//! 5           5.0        yes
//! null        null       yes
//! null        0          no     (null only equals null/missing)
//! true        1          yes    (bools compare as 0/1)
//! "abc"       "ABC"      no
//! ```

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{DbError, DbResult};

/// One record in a table.
pub type Row = Map<String, Value>;

// =============================================================================
// Building Rows
// =============================================================================

/// Serializes an input into a row.
pub fn to_row<T: Serialize>(input: &T) -> DbResult<Row> {
    match serde_json::to_value(input)? {
        Value::Object(map) => Ok(map),
        other => Err(DbError::Serialization(serde::ser::Error::custom(format!(
            "expected an object, got {other}"
        )))),
    }
}

/// Formats a timestamp the way rows store it: `2024-01-01T10:00:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Current time as a row timestamp.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Reads `id` as an integer (0 when absent or not numeric).
pub fn row_id(row: &Row) -> i64 {
    row.get("id").and_then(as_number).map(|n| n as i64).unwrap_or(0)
}

/// Reads a numeric field, accepting numeric text.
pub fn number_field(row: &Row, field: &str) -> f64 {
    row.get(field).and_then(as_number).unwrap_or(0.0)
}

/// Reads a text field; missing and null read as `None`.
pub fn text_field<'a>(row: &'a Row, field: &str) -> Option<&'a str> {
    row.get(field).and_then(Value::as_str)
}

// =============================================================================
// Comparison
// =============================================================================

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// Equality with the coercions of a form-driven frontend.
///
/// `None` stands for a missing field and behaves like `null`.
pub fn loose_eq(stored: Option<&Value>, wanted: &Value) -> bool {
    let stored = stored.unwrap_or(&Value::Null);
    match (stored, wanted) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            stored == wanted
        }
        (a, b) => match (as_number(a), as_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// Predicate matching rows whose `field` loosely equals `value`.
pub fn field_eq<'a>(field: &'a str, value: &'a Value) -> impl Fn(&Row) -> bool + 'a {
    move |row| loose_eq(row.get(field), value)
}

/// Predicate matching the row with the given id.
pub fn by_id(id: i64) -> impl Fn(&Row) -> bool {
    move |row| row_id(row) == id
}

/// Text used to order rows by a field.
///
/// Missing and falsy values (`null`, `false`, `0`, `""`) sort as the
/// empty string; numbers sort by their decimal text, so `10` comes
/// before `9`.
pub fn sort_key(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(f) if f == 0.0 => String::new(),
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Some(other) => other.to_string(),
    }
}

/// Case-insensitive text order with a lowercase-first tie-break.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Compares two field values by their [`sort_key`]s.
pub fn compare_keys(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    collate(&sort_key(a), &sort_key(b))
}

/// Orders rows newest first by `created_at`, then by id.
pub fn newest_first(a: &Row, b: &Row) -> Ordering {
    compare_keys(b.get("created_at"), a.get("created_at"))
        .then_with(|| row_id(b).cmp(&row_id(a)))
}

/// Orders rows by one text field, descending, falling back to another.
pub fn desc_by(a: &Row, b: &Row, first: &str, second: &str) -> Ordering {
    compare_keys(b.get(first), a.get(first))
        .then_with(|| compare_keys(b.get(second), a.get(second)))
}

/// Orders rows by one text field, ascending.
pub fn asc_by(a: &Row, b: &Row, field: &str) -> Ordering {
    compare_keys(a.get(field), b.get(field))
}
