use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// One raw row as delivered by the backend: an invoice, voucher, return,
/// stock line, visit or product. The engine only ever reads these.
pub type Record = serde_json::Map<String, Value>;

/// Resolve a dot-path like `customer.name` against a record.
/// Missing segments and JSON null both resolve to `None`.
pub fn resolve_path<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let first = parts.next()?;
    let mut current = record.get(first)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Same as [`resolve_path`] but starting from an arbitrary JSON value
/// (used for the entries of a dynamic report's nested array).
pub fn resolve_value_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    resolve_path(value.as_object()?, path)
}

/// Canonical string form of a scalar value. Options are deduplicated by
/// this string and exact-match filters compare through it, so both sides
/// always agree on identity even when the backend mixes numbers and
/// numeric strings for the same id field.
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse a record's date field as a calendar date. Accepts RFC 3339
/// timestamps, `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD`; anything
/// else is `None` and the row is silently dropped by date predicates.
pub fn parse_record_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?;
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Numeric reading of a field for totals. Absent, null and non-numeric
/// values count as zero; numeric strings are accepted.
pub fn numeric_field(record: &Record, path: &str) -> f64 {
    match resolve_path(record, path) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Adapt a raw backend response into records. The backend sometimes
/// returns the collection at the top level and sometimes wrapped under
/// a `data` key; non-object rows are skipped.
pub fn records_from_response(body: Value) -> Vec<Record> {
    let rows = match body {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    rows.into_iter()
        .filter_map(|row| match row {
            Value::Object(map) => Some(map),
            _ => None,
        })
        .collect()
}
