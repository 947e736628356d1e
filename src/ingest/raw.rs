// src/ingest/raw.rs
//! Loose source-table representation and permissive field coercion.
//!
//! Source tables arrive with some subset of the canonical columns plus
//! arbitrary extras (per-platform metadata like `subreddit` or `query`).
//! Schema and numeric problems are recovered locally: missing columns get
//! type-appropriate defaults and malformed counters become 0. Nothing here
//! is surfaced as an error.

use serde_json::Value;
use std::collections::HashMap;

/// One raw row: column name → loosely typed value.
pub type RawRow = HashMap<String, Value>;

/// One raw per-source table.
pub type RawTable = Vec<RawRow>;

/// The nine canonical columns, in canonical order.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    "platform",
    "post_id",
    "author",
    "created_at",
    "content",
    "like_count",
    "reply_count",
    "share_count",
    "url",
];

/// Missing/null → empty string; numbers are rendered without a float tail so
/// numeric `post_id` columns survive as clean strings.
pub fn string_field(row: &RawRow, name: &str) -> String {
    match row.get(name) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (f as i64).to_string()
                } else {
                    f.to_string()
                }
            } else {
                n.to_string()
            }
        }
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Counter coercion: integers pass through, floats truncate, numeric strings
/// parse, everything else (and negatives) becomes 0.
pub fn count_field(row: &RawRow, name: &str) -> u64 {
    let v = match row.get(name) {
        Some(v) => v,
        None => return 0,
    };
    let n = match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i as f64
            } else {
                n.as_f64().unwrap_or(0.0)
            }
        }
        Value::String(s) => {
            let t = s.trim();
            if let Ok(i) = t.parse::<i64>() {
                i as f64
            } else {
                t.parse::<f64>().unwrap_or(0.0)
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if !n.is_finite() || n <= 0.0 {
        0
    } else {
        n.trunc() as u64
    }
}
