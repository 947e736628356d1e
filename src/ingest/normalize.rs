// src/ingest/normalize.rs
//! Normalizer: loose per-source tables → canonical `Post` rows.
//!
//! Missing canonical columns are defaulted, counters coerced, content
//! whitespace collapsed, and `created_at` parsed permissively and re-pinned
//! to UTC second precision. Rows whose timestamp cannot be parsed are
//! dropped (and counted), never retained with a null timestamp. Normalizing
//! an already-normalized table yields an identical table.

use crate::ingest::raw::{count_field, string_field, RawRow, RawTable};
use crate::record::Post;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

/// Collapse run-length whitespace (including newlines) to single spaces and trim.
pub fn collapse_whitespace(s: &str) -> String {
    RE_WS.replace_all(s, " ").trim().to_string()
}

/// Permissive timestamp parsing. Accepts RFC3339 with or without offset,
/// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`, date-only (midnight UTC),
/// and already-typed unix-second numbers. Result is truncated to second
/// precision.
pub fn parse_created_at(value: &Value) -> Option<DateTime<Utc>> {
    let dt = match value {
        Value::String(s) => parse_timestamp_str(s)?,
        Value::Number(n) => {
            let secs = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))?;
            Utc.timestamp_opt(secs, 0).single()?
        }
        _ => return None,
    };
    dt.with_nanosecond(0)
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Normalize one row; `None` when `created_at` is unparseable.
pub fn normalize_row(row: &RawRow) -> Option<Post> {
    let created_at = row.get("created_at").and_then(parse_created_at)?;
    Some(Post {
        platform: string_field(row, "platform"),
        post_id: string_field(row, "post_id"),
        author: string_field(row, "author"),
        created_at,
        content: collapse_whitespace(&string_field(row, "content")),
        like_count: count_field(row, "like_count"),
        reply_count: count_field(row, "reply_count"),
        share_count: count_field(row, "share_count"),
        url: string_field(row, "url"),
    })
}

/// Normalize a whole table. Returns the kept rows (canonical order preserved)
/// and the number of rows dropped for unparseable timestamps.
pub fn normalize_table(table: &RawTable) -> (Vec<Post>, usize) {
    let mut kept = Vec::with_capacity(table.len());
    let mut dropped = 0usize;
    for row in table {
        match normalize_row(row) {
            Some(post) => kept.push(post),
            None => dropped += 1,
        }
    }
    (kept, dropped)
}
