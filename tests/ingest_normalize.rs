// tests/ingest_normalize.rs
use misinfo_profiler::ingest::normalize::{collapse_whitespace, normalize_table};
use misinfo_profiler::ingest::raw::{RawRow, RawTable};
use serde_json::{json, Value};

fn row(pairs: &[(&str, Value)]) -> RawRow {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn empty_table_is_ok() {
    let (posts, dropped) = normalize_table(&RawTable::new());
    assert!(posts.is_empty());
    assert_eq!(dropped, 0);
}

#[test]
fn content_whitespace_folds_to_single_spaces() {
    assert_eq!(collapse_whitespace("Breaking:\n\n big \t news "), "Breaking: big news");
}

#[test]
fn canonical_output_has_all_nine_fields_defaulted() {
    let table = vec![row(&[
        ("created_at", json!("2025-06-14")),
        ("post_id", json!("p1")),
        ("extra_platform_column", json!("ignored")),
    ])];
    let (posts, _) = normalize_table(&table);
    let p = &posts[0];
    assert_eq!(p.platform, "");
    assert_eq!(p.author, "");
    assert_eq!(p.url, "");
    assert_eq!(p.content, "");
    assert_eq!((p.like_count, p.reply_count, p.share_count), (0, 0, 0));
    // Extra columns never leak into the canonical record.
    let v = serde_json::to_value(p).unwrap();
    assert!(v.get("extra_platform_column").is_none());
    assert_eq!(v.as_object().unwrap().len(), 9);
}

#[test]
fn counters_coerce_to_nonnegative_integers() {
    let table = vec![row(&[
        ("created_at", json!("2025-06-14T08:00:00Z")),
        ("like_count", json!("12")),
        ("reply_count", json!(7.8)),
        ("share_count", json!("oops")),
    ])];
    let (posts, _) = normalize_table(&table);
    assert_eq!(posts[0].like_count, 12);
    assert_eq!(posts[0].reply_count, 7);
    assert_eq!(posts[0].share_count, 0);
}

#[test]
fn offset_timestamps_are_rewritten_as_utc() {
    let table = vec![row(&[
        ("created_at", json!("2025-06-14T16:00:00+05:30")),
        ("post_id", json!("p1")),
    ])];
    let (posts, _) = normalize_table(&table);
    let v = serde_json::to_value(&posts[0]).unwrap();
    assert_eq!(v["created_at"], json!("2025-06-14T10:30:00Z"));
}

#[test]
fn bad_timestamps_drop_rows_not_the_batch() {
    let table = vec![
        row(&[("created_at", json!("soon™")), ("post_id", json!("a"))]),
        row(&[("created_at", Value::Null), ("post_id", json!("b"))]),
        row(&[("post_id", json!("c"))]),
        row(&[
            ("created_at", json!("2025-06-14T08:00:00Z")),
            ("post_id", json!("d")),
        ]),
    ];
    let (posts, dropped) = normalize_table(&table);
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].post_id, "d");
    assert_eq!(dropped, 3);
}
