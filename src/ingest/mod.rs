// src/ingest/mod.rs
pub mod dedup;
pub mod normalize;
pub mod raw;

use crate::ingest::dedup::deduplicate;
use crate::ingest::normalize::normalize_table;
use crate::ingest::raw::RawTable;
use crate::record::Post;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on scrape).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "pipeline_rows_total",
            "Raw rows received across all source tables."
        );
        describe_counter!(
            "pipeline_dropped_timestamp_total",
            "Rows dropped for unparseable created_at."
        );
        describe_counter!(
            "pipeline_dedup_key_total",
            "Rows removed by (platform, post_id) keep-first dedup."
        );
        describe_counter!("pipeline_dedup_url_total", "Rows removed by URL dedup.");
        describe_counter!(
            "pipeline_kept_total",
            "Canonical rows kept after normalization + dedup."
        );
    });
}

/// Drop-count accounting for one batch. The only user-visible failure mode of
/// the core is "fewer rows than expected", and these counts explain it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub rows_in: usize,
    pub dropped_timestamps: usize,
    pub dedup_by_key: usize,
    pub dedup_by_url: usize,
    pub kept: usize,
}

/// Run the normalization + deduplication half of the pipeline over any number
/// of raw source tables. Empty input degrades to an empty output.
pub fn normalize_and_deduplicate(tables: &[RawTable]) -> (Vec<Post>, IngestStats) {
    ensure_metrics_described();

    let mut stats = IngestStats::default();
    let mut combined: Vec<Post> = Vec::new();
    for table in tables {
        stats.rows_in += table.len();
        let (mut posts, dropped) = normalize_table(table);
        stats.dropped_timestamps += dropped;
        combined.append(&mut posts);
    }

    let (kept, dd) = deduplicate(combined);
    stats.dedup_by_key = dd.by_key;
    stats.dedup_by_url = dd.by_url;
    stats.kept = kept.len();

    counter!("pipeline_rows_total").increment(stats.rows_in as u64);
    counter!("pipeline_dropped_timestamp_total").increment(stats.dropped_timestamps as u64);
    counter!("pipeline_dedup_key_total").increment(stats.dedup_by_key as u64);
    counter!("pipeline_dedup_url_total").increment(stats.dedup_by_url as u64);
    counter!("pipeline_kept_total").increment(stats.kept as u64);

    tracing::info!(
        rows_in = stats.rows_in,
        dropped_timestamps = stats.dropped_timestamps,
        dedup_by_key = stats.dedup_by_key,
        dedup_by_url = stats.dedup_by_url,
        kept = stats.kept,
        "normalize + dedup finished"
    );

    (kept, stats)
}
