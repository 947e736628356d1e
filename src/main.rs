//! Misinfo Profiler batch entrypoint.
//! Reads raw per-source CSV tables, runs normalize → dedup → annotate →
//! score → aggregate, and writes the four flat snapshots. Network fetchers
//! and the dashboard live outside this binary; it only consumes their
//! tables and annotation vectors.
//!
//! Usage: `misinfo-profiler [data_dir] [out_dir]` (both default to `data`).
//! Env: MISINFO_ANNOTATIONS_PATH, MISINFO_RULES_PATH, MISINFO_WEIGHTS_PATH,
//! MISINFO_THRESHOLD, MISINFO_DEV_LOG, RUST_LOG.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use misinfo_profiler::aggregate::{aggregate_daily, aggregate_emotions_daily};
use misinfo_profiler::analyze::score_posts_default;
use misinfo_profiler::annotate::{annotate_posts, NullAnnotator, TableAnnotator};
use misinfo_profiler::ingest::normalize_and_deduplicate;
use misinfo_profiler::snapshot;

const ENV_ANNOTATIONS_PATH: &str = "MISINFO_ANNOTATIONS_PATH";
const ENV_THRESHOLD: &str = "MISINFO_THRESHOLD";
const DEFAULT_THRESHOLD: f32 = 0.60;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

/// All `*.csv` source tables in the data directory, skipping our own outputs.
fn source_table_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    const OUTPUTS: [&str; 4] = [
        "combined.csv",
        "combined_with_emotions.csv",
        "daily.csv",
        "daily_emotions.csv",
    ];
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading data directory {}", dir.display()))?
    {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if path.extension().and_then(|e| e.to_str()) == Some("csv")
            && !OUTPUTS.contains(&name)
        {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op elsewhere.
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".into()));
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| data_dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    // ---- Source tables ----
    let paths = source_table_paths(&data_dir)?;
    if paths.is_empty() {
        warn!(dir = %data_dir.display(), "no source tables found; nothing to write");
        return Ok(());
    }
    let mut tables = Vec::with_capacity(paths.len());
    for path in &paths {
        let table = snapshot::read_raw_table(path)?;
        info!(table = %path.display(), rows = table.len(), "loaded source table");
        tables.push(table);
    }

    // ---- Normalize + dedup ----
    let (posts, stats) = normalize_and_deduplicate(&tables);
    info!(
        kept = stats.kept,
        dropped_timestamps = stats.dropped_timestamps,
        dedup_by_key = stats.dedup_by_key,
        dedup_by_url = stats.dedup_by_url,
        "combined dataset ready"
    );
    snapshot::write_posts_csv(out_dir.join("combined.csv"), &posts)?;

    // ---- Annotate (external vectors; zeros when none are supplied) ----
    let annotated = match std::env::var(ENV_ANNOTATIONS_PATH) {
        Ok(p) => {
            let table = TableAnnotator::from_csv_path(&p)
                .with_context(|| format!("loading annotations from {p}"))?;
            info!(entries = table.len(), "annotation table loaded");
            annotate_posts(posts, &table)
        }
        Err(_) => {
            warn!("{ENV_ANNOTATIONS_PATH} not set; sentiment/emotion vectors default to zero");
            annotate_posts(posts, &NullAnnotator)
        }
    };

    // ---- Score (rule tables and weights from config/, env-overridable) ----
    let scored = score_posts_default(annotated);

    let threshold = std::env::var(ENV_THRESHOLD)
        .ok()
        .and_then(|s| s.trim().parse::<f32>().ok())
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(DEFAULT_THRESHOLD);
    let suspected = scored.iter().filter(|s| s.suspected(threshold)).count();
    info!(
        total = scored.len(),
        suspected,
        threshold,
        "scoring finished"
    );
    snapshot::write_scored_csv(out_dir.join("combined_with_emotions.csv"), &scored)?;

    // ---- Daily rollups ----
    snapshot::write_daily_csv(out_dir.join("daily.csv"), &aggregate_daily(&scored))?;
    snapshot::write_daily_emotions_csv(
        out_dir.join("daily_emotions.csv"),
        &aggregate_emotions_daily(&scored),
    )?;

    for name in [
        "combined.csv",
        "combined_with_emotions.csv",
        "daily.csv",
        "daily_emotions.csv",
    ] {
        info!(snapshot = %out_dir.join(name).display(), "wrote");
    }
    Ok(())
}
