// src/snapshot.rs
//! Flat tabular snapshots: raw CSV tables in, the four output CSVs out.
//!
//! The core itself never persists anything; these helpers are the seam the
//! orchestration layer uses. Empty tables are written with the full header
//! row so downstream consumers need no shape checks, and timestamps always
//! use the fixed `YYYY-MM-DDTHH:MM:SSZ` form.

use crate::aggregate::{DailyEmotions, DailyEngagement};
use crate::ingest::raw::{RawRow, RawTable, CANONICAL_COLUMNS};
use crate::record::{Post, ScoredPost, TIMESTAMP_FORMAT};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::path::Path;

/// Read one raw source table. Every cell arrives as a string value; the
/// normalizer does all coercion, so unknown extra columns ride along
/// harmlessly.
pub fn read_raw_table<P: AsRef<Path>>(path: P) -> Result<RawTable> {
    let file = File::open(&path)
        .with_context(|| format!("opening source table {:?}", path.as_ref()))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader
        .headers()
        .context("reading source table headers")?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("reading source table row")?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

/// Snapshot (1): full normalized/deduplicated records.
pub fn write_posts_csv<P: AsRef<Path>>(path: P, posts: &[Post]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating snapshot {:?}", path.as_ref()))?;
    let mut writer = csv::Writer::from_writer(file);
    if posts.is_empty() {
        writer.write_record(CANONICAL_COLUMNS)?;
    }
    for post in posts {
        writer.serialize(post)?;
    }
    writer.flush()?;
    Ok(())
}

/// Flat row shape for snapshot (2).
#[derive(Debug, Serialize)]
struct ScoredRow<'a> {
    platform: &'a str,
    post_id: &'a str,
    author: &'a str,
    created_at: String,
    content: &'a str,
    like_count: u64,
    reply_count: u64,
    share_count: u64,
    url: &'a str,
    sentiment_pos: f32,
    sentiment_neu: f32,
    sentiment_neg: f32,
    sentiment_compound: f32,
    anger: f32,
    sadness: f32,
    joy: f32,
    fear: f32,
    surprise: f32,
    disgust: f32,
    dominant_emotion: &'static str,
    misinfo_score: f32,
}

impl<'a> From<&'a ScoredPost> for ScoredRow<'a> {
    fn from(sp: &'a ScoredPost) -> Self {
        let a = &sp.annotated;
        let p = &a.post;
        Self {
            platform: &p.platform,
            post_id: &p.post_id,
            author: &p.author,
            created_at: p.created_at.format(TIMESTAMP_FORMAT).to_string(),
            content: &p.content,
            like_count: p.like_count,
            reply_count: p.reply_count,
            share_count: p.share_count,
            url: &p.url,
            sentiment_pos: a.sentiment.pos,
            sentiment_neu: a.sentiment.neu,
            sentiment_neg: a.sentiment.neg,
            sentiment_compound: a.sentiment.compound,
            anger: a.emotions.anger,
            sadness: a.emotions.sadness,
            joy: a.emotions.joy,
            fear: a.emotions.fear,
            surprise: a.emotions.surprise,
            disgust: a.emotions.disgust,
            dominant_emotion: a.emotions.dominant(),
            misinfo_score: sp.misinfo_score,
        }
    }
}

const SCORED_COLUMNS: [&str; 21] = [
    "platform",
    "post_id",
    "author",
    "created_at",
    "content",
    "like_count",
    "reply_count",
    "share_count",
    "url",
    "sentiment_pos",
    "sentiment_neu",
    "sentiment_neg",
    "sentiment_compound",
    "anger",
    "sadness",
    "joy",
    "fear",
    "surprise",
    "disgust",
    "dominant_emotion",
    "misinfo_score",
];

/// Snapshot (2): records plus sentiment, emotions, dominant emotion, and
/// misinfo_score. The suspected flag is query-time only and never written.
pub fn write_scored_csv<P: AsRef<Path>>(path: P, records: &[ScoredPost]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating snapshot {:?}", path.as_ref()))?;
    let mut writer = csv::Writer::from_writer(file);
    if records.is_empty() {
        writer.write_record(SCORED_COLUMNS)?;
    }
    for record in records {
        writer.serialize(ScoredRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

const DAILY_COLUMNS: [&str; 9] = [
    "date",
    "posts",
    "likes",
    "replies",
    "shares",
    "sentiment_pos",
    "sentiment_neu",
    "sentiment_neg",
    "sentiment_compound",
];

/// Snapshot (3): daily engagement/sentiment rollup keyed by calendar date.
pub fn write_daily_csv<P: AsRef<Path>>(path: P, rows: &[DailyEngagement]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating snapshot {:?}", path.as_ref()))?;
    let mut writer = csv::Writer::from_writer(file);
    if rows.is_empty() {
        writer.write_record(DAILY_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

const DAILY_EMOTION_COLUMNS: [&str; 7] = [
    "date", "anger", "sadness", "joy", "fear", "surprise", "disgust",
];

/// Snapshot (4): daily per-emotion-mean rollup keyed by calendar date.
pub fn write_daily_emotions_csv<P: AsRef<Path>>(path: P, rows: &[DailyEmotions]) -> Result<()> {
    let file = File::create(&path)
        .with_context(|| format!("creating snapshot {:?}", path.as_ref()))?;
    let mut writer = csv::Writer::from_writer(file);
    if rows.is_empty() {
        writer.write_record(DAILY_EMOTION_COLUMNS)?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
