// src/aggregate.rs
//! Daily rollups over annotated/scored record sets.
//!
//! Buckets are UTC calendar days derived only from observed `created_at`
//! values: days with no posts are simply absent, never emitted as zeros.
//! Empty input degrades to an empty table whose column set is fixed by the
//! row structs (snapshots still write full headers, see `snapshot`).

use crate::record::{AnnotatedPost, ScoredPost};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

impl AsRef<AnnotatedPost> for AnnotatedPost {
    fn as_ref(&self) -> &AnnotatedPost {
        self
    }
}

impl AsRef<AnnotatedPost> for ScoredPost {
    fn as_ref(&self) -> &AnnotatedPost {
        &self.annotated
    }
}

/// One day of post counts, engagement sums, and sentiment means.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEngagement {
    pub date: NaiveDate,
    pub posts: u64,
    pub likes: u64,
    pub replies: u64,
    pub shares: u64,
    pub sentiment_pos: f32,
    pub sentiment_neu: f32,
    pub sentiment_neg: f32,
    pub sentiment_compound: f32,
}

/// One day of mean emotion intensities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEmotions {
    pub date: NaiveDate,
    pub anger: f32,
    pub sadness: f32,
    pub joy: f32,
    pub fear: f32,
    pub surprise: f32,
    pub disgust: f32,
}

#[derive(Default)]
struct EngagementAcc {
    posts: u64,
    likes: u64,
    replies: u64,
    shares: u64,
    pos: f64,
    neu: f64,
    neg: f64,
    compound: f64,
}

#[derive(Default)]
struct EmotionAcc {
    posts: u64,
    anger: f64,
    sadness: f64,
    joy: f64,
    fear: f64,
    surprise: f64,
    disgust: f64,
}

/// Daily post count, engagement sums, and arithmetic sentiment means,
/// ascending by date.
pub fn aggregate_daily<T: AsRef<AnnotatedPost>>(records: &[T]) -> Vec<DailyEngagement> {
    let mut days: BTreeMap<NaiveDate, EngagementAcc> = BTreeMap::new();
    for rec in records {
        let r = rec.as_ref();
        let acc = days.entry(r.post.created_at.date_naive()).or_default();
        acc.posts += 1;
        acc.likes += r.post.like_count;
        acc.replies += r.post.reply_count;
        acc.shares += r.post.share_count;
        acc.pos += r.sentiment.pos as f64;
        acc.neu += r.sentiment.neu as f64;
        acc.neg += r.sentiment.neg as f64;
        acc.compound += r.sentiment.compound as f64;
    }

    days.into_iter()
        .map(|(date, acc)| {
            let n = acc.posts as f64;
            DailyEngagement {
                date,
                posts: acc.posts,
                likes: acc.likes,
                replies: acc.replies,
                shares: acc.shares,
                sentiment_pos: (acc.pos / n) as f32,
                sentiment_neu: (acc.neu / n) as f32,
                sentiment_neg: (acc.neg / n) as f32,
                sentiment_compound: (acc.compound / n) as f32,
            }
        })
        .collect()
}

/// Daily mean emotion intensities, ascending by date.
pub fn aggregate_emotions_daily<T: AsRef<AnnotatedPost>>(records: &[T]) -> Vec<DailyEmotions> {
    let mut days: BTreeMap<NaiveDate, EmotionAcc> = BTreeMap::new();
    for rec in records {
        let r = rec.as_ref();
        let acc = days.entry(r.post.created_at.date_naive()).or_default();
        acc.posts += 1;
        acc.anger += r.emotions.anger as f64;
        acc.sadness += r.emotions.sadness as f64;
        acc.joy += r.emotions.joy as f64;
        acc.fear += r.emotions.fear as f64;
        acc.surprise += r.emotions.surprise as f64;
        acc.disgust += r.emotions.disgust as f64;
    }

    days.into_iter()
        .map(|(date, acc)| {
            let n = acc.posts as f64;
            DailyEmotions {
                date,
                anger: (acc.anger / n) as f32,
                sadness: (acc.sadness / n) as f32,
                joy: (acc.joy / n) as f32,
                fear: (acc.fear / n) as f32,
                surprise: (acc.surprise / n) as f32,
                disgust: (acc.disgust / n) as f32,
            }
        })
        .collect()
}
