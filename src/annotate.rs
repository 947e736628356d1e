// src/annotate.rs
//! Seam for the external sentiment/emotion annotators.
//!
//! The core never computes sentiment or emotion itself; it consumes a pure
//! `content → (4 sentiment floats, 6 emotion floats)` function with the value
//! ranges documented on `Sentiment` and `Emotions`. Whatever the annotator
//! returns is sanitized before scoring so the engine stays total.

use crate::record::{AnnotatedPost, Emotions, Post, Sentiment};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Per-post annotation vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Annotation {
    pub sentiment: Sentiment,
    pub emotions: Emotions,
}

/// Fixed contract of the external annotators.
pub trait Annotator {
    fn annotate(&self, content: &str) -> Annotation;
}

/// Layer annotations over posts. Pure per-row; row order is preserved and
/// the underlying `Post` fields are untouched.
pub fn annotate_posts<A: Annotator>(posts: Vec<Post>, annotator: &A) -> Vec<AnnotatedPost> {
    posts
        .into_iter()
        .map(|post| {
            let a = annotator.annotate(&post.content);
            AnnotatedPost {
                post,
                sentiment: a.sentiment.sanitized(),
                emotions: a.emotions.sanitized(),
            }
        })
        .collect()
}

/// All-zero annotator for dry runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnnotator;

impl Annotator for NullAnnotator {
    fn annotate(&self, _content: &str) -> Annotation {
        Annotation::default()
    }
}

#[derive(Debug, Deserialize)]
struct AnnotationRow {
    content: String,
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
}

/// Content-keyed lookup over vectors produced out of process (the VADER/NRC
/// annotators run elsewhere and hand us a flat table). Unknown content maps
/// to zeros, matching the "no lexicon term matched" convention.
#[derive(Debug, Clone, Default)]
pub struct TableAnnotator {
    by_content: HashMap<String, Annotation>,
}

impl TableAnnotator {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)
            .with_context(|| format!("opening annotations table {:?}", path.as_ref()))?;
        let mut reader = csv::Reader::from_reader(file);
        let mut by_content = HashMap::new();
        for row in reader.deserialize() {
            let row: AnnotationRow = row.context("parsing annotation row")?;
            by_content.insert(
                row.content,
                Annotation {
                    sentiment: Sentiment::new(
                        row.sentiment_pos,
                        row.sentiment_neu,
                        row.sentiment_neg,
                        row.sentiment_compound,
                    ),
                    emotions: Emotions::new(
                        row.anger,
                        row.sadness,
                        row.joy,
                        row.fear,
                        row.surprise,
                        row.disgust,
                    ),
                },
            );
        }
        Ok(Self { by_content })
    }

    pub fn len(&self) -> usize {
        self.by_content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_content.is_empty()
    }
}

impl Annotator for TableAnnotator {
    fn annotate(&self, content: &str) -> Annotation {
        self.by_content.get(content).copied().unwrap_or_default()
    }
}
