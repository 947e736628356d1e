// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod annotate;
pub mod ingest;
pub mod record;
pub mod snapshot;

// Scoring pipeline (features, rules, weights, scoring)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{aggregate_daily, aggregate_emotions_daily};
pub use crate::analyze::{explain_post, score_posts, ScoreBreakdown, ScoreWeights};
pub use crate::annotate::{annotate_posts, Annotation, Annotator};
pub use crate::ingest::{normalize_and_deduplicate, IngestStats};
pub use crate::record::{AnnotatedPost, Emotions, Post, ScoredPost, Sentiment};
