// src/analyze/mod.rs
//! Scoring pipeline entry: features + rules + weights → scored records.

pub mod features;
pub mod rules;
pub mod scoring;
pub mod weights;

use crate::record::{AnnotatedPost, ScoredPost};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::info;

// Re-export convenient types.
pub use crate::analyze::rules::{CompiledRules, HotReloadRules, RuleSet};
pub use crate::analyze::scoring::{score_breakdown, ScoreBreakdown};
pub use crate::analyze::weights::{HotReloadWeights, ScoreWeights};

/// Global hot-reloaded configs. Env path overrides are captured once, on
/// first use.
static HOT_RULES: OnceLock<HotReloadRules> = OnceLock::new();
static HOT_WEIGHTS: OnceLock<HotReloadWeights> = OnceLock::new();

fn hot_rules() -> &'static HotReloadRules {
    HOT_RULES.get_or_init(|| {
        let path = std::env::var(rules::ENV_RULES_PATH).ok().map(PathBuf::from);
        HotReloadRules::new(path.as_deref())
    })
}

fn hot_weights() -> &'static HotReloadWeights {
    HOT_WEIGHTS.get_or_init(|| {
        let path = std::env::var(weights::ENV_WEIGHTS_PATH)
            .ok()
            .map(PathBuf::from);
        HotReloadWeights::new(path.as_deref())
    })
}

/// Score a batch with explicit rules and weights. Pure per row: evaluation
/// order never changes a result, and permuting the input permutes the output.
pub fn score_posts(
    posts: Vec<AnnotatedPost>,
    rules: &CompiledRules,
    w: &ScoreWeights,
) -> Vec<ScoredPost> {
    posts
        .into_iter()
        .map(|annotated| {
            let breakdown = score_breakdown(&annotated, rules, w);
            dev_log_score(&annotated.post.content, breakdown.misinfo_score);
            ScoredPost {
                annotated,
                misinfo_score: breakdown.misinfo_score,
            }
        })
        .collect()
}

/// Audit breakdown for one record, derived from the same computation as the
/// scalar score.
pub fn explain_post(
    annotated: &AnnotatedPost,
    rules: &CompiledRules,
    w: &ScoreWeights,
) -> ScoreBreakdown {
    score_breakdown(annotated, rules, w)
}

/// `score_posts` against the hot-reloaded `config/` rule and weight tables.
pub fn score_posts_default(posts: Vec<AnnotatedPost>) -> Vec<ScoredPost> {
    let rules = hot_rules().current();
    let w = hot_weights().current();
    score_posts(posts, &rules, &w)
}

/// `explain_post` against the hot-reloaded `config/` rule and weight tables.
pub fn explain_post_default(annotated: &AnnotatedPost) -> ScoreBreakdown {
    let rules = hot_rules().current();
    let w = hot_weights().current();
    explain_post(annotated, &rules, &w)
}

// Dev logging gate: MISINFO_DEV_LOG=1 AND a dev build.
fn dev_logging_enabled() -> bool {
    cfg!(debug_assertions) && std::env::var("MISINFO_DEV_LOG").ok().as_deref() == Some("1")
}

/// Short anonymized id for a piece of content. Raw text is never logged.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn dev_log_score(text: &str, score: f32) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(text);
    info!(target: "scoring", %id, %score, "scored");
}
