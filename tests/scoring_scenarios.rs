// tests/scoring_scenarios.rs
//! End-to-end scoring behavior on representative posts.

use chrono::{TimeZone, Utc};
use misinfo_profiler::analyze::{explain_post, score_posts, RuleSet, ScoreWeights};
use misinfo_profiler::record::{AnnotatedPost, Emotions, Post, Sentiment};

fn annotated(content: &str, url: &str, sentiment: Sentiment, emotions: Emotions) -> AnnotatedPost {
    AnnotatedPost {
        post: Post {
            platform: "x".into(),
            post_id: "1".into(),
            author: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 14, 0, 0, 0).unwrap(),
            content: content.into(),
            like_count: 0,
            reply_count: 0,
            share_count: 0,
            url: url.into(),
        },
        sentiment,
        emotions,
    }
}

fn neutral() -> Sentiment {
    Sentiment::new(0.0, 1.0, 0.0, 0.0)
}

#[test]
fn alarmist_rumor_post_scores_high() {
    let rules = RuleSet::default_seed().compile();
    let w = ScoreWeights::default();
    let a = annotated(
        "BREAKING!!! This hoax is EXPOSED!!! share before they delete 🚨🚨🚨",
        "",
        Sentiment::new(0.05, 0.0, 0.95, -0.9),
        Emotions::new(0.5, 0.0, 0.0, 0.3, 0.2, 0.0),
    );
    let b = explain_post(&a, &rules, &w);
    // All four stylistic signals clear their activation thresholds, so the
    // gate must not damp the style terms.
    assert!(b.lexicon_hit_rate > 0.0);
    assert!(b.caps_ratio > w.caps_gate);
    assert!(b.punctuation_intensity > w.punct_gate);
    assert!(b.emoji_density > 0.0);
    assert_eq!(b.style_gate, 1.0);
    assert!(b.misinfo_score > 0.6, "got {}", b.misinfo_score);
    assert!(b.misinfo_score <= 1.0);

    let scored = score_posts(vec![a], &rules, &w);
    assert!(scored[0].suspected(0.6));
}

#[test]
fn plain_factual_post_scores_low() {
    let rules = RuleSet::default_seed().compile();
    let w = ScoreWeights::default();
    let a = annotated(
        "Officials confirmed the update this morning.",
        "",
        neutral(),
        Emotions::default(),
    );
    let b = explain_post(&a, &rules, &w);
    assert!(b.misinfo_score < 0.2, "got {}", b.misinfo_score);

    let scored = score_posts(vec![a], &rules, &w);
    assert!(!scored[0].suspected(0.6));
}

#[test]
fn debunk_vocabulary_strictly_lowers_the_score() {
    let w = ScoreWeights::default();
    let with_debunk = RuleSet::default_seed().compile();
    let mut no_debunk_seed = RuleSet::default_seed();
    no_debunk_seed.debunk_terms = Vec::new();
    let no_debunk = no_debunk_seed.compile();

    let a = annotated(
        "This rumor is spreading fast!!! clarification coming 🚨🚨",
        "",
        neutral(),
        Emotions::default(),
    );
    let damped = explain_post(&a, &with_debunk, &w);
    let raw = explain_post(&a, &no_debunk, &w);

    assert_eq!(damped.debunk_signal, 1.0);
    assert_eq!(raw.debunk_signal, 0.0);
    // Far enough from the lower clamp that the dampener is fully visible.
    assert!(raw.misinfo_score > 0.1);
    assert!(damped.misinfo_score < raw.misinfo_score);
    assert!((raw.misinfo_score - damped.misinfo_score - w.w_debunk).abs() < 1e-5);
}

#[test]
fn domain_lists_nudge_in_both_directions() {
    let mut seed = RuleSet::default_seed();
    seed.low_cred_domains = vec!["badsite.example".into()];
    let rules = seed.compile();
    let w = ScoreWeights::default();

    let content = "unverified claim going viral!!!";
    let unknown = explain_post(
        &annotated(content, "https://somewhere.net/p/1", neutral(), Emotions::default()),
        &rules,
        &w,
    );
    let mainstream = explain_post(
        &annotated(content, "https://www.reuters.com/article", neutral(), Emotions::default()),
        &rules,
        &w,
    );
    let low_cred = explain_post(
        &annotated(content, "https://badsite.example/p/1", neutral(), Emotions::default()),
        &rules,
        &w,
    );

    assert_eq!(unknown.domain_adjustment, 0.0);
    assert!(mainstream.misinfo_score < unknown.misinfo_score);
    assert!(low_cred.misinfo_score > unknown.misinfo_score);
}

#[test]
fn empty_content_scores_zero_without_a_domain_signal() {
    let rules = RuleSet::default_seed().compile();
    let w = ScoreWeights::default();
    let b = explain_post(&annotated("", "", neutral(), Emotions::default()), &rules, &w);
    assert_eq!(b.misinfo_score, 0.0);
}
