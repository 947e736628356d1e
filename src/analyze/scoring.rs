//! Heuristic suspicion scoring with guardrails.
//!
//! One pure per-row computation produces both the scalar `misinfo_score` and
//! the structured breakdown; there is no second code path for "explain", so
//! the two can never drift apart.

use crate::analyze::features;
use crate::analyze::rules::CompiledRules;
use crate::analyze::weights::ScoreWeights;
use crate::record::{clamp01, AnnotatedPost};
use serde::Serialize;

/// Every named sub-term of the score, for audit/UI consumption.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub lexicon_hit_rate: f32,
    pub caps_ratio: f32,
    pub punctuation_intensity: f32,
    pub emoji_density: f32,
    pub style_gate: f32,
    pub emotion_mix: f32,
    pub sentiment_extremity: f32,
    pub low_neutrality_boost: f32,
    pub domain_adjustment: f32,
    pub debunk_signal: f32,
    pub misinfo_score: f32,
}

/// Score one annotated post. Total over its declared input domain: annotation
/// vectors are pre-clamped on construction and every text signal treats empty
/// content as its zero value.
pub fn score_breakdown(
    annotated: &AnnotatedPost,
    rules: &CompiledRules,
    w: &ScoreWeights,
) -> ScoreBreakdown {
    let text = annotated.post.content.as_str();
    let sentiment = annotated.sentiment.sanitized();
    let emotions = annotated.emotions.sanitized();

    // Stylistic signals.
    let lexicon_hit_rate = features::lexicon_hit_rate(text, rules);
    let caps_ratio = features::caps_ratio(text);
    let punctuation_intensity = features::punctuation_intensity(text);
    let emoji_density = features::emoji_density(text, rules);

    // Style gate: a single noisy signal (one exclamation mark, say) must not
    // dominate the score.
    let active = [
        lexicon_hit_rate > 0.0,
        caps_ratio > w.caps_gate,
        punctuation_intensity > w.punct_gate,
        emoji_density > 0.0,
    ]
    .iter()
    .filter(|&&on| on)
    .count();
    let style_gate = if active >= w.min_active_signals {
        1.0
    } else {
        w.inactive_gate
    };

    // Emotion mix: anger/fear/surprise/disgust up, joy down.
    let emotion_mix = clamp01(
        w.w_anger * emotions.anger
            + w.w_fear * emotions.fear
            + w.w_surprise * emotions.surprise
            + w.w_disgust * emotions.disgust
            - w.w_joy * emotions.joy,
    );

    // Strongly positive or strongly negative sentiment is more suspect than
    // neutral, and mostly-non-neutral posts get a small boost.
    let sentiment_extremity = clamp01(sentiment.compound.abs());
    let low_neutrality_boost = (0.5 - sentiment.neu).max(0.0) * 2.0;

    let domain_adjustment = features::domain_adjustment(&annotated.post.url, rules);
    let debunk_signal = features::debunk_signal(text, rules);

    let misinfo_score = clamp01(
        w.w_lexicon * lexicon_hit_rate
            + style_gate
                * (w.w_caps * caps_ratio
                    + w.w_punct * punctuation_intensity
                    + w.w_emoji * emoji_density)
            + w.w_emotion * emotion_mix
            + w.w_extremity * sentiment_extremity
            + w.w_low_neutral * low_neutrality_boost
            + domain_adjustment
            - w.w_debunk * debunk_signal,
    );

    ScoreBreakdown {
        lexicon_hit_rate,
        caps_ratio,
        punctuation_intensity,
        emoji_density,
        style_gate,
        emotion_mix,
        sentiment_extremity,
        low_neutrality_boost,
        domain_adjustment,
        debunk_signal,
        misinfo_score,
    }
}
