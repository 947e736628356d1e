//! Stylistic/lexical feature extraction over `content` and `url`.
//!
//! Every function here is pure, total, and independent of row order: empty
//! text is its zero value and nothing panics. Each returns a value in [0,1],
//! except `domain_adjustment` which is a small signed nudge.

use crate::analyze::rules::CompiledRules;
use once_cell::sync::Lazy;
use regex::Regex;

/// Suspicion nudge for a host on the low-credibility list.
pub const LOW_CRED_ADJUSTMENT: f32 = 0.08;
/// Suspicion nudge for a host on the mainstream list.
pub const MAINSTREAM_ADJUSTMENT: f32 = -0.06;

/// Fixed normalizer for the damped punctuation combination.
const PUNCT_NORMALIZER: f32 = 5.0;
/// Emoji count that saturates `emoji_density`.
const EMOJI_SATURATION: f32 = 3.0;
/// Hit count that saturates `lexicon_hit_rate`.
const LEXICON_SATURATION: f32 = 4.0;

static RE_URL_HOST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://([^/\s]+)").expect("url host regex"));

/// Fraction of alphabetic characters that are uppercase; 0 without letters.
pub fn caps_ratio(text: &str) -> f32 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            letters += 1;
            if c.is_uppercase() {
                upper += 1;
            }
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f32 / letters as f32
    }
}

/// Logarithmically damped `!` / `?` / `...` intensity, capped at 1.0.
/// Question marks weigh 0.8x and ellipses 0.5x of exclamations, so repeated
/// punctuation has diminishing marginal effect.
pub fn punctuation_intensity(text: &str) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let exclam = text.matches('!').count() as f32;
    let quest = text.matches('?').count() as f32;
    let dots = text.matches("...").count() as f32;
    let raw = (exclam.ln_1p() + 0.8 * quest.ln_1p() + 0.5 * dots.ln_1p()) / PUNCT_NORMALIZER;
    raw.min(1.0)
}

/// Alarm-emoji occurrences divided by 3, capped at 1.0.
pub fn emoji_density(text: &str, rules: &CompiledRules) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    (rules.alarm_emoji_count(text) as f32 / EMOJI_SATURATION).min(1.0)
}

/// Combined rumor + sensationalism + alarm-emoji hits divided by 4, capped
/// at 1.0. Term matching is case-insensitive and word-boundary-aware.
pub fn lexicon_hit_rate(text: &str, rules: &CompiledRules) -> f32 {
    if text.is_empty() {
        return 0.0;
    }
    let hits = rules.rumor.find_iter(text).count()
        + rules.sensational.find_iter(text).count()
        + rules.alarm_emoji_count(text);
    (hits as f32 / LEXICON_SATURATION).min(1.0)
}

/// 1 when the content carries fact-checking/clarification vocabulary, else 0.
/// Used downstream as a suspicion dampener.
pub fn debunk_signal(text: &str, rules: &CompiledRules) -> f32 {
    if !text.is_empty() && rules.debunk.is_match(text) {
        1.0
    } else {
        0.0
    }
}

/// Signed nudge from the credibility lists for the host of the first URL in
/// the `url` field: low-credibility hosts upweight suspicion, mainstream
/// hosts downweight it, unknown hosts contribute nothing.
pub fn domain_adjustment(url: &str, rules: &CompiledRules) -> f32 {
    let host = match RE_URL_HOST.captures(url).and_then(|c| c.get(1)) {
        Some(m) => m.as_str().to_ascii_lowercase(),
        None => return 0.0,
    };
    if rules.is_low_cred_host(&host) {
        LOW_CRED_ADJUSTMENT
    } else if rules.is_mainstream_host(&host) {
        MAINSTREAM_ADJUSTMENT
    } else {
        0.0
    }
}
