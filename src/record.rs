// src/record.rs
//! Canonical record types for the pipeline.
//!
//! `Post` is the nine-field canonical record every stage consumes and emits.
//! `AnnotatedPost` and `ScoredPost` are layered on top as pure transformations;
//! the underlying `Post` fields are never mutated once the deduplicator has
//! produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed textual timestamp form used in all persisted outputs:
/// `YYYY-MM-DDTHH:MM:SSZ` (UTC, second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Serde adapter pinning `created_at` to the fixed textual form.
pub mod utc_second {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, TIMESTAMP_FORMAT) {
            return Ok(naive.and_utc());
        }
        // Tolerate full RFC3339 on the way in; output is always re-pinned.
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// One normalized post/comment. Unique per (platform, post_id) after dedup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub platform: String,
    pub post_id: String,
    pub author: String,
    #[serde(with = "utc_second")]
    pub created_at: DateTime<Utc>,
    pub content: String,
    pub like_count: u64,
    pub reply_count: u64,
    pub share_count: u64,
    pub url: String,
}

impl Post {
    /// Primary dedup key.
    pub fn key(&self) -> (&str, &str) {
        (self.platform.as_str(), self.post_id.as_str())
    }
}

/// Sentiment vector supplied by an external annotator.
/// Components are in [0,1]; compound in [-1,1]. Malformed values are coerced
/// to 0 on construction so the scoring engine stays total.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sentiment {
    pub pos: f32,
    pub neu: f32,
    pub neg: f32,
    pub compound: f32,
}

impl Sentiment {
    pub fn new(pos: f32, neu: f32, neg: f32, compound: f32) -> Self {
        Self {
            pos: clamp01(finite(pos)),
            neu: clamp01(finite(neu)),
            neg: clamp01(finite(neg)),
            compound: finite(compound).clamp(-1.0, 1.0),
        }
    }

    /// Re-apply the construction clamps (for values that arrived via serde).
    pub fn sanitized(self) -> Self {
        Self::new(self.pos, self.neu, self.neg, self.compound)
    }
}

/// Labels in the fixed order used by annotators and rollups.
pub const EMOTION_KEYS: [&str; 6] = ["anger", "sadness", "joy", "fear", "surprise", "disgust"];

/// Six named emotion intensities in [0,1]. Annotators normalize them to sum
/// to 1 when any lexicon term matched, else all zero; the core only relies on
/// the per-component range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Emotions {
    pub anger: f32,
    pub sadness: f32,
    pub joy: f32,
    pub fear: f32,
    pub surprise: f32,
    pub disgust: f32,
}

impl Emotions {
    pub fn new(anger: f32, sadness: f32, joy: f32, fear: f32, surprise: f32, disgust: f32) -> Self {
        Self {
            anger: clamp01(finite(anger)),
            sadness: clamp01(finite(sadness)),
            joy: clamp01(finite(joy)),
            fear: clamp01(finite(fear)),
            surprise: clamp01(finite(surprise)),
            disgust: clamp01(finite(disgust)),
        }
    }

    pub fn sanitized(self) -> Self {
        Self::new(
            self.anger,
            self.sadness,
            self.joy,
            self.fear,
            self.surprise,
            self.disgust,
        )
    }

    fn values(&self) -> [f32; 6] {
        [
            self.anger,
            self.sadness,
            self.joy,
            self.fear,
            self.surprise,
            self.disgust,
        ]
    }

    /// Label of the strongest emotion; `"none"` when all six are zero.
    /// Ties resolve to the first label in `EMOTION_KEYS` order.
    pub fn dominant(&self) -> &'static str {
        let vals = self.values();
        if vals.iter().all(|&v| v == 0.0) {
            return "none";
        }
        let mut best = 0usize;
        for (i, &v) in vals.iter().enumerate() {
            if v > vals[best] {
                best = i;
            }
        }
        EMOTION_KEYS[best]
    }
}

/// A post plus its externally supplied annotation vectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedPost {
    pub post: Post,
    pub sentiment: Sentiment,
    pub emotions: Emotions,
}

/// An annotated post plus its heuristic suspicion score in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPost {
    pub annotated: AnnotatedPost,
    pub misinfo_score: f32,
}

impl ScoredPost {
    pub fn post(&self) -> &Post {
        &self.annotated.post
    }

    /// Query-time flag; the threshold is caller-supplied and never persisted.
    pub fn suspected(&self, threshold: f32) -> bool {
        self.misinfo_score >= threshold
    }
}

/// Clamp to [0.0, 1.0].
pub fn clamp01(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

fn finite(x: f32) -> f32 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post() -> Post {
        Post {
            platform: "reddit".into(),
            post_id: "abc".into(),
            author: "u1".into(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 14, 10, 30, 0).unwrap(),
            content: "hello".into(),
            like_count: 3,
            reply_count: 1,
            share_count: 0,
            url: "https://reddit.com/r/x/abc".into(),
        }
    }

    #[test]
    fn created_at_serializes_in_fixed_form() {
        let v = serde_json::to_value(post()).unwrap();
        assert_eq!(v["created_at"], serde_json::json!("2025-06-14T10:30:00Z"));
    }

    #[test]
    fn created_at_roundtrips_and_accepts_offsets() {
        let p: Post = serde_json::from_value(serde_json::to_value(post()).unwrap()).unwrap();
        assert_eq!(p, post());

        let mut v = serde_json::to_value(post()).unwrap();
        v["created_at"] = serde_json::json!("2025-06-14T16:00:00+05:30");
        let p: Post = serde_json::from_value(v).unwrap();
        assert_eq!(
            p.created_at,
            Utc.with_ymd_and_hms(2025, 6, 14, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn sentiment_coerces_malformed_values() {
        let s = Sentiment::new(f32::NAN, 1.7, -0.3, -2.0);
        assert_eq!(s.pos, 0.0);
        assert_eq!(s.neu, 1.0);
        assert_eq!(s.neg, 0.0);
        assert_eq!(s.compound, -1.0);
    }

    #[test]
    fn dominant_emotion_picks_max_or_none() {
        assert_eq!(Emotions::default().dominant(), "none");
        let e = Emotions::new(0.1, 0.0, 0.0, 0.6, 0.2, 0.1);
        assert_eq!(e.dominant(), "fear");
        // Ties resolve to the first key in order.
        let tie = Emotions::new(0.5, 0.0, 0.0, 0.5, 0.0, 0.0);
        assert_eq!(tie.dominant(), "anger");
    }

    #[test]
    fn suspected_is_threshold_derived() {
        let sp = ScoredPost {
            annotated: AnnotatedPost {
                post: post(),
                sentiment: Sentiment::default(),
                emotions: Emotions::default(),
            },
            misinfo_score: 0.61,
        };
        assert!(sp.suspected(0.6));
        assert!(!sp.suspected(0.62));
    }
}
