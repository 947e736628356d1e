// src/ingest/dedup.rs
//! Deduplicator: keep-first resolution across the combined normalized tables.
//!
//! Two strictly sequential passes over rows sorted ascending by `created_at`:
//! 1. primary keep-first by (platform, post_id): the earliest observation
//!    of a post is the freshest ingest for that content;
//! 2. a conservative URL pass. YouTube comment rows share their video URL,
//!    so a `youtube` row whose URL lacks a `lc=` query marker is exempt from
//!    URL dedup entirely: it is never dropped by URL and its URL is never
//!    registered as a seen key. Blank URLs never key.
//!
//! Rows removed by the primary pass are never reconsidered by the URL pass.
//! Running the stage on its own output is a no-op.

use crate::record::Post;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Query marker that disambiguates individual YouTube comments on one video.
static RE_YT_COMMENT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[?&]lc=").expect("yt comment marker regex"));

/// Per-pass removal counts, reported instead of failing the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Rows dropped by the (platform, post_id) keep-first pass.
    pub by_key: usize,
    /// Rows dropped by the URL pass.
    pub by_url: usize,
}

/// True when the row's URL must not participate in URL dedup.
fn url_exempt(post: &Post) -> bool {
    post.platform.eq_ignore_ascii_case("youtube") && !RE_YT_COMMENT_MARKER.is_match(&post.url)
}

/// Deduplicate the combined normalized rows. Output is sorted ascending by
/// `created_at` and satisfies the (platform, post_id) uniqueness invariant.
pub fn deduplicate(mut posts: Vec<Post>) -> (Vec<Post>, DedupStats) {
    // Stable sort: ties on created_at keep input order, so the run is
    // deterministic and idempotent on its own output.
    posts.sort_by_key(|p| p.created_at);

    let mut stats = DedupStats::default();

    // Pass 1: keep-first by (platform, post_id).
    let mut seen_keys: HashSet<(String, String)> = HashSet::new();
    let mut primary = Vec::with_capacity(posts.len());
    for post in posts {
        if seen_keys.insert((post.platform.clone(), post.post_id.clone())) {
            primary.push(post);
        } else {
            stats.by_key += 1;
        }
    }

    // Pass 2: keep-first by URL, skipping exempt and blank-URL rows.
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(primary.len());
    for post in primary {
        if post.url.is_empty() || url_exempt(&post) {
            kept.push(post);
            continue;
        }
        if seen_urls.insert(post.url.clone()) {
            kept.push(post);
        } else {
            stats.by_url += 1;
        }
    }

    (kept, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike, Utc};

    fn post(platform: &str, id: &str, ts: u32, url: &str) -> Post {
        Post {
            platform: platform.into(),
            post_id: id.into(),
            author: String::new(),
            created_at: Utc.with_ymd_and_hms(2025, 6, 14, 0, 0, ts).unwrap(),
            content: String::new(),
            like_count: 0,
            reply_count: 0,
            share_count: 0,
            url: url.into(),
        }
    }

    #[test]
    fn keeps_earliest_occurrence_per_key() {
        let (kept, stats) = deduplicate(vec![
            post("reddit", "abc", 30, ""),
            post("reddit", "abc", 10, ""),
            post("reddit", "abc", 20, ""),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].created_at.second(), 10);
        assert_eq!(stats.by_key, 2);
    }

    #[test]
    fn youtube_video_urls_are_exempt_from_url_pass() {
        let video = "https://youtube.com/watch?v=xyz";
        let (kept, stats) = deduplicate(vec![
            post("youtube", "c1", 1, video),
            post("youtube", "c2", 2, video),
            post("youtube", "c3", 3, &format!("{video}&lc=tok1")),
            post("youtube", "c4", 4, &format!("{video}&lc=tok1")),
        ]);
        // Two comments sharing the bare video URL both survive; the two rows
        // with the same lc= marker collapse to one.
        assert_eq!(kept.len(), 3);
        assert_eq!(stats, DedupStats { by_key: 0, by_url: 1 });
    }

    #[test]
    fn exempt_rows_do_not_shadow_later_urls() {
        let shared = "https://youtube.com/watch?v=xyz";
        let (kept, _) = deduplicate(vec![
            post("youtube", "c1", 1, shared),
            post("x", "t1", 2, shared),
            post("x", "t2", 3, shared),
        ]);
        // The exempt youtube row never registered the URL, so the first
        // non-exempt row is retained; only the second one collides.
        let ids: Vec<&str> = kept.iter().map(|p| p.post_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "t1"]);
    }

    #[test]
    fn blank_urls_never_key() {
        let (kept, stats) = deduplicate(vec![
            post("x", "a", 1, ""),
            post("x", "b", 2, ""),
            post("reddit", "c", 3, ""),
        ]);
        assert_eq!(kept.len(), 3);
        assert_eq!(stats, DedupStats::default());
    }

    #[test]
    fn rows_removed_by_key_pass_never_reach_url_pass() {
        let (kept, stats) = deduplicate(vec![
            post("x", "a", 1, "https://a.example/1"),
            post("x", "a", 2, "https://a.example/2"),
            post("x", "b", 3, "https://a.example/2"),
        ]);
        // The duplicate of "a" is gone before URL comparison, so "b" keeps
        // its URL uncontested.
        assert_eq!(kept.len(), 2);
        assert_eq!(stats, DedupStats { by_key: 1, by_url: 0 });
    }

    #[test]
    fn stage_is_stable_on_its_own_output() {
        let input = vec![
            post("reddit", "a", 5, "https://reddit.com/a"),
            post("x", "b", 3, "https://x.com/b"),
            post("youtube", "c", 4, "https://youtube.com/watch?v=1"),
        ];
        let (once, _) = deduplicate(input);
        let (twice, stats) = deduplicate(once.clone());
        assert_eq!(once, twice);
        assert_eq!(stats, DedupStats::default());
    }
}
