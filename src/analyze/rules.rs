//! Rule tables for the feature extractor (loaded from `config/rules.toml`).
//!
//! Scoring policy (the rumor/sensational/debunk vocabularies, the alarm
//! emoji set, and the domain credibility lists) lives in versionable config
//! rather than code, so it can be swapped without redeploying. A built-in
//! seed keeps the engine functional when no config file is present.
//!
//! Lookup order for the default path:
//! 1) $MISINFO_RULES_PATH
//! 2) config/rules.toml
//! 3) config/rules.json
//! 4) built-in seed

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::SystemTime,
};

pub const ENV_RULES_PATH: &str = "MISINFO_RULES_PATH";
pub const DEFAULT_RULES_TOML: &str = "config/rules.toml";
pub const DEFAULT_RULES_JSON: &str = "config/rules.json";

/// Named term/domain lists. Term matching downstream is case-insensitive and
/// word-boundary-aware; domain matching is exact host or dot-suffix.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RuleSet {
    #[serde(default)]
    pub rumor_terms: Vec<String>,
    #[serde(default)]
    pub sensational_terms: Vec<String>,
    #[serde(default)]
    pub debunk_terms: Vec<String>,
    #[serde(default)]
    pub alarm_emoji: Vec<String>,
    #[serde(default)]
    pub low_cred_domains: Vec<String>,
    #[serde(default)]
    pub mainstream_domains: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl RuleSet {
    /// Built-in seed mirroring the curated vocabulary the profiler ships with.
    /// The low-credibility list is intentionally empty; operators curate it
    /// per deployment.
    pub fn default_seed() -> Self {
        fn v(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            rumor_terms: v(&[
                "rumor",
                "rumour",
                "rumors",
                "rumours",
                "rumored",
                "rumoured",
                "unverified",
                "alleged",
                "allegedly",
                "claim",
                "claims",
                "hoax",
                "fake",
                "false",
                "misleading",
                "debunk",
                "debunked",
                "debunking",
                "conspiracy",
                "viral",
                "clickbait",
                "scam",
                "propaganda",
            ]),
            sensational_terms: v(&[
                "breaking",
                "shocking",
                "explosive",
                "stunning",
                "unbelievable",
                "you won't believe",
                "you wont believe",
                "proof",
                "exposed",
                "secret",
                "cover-up",
                "cover up",
                "coverup",
            ]),
            debunk_terms: v(&[
                "debunk",
                "debunked",
                "debunking",
                "fact-check",
                "fact check",
                "fact-checked",
                "fact checked",
                "fact-checking",
                "fact checking",
                "clarify",
                "clarified",
                "clarification",
            ]),
            alarm_emoji: v(&[
                "🔥", "🚨", "🤯", "😱", "😡", "🤬", "💥", "❗", "‼️", "❕", "❓",
            ]),
            low_cred_domains: Vec::new(),
            mainstream_domains: v(&[
                "reuters.com",
                "apnews.com",
                "bbc.com",
                "thehindu.com",
                "indiatoday.in",
                "ndtv.com",
            ]),
        }
    }

    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading rules from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        parse_rules(&content, ext.as_str())
    }

    /// Load using env var + fallbacks; the built-in seed on total miss.
    pub fn load_default() -> Self {
        if let Ok(p) = std::env::var(ENV_RULES_PATH) {
            let pb = PathBuf::from(p);
            match Self::load_from_file(&pb) {
                Ok(rules) => return rules,
                Err(e) => {
                    tracing::warn!(error = ?e, path = %pb.display(), "rules config unreadable; using seed");
                    return Self::default_seed();
                }
            }
        }
        for p in [DEFAULT_RULES_TOML, DEFAULT_RULES_JSON] {
            let pb = PathBuf::from(p);
            if pb.exists() {
                if let Ok(rules) = Self::load_from_file(&pb) {
                    return rules;
                }
            }
        }
        Self::default_seed()
    }

    /// Compile the lists into matchers.
    pub fn compile(&self) -> CompiledRules {
        let low_cred_domains = lower_all(&self.low_cred_domains);
        let mainstream_domains = lower_all(&self.mainstream_domains);
        CompiledRules {
            rumor: compile_terms(&self.rumor_terms),
            sensational: compile_terms(&self.sensational_terms),
            debunk: compile_terms(&self.debunk_terms),
            alarm_emoji: self.alarm_emoji.clone(),
            low_cred_suffixes: dotted(&low_cred_domains),
            mainstream_suffixes: dotted(&mainstream_domains),
            low_cred_domains,
            mainstream_domains,
        }
    }
}

fn parse_rules(s: &str, hint_ext: &str) -> Result<RuleSet> {
    if hint_ext == "toml" {
        if let Ok(v) = toml::from_str::<RuleSet>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<RuleSet>(s) {
        return Ok(v);
    }
    if hint_ext != "toml" {
        if let Ok(v) = toml::from_str::<RuleSet>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported rules format"))
}

/// Word-boundary, case-insensitive alternation over literal terms.
/// An empty list compiles to a never-matching pattern.
fn compile_terms(terms: &[String]) -> Regex {
    let non_empty: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    let pattern = if non_empty.is_empty() {
        r"[^\s\S]".to_string()
    } else {
        format!(r"(?i)\b(?:{})\b", non_empty.join("|"))
    };
    Regex::new(&pattern).expect("term list regex")
}

fn lower_all(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn dotted(domains: &[String]) -> Vec<String> {
    domains.iter().map(|d| format!(".{d}")).collect()
}

/// Compiled matchers shared by the feature extractor. The dot-prefixed
/// suffix forms are precomputed so per-row host checks allocate nothing.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub rumor: Regex,
    pub sensational: Regex,
    pub debunk: Regex,
    pub alarm_emoji: Vec<String>,
    pub low_cred_domains: Vec<String>,
    pub mainstream_domains: Vec<String>,
    low_cred_suffixes: Vec<String>,
    mainstream_suffixes: Vec<String>,
}

impl Default for CompiledRules {
    fn default() -> Self {
        RuleSet::default_seed().compile()
    }
}

impl CompiledRules {
    /// Non-overlapping occurrences of alarm emoji sequences.
    pub fn alarm_emoji_count(&self, text: &str) -> usize {
        self.alarm_emoji
            .iter()
            .map(|e| text.matches(e.as_str()).count())
            .sum()
    }

    /// Exact host or dot-suffix membership in the low-credibility list
    /// ("news.example.com" matches "example.com"). Expects a lowercased host.
    pub fn is_low_cred_host(&self, host: &str) -> bool {
        host_in(host, &self.low_cred_domains, &self.low_cred_suffixes)
    }

    /// Same membership test against the mainstream list.
    pub fn is_mainstream_host(&self, host: &str) -> bool {
        host_in(host, &self.mainstream_domains, &self.mainstream_suffixes)
    }
}

fn host_in(host: &str, exact: &[String], suffixes: &[String]) -> bool {
    exact.iter().any(|d| host == d.as_str()) || suffixes.iter().any(|s| host.ends_with(s.as_str()))
}

/// Hot-reload wrapper: recompiles when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadRules {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    compiled: Arc<CompiledRules>,
    last_modified: Option<SystemTime>,
}

impl HotReloadRules {
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RULES_TOML));
        Self {
            path,
            inner: RwLock::new(State {
                compiled: Arc::new(CompiledRules::default()),
                last_modified: None,
            }),
        }
    }

    pub fn current(&self) -> Arc<CompiledRules> {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap();
                guard.last_modified != Some(mtime)
            }
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().unwrap().compiled.clone();
        }

        let mut guard = self.inner.write().unwrap();
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    if let Ok(rules) = RuleSet::load_from_file(&self.path) {
                        guard.compiled = Arc::new(rules.compile());
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.compiled.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_terms_match_with_word_boundaries() {
        let c = RuleSet::default_seed().compile();
        assert_eq!(c.rumor.find_iter("A hoax, a HOAX, and a scam").count(), 3);
        // Partial words never match.
        assert!(!c.rumor.is_match("scamper hoaxes-free viralize"));
        assert!(c.sensational.is_match("BREAKING news"));
        assert!(c.debunk.is_match("this was fact-checked"));
    }

    #[test]
    fn alarm_emoji_are_counted_per_occurrence() {
        let c = RuleSet::default_seed().compile();
        assert_eq!(c.alarm_emoji_count("🚨🚨 stay calm 🔥"), 3);
        assert_eq!(c.alarm_emoji_count("no emoji"), 0);
    }

    #[test]
    fn empty_term_list_never_matches() {
        let empty = RuleSet {
            rumor_terms: vec![],
            sensational_terms: vec![],
            debunk_terms: vec![],
            alarm_emoji: vec![],
            low_cred_domains: vec![],
            mainstream_domains: vec![],
        };
        let c = empty.compile();
        assert!(!c.rumor.is_match("rumor hoax anything"));
        assert_eq!(c.alarm_emoji_count("🚨"), 0);
    }

    #[test]
    fn domain_membership_matches_exact_and_dot_suffix() {
        let mut seed = RuleSet::default_seed();
        seed.low_cred_domains = vec!["Badsite.Example".into()];
        let c = seed.compile();
        assert!(c.is_low_cred_host("badsite.example"));
        assert!(c.is_low_cred_host("sub.badsite.example"));
        // A host merely ending in the same characters is not a subdomain.
        assert!(!c.is_low_cred_host("notbadsite.example"));
        assert!(c.is_mainstream_host("www.reuters.com"));
        assert!(!c.is_mainstream_host("reuters.com.evil.net"));
    }

    #[test]
    fn hot_reload_recompiles_on_file_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, r#"rumor_terms = ["hoax"]"#).unwrap();

        let hot = HotReloadRules::new(Some(&path));
        assert!(hot.current().rumor.is_match("a hoax"));
        assert!(!hot.current().rumor.is_match("a psyop"));

        // Ensure a different mtime (filesystem granularity can be coarse).
        std::thread::sleep(std::time::Duration::from_millis(1100));
        fs::write(&path, r#"rumor_terms = ["psyop"]"#).unwrap();

        assert!(hot.current().rumor.is_match("a psyop"));
        assert!(!hot.current().rumor.is_match("a hoax"));
    }

    #[test]
    fn toml_and_json_both_parse() {
        let toml_src = r#"
            rumor_terms = ["hoax"]
            mainstream_domains = ["Reuters.com"]
        "#;
        let r1 = parse_rules(toml_src, "toml").unwrap();
        assert_eq!(r1.rumor_terms, vec!["hoax"]);
        // Domains are lowercased at compile time.
        assert_eq!(r1.compile().mainstream_domains, vec!["reuters.com"]);

        let json_src = r#"{"rumor_terms": ["hoax"], "debunk_terms": []}"#;
        let r2 = parse_rules(json_src, "json").unwrap();
        assert_eq!(r2.rumor_terms, vec!["hoax"]);
    }
}
