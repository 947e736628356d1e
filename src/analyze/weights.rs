//! Scoring weights and activation thresholds (tunable via `config/weights.json`).
//!
//! The defaults are the calibrated constants of the heuristic. Overriding a
//! subset in JSON keeps the rest at their defaults, so only the tuning
//! changes, never the algorithm's structure.
//!
//! On each `current()` call we check the file's modified time and reload if
//! changed.

use serde::Deserialize;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};

pub const ENV_WEIGHTS_PATH: &str = "MISINFO_WEIGHTS_PATH";
pub const DEFAULT_WEIGHTS_JSON: &str = "config/weights.json";

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    // Final-sum term weights.
    pub w_lexicon: f32,
    pub w_caps: f32,
    pub w_punct: f32,
    pub w_emoji: f32,
    pub w_emotion: f32,
    pub w_extremity: f32,
    pub w_low_neutral: f32,
    pub w_debunk: f32,

    // Emotion-mix weights (joy suppresses).
    pub w_anger: f32,
    pub w_fear: f32,
    pub w_surprise: f32,
    pub w_disgust: f32,
    pub w_joy: f32,

    // Style gate: per-signal activation thresholds and the damped multiplier
    // applied when fewer than `min_active_signals` fire.
    pub caps_gate: f32,
    pub punct_gate: f32,
    pub min_active_signals: usize,
    pub inactive_gate: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            w_lexicon: 0.28,
            w_caps: 0.12,
            w_punct: 0.10,
            w_emoji: 0.07,
            w_emotion: 0.18,
            w_extremity: 0.12,
            w_low_neutral: 0.05,
            w_debunk: 0.10,

            w_anger: 0.35,
            w_fear: 0.25,
            w_surprise: 0.20,
            w_disgust: 0.10,
            w_joy: 0.10,

            caps_gate: 0.2,
            punct_gate: 0.2,
            min_active_signals: 2,
            inactive_gate: 0.5,
        }
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadWeights {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    weights: ScoreWeights,
    last_modified: Option<SystemTime>,
}

impl HotReloadWeights {
    /// Create with a path (defaults to `config/weights.json` if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WEIGHTS_JSON));
        Self {
            path,
            inner: RwLock::new(State {
                weights: ScoreWeights::default(),
                last_modified: None,
            }),
        }
    }

    /// Get the latest weights, reloading if the config file changed.
    pub fn current(&self) -> ScoreWeights {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().unwrap();
                guard.last_modified != Some(mtime)
            }
            // If the file isn't there, we keep defaults; no reload.
            Err(_) => false,
        };

        if !needs_reload {
            return self.inner.read().unwrap().weights;
        }

        let mut guard = self.inner.write().unwrap();
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    if let Ok(w) = load_weights_file(&self.path) {
                        guard.weights = w;
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.weights
    }
}

/// Load weights directly (no caching). Public for tests/tools.
pub fn load_weights_file(path: &Path) -> io::Result<ScoreWeights> {
    let bytes = fs::read(path)?;
    let w: ScoreWeights = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(w)
}
