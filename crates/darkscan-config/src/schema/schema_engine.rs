//! Engine and remote classifier configuration.

use serde::{Deserialize, Serialize};

use super::default_true;

/// Detection engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay before the first snapshot when a scan waits for changes to settle.
    #[serde(default = "default_delay_ms")]
    pub settle_delay_ms: u64,

    /// Delay between the two snapshots of one pass.
    #[serde(default = "default_delay_ms")]
    pub observation_delay_ms: u64,

    /// Element tags excluded from snapshots, matched case-insensitively.
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,

    /// Prefix of every class the engine writes into the live tree.
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,

    /// Text leaves must be longer than this (in characters) to reach the text classifier.
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,

    /// Text leaves must be shorter than this to reach the text classifier.
    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_delay_ms(),
            observation_delay_ms: default_delay_ms(),
            denylist: default_denylist(),
            marker_prefix: default_marker_prefix(),
            min_text_len: default_min_text_len(),
            max_text_len: default_max_text_len(),
        }
    }
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_denylist() -> Vec<String> {
    ["script", "style", "noscript", "audio", "video"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_marker_prefix() -> String {
    "__ph__".to_string()
}

fn default_min_text_len() -> usize {
    20
}

fn default_max_text_len() -> usize {
    40000
}

/// Remote classifier service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// When false, only the deterministic rules run.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_text_path")]
    pub text_path: String,

    #[serde(default = "default_image_path")]
    pub image_path: String,

    #[serde(default = "default_feedback_path")]
    pub feedback_path: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_base_url(),
            text_path: default_text_path(),
            image_path: default_image_path(),
            feedback_path: default_feedback_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_text_path() -> String {
    "/predict".to_string()
}

fn default_image_path() -> String {
    "/predict_image".to_string()
}

fn default_feedback_path() -> String {
    "/collect_user_feedback".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
