//! Pattern table configuration.

use serde::{Deserialize, Serialize};

/// Adjustments to the builtin pattern table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternsConfig {
    /// Builtin pattern ids to drop from the table.
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Additional regex-driven patterns appended after the builtin ones.
    #[serde(default)]
    pub custom: Vec<CustomPatternConfig>,
}

/// A user-defined pattern matched by case-insensitive regexes over node text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPatternConfig {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub info_url: String,

    #[serde(default)]
    pub info: String,

    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    #[serde(default)]
    pub regexes: Vec<String>,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}
