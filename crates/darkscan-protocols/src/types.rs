//! Shared value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a logical element node within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phid(pub u64);

impl Phid {
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Parse the value stored in a `data-phid` attribute.
    pub fn parse(value: &str) -> Option<Self> {
        value.trim().parse().ok().map(Phid)
    }
}

impl fmt::Display for Phid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a pattern in the pattern table, e.g. `countdown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(String);

impl PatternId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatternId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PatternId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which classification tiers a scan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Text,
    Image,
    Both,
}

impl ScanMode {
    pub fn includes_text(self) -> bool {
        matches!(self, ScanMode::Text | ScanMode::Both)
    }

    pub fn includes_image(self) -> bool {
        matches!(self, ScanMode::Image | ScanMode::Both)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanMode::Text => "text",
            ScanMode::Image => "image",
            ScanMode::Both => "both",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ScanMode::Text),
            "image" => Ok(ScanMode::Image),
            "both" => Ok(ScanMode::Both),
            other => Err(format!("unknown scan mode: {}", other)),
        }
    }
}

/// Outcome of the remote text classifier. Index 0 is background.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Classification {
    pub class_index: u32,
    #[serde(default)]
    pub label: Option<String>,
}

impl Classification {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn new(class_index: u32, label: impl Into<String>) -> Self {
        Self {
            class_index,
            label: Some(label.into()),
        }
    }

    pub fn is_pattern(&self) -> bool {
        self.class_index != 0
    }
}

/// Outcome of the remote image classifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageClassification {
    #[serde(flatten)]
    pub classification: Classification,
    /// Text the classifier recognised inside the image.
    #[serde(default)]
    pub extracted_text: String,
}

impl ImageClassification {
    pub fn background() -> Self {
        Self::default()
    }

    pub fn is_pattern(&self) -> bool {
        self.classification.is_pattern()
    }
}

/// A user's verdict on a flagged node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgment {
    #[serde(rename = "Dark Pattern")]
    DarkPattern,
    #[serde(rename = "Not a Dark Pattern")]
    NotDarkPattern,
}

impl Judgment {
    pub fn as_str(self) -> &'static str {
        match self {
            Judgment::DarkPattern => "Dark Pattern",
            Judgment::NotDarkPattern => "Not a Dark Pattern",
        }
    }
}

/// Feedback sent to the feedback sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub text: String,
    pub prediction: Judgment,
}

/// Which tier produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionSource {
    Rule,
    TextModel,
    ImageModel,
}

/// Per-pattern visibility partition in the aggregate report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCount {
    pub id: PatternId,
    pub name: String,
    pub visible_ids: Vec<Phid>,
    pub hidden_ids: Vec<Phid>,
}

/// Detection result set handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateReport {
    pub patterns: Vec<PatternCount>,
    pub total_visible: usize,
    pub total: usize,
}

impl AggregateReport {
    pub fn pattern(&self, id: &str) -> Option<&PatternCount> {
        self.patterns.iter().find(|p| p.id.as_str() == id)
    }
}

/// Activation toggle as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationState {
    pub is_enabled: bool,
}
