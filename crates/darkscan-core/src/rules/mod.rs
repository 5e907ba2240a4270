//! Deterministic rule pipeline.
//!
//! Patterns are evaluated in table order and their detectors in list order;
//! the first detector returning `true` decides the pattern. Detectors are pure
//! functions of the current node view and, for temporal checks, the view of
//! the same node in the earlier snapshot.

mod catalog;
mod countdown;
mod detectors;
mod labels;

use std::collections::HashSet;
use std::fmt;

use darkscan_config::PatternsConfig;
use darkscan_protocols::PatternId;
use tracing::warn;

use crate::error::RuleError;
pub use crate::snapshot::NodeView;

pub use catalog::builtin_patterns;
pub use countdown::CountdownDetector;
pub use detectors::{CheckedCheckboxDetector, RegexDetector};
pub use labels::{label_for_index, normalize_label, resolve_label};

/// A single named detection strategy.
pub trait Detector: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Whether `current` exhibits the pattern. `previous` is the same node in
    /// the earlier snapshot, when it existed there.
    fn evaluate(&self, current: &NodeView, previous: Option<&NodeView>) -> bool;
}

/// One entry of the pattern table.
#[derive(Debug)]
pub struct PatternDescriptor {
    pub id: PatternId,
    pub name: String,
    pub detectors: Vec<Box<dyn Detector>>,
    pub info_url: String,
    pub info: String,
    pub languages: Vec<String>,
}

impl PatternDescriptor {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: PatternId::from(id),
            name: name.to_string(),
            detectors: Vec::new(),
            info_url: String::new(),
            info: String::new(),
            languages: Vec::new(),
        }
    }

    pub fn info(mut self, url: &str, text: &str) -> Self {
        self.info_url = url.to_string();
        self.info = text.to_string();
        self
    }

    pub fn languages(mut self, languages: &[&str]) -> Self {
        self.languages = languages.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn detector(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    fn validate(&self) -> Result<(), RuleError> {
        let pattern = self.id.to_string();
        let empty = |field| RuleError::EmptyField {
            pattern: pattern.clone(),
            field,
        };
        if self.id.as_str().trim().is_empty() {
            return Err(empty("id"));
        }
        if self.name.trim().is_empty() {
            return Err(empty("name"));
        }
        if self.info_url.trim().is_empty() {
            return Err(empty("info_url"));
        }
        if self.info.trim().is_empty() {
            return Err(empty("info"));
        }
        if self.languages.is_empty() || self.languages.iter().any(|l| l.trim().is_empty()) {
            return Err(empty("languages"));
        }
        if self.detectors.is_empty() {
            return Err(RuleError::NoDetectors(pattern));
        }
        Ok(())
    }
}

/// Validated, ordered pattern table.
#[derive(Debug)]
pub struct RulePipeline {
    patterns: Vec<PatternDescriptor>,
}

impl RulePipeline {
    pub fn new(patterns: Vec<PatternDescriptor>) -> Result<Self, RuleError> {
        let mut seen = HashSet::new();
        for pattern in &patterns {
            pattern.validate()?;
            if !seen.insert(pattern.id.clone()) {
                return Err(RuleError::DuplicateId(pattern.id.to_string()));
            }
        }
        Ok(Self { patterns })
    }

    /// The builtin catalog.
    pub fn builtin() -> Result<Self, RuleError> {
        Self::new(builtin_patterns()?)
    }

    /// Builtin catalog minus disabled entries, plus configured custom patterns.
    pub fn from_config(config: &PatternsConfig) -> Result<Self, RuleError> {
        let mut patterns = builtin_patterns()?;
        for id in &config.disabled {
            if !patterns.iter().any(|p| p.id.as_str() == id) {
                warn!(pattern = %id, "Disabled pattern is not part of the builtin table");
            }
        }
        patterns.retain(|p| !config.disabled.iter().any(|d| d == p.id.as_str()));

        for custom in &config.custom {
            let mut pattern = PatternDescriptor::new(&custom.id, &custom.name);
            pattern.info_url = custom.info_url.clone();
            pattern.info = custom.info.clone();
            pattern.languages = custom.languages.clone();
            for (i, source) in custom.regexes.iter().enumerate() {
                let detector = RegexDetector::new(&format!("{}-{}", custom.id, i + 1), source)
                    .map_err(|e| RuleError::InvalidRegex {
                        pattern: custom.id.clone(),
                        message: e.to_string(),
                    })?;
                pattern.detectors.push(Box::new(detector));
            }
            patterns.push(pattern);
        }

        Self::new(patterns)
    }

    /// First matching pattern in table order.
    pub fn classify(&self, current: &NodeView, previous: Option<&NodeView>) -> Option<&PatternId> {
        self.patterns
            .iter()
            .find(|p| p.detectors.iter().any(|d| d.evaluate(current, previous)))
            .map(|p| &p.id)
    }

    pub fn patterns(&self) -> &[PatternDescriptor] {
        &self.patterns
    }

    pub fn get(&self, id: &str) -> Option<&PatternDescriptor> {
        self.patterns.iter().find(|p| p.id.as_str() == id)
    }

    pub fn contains(&self, id: &PatternId) -> bool {
        self.patterns.iter().any(|p| &p.id == id)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
