//! Class names the engine writes into the live document.

use darkscan_protocols::PatternId;

/// Marker and extension-owned class names derived from one prefix.
#[derive(Debug, Clone)]
pub struct Markers {
    prefix: String,
    detected: String,
    current_pattern: String,
    feedback: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self::new("__ph__")
    }
}

impl Markers {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            detected: format!("{prefix}pattern-detected"),
            current_pattern: format!("{prefix}current-pattern"),
            feedback: format!("{prefix}feedback"),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generic class carried by every flagged node.
    pub fn detected(&self) -> &str {
        &self.detected
    }

    /// Pattern-specific class, e.g. `__ph__countdown`.
    pub fn specific(&self, id: &PatternId) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Class of the highlight overlay added by the presenter.
    pub fn current_pattern(&self) -> &str {
        &self.current_pattern
    }

    /// Class of the feedback affordance container.
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn feedback_button(&self, positive: bool) -> String {
        let suffix = if positive { "up" } else { "down" };
        format!("{}-{}", self.feedback, suffix)
    }

    /// Whether an element with `classes` was inserted by the engine itself.
    pub fn is_owned(&self, classes: &[String]) -> bool {
        classes
            .iter()
            .any(|c| *c == self.feedback || *c == self.current_pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let markers = Markers::default();
        assert_eq!(markers.detected(), "__ph__pattern-detected");
        assert_eq!(markers.current_pattern(), "__ph__current-pattern");
        assert_eq!(markers.specific(&PatternId::from("countdown")), "__ph__countdown");
        assert_eq!(markers.feedback_button(false), "__ph__feedback-down");
    }

    #[test]
    fn test_is_owned() {
        let markers = Markers::new("x-");
        assert!(markers.is_owned(&["x-feedback".to_string()]));
        assert!(markers.is_owned(&["a".to_string(), "x-current-pattern".to_string()]));
        assert!(!markers.is_owned(&["x-pattern-detected".to_string()]));
    }
}
