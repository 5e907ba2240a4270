//! Stateless detectors over the current node view.

use regex::{Regex, RegexBuilder};

use super::{Detector, NodeView};

/// Case-insensitive regex over the node's text content.
#[derive(Debug)]
pub struct RegexDetector {
    name: String,
    regex: Regex,
}

impl RegexDetector {
    pub fn new(name: &str, pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            name: name.to_string(),
            regex,
        })
    }

    /// One detector matching any of `patterns`.
    pub fn any_of(name: &str, patterns: &[&str]) -> Result<Self, regex::Error> {
        let joined = patterns
            .iter()
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        Self::new(name, &joined)
    }
}

impl Detector for RegexDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, current: &NodeView, _previous: Option<&NodeView>) -> bool {
        self.regex.is_match(&current.text)
    }
}

/// A checkbox that is already checked when the user first sees it.
#[derive(Debug, Default)]
pub struct CheckedCheckboxDetector;

impl Detector for CheckedCheckboxDetector {
    fn name(&self) -> &str {
        "prechecked-checkbox"
    }

    fn evaluate(&self, current: &NodeView, _previous: Option<&NodeView>) -> bool {
        current.tag.eq_ignore_ascii_case("input")
            && current
                .attr("type")
                .is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
            && current.has_attr("checked")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_detector_case_insensitive() {
        let detector = RegexDetector::new("hurry", r"\bhurry\b").unwrap();
        assert!(detector.evaluate(&NodeView::new("p", "HURRY, almost gone"), None));
        assert!(!detector.evaluate(&NodeView::new("p", "no rush"), None));
        assert_eq!(detector.name(), "hurry");
    }

    #[test]
    fn test_regex_detector_any_of() {
        let detector = RegexDetector::any_of("deal", &["limited time", r"\d+% off"]).unwrap();
        assert!(detector.evaluate(&NodeView::new("p", "50% OFF today"), None));
        assert!(detector.evaluate(&NodeView::new("p", "Limited time"), None));
        assert!(!detector.evaluate(&NodeView::new("p", "regular price"), None));
    }

    #[test]
    fn test_regex_detector_invalid() {
        assert!(RegexDetector::new("bad", "(unclosed").is_err());
    }

    #[test]
    fn test_checked_checkbox() {
        let detector = CheckedCheckboxDetector;
        let checked = NodeView::new("input", "")
            .with_attr("type", "Checkbox")
            .with_attr("checked", "");
        let unchecked = NodeView::new("input", "").with_attr("type", "checkbox");
        let radio = NodeView::new("input", "")
            .with_attr("type", "radio")
            .with_attr("checked", "");
        assert!(detector.evaluate(&checked, None));
        assert!(!detector.evaluate(&unchecked, None));
        assert!(!detector.evaluate(&radio, None));
    }
}
