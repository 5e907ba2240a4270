//! Temporal countdown detection across two snapshots.

use regex::{Regex, RegexBuilder};

use super::{Detector, NodeView};

const UNIT: &str = r"(?:days?|d?|hours?|h?|minutes?|m?|seconds?|s?|tage?|stunden?|minuten?|sekunden?|[a-zA-Z]{1,3}\.?)";

/// Detects a clock-like value that decreased between the two snapshots.
///
/// Matches like `12:30:40` or `2 days 4 hours` are extracted from both texts
/// and paired by position. A pair signals a countdown when, reading the
/// numeric components left to right, the first differing component is
/// smaller in the current text. Runs of numbers too long to be a timer
/// (five or more units, four or more colons) are stripped first.
#[derive(Debug)]
pub struct CountdownDetector {
    timer: Regex,
    too_long: Regex,
    number: Regex,
}

impl CountdownDetector {
    pub fn new() -> Result<Self, regex::Error> {
        let timer = format!(r"(?:\d{{1,2}}\s*:\s*){{1,3}}\d{{1,2}}|(?:\d{{1,2}}\s*{UNIT}(?:\s*und)?\s*){{2,4}}");
        let too_long = format!(r"(?:\d{{1,2}}\s*:\s*){{4,}}\d{{1,2}}|(?:\d{{1,2}}\s*{UNIT}(?:\s*und)?\s*){{5,}}");
        Ok(Self {
            timer: RegexBuilder::new(&timer).case_insensitive(true).build()?,
            too_long: RegexBuilder::new(&too_long).case_insensitive(true).build()?,
            number: Regex::new(r"\d+")?,
        })
    }

    fn timers(&self, text: &str) -> Vec<String> {
        let cleaned = self.too_long.replace_all(text, "");
        self.timer
            .find_iter(&cleaned)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn numbers(&self, timer: &str) -> Vec<u64> {
        self.number
            .find_iter(timer)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }
}

impl Detector for CountdownDetector {
    fn name(&self) -> &str {
        "countdown-decrease"
    }

    fn evaluate(&self, current: &NodeView, previous: Option<&NodeView>) -> bool {
        let Some(previous) = previous else {
            return false;
        };
        if current.text == previous.text {
            return false;
        }

        let now = self.timers(&current.text);
        let before = self.timers(&previous.text);
        if now.is_empty() || before.is_empty() || now.len() != before.len() {
            return false;
        }

        for (now_timer, before_timer) in now.iter().zip(&before) {
            let now_nums = self.numbers(now_timer);
            let before_nums = self.numbers(before_timer);
            if now_nums.len() != before_nums.len() {
                continue;
            }
            for (n, b) in now_nums.iter().zip(&before_nums) {
                if n > b {
                    break;
                }
                if n < b {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(now: &str, before: Option<&str>) -> bool {
        let detector = CountdownDetector::new().unwrap();
        let before = before.map(|t| NodeView::new("span", t));
        detector.evaluate(&NodeView::new("span", now), before.as_ref())
    }

    #[test]
    fn test_decreasing_clock_is_countdown() {
        assert!(check("12:30:39", Some("12:30:40")));
        assert!(check("Sale ends in 01:00:00", Some("Sale ends in 01:00:01")));
    }

    #[test]
    fn test_increasing_clock_is_not_countdown() {
        assert!(!check("12:31:20", Some("12:30:40")));
    }

    #[test]
    fn test_unchanged_text_is_not_countdown() {
        assert!(!check("12:30:40", Some("12:30:40")));
    }

    #[test]
    fn test_requires_previous_state() {
        assert!(!check("12:30:40", None));
    }

    #[test]
    fn test_unit_based_countdown() {
        assert!(check("2 days 3 hours left", Some("2 days 4 hours left")));
        assert!(check("1 Tag und 5 Stunden", Some("1 Tag und 6 Stunden")));
    }

    #[test]
    fn test_mismatched_timer_counts() {
        assert!(!check("10:00 and 09:59", Some("10:01")));
    }

    #[test]
    fn test_mismatched_component_counts_skip_pair() {
        assert!(!check("12:30", Some("12:30:40")));
    }

    #[test]
    fn test_long_number_runs_are_ignored() {
        assert!(!check("1:2:3:4:5:5", Some("1:2:3:4:5:6")));
    }

    #[test]
    fn test_text_without_timers() {
        assert!(!check("Only 3 left", Some("Only 4 left")));
    }
}
