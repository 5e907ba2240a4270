//! Mapping remote classifier outputs onto pattern identifiers.

use darkscan_protocols::{Classification, PatternId};

/// Label table of the reference classifier, indexed by class.
const DEFAULT_LABELS: [&str; 8] = [
    "not-dark",
    "countdown",
    "scarcity",
    "misdirection",
    "social-proof",
    "sneaking",
    "obstruction",
    "forced-continuity",
];

/// Canonical pattern id for a free-form label, `None` for background labels.
pub fn normalize_label(label: &str) -> Option<String> {
    let normalized: String = label
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c })
        .collect();
    match normalized.as_str() {
        "" | "not-dark" | "not-dark-pattern" | "none" => None,
        "mis-direction" => Some("misdirection".to_string()),
        "forced-action" => Some("forced-continuity".to_string()),
        "socialproof" => Some("social-proof".to_string()),
        _ => Some(normalized),
    }
}

pub fn label_for_index(index: u32) -> Option<&'static str> {
    if index == 0 {
        return None;
    }
    DEFAULT_LABELS.get(index as usize).copied()
}

/// Pattern id for a positive classification.
///
/// The reported label wins; without one, the index is looked up in the
/// default label table. Background results resolve to `None`.
pub fn resolve_label(classification: &Classification) -> Option<PatternId> {
    if !classification.is_pattern() {
        return None;
    }
    classification
        .label
        .as_deref()
        .and_then(normalize_label)
        .or_else(|| label_for_index(classification.class_index).map(String::from))
        .map(PatternId::from)
}
