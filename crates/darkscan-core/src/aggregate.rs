//! Per-pattern visibility report over the live document.

use darkscan_protocols::{AggregateReport, PatternCount};

use crate::dom::{Document, NodeKey};
use crate::markers::Markers;
use crate::rules::RulePipeline;

/// Count flagged nodes per pattern, split into visible and hidden.
///
/// Patterns appear in table order, nodes in document order. The report is
/// recomputed from the live markers on every call.
pub fn aggregate(doc: &Document, rules: &RulePipeline, markers: &Markers) -> AggregateReport {
    let mut report = AggregateReport::default();
    let root = doc.root();

    for pattern in rules.patterns() {
        let mut count = PatternCount {
            id: pattern.id.clone(),
            name: pattern.name.clone(),
            visible_ids: Vec::new(),
            hidden_ids: Vec::new(),
        };
        for key in doc.elements_with_class(root, &markers.specific(&pattern.id)) {
            let Some(phid) = doc.phid(key) else {
                continue;
            };
            if is_hidden(doc, key) {
                count.hidden_ids.push(phid);
            } else {
                count.visible_ids.push(phid);
            }
        }
        report.total_visible += count.visible_ids.len();
        report.total += count.visible_ids.len() + count.hidden_ids.len();
        report.patterns.push(count);
    }

    report
}

/// Whether a flagged element is out of the user's sight.
pub fn is_hidden(doc: &Document, key: NodeKey) -> bool {
    let Some(el) = doc.element(key) else {
        return true;
    };

    let styled_away = doc
        .ancestors_inclusive(key)
        .filter_map(|k| doc.element(k))
        .any(|ancestor| ancestor.style.hides_element());
    if styled_away {
        return true;
    }

    if el.is_tag("img") && doc.is_leaf(key) {
        let layout = el.layout.map(|b| (b.width, b.height));
        return zero_sized_image(layout, el.attr("width"), el.attr("height"));
    }
    el.layout.is_none_or(|b| b.is_empty())
}

fn zero_sized_image(layout: Option<(f64, f64)>, width: Option<&str>, height: Option<&str>) -> bool {
    if let Some((w, h)) = layout {
        return w <= 0.0 || h <= 0.0;
    }
    let zero = |v: Option<&str>| {
        v.and_then(|v| v.trim().trim_end_matches("px").parse::<f64>().ok()) == Some(0.0)
    };
    zero(width) || zero(height)
}
