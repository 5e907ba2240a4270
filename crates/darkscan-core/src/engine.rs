//! Temporal diff engine.
//!
//! Walks the newer snapshot post-order, pairs each element with its
//! counterpart in the older snapshot by identity, and classifies it with the
//! image model, the rule pipeline, or the text model, in that order. Flagged
//! nodes are marked in the live tree and excised from both snapshots so their
//! text never counts towards an ancestor.

use std::sync::Arc;

use darkscan_config::EngineConfig;
use darkscan_protocols::{
    Classification, DetectionSource, ImageClassification, ImageClassifier, PatternId, Phid,
    ScanMode, TextClassifier,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::dom::{Document, NodeKey, SharedDocument};
use crate::error::DocumentError;
use crate::markers::Markers;
use crate::rules::{RulePipeline, resolve_label};
use crate::snapshot::{SnapKey, Snapshot};

/// One node flagged during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub phid: Phid,
    pub pattern: PatternId,
    pub source: DetectionSource,
}

/// Result of one diff pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffOutcome {
    pub detections: Vec<Detection>,
    /// Elements visited, excluding skipped subtrees.
    pub visited: usize,
    /// Flagged nodes that were gone from the live tree by marking time.
    pub stale: usize,
}

/// Length window for the text classifier.
#[derive(Debug, Clone, Copy)]
pub struct TextLimits {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            min_len: 20,
            max_len: 40000,
        }
    }
}

impl TextLimits {
    /// Leaf text worth sending: inside the window and containing a digit.
    pub fn accepts(&self, text: &str) -> bool {
        let len = text.chars().count();
        len > self.min_len && len < self.max_len && text.chars().any(|c| c.is_ascii_digit())
    }
}

pub struct DiffEngine {
    rules: Arc<RulePipeline>,
    markers: Markers,
    limits: TextLimits,
    text_classifier: Option<Arc<dyn TextClassifier>>,
    image_classifier: Option<Arc<dyn ImageClassifier>>,
}

impl DiffEngine {
    pub fn new(rules: Arc<RulePipeline>, markers: Markers) -> Self {
        Self {
            rules,
            markers,
            limits: TextLimits::default(),
            text_classifier: None,
            image_classifier: None,
        }
    }

    pub fn from_config(rules: Arc<RulePipeline>, config: &EngineConfig) -> Self {
        Self::new(rules, Markers::new(&config.marker_prefix)).with_limits(TextLimits {
            min_len: config.min_text_len,
            max_len: config.max_text_len,
        })
    }

    pub fn with_limits(mut self, limits: TextLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_text_classifier(mut self, classifier: Arc<dyn TextClassifier>) -> Self {
        self.text_classifier = Some(classifier);
        self
    }

    pub fn with_image_classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.image_classifier = Some(classifier);
        self
    }

    pub fn markers(&self) -> &Markers {
        &self.markers
    }

    pub fn rules(&self) -> &RulePipeline {
        &self.rules
    }

    /// Run one pass over `current`, using `previous` for temporal checks.
    pub async fn diff(
        &self,
        live: &SharedDocument,
        current: &mut Snapshot,
        previous: &mut Snapshot,
        mode: ScanMode,
    ) -> DiffOutcome {
        let mut outcome = DiffOutcome::default();
        if current.is_empty() {
            return outcome;
        }

        // (node, children already pushed)
        let mut stack: Vec<(SnapKey, bool)> = vec![(current.root(), false)];
        while let Some((key, expanded)) = stack.pop() {
            if !expanded {
                let phid = current.phid(key);
                if self.already_marked(live, phid) {
                    // Flagged earlier: its text must not count towards ancestors either.
                    current.excise(key);
                    if let Some(phid) = phid {
                        previous.excise_phid(phid);
                    }
                    continue;
                }
                stack.push((key, true));
                for child in current.element_children(key).into_iter().rev() {
                    stack.push((child, false));
                }
                continue;
            }

            if current.is_excised(key) {
                continue;
            }
            outcome.visited += 1;
            let Some(phid) = current.phid(key) else {
                continue;
            };
            if let Some((pattern, source, text)) = self.classify(current, previous, key, mode).await {
                let marked = self.mark(live, phid, &pattern, text);
                current.excise(key);
                previous.excise_phid(phid);
                if marked {
                    outcome.detections.push(Detection {
                        phid,
                        pattern,
                        source,
                    });
                } else {
                    outcome.stale += 1;
                }
            }
        }

        outcome
    }

    fn already_marked(&self, live: &SharedDocument, phid: Option<Phid>) -> bool {
        let Some(phid) = phid else {
            return false;
        };
        let doc = live.read();
        doc.find_by_phid(phid)
            .is_some_and(|k| doc.has_class(k, self.markers.detected()))
    }

    async fn classify(
        &self,
        current: &Snapshot,
        previous: &Snapshot,
        key: SnapKey,
        mode: ScanMode,
    ) -> Option<(PatternId, DetectionSource, String)> {
        let is_leaf = current.is_leaf(key);
        let is_image = current.tag(key).is_some_and(|t| t.eq_ignore_ascii_case("img"));

        if is_leaf && is_image && mode.includes_image() {
            let result = self.classify_image(current.attr(key, "src")).await;
            let pattern = resolve_label(&result.classification)?;
            return Some((pattern, DetectionSource::ImageModel, result.extracted_text));
        }
        if !mode.includes_text() {
            return None;
        }

        let view = current.view(key)?;
        let before = current
            .phid(key)
            .and_then(|phid| previous.find(phid))
            .and_then(|k| previous.view(k));
        if let Some(pattern) = self.rules.classify(&view, before.as_ref()) {
            debug!(pattern = %pattern, "Rule match");
            return Some((pattern.clone(), DetectionSource::Rule, view.text));
        }

        if is_leaf && self.limits.accepts(&view.text) {
            let result = self.classify_text(&view.text).await;
            let pattern = resolve_label(&result)?;
            if !self.rules.contains(&pattern) {
                debug!(pattern = %pattern, "Text model label is not in the pattern table");
            }
            return Some((pattern, DetectionSource::TextModel, view.text));
        }
        None
    }

    async fn classify_image(&self, src: Option<&str>) -> ImageClassification {
        let (Some(classifier), Some(src)) = (&self.image_classifier, src) else {
            return ImageClassification::background();
        };
        match classifier.classify_image(src).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, image = %src, "Image classification failed, treating as no pattern");
                ImageClassification::background()
            }
        }
    }

    async fn classify_text(&self, text: &str) -> Classification {
        let Some(classifier) = &self.text_classifier else {
            return Classification::background();
        };
        match classifier.classify_text(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Text classification failed, treating as no pattern");
                Classification::background()
            }
        }
    }

    /// Mark the live node and attach its feedback affordance.
    /// Returns false when the node no longer exists.
    fn mark(&self, live: &SharedDocument, phid: Phid, pattern: &PatternId, text: String) -> bool {
        let mut doc = live.write();
        let Some(key) = doc.find_by_phid(phid) else {
            debug!(%phid, pattern = %pattern, "Flagged node left the live tree, skipping");
            return false;
        };

        let specific = self.markers.specific(pattern);
        let marked = doc
            .add_class(key, self.markers.detected())
            .and_then(|_| doc.add_class(key, &specific));
        if let Err(e) = marked {
            warn!(%phid, error = %e, "Failed to mark node");
            return false;
        }

        if let Err(e) = self.attach_affordance(&mut doc, key) {
            debug!(%phid, error = %e, "Could not attach feedback affordance");
        }
        doc.register_feedback(phid, text);
        debug!(%phid, pattern = %pattern, "Marked node");
        true
    }

    fn attach_affordance(
        &self,
        doc: &mut Document,
        target: NodeKey,
    ) -> Result<(), DocumentError> {
        let container = doc.create_element("div");
        doc.add_class(container, self.markers.feedback())?;
        for positive in [true, false] {
            let button = doc.create_element("button");
            doc.add_class(button, &self.markers.feedback_button(positive))?;
            let label = if positive { "Dark pattern" } else { "Not a dark pattern" };
            doc.set_attribute(button, "aria-label", label)?;
            doc.append_child(container, button)?;
        }
        if let Some(phid) = doc.phid(target) {
            doc.set_attribute(container, "data-for", &phid.to_string())?;
        }
        if let Err(e) = doc.insert_after(target, container) {
            doc.discard(container)?;
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
