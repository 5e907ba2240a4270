use super::*;
use async_trait::async_trait;
use darkscan_protocols::ClassifierError;
use parking_lot::Mutex;

use crate::dom::{Document, Page, PageElement, PageNode};
use crate::tagger::IdentityTagger;

#[derive(Default)]
struct ScriptedText {
    response: Option<Classification>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl TextClassifier for ScriptedText {
    async fn classify_text(&self, text: &str) -> Result<Classification, ClassifierError> {
        self.calls.lock().push(text.to_string());
        if self.fail {
            return Err(ClassifierError::Status {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.response.clone().unwrap_or_default())
    }
}

#[derive(Default)]
struct ScriptedImage {
    response: Option<ImageClassification>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl ImageClassifier for ScriptedImage {
    async fn classify_image(&self, image_link: &str) -> Result<ImageClassification, ClassifierError> {
        self.calls.lock().push(image_link.to_string());
        Ok(self.response.clone().unwrap_or_default())
    }
}

fn live(body: PageElement) -> SharedDocument {
    let page = Page {
        viewport: Default::default(),
        root: body.into(),
    };
    Document::from_page(&page).unwrap().into_shared()
}

fn capture(doc: &SharedDocument, tagger: &mut IdentityTagger) -> Snapshot {
    let mut d = doc.write();
    let root = d.root();
    tagger.tag(&mut d, root);
    Snapshot::capture(&d, root, &["script".to_string()], &Markers::default())
}

fn engine() -> DiffEngine {
    DiffEngine::new(Arc::new(RulePipeline::builtin().unwrap()), Markers::default())
}

async fn scan(engine: &DiffEngine, doc: &SharedDocument, mode: ScanMode) -> DiffOutcome {
    let mut tagger = IdentityTagger::new();
    scan_with(engine, doc, &mut tagger, mode).await
}

async fn scan_with(
    engine: &DiffEngine,
    doc: &SharedDocument,
    tagger: &mut IdentityTagger,
    mode: ScanMode,
) -> DiffOutcome {
    let mut before = capture(doc, tagger);
    let mut now = capture(doc, tagger);
    engine.diff(doc, &mut now, &mut before, mode).await
}

#[tokio::test]
async fn test_rule_match_marks_live_node() {
    let doc = live(
        PageNode::element("body")
            .child(PageNode::element("p").text("Only 2 left in stock"))
            .child(PageNode::element("p").text("Welcome")),
    );
    let outcome = scan(&engine(), &doc, ScanMode::Text).await;

    assert_eq!(outcome.detections.len(), 1);
    let detection = &outcome.detections[0];
    assert_eq!(detection.pattern.as_str(), "scarcity");
    assert_eq!(detection.source, DetectionSource::Rule);

    let d = doc.read();
    let key = d.find_by_phid(detection.phid).unwrap();
    assert!(d.has_class(key, "__ph__pattern-detected"));
    assert!(d.has_class(key, "__ph__scarcity"));
    assert_eq!(d.feedback_text(detection.phid), Some("Only 2 left in stock"));

    let siblings = d.node(d.root()).unwrap().children().to_vec();
    let position = siblings.iter().position(|k| *k == key).unwrap();
    assert!(d.has_class(siblings[position + 1], "__ph__feedback"));
}

#[tokio::test]
async fn test_rule_match_never_reaches_text_model() {
    let classifier = Arc::new(ScriptedText::default());
    let engine = engine().with_text_classifier(classifier.clone());
    let doc = live(
        PageNode::element("body").child(PageNode::element("p").text("Only 2 left in stock, 3 sold today")),
    );
    let outcome = scan(&engine, &doc, ScanMode::Text).await;

    assert_eq!(outcome.detections.len(), 1);
    assert!(classifier.calls.lock().is_empty());
}

#[tokio::test]
async fn test_text_model_fallback() {
    let classifier = Arc::new(ScriptedText {
        response: Some(Classification::new(2, "scarcity")),
        ..Default::default()
    });
    let engine = engine().with_text_classifier(classifier.clone());
    let doc = live(
        PageNode::element("body").child(PageNode::element("p").text("Price drops at 12 noon for everyone")),
    );
    let outcome = scan(&engine, &doc, ScanMode::Text).await;

    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.detections[0].source, DetectionSource::TextModel);
    assert_eq!(outcome.detections[0].pattern.as_str(), "scarcity");
    assert_eq!(classifier.calls.lock().as_slice(), ["Price drops at 12 noon for everyone"]);
}

#[tokio::test]
async fn test_text_model_failure_is_fail_open() {
    let classifier = Arc::new(ScriptedText {
        fail: true,
        ..Default::default()
    });
    let engine = engine().with_text_classifier(classifier.clone());
    let doc = live(
        PageNode::element("body")
            .child(PageNode::element("p").text("Price drops at 12 noon for everyone"))
            .child(PageNode::element("p").text("Only 2 left")),
    );
    let outcome = scan(&engine, &doc, ScanMode::Text).await;

    assert_eq!(classifier.calls.lock().len(), 1);
    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.detections[0].pattern.as_str(), "scarcity");
}

#[tokio::test]
async fn test_text_model_gating() {
    let classifier = Arc::new(ScriptedText {
        response: Some(Classification::new(1, "countdown")),
        ..Default::default()
    });
    let engine = engine().with_text_classifier(classifier.clone());
    let doc = live(
        PageNode::element("body")
            .child(PageNode::element("p").text("short 1"))
            .child(PageNode::element("p").text("a long sentence without any digits")),
    );
    let outcome = scan(&engine, &doc, ScanMode::Text).await;

    assert!(outcome.detections.is_empty());
    assert!(classifier.calls.lock().is_empty());
}

#[tokio::test]
async fn test_flagged_child_shields_ancestor() {
    let doc = live(
        PageNode::element("body").child(
            PageNode::element("div")
                .child(PageNode::element("span").text("Only 2 left"))
                .text(" today, act fast"),
        ),
    );
    let outcome = scan(&engine(), &doc, ScanMode::Text).await;

    assert_eq!(outcome.detections.len(), 1);
    let d = doc.read();
    let key = d.find_by_phid(outcome.detections[0].phid).unwrap();
    assert_eq!(d.element(key).unwrap().tag, "span");
}

#[tokio::test]
async fn test_second_scan_is_idempotent() {
    let engine = engine();
    let doc = live(
        PageNode::element("body")
            .child(PageNode::element("p").text("Hurry up!"))
            .child(PageNode::element("p").text("Members only area")),
    );
    let mut tagger = IdentityTagger::new();
    let first = scan_with(&engine, &doc, &mut tagger, ScanMode::Text).await;
    assert_eq!(first.detections.len(), 2);

    let second = scan_with(&engine, &doc, &mut tagger, ScanMode::Text).await;
    assert!(second.detections.is_empty());
    let d = doc.read();
    assert_eq!(d.elements_with_class(d.root(), "__ph__feedback").len(), 2);
}

#[tokio::test]
async fn test_temporal_countdown_between_snapshots() {
    let engine = engine();
    let doc = live(PageNode::element("body").child(PageNode::element("span").text("Ends in 00:10:06")));
    let mut tagger = IdentityTagger::new();

    let mut before = capture(&doc, &mut tagger);
    {
        let mut d = doc.write();
        let root = d.root();
        let span = d.node(root).unwrap().children()[0];
        d.set_text(span, "Ends in 00:10:05").unwrap();
    }
    let mut now = capture(&doc, &mut tagger);
    let outcome = engine.diff(&doc, &mut now, &mut before, ScanMode::Text).await;

    assert_eq!(outcome.detections.len(), 1);
    assert_eq!(outcome.detections[0].pattern.as_str(), "countdown");
}

#[tokio::test]
async fn test_image_mode_uses_image_model_only() {
    let images = Arc::new(ScriptedImage {
        response: Some(ImageClassification {
            classification: Classification::new(1, "urgency"),
            extracted_text: "Hurry, sale ends tonight".to_string(),
        }),
        ..Default::default()
    });
    let engine = engine().with_image_classifier(images.clone());
    let doc = live(
        PageNode::element("body")
            .child(PageNode::element("img").attr("src", "https://shop.test/banner.png"))
            .child(PageNode::element("p").text("Only 2 left")),
    );
    let outcome = scan(&engine, &doc, ScanMode::Image).await;

    assert_eq!(images.calls.lock().as_slice(), ["https://shop.test/banner.png"]);
    assert_eq!(outcome.detections.len(), 1);
    let detection = &outcome.detections[0];
    assert_eq!(detection.source, DetectionSource::ImageModel);
    assert_eq!(detection.pattern.as_str(), "urgency");
    assert_eq!(doc.read().feedback_text(detection.phid), Some("Hurry, sale ends tonight"));
}

#[tokio::test]
async fn test_text_mode_skips_image_model() {
    let images = Arc::new(ScriptedImage::default());
    let engine = engine().with_image_classifier(images.clone());
    let doc = live(
        PageNode::element("body").child(PageNode::element("img").attr("src", "https://shop.test/a.png")),
    );
    let outcome = scan(&engine, &doc, ScanMode::Text).await;

    assert!(outcome.detections.is_empty());
    assert!(images.calls.lock().is_empty());
}

#[tokio::test]
async fn test_removed_live_node_is_stale() {
    let engine = engine();
    let doc = live(PageNode::element("body").child(PageNode::element("p").text("Hurry up!")));
    let mut tagger = IdentityTagger::new();
    let mut before = capture(&doc, &mut tagger);
    let mut now = capture(&doc, &mut tagger);
    {
        let mut d = doc.write();
        let root = d.root();
        let p = d.node(root).unwrap().children()[0];
        d.remove(p).unwrap();
    }
    let outcome = engine.diff(&doc, &mut now, &mut before, ScanMode::Text).await;

    assert!(outcome.detections.is_empty());
    assert_eq!(outcome.stale, 1);
}

#[tokio::test]
async fn test_denylisted_text_never_classified() {
    let doc = live(
        PageNode::element("body")
            .child(PageNode::element("script").text("hurry up now"))
            .child(PageNode::element("p").text("Hello")),
    );
    let outcome = scan(&engine(), &doc, ScanMode::Both).await;
    assert!(outcome.detections.is_empty());
}

#[test]
fn test_text_limits() {
    let limits = TextLimits::default();
    assert!(limits.accepts("Sale ends on the 12th of May"));
    assert!(!limits.accepts("12 items"));
    assert!(!limits.accepts("no digits in this long sentence at all"));
    assert!(!TextLimits { min_len: 0, max_len: 5 }.accepts("123456"));
}
