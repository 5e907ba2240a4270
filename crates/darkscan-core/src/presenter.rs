//! Bringing a flagged node into view.

use darkscan_protocols::Phid;
use tracing::debug;

use crate::dom::Document;
use crate::error::DocumentError;
use crate::markers::Markers;

/// Remove every highlight overlay from the document.
pub fn clear_highlights(doc: &mut Document, markers: &Markers) -> Result<usize, DocumentError> {
    let root = doc.root();
    let overlays = doc.elements_with_class(root, markers.current_pattern());
    for key in &overlays {
        // Nested overlays go with their enclosing one.
        if doc.node(*key).is_some() {
            doc.remove(*key)?;
        }
    }
    Ok(overlays.len())
}

/// Scroll `phid` to the middle of the viewport and outline it.
///
/// Earlier overlays are removed first. Returns `false` when the identity no
/// longer resolves; the document is left without highlight then.
pub fn reveal(doc: &mut Document, markers: &Markers, phid: Phid) -> Result<bool, DocumentError> {
    clear_highlights(doc, markers)?;

    let Some(key) = doc.find_by_phid(phid) else {
        debug!(%phid, "Nothing to reveal");
        return Ok(false);
    };
    let Some(target) = doc.element(key).and_then(|el| el.layout) else {
        debug!(%phid, "Revealed node has no layout box, skipping overlay");
        return Ok(true);
    };

    doc.viewport_mut().center_on(&target);

    let overlay = doc.create_element("div");
    doc.add_class(overlay, markers.current_pattern())?;
    doc.set_layout(overlay, Some(target))?;
    let style = format!(
        "position: absolute; top: {}px; left: {}px; width: {}px; height: {}px",
        target.y, target.x, target.width, target.height
    );
    doc.set_attribute(overlay, "style", &style)?;
    let root = doc.root();
    doc.append_child(root, overlay)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundingBox, Page, PageNode, ViewportInfo};
    use crate::tagger::IdentityTagger;

    fn doc() -> Document {
        let page = Page {
            viewport: ViewportInfo::default(),
            root: PageNode::element("body")
                .child(
                    PageNode::element("p")
                        .layout(BoundingBox::new(40.0, 3000.0, 200.0, 20.0))
                        .text("Only 2 left"),
                )
                .child(PageNode::element("span").text("no layout"))
                .into(),
        };
        let mut doc = Document::from_page(&page).unwrap();
        let root = doc.root();
        IdentityTagger::new().tag(&mut doc, root);
        doc
    }

    #[test]
    fn test_reveal_centers_and_outlines() {
        let mut doc = doc();
        let markers = Markers::default();
        assert!(reveal(&mut doc, &markers, Phid(2)).unwrap());

        assert_eq!(doc.viewport().scroll_y, 3010.0 - 360.0);
        assert_eq!(doc.viewport().scroll_x, 0.0);

        let root = doc.root();
        let overlays = doc.elements_with_class(root, markers.current_pattern());
        assert_eq!(overlays.len(), 1);
        let overlay = doc.element(overlays[0]).unwrap();
        assert_eq!(overlay.layout, Some(BoundingBox::new(40.0, 3000.0, 200.0, 20.0)));
        assert!(overlay.attr("style").unwrap().contains("top: 3000px"));
    }

    #[test]
    fn test_reveal_replaces_previous_overlay() {
        let mut doc = doc();
        let markers = Markers::default();
        reveal(&mut doc, &markers, Phid(2)).unwrap();
        reveal(&mut doc, &markers, Phid(2)).unwrap();
        let root = doc.root();
        assert_eq!(doc.elements_with_class(root, markers.current_pattern()).len(), 1);
    }

    #[test]
    fn test_reveal_unknown_identity() {
        let mut doc = doc();
        let markers = Markers::default();
        reveal(&mut doc, &markers, Phid(2)).unwrap();

        assert!(!reveal(&mut doc, &markers, Phid(99)).unwrap());
        let root = doc.root();
        assert!(doc.elements_with_class(root, markers.current_pattern()).is_empty());
    }

    #[test]
    fn test_reveal_without_layout() {
        let mut doc = doc();
        let markers = Markers::default();
        assert!(reveal(&mut doc, &markers, Phid(3)).unwrap());
        assert_eq!(doc.viewport().scroll_y, 0.0);
        assert_eq!(clear_highlights(&mut doc, &markers).unwrap(), 0);
    }
}
