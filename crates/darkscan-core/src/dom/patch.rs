//! Incremental mutations a host applies to keep the live document current.
//!
//! Patches address nodes by identity, so targets must have been tagged by a
//! previous scan (or exported via [`Document::to_page`]). Patches are applied
//! in order; a failing patch stops the batch and leaves earlier patches applied.

use darkscan_protocols::Phid;
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::geometry::BoundingBox;
use super::node::{ComputedStyle, NodeKey};
use super::page::PageNode;
use crate::error::DocumentError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DocumentPatch {
    /// Replace the children of an element with a single text node.
    SetText { target: Phid, text: String },
    SetAttribute { target: Phid, name: String, value: String },
    RemoveAttribute { target: Phid, name: String },
    /// Append a new subtree as the last child of `parent`.
    AppendChild { parent: Phid, node: PageNode },
    /// Insert a new subtree right after `reference`.
    InsertAfter { reference: Phid, node: PageNode },
    /// Remove a node and its entire subtree.
    Remove { target: Phid },
    SetStyle { target: Phid, style: ComputedStyle },
    SetLayout { target: Phid, layout: Option<BoundingBox> },
    Scroll { x: f64, y: f64 },
}

impl Document {
    fn resolve(&self, phid: Phid) -> Result<NodeKey, DocumentError> {
        self.find_by_phid(phid).ok_or(DocumentError::UnknownPhid(phid))
    }

    pub fn apply(&mut self, patch: &DocumentPatch) -> Result<(), DocumentError> {
        match patch {
            DocumentPatch::SetText { target, text } => {
                let key = self.resolve(*target)?;
                self.set_text(key, text)
            }
            DocumentPatch::SetAttribute { target, name, value } => {
                let key = self.resolve(*target)?;
                self.set_attribute(key, name, value)
            }
            DocumentPatch::RemoveAttribute { target, name } => {
                let key = self.resolve(*target)?;
                self.remove_attribute(key, name)
            }
            DocumentPatch::AppendChild { parent, node } => {
                let parent = self.resolve(*parent)?;
                let child = self.build(node);
                self.append_child(parent, child)
            }
            DocumentPatch::InsertAfter { reference, node } => {
                let reference = self.resolve(*reference)?;
                let child = self.build(node);
                self.insert_after(reference, child)
            }
            DocumentPatch::Remove { target } => {
                let key = self.resolve(*target)?;
                self.remove(key)
            }
            DocumentPatch::SetStyle { target, style } => {
                let key = self.resolve(*target)?;
                self.set_style(key, style.clone())
            }
            DocumentPatch::SetLayout { target, layout } => {
                let key = self.resolve(*target)?;
                self.set_layout(key, *layout)
            }
            DocumentPatch::Scroll { x, y } => {
                let viewport = self.viewport_mut();
                viewport.scroll_x = x.max(0.0);
                viewport.scroll_y = y.max(0.0);
                Ok(())
            }
        }
    }

    /// Apply patches in order, returning how many succeeded before the first failure.
    pub fn apply_all(&mut self, patches: &[DocumentPatch]) -> Result<usize, (usize, DocumentError)> {
        for (i, patch) in patches.iter().enumerate() {
            self.apply(patch).map_err(|e| (i, e))?;
        }
        Ok(patches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::page::Page;
    use crate::tagger::IdentityTagger;

    fn tagged_doc() -> Document {
        let page = Page {
            viewport: Default::default(),
            root: PageNode::element("body")
                .child(PageNode::element("p").text("Only 3 left"))
                .into(),
        };
        let mut doc = Document::from_page(&page).unwrap();
        let root = doc.root();
        IdentityTagger::new().tag(&mut doc, root);
        doc
    }

    #[test]
    fn test_patch_json_shape() {
        let patch: DocumentPatch =
            serde_json::from_str(r#"{"op":"set_text","target":2,"text":"Only 2 left"}"#).unwrap();
        assert!(matches!(patch, DocumentPatch::SetText { target: Phid(2), .. }));
    }

    #[test]
    fn test_apply_set_text() {
        let mut doc = tagged_doc();
        doc.apply(&DocumentPatch::SetText {
            target: Phid(2),
            text: "Only 2 left".to_string(),
        })
        .unwrap();
        let p = doc.find_by_phid(Phid(2)).unwrap();
        assert_eq!(doc.text_content(p), "Only 2 left");
    }

    #[test]
    fn test_apply_append_and_remove() {
        let mut doc = tagged_doc();
        doc.apply(&DocumentPatch::AppendChild {
            parent: Phid(1),
            node: PageNode::element("span").text("new").into(),
        })
        .unwrap();
        assert_eq!(doc.text_content(doc.root()), "Only 3 leftnew");

        doc.apply(&DocumentPatch::Remove { target: Phid(2) }).unwrap();
        assert_eq!(doc.text_content(doc.root()), "new");
        assert!(doc.find_by_phid(Phid(2)).is_none());
    }

    #[test]
    fn test_apply_unknown_target() {
        let mut doc = tagged_doc();
        let err = doc.apply(&DocumentPatch::Remove { target: Phid(99) }).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownPhid(Phid(99))));
    }

    #[test]
    fn test_apply_all_stops_at_failure() {
        let mut doc = tagged_doc();
        let patches = vec![
            DocumentPatch::Scroll { x: 0.0, y: 300.0 },
            DocumentPatch::Remove { target: Phid(42) },
            DocumentPatch::Scroll { x: 0.0, y: 600.0 },
        ];
        let (index, _) = doc.apply_all(&patches).unwrap_err();
        assert_eq!(index, 1);
        assert_eq!(doc.viewport().scroll_y, 300.0);
    }
}
