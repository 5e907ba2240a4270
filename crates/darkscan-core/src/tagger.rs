//! Lazy identity tagging of live element nodes.

use darkscan_protocols::Phid;
use tracing::trace;

use crate::dom::{Document, NodeKey};

/// Assigns monotonically increasing identities to untagged elements.
///
/// The counter lives as long as the tagger, which belongs to one
/// [`ScanSession`](crate::session::ScanSession). Identities are never reused.
#[derive(Debug)]
pub struct IdentityTagger {
    next: u64,
}

impl Default for IdentityTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityTagger {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Tag every untagged element at or below `root`. Returns how many were tagged.
    pub fn tag(&mut self, doc: &mut Document, root: NodeKey) -> usize {
        let mut tagged = 0;
        for key in doc.preorder(root) {
            let needs_tag = doc.element(key).is_some_and(|el| el.phid.is_none());
            if !needs_tag {
                continue;
            }
            let phid = Phid(self.next);
            if doc.assign_phid(key, phid).is_ok() {
                self.next += 1;
                tagged += 1;
            }
        }
        if tagged > 0 {
            trace!(tagged, next = self.next, "Tagged new elements");
        }
        tagged
    }

    /// The identity the next new element will receive.
    pub fn peek_next(&self) -> Phid {
        Phid(self.next)
    }
}
