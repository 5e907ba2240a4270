//! One engine instance: the live document, its identity counter and the scan lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::debug;

use crate::dom::{Document, Page, SharedDocument};
use crate::error::DocumentError;
use crate::markers::Markers;
use crate::snapshot::Snapshot;
use crate::tagger::IdentityTagger;

/// Context shared by every pass over one document.
///
/// Independent sessions never share identities or locks, so several engines
/// can run in one process.
#[derive(Debug)]
pub struct ScanSession {
    document: SharedDocument,
    tagger: Mutex<IdentityTagger>,
    scanning: AtomicBool,
}

impl ScanSession {
    pub fn new(document: SharedDocument) -> Self {
        Self {
            document,
            tagger: Mutex::new(IdentityTagger::new()),
            scanning: AtomicBool::new(false),
        }
    }

    pub fn from_page(page: &Page) -> Result<Self, DocumentError> {
        Ok(Self::new(Document::from_page(page)?.into_shared()))
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    fn claim(&self) -> bool {
        self.scanning
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Claim the scan lock. `None` while another pass holds it.
    pub fn try_begin(&self) -> Option<ScanGuard<'_>> {
        self.claim().then(|| ScanGuard { session: self })
    }

    /// Like [`ScanSession::try_begin`], but the guard can move into a spawned task.
    pub fn try_begin_owned(self: &Arc<Self>) -> Option<OwnedScanGuard> {
        self.claim().then(|| OwnedScanGuard {
            session: Arc::clone(self),
        })
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Tag new elements, then copy the tree.
    pub fn capture(&self, denylist: &[String], markers: &Markers) -> Snapshot {
        let mut doc = self.document.write();
        let root = doc.root();
        let tagged = self.tagger.lock().tag(&mut doc, root);
        let snapshot = Snapshot::capture(&doc, root, denylist, markers);
        debug!(tagged, nodes = snapshot.len(), "Captured snapshot");
        snapshot
    }

    /// Replace the live tree with a new page. Identities keep counting up.
    pub fn load_page(&self, page: &Page) -> Result<(), DocumentError> {
        let fresh = Document::from_page(page)?;
        self.document.write().replace(fresh);
        Ok(())
    }
}

/// Holds the scan lock; releases it when dropped.
#[derive(Debug)]
pub struct ScanGuard<'a> {
    session: &'a ScanSession,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.session.scanning.store(false, Ordering::Release);
    }
}

/// Owning variant of [`ScanGuard`].
#[derive(Debug)]
pub struct OwnedScanGuard {
    session: Arc<ScanSession>,
}

impl Drop for OwnedScanGuard {
    fn drop(&mut self) {
        self.session.scanning.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::PageNode;
    use darkscan_protocols::Phid;

    fn page(text: &str) -> Page {
        Page {
            viewport: Default::default(),
            root: PageNode::element("body").child(PageNode::element("p").text(text)).into(),
        }
    }

    #[test]
    fn test_lock_is_exclusive_and_released_on_drop() {
        let session = ScanSession::from_page(&page("hello")).unwrap();
        let guard = session.try_begin();
        assert!(guard.is_some());
        assert!(session.is_scanning());
        assert!(session.try_begin().is_none());

        drop(guard);
        assert!(!session.is_scanning());
        assert!(session.try_begin().is_some());
    }

    #[test]
    fn test_owned_guard_shares_the_lock() {
        let session = Arc::new(ScanSession::from_page(&page("hello")).unwrap());
        let owned = session.try_begin_owned();
        assert!(owned.is_some());
        assert!(session.try_begin().is_none());
        assert!(session.try_begin_owned().is_none());

        let moved = std::thread::spawn(move || drop(owned));
        moved.join().unwrap();
        assert!(!session.is_scanning());
        assert!(session.try_begin_owned().is_some());
    }

    #[test]
    fn test_capture_tags_lazily() {
        let session = ScanSession::from_page(&page("hello")).unwrap();
        let first = session.capture(&[], &Markers::default());
        // body, p and the text node
        assert_eq!(first.len(), 3);
        assert!(first.find(Phid(2)).is_some());

        let second = session.capture(&[], &Markers::default());
        assert!(second.find(Phid(1)).is_some());
        assert!(second.find(Phid(3)).is_none());
    }

    #[test]
    fn test_load_page_never_reuses_identities() {
        let session = ScanSession::from_page(&page("one")).unwrap();
        session.capture(&[], &Markers::default());

        session.load_page(&page("two")).unwrap();
        let snapshot = session.capture(&[], &Markers::default());
        assert!(snapshot.find(Phid(1)).is_none());
        assert!(snapshot.find(Phid(3)).is_some());
        assert!(snapshot.find(Phid(4)).is_some());
    }

    #[test]
    fn test_sessions_are_independent() {
        let a = ScanSession::from_page(&page("a")).unwrap();
        let b = ScanSession::from_page(&page("b")).unwrap();
        let _guard = a.try_begin();
        assert!(b.try_begin().is_some());
        a.capture(&[], &Markers::default());
        assert!(b.capture(&[], &Markers::default()).find(Phid(1)).is_some());
    }
}
