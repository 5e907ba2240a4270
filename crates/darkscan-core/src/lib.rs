//! # darkscan Core
//!
//! Dark pattern detection over a live document tree.
//!
//! ## Components
//!
//! - [`Document`] - Arena-backed live tree with identities and a mutation observer
//! - [`IdentityTagger`] - Lazily assigns stable identities to element nodes
//! - [`Snapshot`] - Detached copy of the live tree for one pass
//! - [`RulePipeline`] - Ordered pattern table with pluggable detectors
//! - [`DiffEngine`] - Post-order walk pairing two snapshots and classifying nodes
//! - [`aggregate`] / [`reveal`] - Host-facing report and highlight
//! - [`ScanSession`] - Identity counter and scan lock of one engine instance

pub mod aggregate;
pub mod dom;
pub mod engine;
pub mod error;
pub mod markers;
pub mod presenter;
pub mod rules;
pub mod session;
pub mod snapshot;
pub mod tagger;

pub use aggregate::aggregate;
pub use dom::{Document, DocumentPatch, MutationRecord, Page, PageNode, SharedDocument};
pub use engine::{Detection, DiffEngine, DiffOutcome, TextLimits};
pub use error::{DocumentError, EngineError, RuleError};
pub use markers::Markers;
pub use presenter::{clear_highlights, reveal};
pub use rules::{Detector, PatternDescriptor, RulePipeline};
pub use session::{OwnedScanGuard, ScanGuard, ScanSession};
pub use snapshot::{NodeView, Snapshot};
pub use tagger::IdentityTagger;
