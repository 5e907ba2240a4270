//! Live document model.

mod document;
mod geometry;
mod node;
mod page;
mod patch;

pub use document::{Document, MutationKind, MutationRecord, PHID_ATTRIBUTE, SharedDocument};
pub use geometry::{BoundingBox, ViewportInfo};
pub use node::{ComputedStyle, ElementData, Node, NodeData, NodeKey};
pub use page::{Page, PageElement, PageNode};
pub use patch::DocumentPatch;
