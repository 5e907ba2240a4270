//! The live document: an arena tree with identity index, viewport and observer.

use std::collections::HashMap;
use std::sync::Arc;

use darkscan_protocols::Phid;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::geometry::{BoundingBox, ViewportInfo};
use super::node::{ComputedStyle, ElementData, Node, NodeData, NodeKey};
use super::page::{Page, PageElement, PageNode};
use crate::error::DocumentError;

/// Attribute mirroring a node's identity.
pub const PHID_ATTRIBUTE: &str = "data-phid";

/// Live document shared between the scheduler, the engine and the host surface.
pub type SharedDocument = Arc<RwLock<Document>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

/// One observed change. `target` is the nearest tagged element, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: Option<Phid>,
}

#[derive(Debug)]
struct Observer {
    tx: mpsc::UnboundedSender<MutationRecord>,
    armed: bool,
}

#[derive(Debug)]
pub struct Document {
    /// `None` marks a released slot waiting in `free`.
    nodes: Vec<Option<Node>>,
    free: Vec<NodeKey>,
    root: NodeKey,
    phids: HashMap<Phid, NodeKey>,
    viewport: ViewportInfo,
    feedback: HashMap<Phid, String>,
    observer: Option<Observer>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document with a `body` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeData::Element(ElementData::new("body"))))],
            free: Vec::new(),
            root: NodeKey(0),
            phids: HashMap::new(),
            viewport: ViewportInfo::default(),
            feedback: HashMap::new(),
            observer: None,
        }
    }

    pub fn from_page(page: &Page) -> Result<Self, DocumentError> {
        let PageNode::Element(root) = &page.root else {
            return Err(DocumentError::InvalidPage("root must be an element".to_string()));
        };
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeKey(0),
            phids: HashMap::new(),
            viewport: page.viewport,
            feedback: HashMap::new(),
            observer: None,
        };
        doc.root = doc.build_element(root);
        Ok(doc)
    }

    /// Swap in a freshly loaded tree, keeping the attached observer.
    ///
    /// Feedback texts and identities of the old tree are dropped with it.
    pub fn replace(&mut self, mut other: Document) {
        other.observer = self.observer.take();
        *self = other;
        let root = self.root;
        self.notify(MutationKind::ChildList, root);
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    /// Build a detached subtree from a page description.
    pub fn build(&mut self, node: &PageNode) -> NodeKey {
        match node {
            PageNode::Text { text } => self.create_text(text),
            PageNode::Element(el) => self.build_element(el),
        }
    }

    fn build_element(&mut self, el: &PageElement) -> NodeKey {
        let mut data = ElementData::new(&el.tag);
        for (name, value) in &el.attrs {
            match name.as_str() {
                "class" => data.classes = value.split_whitespace().map(String::from).collect(),
                PHID_ATTRIBUTE => {}
                _ => {
                    data.attrs.insert(name.to_ascii_lowercase(), value.clone());
                }
            }
        }
        data.style = el.style.clone();
        data.layout = el.layout;
        let key = self.push(NodeData::Element(data));
        for child in &el.children {
            let child_key = self.build(child);
            self.link(key, child_key, None);
        }
        key
    }

    /// Export the subtree at `key`, identities included as attributes.
    pub fn to_page(&self, key: NodeKey) -> Option<PageNode> {
        let node = self.node(key)?;
        Some(match &node.data {
            NodeData::Text(text) => PageNode::text(text.clone()),
            NodeData::Element(el) => {
                let mut attrs = el.attrs.clone();
                if !el.classes.is_empty() {
                    attrs.insert("class".to_string(), el.classes.join(" "));
                }
                PageNode::Element(PageElement {
                    tag: el.tag.clone(),
                    attrs,
                    style: el.style.clone(),
                    layout: el.layout,
                    children: node.children.iter().filter_map(|c| self.to_page(*c)).collect(),
                })
            }
        })
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key.0)?.as_ref()
    }

    fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key.0)?.as_mut()
    }

    pub fn element(&self, key: NodeKey) -> Option<&ElementData> {
        self.node(key).and_then(Node::as_element)
    }

    fn element_mut(&mut self, key: NodeKey) -> Result<&mut ElementData, DocumentError> {
        self.node_mut(key)
            .ok_or(DocumentError::UnknownNode)?
            .as_element_mut()
            .ok_or(DocumentError::NotAnElement)
    }

    /// Number of slots in the arena, released ones included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, data: NodeData) -> NodeKey {
        if let Some(key) = self.free.pop() {
            self.nodes[key.0] = Some(Node::new(data));
            return key;
        }
        self.nodes.push(Some(Node::new(data)));
        NodeKey(self.nodes.len() - 1)
    }

    /// Drop a detached subtree: purge its identities and feedback texts and
    /// hand its slots back to the arena. Keys into it stop resolving.
    fn release(&mut self, key: NodeKey) {
        for k in self.preorder(key) {
            if let Some(phid) = self.phid(k) {
                if self.phids.get(&phid) == Some(&k) {
                    self.phids.remove(&phid);
                }
                self.feedback.remove(&phid);
            }
            self.nodes[k.0] = None;
            self.free.push(k);
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeKey {
        self.push(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.push(NodeData::Text(text.to_string()))
    }

    fn link(&mut self, parent: NodeKey, child: NodeKey, position: Option<usize>) {
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        let Some(parent) = self.node_mut(parent) else {
            return;
        };
        let children = &mut parent.children;
        match position {
            Some(pos) if pos <= children.len() => children.insert(pos, child),
            _ => children.push(child),
        }
    }

    fn unlink(&mut self, key: NodeKey) {
        let Some(parent) = self.node_mut(key).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.node_mut(parent) {
            parent.children.retain(|c| *c != key);
        }
    }

    fn check_insert(&self, parent: NodeKey, child: NodeKey) -> Result<(), DocumentError> {
        let parent_node = self.node(parent).ok_or(DocumentError::UnknownNode)?;
        if !parent_node.is_element() {
            return Err(DocumentError::NotAnElement);
        }
        self.node(child).ok_or(DocumentError::UnknownNode)?;
        if child == self.root || self.ancestors_inclusive(parent).any(|a| a == child) {
            return Err(DocumentError::Cycle);
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DocumentError> {
        self.check_insert(parent, child)?;
        self.unlink(child);
        self.link(parent, child, None);
        self.notify(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Insert `node` as the next sibling of `reference`.
    pub fn insert_after(&mut self, reference: NodeKey, node: NodeKey) -> Result<(), DocumentError> {
        let parent = self
            .node(reference)
            .ok_or(DocumentError::UnknownNode)?
            .parent
            .ok_or(DocumentError::Detached)?;
        self.check_insert(parent, node)?;
        self.unlink(node);
        let pos = self
            .node(parent)
            .and_then(|p| p.children.iter().position(|c| *c == reference))
            .map(|p| p + 1);
        self.link(parent, node, pos);
        self.notify(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Remove a subtree. Its identities stop resolving and its slots are reused.
    pub fn remove(&mut self, key: NodeKey) -> Result<(), DocumentError> {
        if key == self.root {
            return Err(DocumentError::RootRemoval);
        }
        let parent = self
            .node(key)
            .ok_or(DocumentError::UnknownNode)?
            .parent
            .ok_or(DocumentError::Detached)?;
        self.unlink(key);
        self.release(key);
        self.notify(MutationKind::ChildList, parent);
        Ok(())
    }

    /// Throw away a subtree that never made it into the tree.
    pub fn discard(&mut self, key: NodeKey) -> Result<(), DocumentError> {
        if key == self.root {
            return Err(DocumentError::RootRemoval);
        }
        self.node(key).ok_or(DocumentError::UnknownNode)?;
        if self.is_attached(key) {
            return self.remove(key);
        }
        self.unlink(key);
        self.release(key);
        Ok(())
    }

    /// Replace text. On an element, replaces all children with one text node.
    pub fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DocumentError> {
        let node = self.node_mut(key).ok_or(DocumentError::UnknownNode)?;
        if let NodeData::Text(existing) = &mut node.data {
            *existing = text.to_string();
            self.notify(MutationKind::CharacterData, key);
            return Ok(());
        }
        let old = std::mem::take(&mut node.children);
        for child in old {
            if let Some(child_node) = self.node_mut(child) {
                child_node.parent = None;
            }
            self.release(child);
        }
        let text_key = self.create_text(text);
        self.link(key, text_key, None);
        self.notify(MutationKind::ChildList, key);
        Ok(())
    }

    pub fn set_attribute(&mut self, key: NodeKey, name: &str, value: &str) -> Result<(), DocumentError> {
        let el = self.element_mut(key)?;
        let name = name.to_ascii_lowercase();
        if name == "class" {
            el.classes = value.split_whitespace().map(String::from).collect();
        } else {
            el.attrs.insert(name, value.to_string());
        }
        self.notify(MutationKind::Attributes, key);
        Ok(())
    }

    pub fn remove_attribute(&mut self, key: NodeKey, name: &str) -> Result<(), DocumentError> {
        let el = self.element_mut(key)?;
        let name = name.to_ascii_lowercase();
        if name == "class" {
            el.classes.clear();
        } else {
            el.attrs.remove(&name);
        }
        self.notify(MutationKind::Attributes, key);
        Ok(())
    }

    pub fn add_class(&mut self, key: NodeKey, class: &str) -> Result<(), DocumentError> {
        let el = self.element_mut(key)?;
        if !el.has_class(class) {
            el.classes.push(class.to_string());
        }
        self.notify(MutationKind::Attributes, key);
        Ok(())
    }

    pub fn has_class(&self, key: NodeKey, class: &str) -> bool {
        self.element(key).is_some_and(|el| el.has_class(class))
    }

    pub fn set_style(&mut self, key: NodeKey, style: ComputedStyle) -> Result<(), DocumentError> {
        self.element_mut(key)?.style = style;
        self.notify(MutationKind::Attributes, key);
        Ok(())
    }

    pub fn set_layout(&mut self, key: NodeKey, layout: Option<BoundingBox>) -> Result<(), DocumentError> {
        self.element_mut(key)?.layout = layout;
        self.notify(MutationKind::Attributes, key);
        Ok(())
    }

    pub fn phid(&self, key: NodeKey) -> Option<Phid> {
        self.element(key).and_then(|el| el.phid)
    }

    /// Resolve an identity to an attached node.
    pub fn find_by_phid(&self, phid: Phid) -> Option<NodeKey> {
        self.phids.get(&phid).copied().filter(|k| self.is_attached(*k))
    }

    pub(crate) fn assign_phid(&mut self, key: NodeKey, phid: Phid) -> Result<(), DocumentError> {
        let el = self.element_mut(key)?;
        el.phid = Some(phid);
        el.attrs.insert(PHID_ATTRIBUTE.to_string(), phid.to_string());
        self.phids.insert(phid, key);
        self.notify(MutationKind::Attributes, key);
        Ok(())
    }

    pub fn is_attached(&self, key: NodeKey) -> bool {
        self.ancestors_inclusive(key).last() == Some(self.root)
    }

    /// `key` followed by its parent chain up to the top.
    pub fn ancestors_inclusive(&self, key: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.node(key).map(|_| key), move |k| {
            self.node(*k).and_then(|n| n.parent)
        })
    }

    /// Every node of the subtree in document order.
    pub fn preorder(&self, key: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        if self.node(key).is_none() {
            return out;
        }
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.node(k) {
                out.push(k);
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Elements of the subtree carrying `class`, in document order.
    pub fn elements_with_class(&self, key: NodeKey, class: &str) -> Vec<NodeKey> {
        self.preorder(key)
            .into_iter()
            .filter(|k| self.has_class(*k, class))
            .collect()
    }

    /// True when the element has no element children.
    pub fn is_leaf(&self, key: NodeKey) -> bool {
        self.node(key)
            .is_some_and(|n| !n.children.iter().any(|c| self.node(*c).is_some_and(Node::is_element)))
    }

    pub fn text_content(&self, key: NodeKey) -> String {
        self.preorder(key)
            .into_iter()
            .filter_map(|k| match self.node(k).map(Node::data) {
                Some(NodeData::Text(t)) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn viewport(&self) -> &ViewportInfo {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportInfo {
        &mut self.viewport
    }

    /// Remember the text a feedback affordance reports for `phid`.
    pub fn register_feedback(&mut self, phid: Phid, text: String) {
        self.feedback.insert(phid, text);
    }

    pub fn feedback_text(&self, phid: Phid) -> Option<&str> {
        self.feedback.get(&phid).map(String::as_str)
    }

    /// Route mutation records to `tx` and start observing.
    pub fn attach_observer(&mut self, tx: mpsc::UnboundedSender<MutationRecord>) {
        self.observer = Some(Observer { tx, armed: true });
    }

    /// Resume delivering records to the attached observer.
    pub fn observe(&mut self) {
        if let Some(observer) = &mut self.observer {
            observer.armed = true;
        }
    }

    /// Stop delivering records until [`Document::observe`] is called.
    pub fn disconnect_observer(&mut self) {
        if let Some(observer) = &mut self.observer {
            observer.armed = false;
        }
    }

    pub fn is_observing(&self) -> bool {
        self.observer.as_ref().is_some_and(|o| o.armed)
    }

    fn notify(&mut self, kind: MutationKind, key: NodeKey) {
        let Some(observer) = &self.observer else {
            return;
        };
        if !observer.armed {
            return;
        }
        let target = self
            .ancestors_inclusive(key)
            .find_map(|k| self.phid(k));
        if observer.tx.send(MutationRecord { kind, target }).is_err() {
            self.observer = None;
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
