//! Detached snapshots of the live tree.
//!
//! A snapshot keeps the shape of the live tree at capture time minus
//! denylisted and engine-owned subtrees. Nodes are excised by flag; the arena
//! itself is never reshaped, so keys stay valid for the whole pass.

use std::collections::{BTreeMap, HashMap};

use darkscan_protocols::Phid;

use crate::dom::{Document, NodeData, NodeKey};
use crate::markers::Markers;

/// Index of a node inside one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapKey(usize);

#[derive(Debug, Clone)]
enum SnapData {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
        phid: Option<Phid>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct SnapNode {
    data: SnapData,
    children: Vec<SnapKey>,
    excised: bool,
}

/// Read-only view of one snapshot element, handed to detectors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeView {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
}

impl NodeView {
    pub fn new(tag: &str, text: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            text: text.to_string(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    nodes: Vec<SnapNode>,
    root: SnapKey,
    index: HashMap<Phid, SnapKey>,
}

impl Snapshot {
    /// Copy the subtree at `root`, skipping `denylist` tags and engine-owned nodes.
    pub fn capture(doc: &Document, root: NodeKey, denylist: &[String], markers: &Markers) -> Self {
        let mut snapshot = Self {
            nodes: Vec::new(),
            root: SnapKey(0),
            index: HashMap::new(),
        };
        let mut stack: Vec<(NodeKey, Option<SnapKey>)> = vec![(root, None)];

        while let Some((key, parent)) = stack.pop() {
            let Some(node) = doc.node(key) else {
                continue;
            };
            let data = match node.data() {
                NodeData::Text(text) => SnapData::Text(text.clone()),
                NodeData::Element(el) => {
                    let is_root = parent.is_none();
                    if !is_root
                        && (denylist.iter().any(|t| el.is_tag(t)) || markers.is_owned(&el.classes))
                    {
                        continue;
                    }
                    SnapData::Element {
                        tag: el.tag.clone(),
                        attrs: el.attrs.clone(),
                        phid: el.phid,
                    }
                }
            };

            let snap_key = SnapKey(snapshot.nodes.len());
            if let SnapData::Element { phid: Some(phid), .. } = &data {
                snapshot.index.insert(*phid, snap_key);
            }
            snapshot.nodes.push(SnapNode {
                data,
                children: Vec::new(),
                excised: false,
            });
            if let Some(parent) = parent {
                snapshot.nodes[parent.0].children.push(snap_key);
            }
            for child in node.children().iter().rev() {
                stack.push((*child, Some(snap_key)));
            }
        }

        snapshot
    }

    pub fn root(&self) -> SnapKey {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Counterpart lookup by identity. Excised nodes are not found.
    pub fn find(&self, phid: Phid) -> Option<SnapKey> {
        self.index
            .get(&phid)
            .copied()
            .filter(|k| !self.nodes[k.0].excised)
    }

    pub fn phid(&self, key: SnapKey) -> Option<Phid> {
        match &self.nodes.get(key.0)?.data {
            SnapData::Element { phid, .. } => *phid,
            SnapData::Text(_) => None,
        }
    }

    pub fn tag(&self, key: SnapKey) -> Option<&str> {
        match &self.nodes.get(key.0)?.data {
            SnapData::Element { tag, .. } => Some(tag),
            SnapData::Text(_) => None,
        }
    }

    pub fn attr(&self, key: SnapKey, name: &str) -> Option<&str> {
        match &self.nodes.get(key.0)?.data {
            SnapData::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            SnapData::Text(_) => None,
        }
    }

    pub fn is_excised(&self, key: SnapKey) -> bool {
        self.nodes.get(key.0).is_none_or(|n| n.excised)
    }

    /// Non-excised element children in document order.
    pub fn element_children(&self, key: SnapKey) -> Vec<SnapKey> {
        self.nodes
            .get(key.0)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|c| {
                        let child = &self.nodes[c.0];
                        !child.excised && matches!(child.data, SnapData::Element { .. })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// True when no non-excised element children remain.
    pub fn is_leaf(&self, key: SnapKey) -> bool {
        self.element_children(key).is_empty()
    }

    /// Concatenated text of all non-excised descendants.
    pub fn text_content(&self, key: SnapKey) -> String {
        let mut out = String::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            let Some(node) = self.nodes.get(k.0) else {
                continue;
            };
            if node.excised {
                continue;
            }
            if let SnapData::Text(text) = &node.data {
                out.push_str(text);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn view(&self, key: SnapKey) -> Option<NodeView> {
        match &self.nodes.get(key.0)?.data {
            SnapData::Element { tag, attrs, .. } => Some(NodeView {
                tag: tag.clone(),
                attrs: attrs.clone(),
                text: self.text_content(key),
            }),
            SnapData::Text(_) => None,
        }
    }

    /// Mark a node removed. Its text no longer contributes to ancestors.
    pub fn excise(&mut self, key: SnapKey) {
        if let Some(node) = self.nodes.get_mut(key.0) {
            node.excised = true;
        }
    }

    /// Excise the node carrying `phid`, if present.
    pub fn excise_phid(&mut self, phid: Phid) {
        if let Some(key) = self.find(phid) {
            self.excise(key);
        }
    }
}
