//! JSON description of a page, used by hosts to load and export the live tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, ViewportInfo};
use super::node::ComputedStyle;

/// A whole page: viewport plus the root element (usually `body`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub viewport: ViewportInfo,
    pub root: PageNode,
}

/// One node of a page description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PageNode {
    Text { text: String },
    Element(PageElement),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageElement {
    pub tag: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub style: ComputedStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageNode>,
}

impl PageNode {
    pub fn text(text: impl Into<String>) -> Self {
        PageNode::Text { text: text.into() }
    }

    pub fn element(tag: &str) -> PageElement {
        PageElement {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            style: ComputedStyle::default(),
            layout: None,
            children: Vec::new(),
        }
    }
}

impl PageElement {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn layout(mut self, layout: BoundingBox) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn child(mut self, child: impl Into<PageNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.child(PageNode::text(text))
    }
}

impl From<PageElement> for PageNode {
    fn from(value: PageElement) -> Self {
        PageNode::Element(value)
    }
}
