//! A concrete, serde-deserializable stand-in for "a styled DOM" (§6 CLI
//! surface). Real HTML/CSS parsing is out of scope for this workspace, so
//! the CLI and the conformance test fixtures both describe documents
//! directly in this shape rather than pulling in an HTML parser.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arena::{Arena, NodeId};
use crate::dom::{Document, NodeKind};
use webbox_css::style::ComputedStyle;

/// The on-disk / in-test shape: a recursive tree literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureNode {
    pub tag: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub style: ComputedStyle,
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<FixtureNode>,
}

impl FixtureNode {
    pub fn element(tag: &str) -> Self {
        FixtureNode {
            tag: Some(tag.to_string()),
            attributes: BTreeMap::new(),
            style: ComputedStyle::default(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn text(content: &str) -> Self {
        FixtureNode {
            tag: None,
            attributes: BTreeMap::new(),
            style: ComputedStyle::default(),
            text: Some(content.to_string()),
            children: Vec::new(),
        }
    }

    pub fn with_style(mut self, style: ComputedStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_child(mut self, child: FixtureNode) -> Self {
        self.children.push(child);
        self
    }
}

enum Payload {
    Element { tag: String, attributes: BTreeMap<String, String>, style: ComputedStyle },
    Text(String),
}

/// The arena-backed tree actually walked by the layout orchestrator.
pub struct FixtureDocument {
    arena: Arena<Payload>,
    root: NodeId,
}

impl FixtureDocument {
    pub fn from_root(node: FixtureNode) -> Self {
        let mut arena = Arena::new();
        let root = Self::build(&mut arena, node);
        FixtureDocument { arena, root }
    }

    fn build(arena: &mut Arena<Payload>, node: FixtureNode) -> NodeId {
        let payload = match (&node.tag, &node.text) {
            (_, Some(text)) => Payload::Text(text.clone()),
            (Some(tag), None) => {
                Payload::Element { tag: tag.clone(), attributes: node.attributes.clone(), style: node.style.clone() }
            }
            (None, None) => Payload::Element {
                tag: "div".to_string(),
                attributes: node.attributes.clone(),
                style: node.style.clone(),
            },
        };
        let id = arena.alloc(payload);
        for child in node.children {
            let child_id = Self::build(arena, child);
            arena.append_child(id, child_id);
        }
        id
    }
}

impl Document for FixtureDocument {
    fn root(&self) -> NodeId {
        self.root
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.arena.get(node) {
            Payload::Element { .. } => NodeKind::Element,
            Payload::Text(_) => NodeKind::Text,
        }
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match self.arena.get(node) {
            Payload::Element { tag, .. } => Some(tag.as_str()),
            Payload::Text(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.arena.get(node) {
            Payload::Element { attributes, .. } => attributes.get(name).map(|s| s.as_str()),
            Payload::Text(_) => None,
        }
    }

    fn text_content(&self, node: NodeId) -> Option<&str> {
        match self.arena.get(node) {
            Payload::Text(t) => Some(t.as_str()),
            Payload::Element { .. } => None,
        }
    }

    fn style(&self, node: NodeId) -> &ComputedStyle {
        match self.arena.get(node) {
            Payload::Element { style, .. } => style,
            // Text nodes carry no style of their own; callers resolve font
            // properties from the nearest ancestor element instead.
            Payload::Text(_) => static_default(),
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.parent(node)
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.arena.node(node).first_child
    }

    fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.arena.node(node).last_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.node(node).next_sibling
    }
}

fn static_default() -> &'static ComputedStyle {
    use std::sync::OnceLock;
    static CELL: OnceLock<ComputedStyle> = OnceLock::new();
    CELL.get_or_init(ComputedStyle::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_walks_a_tree() {
        let doc = FixtureDocument::from_root(
            FixtureNode::element("body").with_child(FixtureNode::element("div")),
        );
        assert_eq!(doc.tag_name(doc.root()), Some("body"));
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.tag_name(div), Some("div"));
        assert_eq!(doc.parent(div), Some(doc.root()));
    }

    #[test]
    fn round_trips_through_json() {
        let doc = FixtureNode::element("div").with_child(FixtureNode::text("hello"));
        let json = serde_json::to_string(&doc).unwrap();
        let back: FixtureNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tag.as_deref(), Some("div"));
        assert_eq!(back.children[0].text.as_deref(), Some("hello"));
    }
}
