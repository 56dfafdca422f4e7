//! Document - owner of the node arena and the boundary marker
//!
//! Every document is shaped `#document > HTML > (HEAD, BODY)`. BODY is the
//! boundary marker: nesting depth is counted up to it, and no wrap or unwrap
//! ever acts on it or above it.
//!
//! Documents can also be built from a JSON snapshot of the body:
//! ```json
//! {
//!   "tag": "body",
//!   "children": [
//!     { "tag": "p", "attributes": { "id": "intro" }, "children": ["Hello"] }
//!   ]
//! }
//! ```
//! A child is either such an object or a string (a text node).

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::element_ref::Selector;
use crate::types::{DomNode, NodeId};
use crate::utils;
use serde_json::Value;

/// An HTML document tree
#[derive(Debug)]
pub struct Document {
    arena: DomArena,
    html: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        let (mut arena, root) = DomArena::with_document();
        let html = arena.create_element("html");
        let head = arena.create_element("head");
        let body = arena.create_element("body");
        arena.link(root, html);
        arena.link(html, head);
        arena.link(html, body);

        Self {
            arena,
            html,
            head,
            body,
        }
    }

    /// Build a document from a JSON snapshot rooted at `body`
    pub fn from_json(snapshot: &Value) -> Result<Self> {
        let tag = snapshot
            .get("tag")
            .and_then(Value::as_str)
            .ok_or_else(|| DomError::InvalidArgument("snapshot root needs a 'tag'".to_string()))?;
        if !tag.eq_ignore_ascii_case("body") {
            return Err(DomError::InvalidArgument(format!(
                "snapshot root must be 'body', got '{tag}'"
            )));
        }

        let mut doc = Self::new();
        let body = doc.body;
        doc.apply_snapshot_attributes(body, snapshot)?;
        doc.parse_children(body, snapshot)?;
        Ok(doc)
    }

    /// Build a document from a JSON snapshot string
    pub fn from_json_str(snapshot: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(snapshot)?;
        Self::from_json(&value)
    }

    /// Recursively parse a snapshot node, returns the new (attached) node
    fn parse_node(&mut self, parent: NodeId, value: &Value) -> Result<NodeId> {
        let node_id = match value {
            Value::String(text) => self.arena.create_text(text),
            Value::Object(_) => {
                let tag = value
                    .get("tag")
                    .and_then(Value::as_str)
                    .ok_or_else(|| DomError::InvalidArgument("element needs a 'tag'".to_string()))?;
                if !utils::is_valid_tag_name(tag) {
                    return Err(DomError::InvalidArgument(format!("invalid tag name '{tag}'")));
                }
                let id = self.arena.create_element(tag);
                self.apply_snapshot_attributes(id, value)?;
                id
            }
            other => {
                return Err(DomError::InvalidArgument(format!(
                    "unexpected snapshot node: {other}"
                )))
            }
        };

        self.arena.append_child(parent, node_id)?;
        self.parse_children(node_id, value)?;
        Ok(node_id)
    }

    fn parse_children(&mut self, node_id: NodeId, value: &Value) -> Result<()> {
        if let Some(children) = value.get("children").and_then(Value::as_array) {
            for child in children {
                self.parse_node(node_id, child)?;
            }
        }
        Ok(())
    }

    fn apply_snapshot_attributes(&mut self, node_id: NodeId, value: &Value) -> Result<()> {
        if let Some(attrs) = value.get("attributes").and_then(Value::as_object) {
            let node = self.arena.get_mut(node_id)?;
            for (key, attr_value) in attrs {
                match attr_value {
                    Value::String(s) => node.set_attr(key, s),
                    other => node.set_attr(key, &other.to_string()),
                }
            }
        }
        Ok(())
    }

    /// Get reference to internal arena
    pub fn arena(&self) -> &DomArena {
        &self.arena
    }

    /// Get mutable reference to internal arena
    pub fn arena_mut(&mut self) -> &mut DomArena {
        &mut self.arena
    }

    pub fn html(&self) -> NodeId {
        self.html
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    /// The boundary marker
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn is_body(&self, node_id: NodeId) -> bool {
        node_id == self.body
    }

    pub fn node(&self, node_id: NodeId) -> Result<&DomNode> {
        self.arena.get(node_id)
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.arena.parent(node_id)
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.arena.children(node_id)
    }

    /// Upper-cased tag of an element
    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.arena.get(node_id).ok().and_then(DomNode::tag_name)
    }

    /// First connected element matching the selector, in document order
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(Selector::parse(selector)?.select_first(&self.arena))
    }

    /// Every connected element matching the selector, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        Ok(Selector::parse(selector)?.select_all(&self.arena))
    }

    /// Concatenated text of the subtree
    pub fn text_content(&self, node_id: NodeId) -> Result<String> {
        utils::get_text_content(&self.arena, node_id)
    }

    /// Replace all children of the node with a single text node
    pub fn set_text_content(&mut self, node_id: NodeId, text: &str) -> Result<()> {
        let children: Vec<NodeId> = self.arena.children(node_id).to_vec();
        for child in children {
            self.arena.remove_child(node_id, child)?;
        }
        if !text.is_empty() {
            let text_id = self.arena.create_text(text);
            self.arena.append_child(node_id, text_id)?;
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
