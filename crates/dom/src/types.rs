//! Core type definitions
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Use SmallVec for child lists (most elements have few children)
//! 3. Tag identity is stored upper-cased, the way the DOM reports `tagName`

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Node identifier (index into arena)
pub type NodeId = u32;

/// Node kinds the document tree holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Document = 9,
}

/// A node of the document tree
///
/// Navigation is by index: `parent_id` and `children_ids` point back into the
/// owning arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    pub parent_id: Option<NodeId>,
    pub children_ids: SmallVec<[NodeId; 4]>,

    /// `DIV`, `SPAN`, ... for elements, `#text` / `#document` otherwise
    pub node_name: String,
    /// Character data of text nodes
    pub node_value: String,
    pub attributes: HashMap<String, String>,
}

impl DomNode {
    fn new(node_id: NodeId, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            children_ids: SmallVec::new(),
            node_name,
            node_value: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Create a detached element node
    pub fn element(node_id: NodeId, tag: &str) -> Self {
        Self::new(node_id, NodeType::Element, tag.to_ascii_uppercase())
    }

    /// Create a detached text node
    pub fn text(node_id: NodeId, value: &str) -> Self {
        let mut node = Self::new(node_id, NodeType::Text, "#text".to_string());
        node.node_value = value.to_string();
        node
    }

    pub fn document(node_id: NodeId) -> Self {
        Self::new(node_id, NodeType::Document, "#document".to_string())
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    /// Check if node is an element
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if node is text
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Get attribute value
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Whitespace-separated entries of the `class` attribute
    pub fn class_list(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.class_list().any(|c| c == class_name)
    }
}

/// Attributes understood by the element factory
///
/// Deserializes from the same object shape the utilities have always taken:
/// `{"id": .., "classes": .., "href": .., "src": .., "textcontent": ..,
/// "title": .., "target": .., "type": ..}`. Unknown keys are ignored and
/// empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(rename = "textcontent", skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, value: impl Into<String>) -> Self {
        self.id = Some(value.into());
        self
    }

    pub fn classes(mut self, value: impl Into<String>) -> Self {
        self.classes = Some(value.into());
        self
    }

    pub fn href(mut self, value: impl Into<String>) -> Self {
        self.href = Some(value.into());
        self
    }

    pub fn src(mut self, value: impl Into<String>) -> Self {
        self.src = Some(value.into());
        self
    }

    pub fn text_content(mut self, value: impl Into<String>) -> Self {
        self.text_content = Some(value.into());
        self
    }

    pub fn title(mut self, value: impl Into<String>) -> Self {
        self.title = Some(value.into());
        self
    }

    pub fn target(mut self, value: impl Into<String>) -> Self {
        self.target = Some(value.into());
        self
    }

    pub fn kind(mut self, value: impl Into<String>) -> Self {
        self.kind = Some(value.into());
        self
    }

    /// Attribute-backed entries as `(attribute name, value)` pairs, skipping
    /// absent and empty values. Text content is not an attribute and is
    /// handled separately.
    pub fn attribute_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("id", &self.id),
            ("class", &self.classes),
            ("href", &self.href),
            ("src", &self.src),
            ("title", &self.title),
            ("target", &self.target),
            ("type", &self.kind),
        ]
        .into_iter()
        .filter_map(|(name, value)| match value.as_deref() {
            Some(v) if !v.is_empty() => Some((name, v)),
            _ => None,
        })
    }

    /// True when no entry would have an effect
    pub fn is_empty(&self) -> bool {
        self.attribute_pairs().next().is_none()
            && self.text_content.as_deref().map_or(true, str::is_empty)
    }
}

/// One container of a wrapper stack: a tag plus optional attributes
///
/// In JSON a spec is written `["div", {"id": "outer"}]`, `["div", null]`,
/// `["div"]` or just `"div"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawWrapperSpec", into = "(String, Option<AttributeSet>)")]
pub struct WrapperSpec {
    pub tag: String,
    pub attributes: Option<AttributeSet>,
}

impl WrapperSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: None,
        }
    }

    pub fn with_attributes(tag: impl Into<String>, attributes: AttributeSet) -> Self {
        Self {
            tag: tag.into(),
            attributes: Some(attributes),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawWrapperSpec {
    Pair(String, Option<AttributeSet>),
    Single((String,)),
    Bare(String),
}

impl From<RawWrapperSpec> for WrapperSpec {
    fn from(raw: RawWrapperSpec) -> Self {
        match raw {
            RawWrapperSpec::Pair(tag, attributes) => Self { tag, attributes },
            RawWrapperSpec::Single((tag,)) | RawWrapperSpec::Bare(tag) => Self::new(tag),
        }
    }
}

impl From<WrapperSpec> for (String, Option<AttributeSet>) {
    fn from(spec: WrapperSpec) -> Self {
        (spec.tag, spec.attributes)
    }
}

impl From<&str> for WrapperSpec {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// Attributes emitted by the serializer, in output order
pub const DEFAULT_INCLUDE_ATTRIBUTES: &[&str] = &[
    "id", "class", "href", "src", "title", "target", "type", "name", "role", "style",
];
