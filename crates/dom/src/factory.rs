//! Element factory - detached elements from a tag and an attribute set

use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::{AttributeSet, NodeId, WrapperSpec};
use crate::utils;

/// Create a detached element
///
/// Only the recognized attributes of `attrs` are applied, and only when they
/// hold a non-empty value. The class list goes through the `class` attribute.
pub fn create(doc: &mut Document, tag: &str, attrs: Option<&AttributeSet>) -> Result<NodeId> {
    check_tag(tag)?;

    let node_id = doc.arena_mut().create_element(tag);
    let Some(attrs) = attrs else {
        return Ok(node_id);
    };

    let node = doc.arena_mut().get_mut(node_id)?;
    for (name, value) in attrs.attribute_pairs() {
        node.set_attr(name, value);
    }
    if let Some(text) = attrs.text_content.as_deref().filter(|t| !t.is_empty()) {
        doc.set_text_content(node_id, text)?;
    }
    Ok(node_id)
}

pub(crate) fn check_tag(tag: &str) -> Result<()> {
    if tag.is_empty() {
        return Err(DomError::InvalidArgument("tag must be defined".to_string()));
    }
    if !utils::is_valid_tag_name(tag) {
        return Err(DomError::InvalidArgument(format!("invalid tag name '{tag}'")));
    }
    Ok(())
}

/// Create one detached element per spec, in order
pub fn create_all(doc: &mut Document, specs: &[WrapperSpec]) -> Result<Vec<NodeId>> {
    specs
        .iter()
        .map(|spec| create(doc, &spec.tag, spec.attributes.as_ref()))
        .collect()
}

impl AttributeSet {
    /// Read the recognized attributes back from a node
    pub fn read_back(doc: &Document, node_id: NodeId) -> Result<Self> {
        let node = doc.node(node_id)?;
        let get = |name: &str| node.attr(name).map(str::to_string);
        let text = doc.text_content(node_id)?;
        Ok(Self {
            id: get("id"),
            classes: get("class"),
            href: get("href"),
            src: get("src"),
            text_content: (!text.is_empty()).then_some(text),
            title: get("title"),
            target: get("target"),
            kind: get("type"),
        })
    }
}
