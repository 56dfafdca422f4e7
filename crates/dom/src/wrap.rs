//! Wrap engine and deep wrap driver
//!
//! `wrap_around` puts a new container exactly where the target used to sit
//! and moves the target inside it. `wrap_deeply` repeats that over a list of
//! wrapper specs. Every pass wraps whatever currently sits where the target
//! used to be, so the first spec applied ends up innermost:
//!
//! ```text
//! wrap_deeply(span, [div, section], forward)   body > section > div > span
//! wrap_deeply(span, [div, section], backward)  body > div > section > span
//! ```

use crate::accessor::{self, NodeRef};
use crate::arena::AdjacentPosition;
use crate::document::Document;
use crate::error::{DomError, Result};
use crate::factory;
use crate::types::{AttributeSet, NodeId, WrapperSpec};
use serde_json::Value;

/// Wrap `target` in a new `tag` element, returns the container
///
/// A target without a parent still ends up inside the container, but the
/// container itself stays detached.
pub fn wrap_around<'a>(
    doc: &mut Document,
    target: impl Into<NodeRef<'a>>,
    tag: &str,
    attrs: Option<&AttributeSet>,
) -> Result<NodeId> {
    let target = target.into();
    let node_id = accessor::resolve(doc, target)
        .ok_or_else(|| DomError::NotFound(describe(target)))?;
    wrap_node(doc, node_id, tag, attrs)
}

fn wrap_node(
    doc: &mut Document,
    node_id: NodeId,
    tag: &str,
    attrs: Option<&AttributeSet>,
) -> Result<NodeId> {
    if doc.arena().is_inclusive_ancestor(node_id, doc.body()) {
        return Err(DomError::InvalidArgument(format!(
            "{} encloses the body and cannot be wrapped",
            doc.node(node_id)?.node_name
        )));
    }

    let arena = doc.arena();
    let parent = arena.parent(node_id);
    let previous = arena.previous_sibling(node_id);
    let next = arena.next_sibling(node_id);

    let container = factory::create(doc, tag, attrs)?;
    doc.arena_mut().append_child(container, node_id)?;

    let Some(parent) = parent else {
        tracing::debug!("wrapped detached node {} in {}", node_id, tag);
        return Ok(container);
    };

    // One insertion is enough: either anchor yields the target's old slot
    let (anchor, position) = match (previous, next) {
        (Some(previous), _) => (previous, AdjacentPosition::AfterEnd),
        (None, Some(next)) => (next, AdjacentPosition::BeforeBegin),
        (None, None) => (parent, AdjacentPosition::BeforeEnd),
    };
    doc.arena_mut().insert_adjacent(anchor, position, container)?;

    tracing::debug!("wrapped node {} in {} (container {})", node_id, tag, container);
    Ok(container)
}

/// Wrap `target` once per spec, returns the containers in creation order
///
/// Forward mode walks `specs` from first to last, backward mode from last to
/// first. The target is resolved once; each later pass wraps the container
/// made by the pass before it. Every tag is checked before the first pass, so
/// a bad spec leaves the tree untouched.
pub fn wrap_deeply<'a>(
    doc: &mut Document,
    target: impl Into<NodeRef<'a>>,
    specs: &[WrapperSpec],
    forward: bool,
) -> Result<Vec<NodeId>> {
    if specs.is_empty() {
        return Ok(Vec::new());
    }
    let target = target.into();
    let node_id = accessor::resolve(doc, target)
        .ok_or_else(|| DomError::NotFound(describe(target)))?;
    for spec in specs {
        factory::check_tag(&spec.tag)?;
    }

    let ordered: Box<dyn Iterator<Item = &WrapperSpec>> = if forward {
        Box::new(specs.iter())
    } else {
        Box::new(specs.iter().rev())
    };

    let mut containers = Vec::with_capacity(specs.len());
    let mut outermost = node_id;
    for spec in ordered {
        outermost = wrap_node(doc, outermost, &spec.tag, spec.attributes.as_ref())?;
        containers.push(outermost);
    }
    Ok(containers)
}

/// Parse a JSON wrapper spec list such as `[["div", {"id": "a"}], ["section"]]`
pub fn parse_wrapper_specs(value: &Value) -> Result<Vec<WrapperSpec>> {
    if !value.is_array() {
        return Err(DomError::InvalidArgument(
            "wrapper specs must be an array".to_string(),
        ));
    }
    serde_json::from_value(value.clone())
        .map_err(|err| DomError::InvalidArgument(format!("malformed wrapper spec: {err}")))
}

pub(crate) fn describe(target: NodeRef<'_>) -> String {
    match target {
        NodeRef::Selector(selector) => format!("'{selector}'"),
        NodeRef::Node(node_id) => format!("node {node_id}"),
        NodeRef::None => "no element".to_string(),
    }
}
