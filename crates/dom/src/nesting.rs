//! Nesting inspector - how deep a node sits below the body
//!
//! Depth counts parent hops up to, but not including, BODY: a direct child of
//! BODY has depth 0. Nodes that are not inside BODY (detached subtrees, HEAD
//! content, BODY itself and what encloses it) have no depth at all.

use crate::accessor::{self, NodeRef};
use crate::console::Console;
use crate::document::Document;
use crate::types::NodeId;

/// Ancestor hops from the node to BODY
pub fn nesting_depth<'a>(doc: &Document, node: impl Into<NodeRef<'a>>) -> Option<usize> {
    let node_id = accessor::resolve(doc, node)?;
    if doc.is_body(node_id) {
        return None;
    }

    let mut depth = 0;
    let mut current = node_id;
    loop {
        let parent = doc.parent(current)?;
        if doc.is_body(parent) {
            return Some(depth);
        }
        depth += 1;
        current = parent;
    }
}

/// Ancestors from the parent upward, BODY excluded
pub fn ancestors<'a>(doc: &Document, node: impl Into<NodeRef<'a>>) -> Vec<NodeId> {
    let Some(node_id) = accessor::resolve(doc, node) else {
        return Vec::new();
    };
    if nesting_depth(doc, node_id).is_none() {
        return Vec::new();
    }

    let mut chain = Vec::new();
    let mut cursor = doc.parent(node_id);
    while let Some(ancestor) = cursor.filter(|&id| !doc.is_body(id)) {
        chain.push(ancestor);
        cursor = doc.parent(ancestor);
    }
    chain
}

/// `DIV > SECTION > ARTICLE`, nearest ancestor first
///
/// Lists as many ancestors as the node's depth, starting at its parent. A
/// direct child of BODY has depth 0 and reports its parent, `BODY`.
pub fn ancestor_chain<'a>(doc: &Document, node: impl Into<NodeRef<'a>>) -> Option<String> {
    let node_id = accessor::resolve(doc, node)?;
    let depth = nesting_depth(doc, node_id)?;

    let mut tags = Vec::with_capacity(depth.max(1));
    let mut cursor = doc.parent(node_id);
    while let Some(ancestor) = cursor {
        if tags.len() == depth.max(1) {
            break;
        }
        tags.push(doc.tag_name(ancestor)?);
        cursor = doc.parent(ancestor);
    }
    Some(tags.join(" > "))
}

/// Emit the ancestor chain to the console; no-op for unresolved nodes
pub fn print_ancestors<'a>(
    doc: &Document,
    node: impl Into<NodeRef<'a>>,
    console: &mut Console,
) -> Option<String> {
    let chain = ancestor_chain(doc, node)?;
    console.log(chain.clone());
    Some(chain)
}
