//! Unwrap engine - lift a node out of its enclosing ancestors
//!
//! `unwrap` walks `levels` ancestors up from the node, moves the node to sit
//! right before the last ancestor reached, and by default deletes that
//! ancestor along with whatever is still inside it. With one level and the
//! default deletion this undoes a single `wrap_around`.

use crate::accessor::{self, NodeRef};
use crate::document::Document;
use crate::error::Result;
use crate::nesting;
use crate::types::NodeId;
use crate::utils;
use serde::{Deserialize, Serialize};

/// How far to unwrap and what to do with the ancestor left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnwrapOptions {
    /// Ancestors to climb; zero makes the call a no-op
    pub levels: u32,
    /// Remove the boundary ancestor subtree after the move
    pub delete_ancestor: bool,
}

impl Default for UnwrapOptions {
    fn default() -> Self {
        Self {
            levels: 1,
            delete_ancestor: true,
        }
    }
}

impl UnwrapOptions {
    pub fn levels(levels: u32) -> Self {
        Self {
            levels,
            ..Self::default()
        }
    }

    /// Leave the emptied ancestor in the tree
    pub fn keep_ancestor(mut self) -> Self {
        self.delete_ancestor = false;
        self
    }

    /// Leading positive integer of a textual level count (`"2"`, `"3 levels"`)
    pub fn parse_levels(src: &str) -> Option<u32> {
        utils::parse_leading_int(src)
            .filter(|&n| n > 0)
            .and_then(|n| u32::try_from(n).ok())
    }

    /// Options for a textual level count; anything unparsable means zero levels
    pub fn from_levels_str(src: &str) -> Self {
        Self::levels(Self::parse_levels(src).unwrap_or(0))
    }
}

/// Unwrap `node`, returns the boundary ancestor when the tree changed
///
/// Silently does nothing when the node does not resolve, is BODY, sits
/// directly in BODY, or has fewer than `levels` ancestors below BODY.
pub fn unwrap<'a>(
    doc: &mut Document,
    node: impl Into<NodeRef<'a>>,
    options: UnwrapOptions,
) -> Result<Option<NodeId>> {
    let Some(node_id) = accessor::resolve(doc, node) else {
        tracing::trace!("unwrap: nothing to unwrap");
        return Ok(None);
    };
    if doc.is_body(node_id) {
        return Ok(None);
    }
    match doc.parent(node_id) {
        Some(parent) if !doc.is_body(parent) => {}
        _ => {
            tracing::trace!("unwrap: node {} has no ancestor to leave", node_id);
            return Ok(None);
        }
    }
    if options.levels == 0 {
        return Ok(None);
    }

    let depth = nesting::nesting_depth(doc, node_id).unwrap_or(0);
    if depth < options.levels as usize {
        tracing::trace!(
            "unwrap: node {} is {} deep, {} levels requested",
            node_id,
            depth,
            options.levels
        );
        return Ok(None);
    }

    let mut boundary = node_id;
    for _ in 0..options.levels {
        let Some(parent) = doc.parent(boundary) else {
            return Ok(None);
        };
        boundary = parent;
    }
    let Some(outer) = doc.parent(boundary) else {
        return Ok(None);
    };

    doc.arena_mut().insert_before(outer, node_id, boundary)?;
    if options.delete_ancestor {
        doc.arena_mut().remove_child(outer, boundary)?;
    }

    tracing::debug!(
        "unwrapped node {} past {} ({} levels, deleted: {})",
        node_id,
        boundary,
        options.levels,
        options.delete_ancestor
    );
    Ok(Some(boundary))
}
