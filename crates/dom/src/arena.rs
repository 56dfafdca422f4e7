//! Arena-based DOM tree storage
//!
//! Nodes live in a single `Vec<DomNode>` and refer to each other by
//! `NodeId`. Nothing is ever freed: removing a node only disconnects it, so
//! an id handed out once stays addressable for the lifetime of the arena.
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [#document][HTML][HEAD][BODY][DIV]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! All structural mutation goes through the primitives here
//! (`append_child`, `insert_before`, `insert_adjacent`, `remove_child`, ...),
//! which keep `parent_id` and `children_ids` consistent with each other.

use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Where `insert_adjacent` places a node relative to its anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdjacentPosition {
    /// Immediately before the anchor, as a sibling
    BeforeBegin,
    /// As the first child of the anchor
    AfterBegin,
    /// As the last child of the anchor
    BeforeEnd,
    /// Immediately after the anchor, as a sibling
    AfterEnd,
}

/// Arena allocator for DOM nodes
#[derive(Debug)]
pub struct DomArena {
    /// All nodes stored sequentially (cache-friendly)
    nodes: Vec<DomNode>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    /// Create an arena holding a single document node as its root
    pub fn with_document() -> (Self, NodeId) {
        let mut arena = Self::new();
        let root = arena.add_node(DomNode::document(0));
        arena.root_id = Some(root);
        (arena, root)
    }

    /// Add a detached node to the arena, returns its ID
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.nodes.len() as NodeId;
        node.node_id = node_id;
        node.parent_id = None;
        node.children_ids.clear();
        self.nodes.push(node);
        node_id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.add_node(DomNode::element(0, tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, value: &str) -> NodeId {
        self.add_node(DomNode::text(0, value))
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Get node by ID (mutable)
    pub fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Total number of nodes, connected or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent of a node, `None` for detached nodes and the root
    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id as usize).and_then(|n| n.parent_id)
    }

    /// Child ids in order; empty for unknown ids
    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id as usize)
            .map(|n| n.children_ids.as_slice())
            .unwrap_or(&[])
    }

    /// Position of a node among its parent's children
    pub fn child_index(&self, node_id: NodeId) -> Option<usize> {
        let parent = self.parent(node_id)?;
        self.children(parent).iter().position(|&id| id == node_id)
    }

    /// Immediately preceding sibling, any node type
    pub fn previous_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let index = self.child_index(node_id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Immediately following sibling, any node type
    pub fn next_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let index = self.child_index(node_id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Whether the node is reachable from the root
    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let Some(root) = self.root_id else {
            return false;
        };
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    /// Whether `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Traverse tree depth-first in document order (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    /// Nodes of the subtree at `start_id` in document order, `start_id` first
    ///
    /// Unknown ids yield nothing.
    pub fn descendants(&self, start_id: NodeId) -> Descendants<'_> {
        Descendants {
            arena: self,
            stack: vec![start_id],
        }
    }

    /// Connected nodes matching predicate, in document order
    pub fn find<F>(&self, mut predicate: F) -> Vec<NodeId>
    where
        F: FnMut(&DomNode) -> bool,
    {
        let Some(root) = self.root_id else {
            return Vec::new();
        };
        self.descendants(root)
            .filter(|node| predicate(node))
            .map(|node| node.node_id)
            .collect()
    }

    /// First connected node matching predicate
    pub fn find_one<F>(&self, mut predicate: F) -> Option<NodeId>
    where
        F: FnMut(&DomNode) -> bool,
    {
        let root = self.root_id?;
        self.descendants(root)
            .find(|node| predicate(node))
            .map(|node| node.node_id)
    }

    /// Find all elements by tag name
    pub fn find_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find(|node| node.is_element() && node.node_name.eq_ignore_ascii_case(tag))
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;
        if !matches!(parent_node.node_type, NodeType::Element | NodeType::Document) {
            return Err(DomError::HierarchyRequest(format!(
                "{} cannot have children",
                parent_node.node_name
            )));
        }
        if child_node.node_type == NodeType::Document || Some(child) == self.root_id {
            return Err(DomError::HierarchyRequest(
                "the document cannot be inserted".to_string(),
            ));
        }
        // Parent must not be inside child's subtree
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::HierarchyRequest(format!(
                "inserting node {child} into {parent} would create a cycle"
            )));
        }
        Ok(())
    }

    /// Append a freshly created, detached node without validation
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent as usize].children_ids.push(child);
        self.nodes[child as usize].parent_id = Some(parent);
    }

    /// Disconnect a node from its parent; no-op when already detached
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let parent = self.get(node_id)?.parent_id;
        if let Some(parent) = parent {
            self.get_mut(parent)?.children_ids.retain(|id| *id != node_id);
            self.get_mut(node_id)?.parent_id = None;
        }
        Ok(())
    }

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        self.detach(child)?;
        self.get_mut(parent)?.children_ids.push(child);
        self.get_mut(child)?.parent_id = Some(parent);
        Ok(())
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        match self.children(parent).first().copied() {
            Some(reference) => self.insert_before(parent, child, reference),
            None => self.append_child(parent, child),
        }
    }

    /// Insert `child` into `parent` immediately before `reference`
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insertion(parent, child)?;
        if self.parent(reference) != Some(parent) {
            return Err(DomError::HierarchyRequest(format!(
                "node {reference} is not a child of {parent}"
            )));
        }
        if child == reference {
            return Ok(());
        }

        self.detach(child)?;
        let index = self
            .child_index(reference)
            .ok_or_else(|| DomError::HierarchyRequest(format!("node {reference} is detached")))?;
        self.get_mut(parent)?.children_ids.insert(index, child);
        self.get_mut(child)?.parent_id = Some(parent);
        Ok(())
    }

    /// Insert `child` immediately after `target`; no-op when `target` has no parent
    pub fn insert_after(&mut self, target: NodeId, child: NodeId) -> Result<()> {
        let Some(parent) = self.parent(target) else {
            return Ok(());
        };
        if child == target {
            return Ok(());
        }
        // Compute the follower with `child` out of the way, it may be the follower itself
        self.check_insertion(parent, child)?;
        self.detach(child)?;
        match self.next_sibling(target) {
            Some(next) => self.insert_before(parent, child, next),
            None => self.append_child(parent, child),
        }
    }

    /// `insertAdjacentElement` semantics. The sibling positions are no-ops
    /// when the anchor has no parent.
    pub fn insert_adjacent(
        &mut self,
        anchor: NodeId,
        position: AdjacentPosition,
        node: NodeId,
    ) -> Result<()> {
        match position {
            AdjacentPosition::BeforeBegin => match self.parent(anchor) {
                Some(parent) => self.insert_before(parent, node, anchor),
                None => Ok(()),
            },
            AdjacentPosition::AfterBegin => self.prepend_child(anchor, node),
            AdjacentPosition::BeforeEnd => self.append_child(anchor, node),
            AdjacentPosition::AfterEnd => self.insert_after(anchor, node),
        }
    }

    /// Remove `child` (and its subtree) from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::HierarchyRequest(format!(
                "node {child} is not a child of {parent}"
            )));
        }
        self.detach(child)
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first walk returned by [`DomArena::descendants`]
pub struct Descendants<'a> {
    arena: &'a DomArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node_id) = self.stack.pop() {
            let Some(node) = self.arena.nodes.get(node_id as usize) else {
                continue;
            };
            // Reverse push so children come out left-to-right
            self.stack.extend(node.children_ids.iter().rev());
            return Some(node);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> [a, b, c]
    fn three_children() -> (DomArena, NodeId, [NodeId; 3]) {
        let mut arena = DomArena::new();
        let root = arena.create_element("div");
        arena.set_root(root).unwrap();
        let a = arena.create_element("a");
        let b = arena.create_element("b");
        let c = arena.create_element("i");
        for id in [a, b, c] {
            arena.append_child(root, id).unwrap();
        }
        (arena, root, [a, b, c])
    }

    #[test]
    fn test_arena_basic() {
        let mut arena = DomArena::new();
        let id = arena.create_element("div");
        assert_eq!(id, 0);

        let retrieved = arena.get(id).unwrap();
        assert_eq!(retrieved.node_name, "DIV");
        assert!(retrieved.parent_id.is_none());
        assert!(matches!(arena.get(7), Err(DomError::NodeNotFound(7))));
    }

    #[test]
    fn test_siblings() {
        let (arena, root, [a, b, c]) = three_children();
        assert_eq!(arena.previous_sibling(b), Some(a));
        assert_eq!(arena.next_sibling(b), Some(c));
        assert_eq!(arena.previous_sibling(a), None);
        assert_eq!(arena.next_sibling(c), None);
        assert_eq!(arena.child_index(c), Some(2));
        assert_eq!(arena.previous_sibling(root), None);
    }

    #[test]
    fn test_append_moves_node() {
        let (mut arena, root, [a, b, c]) = three_children();
        arena.append_child(c, a).unwrap();
        assert_eq!(arena.children(root), &[b, c]);
        assert_eq!(arena.children(c), &[a]);
        assert_eq!(arena.parent(a), Some(c));
    }

    #[test]
    fn test_insert_adjacent_positions() {
        let (mut arena, root, [a, b, c]) = three_children();
        let x = arena.create_element("x");
        let y = arena.create_element("y");
        let z = arena.create_element("z");
        let w = arena.create_element("w");

        arena.insert_adjacent(b, AdjacentPosition::BeforeBegin, x).unwrap();
        arena.insert_adjacent(b, AdjacentPosition::AfterEnd, y).unwrap();
        arena.insert_adjacent(b, AdjacentPosition::AfterBegin, z).unwrap();
        arena.insert_adjacent(b, AdjacentPosition::BeforeEnd, w).unwrap();

        assert_eq!(arena.children(root), &[a, x, b, y, c]);
        assert_eq!(arena.children(b), &[z, w]);
    }

    #[test]
    fn test_insert_after_own_follower() {
        let (mut arena, root, [a, b, c]) = three_children();
        arena.insert_after(a, b).unwrap();
        assert_eq!(arena.children(root), &[a, b, c]);
        arena.insert_after(c, a).unwrap();
        assert_eq!(arena.children(root), &[b, c, a]);
    }

    #[test]
    fn test_sibling_insert_without_parent_is_noop() {
        let mut arena = DomArena::new();
        let lone = arena.create_element("p");
        let other = arena.create_element("span");
        arena
            .insert_adjacent(lone, AdjacentPosition::BeforeBegin, other)
            .unwrap();
        assert_eq!(arena.parent(other), None);
    }

    #[test]
    fn test_cycle_rejected() {
        let (mut arena, root, [a, _, _]) = three_children();
        let err = arena.append_child(a, root).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest(_)));
        let err = arena.append_child(a, a).unwrap_err();
        assert!(matches!(err, DomError::HierarchyRequest(_)));
    }

    #[test]
    fn test_remove_child_disconnects_subtree() {
        let (mut arena, root, [a, b, _]) = three_children();
        let inner = arena.create_element("em");
        arena.append_child(b, inner).unwrap();
        assert!(arena.is_connected(inner));

        arena.remove_child(root, b).unwrap();
        assert!(!arena.is_connected(b));
        assert!(!arena.is_connected(inner));
        assert!(arena.remove_child(root, b).is_err());
        assert!(arena.is_connected(a));
    }

    #[test]
    fn test_traverse_df() {
        let (mut arena, root, [a, b, _]) = three_children();
        let inner = arena.create_element("em");
        arena.append_child(a, inner).unwrap();

        let mut visited = Vec::new();
        arena
            .traverse_df(root, |node| {
                visited.push(node.node_name.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(visited, vec!["DIV", "A", "EM", "B", "I"]);
        assert_eq!(arena.find_by_tag("b"), vec![b]);
    }

    #[test]
    fn test_descendants_and_find() {
        let (mut arena, root, [a, b, c]) = three_children();
        let inner = arena.create_element("em");
        arena.append_child(a, inner).unwrap();

        let order: Vec<NodeId> = arena.descendants(root).map(|n| n.node_id).collect();
        assert_eq!(order, vec![root, a, inner, b, c]);
        assert_eq!(arena.descendants(9999).count(), 0);

        // The predicate may carry state
        let mut seen = 0;
        let found = arena.find(|node| {
            seen += 1;
            node.is_element() && node.node_name != "DIV"
        });
        assert_eq!(found, vec![a, inner, b, c]);
        assert_eq!(seen, 5);

        assert_eq!(arena.find_one(|node| node.node_name == "EM"), Some(inner));
        arena.remove_child(a, inner).unwrap();
        assert_eq!(arena.find_one(|node| node.node_name == "EM"), None);
    }
}
