//! Tree accessor - turns a selector or a node handle into a node
//!
//! Lookups here never fail loudly: an empty or malformed selector, or one
//! that matches nothing, simply resolves to no node.

use crate::document::Document;
use crate::types::NodeId;

/// Something that designates a node: a CSS selector or a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    Selector(&'a str),
    Node(NodeId),
    None,
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(selector: &'a str) -> Self {
        NodeRef::Selector(selector)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(selector: &'a String) -> Self {
        NodeRef::Selector(selector.as_str())
    }
}

impl From<NodeId> for NodeRef<'_> {
    fn from(node_id: NodeId) -> Self {
        NodeRef::Node(node_id)
    }
}

impl From<&NodeId> for NodeRef<'_> {
    fn from(node_id: &NodeId) -> Self {
        NodeRef::Node(*node_id)
    }
}

impl From<Option<NodeId>> for NodeRef<'_> {
    fn from(node_id: Option<NodeId>) -> Self {
        node_id.map_or(NodeRef::None, NodeRef::Node)
    }
}

/// Resolve a reference to a node
///
/// Selectors yield their first match in document order. Handles pass through
/// unchanged as long as the arena knows them.
pub fn resolve<'a>(doc: &Document, target: impl Into<NodeRef<'a>>) -> Option<NodeId> {
    match target.into() {
        NodeRef::Selector(selector) if selector.trim().is_empty() => None,
        NodeRef::Selector(selector) => match doc.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                tracing::trace!("selector {:?} resolves to nothing: {}", selector, err);
                None
            }
        },
        NodeRef::Node(node_id) => doc.node(node_id).is_ok().then_some(node_id),
        NodeRef::None => None,
    }
}

/// Every match of a selector, in document order. The result is a snapshot:
/// later tree changes do not affect it.
pub fn resolve_all(doc: &Document, selector: &str) -> Vec<NodeId> {
    if selector.trim().is_empty() {
        return Vec::new();
    }
    doc.query_selector_all(selector).unwrap_or_else(|err| {
        tracing::trace!("selector {:?} resolves to nothing: {}", selector, err);
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_json(&json!({
            "tag": "body",
            "children": [
                { "tag": "ul", "children": [
                    { "tag": "li", "attributes": { "class": "item" } },
                    { "tag": "li", "attributes": { "class": "item last" } }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_selector() {
        let doc = doc();
        let items = resolve_all(&doc, "li.item");
        assert_eq!(items.len(), 2);
        assert_eq!(resolve(&doc, "li"), Some(items[0]));
        assert_eq!(resolve(&doc, ".last"), Some(items[1]));
    }

    #[test]
    fn test_resolve_nothing() {
        let doc = doc();
        assert_eq!(resolve(&doc, ""), None);
        assert_eq!(resolve(&doc, "table"), None);
        assert_eq!(resolve(&doc, "li >"), None);
        assert_eq!(resolve(&doc, NodeRef::None), None);
        assert_eq!(resolve(&doc, None::<NodeId>), None);
        assert!(resolve_all(&doc, "").is_empty());
        assert!(resolve_all(&doc, "[[").is_empty());
    }

    #[test]
    fn test_handle_passes_through() {
        let mut doc = doc();
        let detached = doc.arena_mut().create_element("p");
        assert_eq!(resolve(&doc, detached), Some(detached));
        assert_eq!(resolve(&doc, 9_999u32), None);
    }

    #[test]
    fn test_resolve_all_is_a_snapshot() {
        let mut doc = doc();
        let items = resolve_all(&doc, "li");
        let ul = resolve(&doc, "ul").unwrap();
        doc.arena_mut().remove_child(ul, items[0]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(resolve_all(&doc, "li").len(), 1);
    }
}
