//! Insertion pipeline
//!
//! ```ignore
//! doc.insert_new("li", None)?
//!     .at("endInside")?
//!     .and()
//!     .apply_style(&[("color", "red")])?
//!     .with_respect_to("ul#menu")?;
//! ```

use crate::accessor::{self, NodeRef};
use crate::arena::AdjacentPosition;
use crate::document::Document;
use crate::error::{DomError, Result};
use crate::factory;
use crate::style;
use crate::types::{AttributeSet, NodeId};
use crate::wrap::describe;
use std::fmt;
use std::str::FromStr;

/// Where to put the node relative to the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Right before the anchor, as a sibling
    Beginning,
    /// Right after the anchor, as a sibling
    End,
    /// First child of the anchor
    BeginningInside,
    /// Last child of the anchor
    EndInside,
}

impl FromStr for Position {
    type Err = DomError;

    fn from_str(keyword: &str) -> Result<Self> {
        match keyword {
            "" => Err(DomError::InvalidArgument(
                "a non-empty position keyword is required".to_string(),
            )),
            "beginning" => Ok(Position::Beginning),
            "end" => Ok(Position::End),
            "beginningInside" => Ok(Position::BeginningInside),
            "endInside" => Ok(Position::EndInside),
            other => Err(DomError::Unsupported(format!(
                "position '{other}', expected one of: beginning, end, beginningInside, endInside"
            ))),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Position::Beginning => "beginning",
            Position::End => "end",
            Position::BeginningInside => "beginningInside",
            Position::EndInside => "endInside",
        })
    }
}

impl From<Position> for AdjacentPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Beginning => AdjacentPosition::BeforeBegin,
            Position::End => AdjacentPosition::AfterEnd,
            Position::BeginningInside => AdjacentPosition::AfterBegin,
            Position::EndInside => AdjacentPosition::BeforeEnd,
        }
    }
}

/// A node waiting to be placed, plus its pending position
#[derive(Debug)]
pub struct Insertion<'d> {
    doc: &'d mut Document,
    node: NodeId,
    position: Option<Position>,
}

impl Document {
    /// Begin placing an existing node
    pub fn insert(&mut self, node_id: NodeId) -> Insertion<'_> {
        Insertion {
            doc: self,
            node: node_id,
            position: None,
        }
    }

    /// Begin placing a freshly created element
    pub fn insert_new(&mut self, tag: &str, attrs: Option<&AttributeSet>) -> Result<Insertion<'_>> {
        let node_id = factory::create(self, tag, attrs)?;
        Ok(self.insert(node_id))
    }
}

impl<'d> Insertion<'d> {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Set the position from its keyword
    pub fn at(self, keyword: &str) -> Result<Self> {
        let position = keyword.parse()?;
        Ok(self.at_position(position))
    }

    pub fn at_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Reads better in a chain, does nothing
    pub fn and(self) -> Self {
        self
    }

    pub fn apply_style(self, rules: &[(&str, &str)]) -> Result<Self> {
        style::apply_style(self.doc, self.node, rules)?;
        Ok(self)
    }

    /// Place the node relative to `anchor`, returns the node
    ///
    /// BODY and its ancestors never move.
    pub fn with_respect_to<'a>(self, anchor: impl Into<NodeRef<'a>>) -> Result<NodeId> {
        let Some(position) = self.position else {
            return Err(DomError::InvalidArgument(
                "position must be set before choosing an anchor".to_string(),
            ));
        };
        if self.doc.arena().is_inclusive_ancestor(self.node, self.doc.body()) {
            return Err(DomError::InvalidArgument(format!(
                "{} encloses the body and cannot be moved",
                self.doc.node(self.node)?.node_name
            )));
        }
        let anchor = anchor.into();
        let anchor_id = accessor::resolve(self.doc, anchor)
            .ok_or_else(|| DomError::NotFound(describe(anchor)))?;

        self.doc
            .arena_mut()
            .insert_adjacent(anchor_id, position.into(), self.node)?;
        tracing::debug!("inserted node {} at {} of {}", self.node, position, anchor_id);
        Ok(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_json(&json!({
            "tag": "body",
            "children": [
                { "tag": "ul", "attributes": { "id": "menu" }, "children": [
                    { "tag": "li", "attributes": { "id": "first" } }
                ]}
            ]
        }))
        .unwrap()
    }

    fn menu_tags(doc: &Document) -> Vec<String> {
        let menu = doc.query_selector("#menu").unwrap().unwrap();
        doc.children(menu)
            .iter()
            .map(|&id| {
                let node = doc.node(id).unwrap();
                node.attr("id").unwrap_or(&node.node_name).to_string()
            })
            .collect()
    }

    #[test]
    fn test_positions() {
        let mut doc = doc();
        for (keyword, id) in [("endInside", "last"), ("beginningInside", "zero")] {
            let attrs = AttributeSet::new().id(id);
            doc.insert_new("li", Some(&attrs))
                .unwrap()
                .at(keyword)
                .unwrap()
                .with_respect_to("#menu")
                .unwrap();
        }
        assert_eq!(menu_tags(&doc), vec!["zero", "first", "last"]);

        let p = doc.insert_new("p", None).unwrap().at("beginning").unwrap();
        let p = p.with_respect_to("#menu").unwrap();
        let h = doc.insert_new("h2", None).unwrap().at("end").unwrap();
        let h = h.with_respect_to("#menu").unwrap();
        let body = doc.children(doc.body()).to_vec();
        assert_eq!(body.first(), Some(&p));
        assert_eq!(body.last(), Some(&h));
    }

    #[test]
    fn test_moves_existing_node() {
        let mut doc = doc();
        let first = doc.query_selector("#first").unwrap().unwrap();
        doc.insert(first)
            .at_position(Position::End)
            .with_respect_to("#menu")
            .unwrap();
        assert_eq!(doc.parent(first), Some(doc.body()));
    }

    #[test]
    fn test_style_in_chain() {
        let mut doc = doc();
        let node = doc
            .insert_new("span", None)
            .unwrap()
            .at("endInside")
            .unwrap()
            .and()
            .apply_style(&[("fontWeight", "bold")])
            .unwrap()
            .with_respect_to("#first")
            .unwrap();
        assert_eq!(doc.node(node).unwrap().attr("style"), Some("font-weight: bold;"));
        assert_eq!(doc.query_selector("#first > span").unwrap(), Some(node));
    }

    #[test]
    fn test_keywords() {
        assert_eq!("beginningInside".parse::<Position>().unwrap(), Position::BeginningInside);
        assert!(matches!("".parse::<Position>(), Err(DomError::InvalidArgument(_))));
        assert!(matches!("middle".parse::<Position>(), Err(DomError::Unsupported(_))));
        assert!(matches!("Beginning".parse::<Position>(), Err(DomError::Unsupported(_))));
    }

    #[test]
    fn test_pipeline_errors() {
        let mut doc = doc();
        let err = doc.insert_new("p", None).unwrap().with_respect_to("#menu").unwrap_err();
        assert!(matches!(err, DomError::InvalidArgument(_)));

        let err = doc
            .insert_new("p", None)
            .unwrap()
            .at("end")
            .unwrap()
            .with_respect_to("#missing")
            .unwrap_err();
        assert!(matches!(err, DomError::NotFound(_)));
    }

    #[test]
    fn test_body_and_above_stay_put() {
        let mut doc = doc();
        let (html, head, body) = (doc.html(), doc.head(), doc.body());

        let err = doc
            .insert(body)
            .at_position(Position::EndInside)
            .with_respect_to(head)
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidArgument(_)));
        assert_eq!(doc.parent(body), Some(html));
        assert!(doc.children(head).is_empty());

        let err = doc
            .insert(html)
            .at_position(Position::Beginning)
            .with_respect_to("#menu")
            .unwrap_err();
        assert!(matches!(err, DomError::InvalidArgument(_)));
        assert_eq!(doc.children(html), &[head, body]);
    }
}
