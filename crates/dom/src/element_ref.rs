//! CSS selector matching over the arena, backed by the `selectors` crate
//!
//! `ElementRef` exposes an arena element through `selectors::Element`, so
//! the full selector grammar (sibling combinators, attribute operators,
//! `:not()`, `:nth-child()`, ...) is matched against the live tree.
//! Tag names compare case-insensitively, ids and classes exactly.

use std::fmt;

use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, QuirksMode, SelectorCaches};
use selectors::matching::{
    ElementSelectorFlags, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags,
};
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::{DomNode, NodeId, NodeType};

/// Selector implementation for the arena
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomSelectors;

/// Identifier, name and value strings as parsed out of a selector
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct CssString(pub String);

impl precomputed_hash::PrecomputedHash for CssString {
    fn precomputed_hash(&self) -> u32 {
        let mut h: u32 = 0;
        for byte in self.0.bytes() {
            h = h.wrapping_mul(31).wrapping_add(byte as u32);
        }
        h
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CssString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for CssString {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

impl cssparser::ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

/// No pseudo-elements: a static tree has nothing to generate them from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = DomSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        match *self {}
    }

    fn valid_after_slotted(&self) -> bool {
        match *self {}
    }
}

/// No user-action or link state either; only the tree-structural
/// pseudo-classes built into the parser are available
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = DomSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl SelectorImpl for DomSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssString;
    type LocalName = CssString;
    type NamespaceUrl = CssString;
    type NamespacePrefix = CssString;
    type BorrowedLocalName = CssString;
    type BorrowedNamespaceUrl = CssString;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

impl<'i> selectors::parser::Parser<'i> for DomSelectors {
    type Impl = DomSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// An element of the arena, as seen by the selector matcher
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub arena: &'a DomArena,
    pub id: NodeId,
}

impl<'a> ElementRef<'a> {
    /// `None` unless `id` is an element
    pub fn new(arena: &'a DomArena, id: NodeId) -> Option<Self> {
        arena
            .get(id)
            .ok()
            .filter(|node| node.is_element())
            .map(|_| Self { arena, id })
    }

    fn node(&self) -> Option<&'a DomNode> {
        self.arena.get(self.id).ok()
    }

    /// First element among `ids`, walking in iterator order
    fn first_element(&self, mut ids: impl Iterator<Item = NodeId>) -> Option<Self> {
        ids.find_map(|id| Self::new(self.arena, id))
    }

    fn siblings(&self) -> (&'a [NodeId], usize) {
        let index = self.arena.child_index(self.id);
        match (self.arena.parent(self.id), index) {
            (Some(parent), Some(index)) => (self.arena.children(parent), index),
            _ => (&[], 0),
        }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.node().map(|n| n.node_name.as_str()))
            .finish()
    }
}

impl<'a> selectors::Element for ElementRef<'a> {
    type Impl = DomSelectors;

    fn opaque(&self) -> OpaqueElement {
        // The arena slot, not `self`: copies of the same ref must compare equal
        match self.node() {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self.arena),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        Self::new(self.arena, self.arena.parent(self.id)?)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings();
        self.first_element(siblings[..index].iter().rev().copied())
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings();
        self.first_element(siblings.iter().skip(index + 1).copied())
    }

    fn first_element_child(&self) -> Option<Self> {
        self.first_element(self.arena.children(self.id).iter().copied())
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssString) -> bool {
        self.node()
            .is_some_and(|node| node.node_name.eq_ignore_ascii_case(&name.0))
    }

    fn has_namespace(&self, ns: &CssString) -> bool {
        ns.0.is_empty()
    }

    fn is_same_type(&self, other: &Self) -> bool {
        match (self.node(), other.node()) {
            (Some(a), Some(b)) => a.node_name == b.node_name,
            _ => false,
        }
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssString>,
        local_name: &CssString,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        if let NamespaceConstraint::Specific(ns) = ns {
            if !ns.0.is_empty() {
                return false;
            }
        }
        self.node()
            .and_then(|node| node.attr(&local_name.0))
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.node()
            .and_then(|node| node.attr("id"))
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.node().is_some_and(|node| {
            node.class_list()
                .any(|class| case_sensitivity.eq(class.as_bytes(), name.0.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssString) -> Option<CssString> {
        None
    }

    fn is_part(&self, _name: &CssString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.arena.children(self.id).iter().all(|&child| {
            self.arena.get(child).map_or(true, |node| {
                !node.is_element() && !(node.is_text() && !node.node_value.is_empty())
            })
        })
    }

    fn is_root(&self) -> bool {
        self.arena
            .parent(self.id)
            .and_then(|parent| self.arena.get(parent).ok())
            .is_some_and(|parent| parent.node_type == NodeType::Document)
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &CssString) -> bool {
        false
    }
}

/// A parsed, comma-separated selector list
#[derive(Debug, Clone)]
pub struct Selector {
    list: SelectorList<DomSelectors>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = || DomError::InvalidSelector(source.to_string());
        if source.trim().is_empty() {
            return Err(invalid());
        }
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = parser
            .parse_entirely(|parser| SelectorList::parse(&DomSelectors, parser, ParseRelative::No))
            .map_err(|err| {
                tracing::trace!("selector {:?} rejected: {:?}", source, err.kind);
                invalid()
            })?;
        Ok(Self { list })
    }

    /// Whether the node is an element matching any selector of the list
    pub fn matches(&self, arena: &DomArena, node_id: NodeId) -> bool {
        let mut caches = SelectorCaches::default();
        let mut context = matching_context(&mut caches);
        self.matches_in(arena, node_id, &mut context)
    }

    /// First connected match in document order
    pub fn select_first(&self, arena: &DomArena) -> Option<NodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = matching_context(&mut caches);
        arena.find_one(|node| self.matches_in(arena, node.node_id, &mut context))
    }

    /// Every connected match in document order
    pub fn select_all(&self, arena: &DomArena) -> Vec<NodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = matching_context(&mut caches);
        arena.find(|node| self.matches_in(arena, node.node_id, &mut context))
    }

    fn matches_in(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        context: &mut MatchingContext<'_, DomSelectors>,
    ) -> bool {
        let Some(element) = ElementRef::new(arena, node_id) else {
            return false;
        };
        self.list.slice().iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &element, context)
        })
    }
}

fn matching_context(caches: &mut SelectorCaches) -> MatchingContext<'_, DomSelectors> {
    MatchingContext::new(
        MatchingMode::Normal,
        None,
        caches,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        MatchingForInvalidation::No,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(s: &str) -> Selector {
        Selector::parse(s).unwrap_or_else(|e| panic!("{s}: {e}"))
    }

    /// root > [b, span#t[title="a]b"], "text", i.note]
    fn arena() -> (DomArena, [NodeId; 4]) {
        let mut arena = DomArena::new();
        let root = arena.create_element("body");
        arena.set_root(root).unwrap();
        let b = arena.create_element("b");
        let span = arena.create_element("span");
        let text = arena.create_text("text");
        let i = arena.create_element("i");
        for id in [b, span, text, i] {
            arena.append_child(root, id).unwrap();
        }
        let node = arena.get_mut(span).unwrap();
        node.set_attr("id", "t");
        node.set_attr("title", "a]b");
        arena.get_mut(i).unwrap().set_attr("class", "note Wide");
        (arena, [root, b, span, i])
    }

    #[test]
    fn test_compound_and_groups() {
        let (arena, [_, b, span, i]) = arena();
        assert!(parse_ok("span#t[title]").matches(&arena, span));
        assert!(parse_ok("SPAN").matches(&arena, span));
        assert!(parse_ok("i.note.Wide").matches(&arena, i));
        assert!(!parse_ok("i.wide").matches(&arena, i));
        assert!(!parse_ok("#T").matches(&arena, span));
        assert_eq!(parse_ok("i, b").select_all(&arena), vec![b, i]);
        assert_eq!(parse_ok("i, b").select_first(&arena), Some(b));
    }

    #[test]
    fn test_sibling_and_structural_selectors() {
        let (arena, [_, b, span, i]) = arena();
        let cases = [
            ("span:first-child", vec![]),
            ("b:first-child", vec![b]),
            ("b + span", vec![span]),
            ("span + i", vec![i]),
            ("b ~ i", vec![i]),
            ("span:not(b)", vec![span]),
            ("body > :nth-child(2)", vec![span]),
        ];
        for (selector, expected) in cases {
            assert_eq!(parse_ok(selector).select_all(&arena), expected, "{selector}");
        }
    }

    #[test]
    fn test_attribute_operators() {
        let (arena, [_, _, span, i]) = arena();
        for selector in ["[title^=a]", r#"[title="a]b"]"#, "[title$=b]", "[title*=']']", "[ID=t]"] {
            assert_eq!(parse_ok(selector).select_all(&arena), vec![span], "{selector}");
        }
        assert_eq!(parse_ok("[class~=note]").select_all(&arena), vec![i]);
        assert!(parse_ok("[title=a]").select_all(&arena).is_empty());
    }

    #[test]
    fn test_empty_and_text_children() {
        let (mut arena, [root, b, _, _]) = arena();
        assert!(parse_ok("b:empty").matches(&arena, b));
        assert!(!parse_ok("body:empty").matches(&arena, root));

        let text = arena.create_text("x");
        arena.append_child(b, text).unwrap();
        assert!(!parse_ok("b:empty").matches(&arena, b));
    }

    #[test]
    fn test_descendants_backtrack() {
        let mut arena = DomArena::new();
        let root = arena.create_element("div");
        arena.set_root(root).unwrap();
        let section = arena.create_element("section");
        let p = arena.create_element("p");
        let inner_div = arena.create_element("div");
        let span = arena.create_element("span");
        arena.append_child(root, section).unwrap();
        arena.append_child(section, p).unwrap();
        arena.append_child(p, inner_div).unwrap();
        arena.append_child(inner_div, span).unwrap();

        assert!(parse_ok("section > p span").matches(&arena, span));
        assert!(parse_ok("div > section span").matches(&arena, span));
        assert!(!parse_ok("section > div span").matches(&arena, span));
        assert!(parse_ok("*").matches(&arena, span));
        assert!(!parse_ok("p").matches(&arena, span));
    }

    #[test]
    fn test_text_nodes_never_match() {
        let (arena, [root, ..]) = arena();
        let text = arena.children(root)[2];
        assert!(!parse_ok("*").matches(&arena, text));
        assert!(!parse_ok("*").select_all(&arena).contains(&text));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "   ", "div,", ", p", "> p", "p >", "#", ".", "a]", "p > > a", "div*", "[=v]", "a:hover", "p::before"] {
            assert!(
                matches!(Selector::parse(bad), Err(DomError::InvalidSelector(_))),
                "accepted {bad:?}"
            );
        }
    }
}
