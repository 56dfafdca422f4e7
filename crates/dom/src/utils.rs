//! Utility functions for DOM processing

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::NodeId;
use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

/// Cap text length to avoid flooding diagnostics
pub fn cap_text_length(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Get all text content from node and its descendants
pub fn get_text_content(arena: &DomArena, node_id: NodeId) -> Result<String> {
    let mut text = String::new();

    arena.traverse_df(node_id, |node| {
        if node.is_text() {
            text.push_str(&node.node_value);
        }
        Ok(())
    })?;

    Ok(text)
}

/// Element names `createElement` would accept
pub fn is_valid_tag_name(tag: &str) -> bool {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
        }
        _ => false,
    }
}

/// `parseInt`-style leading integer: optional sign then digits, anything
/// after is ignored. `None` when there are no digits.
pub fn parse_leading_int(src: &str) -> Option<i64> {
    let src = src.trim_start();
    let (negative, digits) = match src.as_bytes().first() {
        Some(b'-') => (true, &src[1..]),
        Some(b'+') => (false, &src[1..]),
        _ => (false, src),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// `backgroundColor` -> `background-color`; names already in CSS form pass through
pub fn js_prop_to_css_name(prop: &str) -> String {
    let mut out = String::with_capacity(prop.len() + 4);
    for ch in prop.trim().chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Split a `style` attribute into ordered `(property, value)` declarations
///
/// Property names are lower-cased, values keep their source text. Malformed
/// and empty declarations are dropped.
pub fn parse_style_declarations(style: Option<&str>) -> Vec<(String, String)> {
    let Some(style) = style else {
        return Vec::new();
    };
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    let mut decl_parser = InlineStyleParser;
    RuleBodyParser::new(&mut parser, &mut decl_parser)
        .filter_map(|result| result.ok())
        .collect()
}

/// Declaration-only rule body parser for `style` attributes
struct InlineStyleParser;

type StyleDeclaration = (String, String);

impl<'i> AtRuleParser<'i> for InlineStyleParser {
    type Prelude = ();
    type AtRule = StyleDeclaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        _name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::AtRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> QualifiedRuleParser<'i> for InlineStyleParser {
    type Prelude = ();
    type QualifiedRule = StyleDeclaration;
    type Error = ();

    fn parse_prelude<'t>(
        &mut self,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::Prelude, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }

    fn parse_block<'t>(
        &mut self,
        _prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> std::result::Result<Self::QualifiedRule, ParseError<'i, Self::Error>> {
        Err(input.new_custom_error(()))
    }
}

impl<'i> DeclarationParser<'i> for InlineStyleParser {
    type Declaration = StyleDeclaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> std::result::Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        // Nested blocks and strings are consumed whole
        while input.next().is_ok() {}
        let value = input.slice_from(start).trim();
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok((name.to_ascii_lowercase(), value.to_string()))
    }
}

impl<'i> RuleBodyItemParser<'i, StyleDeclaration, ()> for InlineStyleParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

pub fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(prop, value)| format!("{prop}: {value};"))
        .collect::<Vec<_>>()
        .join(" ")
}
