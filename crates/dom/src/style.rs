//! Inline styles kept in the `style` attribute

use crate::accessor::{self, NodeRef};
use crate::console::Console;
use crate::document::Document;
use crate::error::{DomError, Result};
use crate::types::{NodeId, NodeType};
use crate::utils;
use crate::wrap::describe;
use ahash::AHashSet;

/// Write CSS declarations into the target's inline style, returns the target
///
/// Property names may be camelCase (`backgroundColor`) or CSS form. An empty
/// value removes the declaration.
pub fn apply_style<'a>(
    doc: &mut Document,
    target: impl Into<NodeRef<'a>>,
    rules: &[(&str, &str)],
) -> Result<NodeId> {
    let target = target.into();
    let node_id = accessor::resolve(doc, target).ok_or_else(|| {
        DomError::NotFound(format!("{} is not a valid element reference", describe(target)))
    })?;
    style_node(doc, node_id, rules)?;
    Ok(node_id)
}

fn style_node(doc: &mut Document, node_id: NodeId, rules: &[(&str, &str)]) -> Result<()> {
    let node = doc.arena_mut().get_mut(node_id)?;
    if node.node_type != NodeType::Element {
        return Err(DomError::InvalidArgument(format!(
            "{} cannot carry a style",
            node.node_name
        )));
    }

    let mut decls = utils::parse_style_declarations(node.attr("style"));
    for (prop, value) in rules {
        let prop = utils::js_prop_to_css_name(prop);
        let value = value.trim();
        match decls.iter().position(|(p, _)| *p == prop) {
            Some(index) if value.is_empty() => {
                decls.remove(index);
            }
            Some(index) => decls[index].1 = value.to_string(),
            None if value.is_empty() => {}
            None => decls.push((prop, value.to_string())),
        }
    }

    if decls.is_empty() {
        node.attributes.remove("style");
    } else {
        node.set_attr("style", &utils::serialize_style_declarations(&decls));
    }
    tracing::debug!("styled node {} with {} rules", node_id, rules.len());
    Ok(())
}

/// Style every target that resolves, each node once; returns how many were styled
///
/// Targets that do not resolve are skipped.
pub fn style_all<'a, I, T>(doc: &mut Document, rules: &[(&str, &str)], targets: I) -> Result<usize>
where
    I: IntoIterator<Item = T>,
    T: Into<NodeRef<'a>>,
{
    let mut seen = AHashSet::new();
    let mut ordered = Vec::new();
    for target in targets {
        let target = target.into();
        match accessor::resolve(doc, target) {
            Some(node_id) if seen.insert(node_id) => ordered.push(node_id),
            Some(_) => {}
            None => tracing::trace!("style_all: skipping {}", describe(target)),
        }
    }

    for &node_id in &ordered {
        style_node(doc, node_id, rules)?;
    }
    Ok(ordered.len())
}

/// `property: value;` lines for every styled element in document order,
/// blocks separated by an empty line
pub fn inline_style_dump(doc: &Document) -> Vec<String> {
    let arena = doc.arena();
    let mut lines = Vec::new();
    for node_id in arena.find(|node| node.is_element() && node.attr("style").is_some()) {
        let Ok(node) = arena.get(node_id) else {
            continue;
        };
        let decls = utils::parse_style_declarations(node.attr("style"));
        if decls.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(decls.iter().map(|(prop, value)| format!("{prop}: {value};")));
    }
    lines
}

/// Dump every inline style to the console, returns the number of lines written
pub fn print_inline_styles(doc: &Document, console: &mut Console) -> usize {
    let lines = inline_style_dump(doc);
    let count = lines.len();
    for line in lines {
        console.log(line);
    }
    count
}
