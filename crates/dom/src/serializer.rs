//! DOM Serializer - render a subtree as markup
//!
//! Used for diagnostics and for asserting tree shape in tests. Only the
//! attributes listed in the config are emitted, in that order, so output is
//! stable regardless of how the attribute map iterates.

use crate::arena::DomArena;
use crate::error::Result;
use crate::types::*;
use crate::utils;

/// Serializer configuration
#[derive(Debug, Clone)]
pub struct SerializerConfig {
    pub include_attributes: Vec<String>,
    pub max_text_length: usize,
    /// One node per line, indented by depth
    pub pretty: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            include_attributes: DEFAULT_INCLUDE_ATTRIBUTES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_text_length: 200,
            pretty: false,
        }
    }
}

impl SerializerConfig {
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }
}

/// DOM Tree Serializer
#[derive(Debug, Clone, Default)]
pub struct DomSerializer {
    config: SerializerConfig,
}

impl DomSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SerializerConfig) -> Self {
        Self { config }
    }

    /// Serialize the subtree rooted at `node_id`
    pub fn serialize(&self, arena: &DomArena, node_id: NodeId) -> Result<String> {
        let mut output = String::with_capacity(256);
        self.serialize_node(arena, node_id, 0, &mut output)?;
        if self.config.pretty && output.ends_with('\n') {
            output.pop();
        }
        Ok(output)
    }

    fn serialize_node(
        &self,
        arena: &DomArena,
        node_id: NodeId,
        depth: usize,
        output: &mut String,
    ) -> Result<()> {
        let node = arena.get(node_id)?;
        let indent = if self.config.pretty {
            "  ".repeat(depth)
        } else {
            String::new()
        };
        let newline = if self.config.pretty { "\n" } else { "" };

        match node.node_type {
            NodeType::Element => {
                let tag = node.node_name.to_ascii_lowercase();
                output.push_str(&indent);
                output.push('<');
                output.push_str(&tag);
                for attr_name in &self.config.include_attributes {
                    if let Some(value) = node.attr(attr_name) {
                        output.push_str(&format!(" {}=\"{}\"", attr_name, escape(value, true)));
                    }
                }
                output.push('>');
                output.push_str(newline);

                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, depth + 1, output)?;
                }

                output.push_str(&indent);
                output.push_str("</");
                output.push_str(&tag);
                output.push('>');
                output.push_str(newline);
            }
            NodeType::Text => {
                // Whitespace-only text only matters in compact output
                let text = if self.config.pretty {
                    node.node_value.trim()
                } else {
                    node.node_value.as_str()
                };
                if !text.is_empty() {
                    let text = utils::cap_text_length(text, self.config.max_text_length);
                    output.push_str(&indent);
                    output.push_str(&escape(&text, false));
                    output.push_str(newline);
                }
            }
            NodeType::Document => {
                for &child_id in &node.children_ids {
                    self.serialize_node(arena, child_id, depth, output)?;
                }
            }
        }

        Ok(())
    }
}

fn escape(text: &str, in_attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_json(&json!({
            "tag": "body",
            "children": [
                { "tag": "div", "attributes": { "id": "a", "class": "x", "data-k": "v" }, "children": [
                    "Tom & Jerry",
                    { "tag": "span" }
                ]}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_compact() {
        let doc = doc();
        let out = DomSerializer::new().serialize(doc.arena(), doc.body()).unwrap();
        assert_eq!(
            out,
            r#"<body><div id="a" class="x">Tom &amp; Jerry<span></span></div></body>"#
        );
    }

    #[test]
    fn test_pretty() {
        let doc = doc();
        let out = DomSerializer::with_config(SerializerConfig::pretty())
            .serialize(doc.arena(), doc.body())
            .unwrap();
        let expected = [
            "<body>",
            "  <div id=\"a\" class=\"x\">",
            "    Tom &amp; Jerry",
            "    <span>",
            "    </span>",
            "  </div>",
            "</body>",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn test_text_is_capped() {
        let doc = doc();
        let config = SerializerConfig {
            max_text_length: 3,
            include_attributes: vec![],
            ..SerializerConfig::default()
        };
        let div = doc.query_selector("div").unwrap().unwrap();
        let out = DomSerializer::with_config(config).serialize(doc.arena(), div).unwrap();
        assert_eq!(out, "<div>Tom...<span></span></div>");
    }
}
