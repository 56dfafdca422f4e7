//! Page - a document, its diagnostic console and the shortcut surface
//!
//! Operations performed through a `Page` behave exactly like the free
//! functions in `domkit`, and additionally publish a `PageEvent` when they
//! changed something.

use domkit::{
    AttributeSet, Console, Document, NodeId, NodeRef, UnwrapOptions, WrapperSpec,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::events::{EventBus, PageEvent};
use crate::shortcuts::{self, KeyPress, ShortcutAction};

/// Page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub id: String,
    pub shortcuts_enabled: bool,
    pub event_capacity: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            shortcuts_enabled: true,
            event_capacity: 1024,
        }
    }
}

impl PageConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct Page {
    pub config: PageConfig,
    pub event_bus: EventBus,
    document: Document,
    console: Console,
}

impl Page {
    pub fn new(config: PageConfig) -> Self {
        Self::with_document(config, Document::new())
    }

    pub fn with_document(config: PageConfig, document: Document) -> Self {
        let event_bus = EventBus::with_capacity(config.event_capacity);
        tracing::debug!("page {} created", config.id);
        Self {
            config,
            event_bus,
            document,
            console: Console::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Run the shortcut bound to `press`, if any
    pub fn handle_key(&mut self, press: &KeyPress) -> Option<ShortcutAction> {
        if !self.config.shortcuts_enabled {
            return None;
        }
        let action = shortcuts::lookup(press)?;
        tracing::debug!("page {}: shortcut {:?}", self.config.id, action);
        self.event_bus
            .publish(PageEvent::ShortcutTriggered { action });

        match action {
            ShortcutAction::PrintInlineStyles => {
                self.print_inline_styles();
            }
            ShortcutAction::ClearConsole => self.clear_console(),
        }
        Some(action)
    }

    /// Dump every inline style to the console, returns the number of lines
    pub fn print_inline_styles(&mut self) -> usize {
        let lines = domkit::print_inline_styles(&self.document, &mut self.console);
        self.event_bus.publish(PageEvent::StylesPrinted { lines });
        lines
    }

    pub fn clear_console(&mut self) {
        let lines = self.console.len();
        self.console.clear();
        self.event_bus.publish(PageEvent::ConsoleCleared { lines });
    }

    pub fn print_ancestors<'a>(&mut self, node: impl Into<NodeRef<'a>>) -> Option<String> {
        domkit::print_ancestors(&self.document, node, &mut self.console)
    }

    pub fn wrap_around<'a>(
        &mut self,
        target: impl Into<NodeRef<'a>>,
        tag: &str,
        attrs: Option<&AttributeSet>,
    ) -> Result<NodeId> {
        let target = domkit::resolve(&self.document, target);
        let container = domkit::wrap_around(&mut self.document, target, tag, attrs)?;
        if let Some(target) = target {
            self.event_bus
                .publish(PageEvent::Wrapped { target, container });
        }
        Ok(container)
    }

    pub fn wrap_deeply<'a>(
        &mut self,
        target: impl Into<NodeRef<'a>>,
        specs: &[WrapperSpec],
        forward: bool,
    ) -> Result<Vec<NodeId>> {
        let target = domkit::resolve(&self.document, target);
        let containers = domkit::wrap_deeply(&mut self.document, target, specs, forward)?;
        if let (Some(target), false) = (target, containers.is_empty()) {
            self.event_bus.publish(PageEvent::DeepWrapped {
                target,
                containers: containers.clone(),
            });
        }
        Ok(containers)
    }

    pub fn unwrap<'a>(
        &mut self,
        node: impl Into<NodeRef<'a>>,
        options: UnwrapOptions,
    ) -> Result<Option<NodeId>> {
        let node = domkit::resolve(&self.document, node);
        let boundary = domkit::unwrap(&mut self.document, node, options)?;
        if let (Some(node), Some(boundary)) = (node, boundary) {
            self.event_bus
                .publish(PageEvent::Unwrapped { node, boundary });
        }
        Ok(boundary)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyboard_types::Modifiers;

    fn ctrl_alt(ch: char) -> KeyPress {
        KeyPress::character(ch, Modifiers::CONTROL | Modifiers::ALT)
    }

    fn styled_page() -> Page {
        let document = Document::from_json_str(
            r#"{"tag":"body","children":[
                {"tag":"p","attributes":{"style":"color: red"}},
                {"tag":"p","attributes":{"style":"margin: 0; padding: 2px"}}
            ]}"#,
        )
        .unwrap();
        Page::with_document(PageConfig::default(), document)
    }

    #[test]
    fn test_shortcuts() {
        let mut page = styled_page();
        let mut rx = page.event_bus.subscribe();

        assert_eq!(page.handle_key(&ctrl_alt('s')), Some(ShortcutAction::PrintInlineStyles));
        assert_eq!(
            page.console().lines(),
            &["color: red;", "", "margin: 0;", "padding: 2px;"]
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            PageEvent::ShortcutTriggered {
                action: ShortcutAction::PrintInlineStyles
            }
        );
        assert_eq!(rx.try_recv().unwrap(), PageEvent::StylesPrinted { lines: 4 });

        assert_eq!(page.handle_key(&ctrl_alt('l')), Some(ShortcutAction::ClearConsole));
        assert!(page.console().is_empty());
    }

    #[test]
    fn test_shortcuts_disabled() {
        let config = PageConfig {
            shortcuts_enabled: false,
            ..PageConfig::default()
        };
        let mut page = Page::new(config);
        assert_eq!(page.handle_key(&ctrl_alt('s')), None);
    }

    #[test]
    fn test_config_from_json() {
        let config = PageConfig::from_json(r#"{"id":"demo","event_capacity":8}"#).unwrap();
        assert_eq!(config.id, "demo");
        assert_eq!(config.event_capacity, 8);
        assert!(config.shortcuts_enabled);
        assert!(PageConfig::from_json("[]").is_err());
        assert_ne!(PageConfig::default().id, PageConfig::default().id);
    }
}
