//! Event Bus - page events over a broadcast channel
//!
//! Plain enum events, no trait objects. Publishing never fails: with no
//! subscriber the event is simply dropped.

use crate::shortcuts::ShortcutAction;
use domkit::NodeId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Things that happened on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageEvent {
    ShortcutTriggered { action: ShortcutAction },
    StylesPrinted { lines: usize },
    ConsoleCleared { lines: usize },
    Wrapped { target: NodeId, container: NodeId },
    DeepWrapped { target: NodeId, containers: Vec<NodeId> },
    Unwrapped { node: NodeId, boundary: NodeId },
}

/// Event bus using a tokio broadcast channel
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<PageEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event
    pub fn publish(&self, event: PageEvent) {
        tracing::trace!("publish {:?}", event);
        let _ = self.tx.send(event); // No subscribers is fine
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(PageEvent::ConsoleCleared { lines: 2 });

        match rx.recv().await {
            Ok(PageEvent::ConsoleCleared { lines: 2 }) => {}
            other => panic!("Expected ConsoleCleared event, got {other:?}"),
        }
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::with_capacity(0);
        bus.publish(PageEvent::StylesPrinted { lines: 0 });
    }
}
