//! Page host for domkit
//!
//! Owns a document and its diagnostic console, maps the fixed keyboard
//! shortcuts to console effects, and publishes what happened on an event bus.

pub mod error;
pub mod events;
pub mod page;
pub mod shortcuts;

pub use error::{PageError, Result};
pub use events::{EventBus, PageEvent};
pub use page::{Page, PageConfig};
pub use shortcuts::{KeyPress, KeyState, ShortcutAction, SHORTCUTS};
