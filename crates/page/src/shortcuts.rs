//! Keyboard shortcuts
//!
//! The mapping is a fixed table, not user configurable:
//!
//! | Combination   | Effect                                   |
//! |---------------|------------------------------------------|
//! | Ctrl+Alt+S    | print the inline styles of every element |
//! | Ctrl+Alt+L    | clear the diagnostic console             |

use keyboard_types::{Key, Modifiers};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// A key event as delivered by the host
#[derive(Clone, Debug)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyPress {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            state: KeyState::Pressed,
        }
    }

    /// Pressed character key
    pub fn character(ch: char, modifiers: Modifiers) -> Self {
        Self::new(Key::Character(ch.to_string()), modifiers)
    }

    pub fn released(mut self) -> Self {
        self.state = KeyState::Released;
        self
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShortcutAction {
    PrintInlineStyles,
    ClearConsole,
}

#[derive(Copy, Clone, Debug)]
pub struct Shortcut {
    pub key: char,
    pub modifiers: Modifiers,
    pub action: ShortcutAction,
}

const CTRL_ALT: Modifiers = Modifiers::CONTROL.union(Modifiers::ALT);

/// Modifiers that take part in matching; Shift and lock keys are ignored
const SIGNIFICANT: Modifiers = Modifiers::CONTROL
    .union(Modifiers::ALT)
    .union(Modifiers::META);

pub const SHORTCUTS: &[Shortcut] = &[
    Shortcut {
        key: 's',
        modifiers: CTRL_ALT,
        action: ShortcutAction::PrintInlineStyles,
    },
    Shortcut {
        key: 'l',
        modifiers: CTRL_ALT,
        action: ShortcutAction::ClearConsole,
    },
];

impl Shortcut {
    pub fn matches(&self, press: &KeyPress) -> bool {
        let Key::Character(text) = &press.key else {
            return false;
        };
        let mut chars = text.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return false;
        };
        ch.eq_ignore_ascii_case(&self.key) && press.modifiers.intersection(SIGNIFICANT) == self.modifiers
    }
}

/// The action bound to a key press, if any. Releases never trigger.
pub fn lookup(press: &KeyPress) -> Option<ShortcutAction> {
    if !press.state.is_pressed() {
        return None;
    }
    SHORTCUTS
        .iter()
        .find(|shortcut| shortcut.matches(press))
        .map(|shortcut| shortcut.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(
            lookup(&KeyPress::character('s', CTRL_ALT)),
            Some(ShortcutAction::PrintInlineStyles)
        );
        assert_eq!(
            lookup(&KeyPress::character('L', CTRL_ALT | Modifiers::SHIFT)),
            Some(ShortcutAction::ClearConsole)
        );
        assert_eq!(
            lookup(&KeyPress::character('l', CTRL_ALT | Modifiers::CAPS_LOCK)),
            Some(ShortcutAction::ClearConsole)
        );
    }

    #[test]
    fn test_unmapped() {
        assert_eq!(lookup(&KeyPress::character('s', Modifiers::CONTROL)), None);
        assert_eq!(lookup(&KeyPress::character('s', CTRL_ALT | Modifiers::META)), None);
        assert_eq!(lookup(&KeyPress::character('x', CTRL_ALT)), None);
        assert_eq!(lookup(&KeyPress::new(Key::Enter, CTRL_ALT)), None);
        assert_eq!(lookup(&KeyPress::character('s', CTRL_ALT).released()), None);
    }
}
