// src/keys.rs

//! Key symbols delivered by the input source.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held while a key was pressed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// A discrete key symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    /// A key that produces a printable character.
    Char(char),

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Navigation keys
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,

    // Editing keys
    Enter,
    Backspace,
    Tab,
    Escape,

    #[default]
    Unknown,
}

/// A key press as reported by a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct KeyPress {
    pub symbol: KeySymbol,
    pub modifiers: Modifiers,
}

impl KeyPress {
    pub fn new(symbol: KeySymbol) -> Self {
        Self {
            symbol,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn with_modifiers(symbol: KeySymbol, modifiers: Modifiers) -> Self {
        Self { symbol, modifiers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_modifiers() {
        let press = KeyPress::with_modifiers(KeySymbol::Char('c'), Modifiers::CONTROL | Modifiers::SHIFT);
        assert!(press.modifiers.contains(Modifiers::CONTROL));
        assert!(!KeyPress::new(KeySymbol::Escape).modifiers.contains(Modifiers::ALT));
    }
}
