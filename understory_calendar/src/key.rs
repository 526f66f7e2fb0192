// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical keys and modifier state.

/// A logical key, independent of any windowing toolkit.
///
/// Hosts translate their native key events into this type. [`Key::from_name`]
/// accepts the W3C `KeyboardEvent.key` names, which most toolkits can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// Shift, pressed on its own.
    Shift,
    /// Control, pressed on its own.
    Control,
    /// Alt / Option, pressed on its own.
    Alt,
    /// Meta / Command / Windows, pressed on its own.
    Meta,
    /// A printable character.
    Character(char),
    /// Any other key.
    Other,
}

impl Key {
    /// Returns `true` for keys that only modify other keys.
    #[must_use]
    pub const fn is_modifier(self) -> bool {
        matches!(self, Self::Shift | Self::Control | Self::Alt | Self::Meta)
    }

    /// Parses a W3C `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Enter" => Self::Enter,
            // Older engines report "Spacebar".
            " " | "Spacebar" => Self::Space,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Shift" => Self::Shift,
            "Control" => Self::Control,
            "Alt" => Self::Alt,
            "Meta" | "OS" => Self::Meta,
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Other,
                }
            }
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held while another key is pressed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

/// A key press together with the modifiers held at the time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// The pressed key.
    pub key: Key,
    /// Modifiers held while pressing it.
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// A key press with the given modifiers.
    #[must_use]
    pub const fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

impl From<Key> for KeyInput {
    fn from(key: Key) -> Self {
        Self::plain(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dom_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_name("Spacebar"), Key::Space);
        assert_eq!(Key::from_name("?"), Key::Character('?'));
        assert_eq!(Key::from_name("F5"), Key::Other);
        assert_eq!(Key::from_name(""), Key::Other);
    }

    #[test]
    fn modifier_keys() {
        assert!(Key::Shift.is_modifier());
        assert!(Key::Meta.is_modifier());
        assert!(!Key::Tab.is_modifier());
        assert!(!Key::Character('?').is_modifier());
    }
}
