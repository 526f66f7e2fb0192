// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The keyboard shortcuts panel and its focus trap.
//!
//! The panel exposes a single interactive control (its close button), so the
//! trap does not cycle through elements. While open, it closes on
//! Enter/Space/Escape, lets the vertical arrows scroll the list, and swallows
//! every key that would otherwise escape the panel or page the calendar
//! underneath.
//!
//! ```
//! use understory_calendar::{FocusIntent, Key, KeyboardShortcutsOverlay, OverlayKey};
//!
//! let mut overlay = KeyboardShortcutsOverlay::new();
//! assert_eq!(overlay.open(Some("date-input")), Some(FocusIntent::ShortcutsCloseControl));
//! assert_eq!(overlay.handle_key(Key::Tab), OverlayKey::Suppressed);
//! assert_eq!(overlay.handle_key(Key::Escape), OverlayKey::Close);
//! assert_eq!(overlay.close(), Some(FocusIntent::Restore("date-input")));
//! ```

use crate::focus::FocusIntent;
use crate::key::Key;
use crate::window::Orientation;

/// Whether the panel is open, plus the focus to return to on close.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayState<H> {
    /// The panel is showing.
    pub open: bool,
    /// Host focus handle captured when the panel opened.
    pub restore_focus_to: Option<H>,
}

impl<H> Default for OverlayState<H> {
    fn default() -> Self {
        Self {
            open: false,
            restore_focus_to: None,
        }
    }
}

/// How the panel treats a key press while open.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKey {
    /// The key activates the close control; call
    /// [`KeyboardShortcutsOverlay::close`].
    Close,
    /// Let the key keep its default behavior (scrolling the list).
    PassThrough,
    /// Swallow the key and prevent its default behavior.
    Suppressed,
    /// The key has no meaning here; do not forward it to the calendar.
    Ignored,
}

/// Modal state of the keyboard shortcuts panel.
#[derive(Clone, Debug)]
pub struct KeyboardShortcutsOverlay<H> {
    state: OverlayState<H>,
}

impl<H> Default for KeyboardShortcutsOverlay<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> KeyboardShortcutsOverlay<H> {
    /// Creates a closed panel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: OverlayState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &OverlayState<H> {
        &self.state
    }

    /// Returns `true` while the panel is showing.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.open
    }

    /// Opens the panel, remembering `restore` as the focus to return to.
    ///
    /// Returns the focus intent for the close control, or `None` if the
    /// panel was already open (the first captured handle is kept).
    pub fn open(&mut self, restore: Option<H>) -> Option<FocusIntent<H>> {
        if self.state.open {
            tracing::trace!("shortcuts panel already open");
            return None;
        }
        self.state.open = true;
        self.state.restore_focus_to = restore;
        tracing::debug!("shortcuts panel opened");
        Some(FocusIntent::ShortcutsCloseControl)
    }

    /// Classifies a key pressed on the close control.
    ///
    /// Every key pressed while the panel is open stays inside it; none of
    /// them reaches calendar navigation.
    #[must_use]
    pub fn handle_key(&self, key: Key) -> OverlayKey {
        match key {
            Key::Enter | Key::Space | Key::Escape => OverlayKey::Close,
            Key::ArrowUp | Key::ArrowDown => OverlayKey::PassThrough,
            Key::Tab
            | Key::Home
            | Key::End
            | Key::PageUp
            | Key::PageDown
            | Key::ArrowLeft
            | Key::ArrowRight => OverlayKey::Suppressed,
            _ => OverlayKey::Ignored,
        }
    }

    /// Closes the panel.
    ///
    /// Yields [`FocusIntent::Restore`] with the handle captured at open, if
    /// there was one. The handle is consumed, so it is restored at most once.
    /// Closing a panel that is not open returns `None`.
    pub fn close(&mut self) -> Option<FocusIntent<H>> {
        if !self.state.open {
            return None;
        }
        self.state.open = false;
        tracing::debug!("shortcuts panel closed");
        self.state.restore_focus_to.take().map(FocusIntent::Restore)
    }
}

/// Where the renderer places the button that opens the panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonLocation {
    /// Top left corner.
    TopLeft,
    /// Top right corner.
    TopRight,
    /// Bottom right corner.
    BottomRight,
}

impl ButtonLocation {
    /// Placement for a calendar with the given orientation.
    ///
    /// Vertical calendars put the button at the top, on the left when shown
    /// in a full-screen portal.
    #[must_use]
    pub const fn for_layout(orientation: Orientation, with_portal: bool) -> Self {
        if orientation.is_vertical() {
            if with_portal {
                Self::TopLeft
            } else {
                Self::TopRight
            }
        } else {
            Self::BottomRight
        }
    }
}

/// Identifiers for the text shown in the shortcuts panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs, reason = "variant names are the phrase names")]
pub enum PhraseKey {
    KeyboardShortcuts,
    ShowKeyboardShortcutsPanel,
    HideKeyboardShortcutsPanel,
    EnterKey,
    LeftArrowRightArrow,
    UpArrowDownArrow,
    PageUpPageDown,
    HomeEnd,
    Escape,
    QuestionMark,
    SelectFocusedDate,
    MoveFocusByOneDay,
    MoveFocusByOneWeek,
    MoveFocusByOneMonth,
    MoveFocusToStartAndEndOfWeek,
    ReturnFocusToInput,
    OpenThisPanel,
}

/// Host phrase table.
pub trait PhraseLookup {
    /// Text for `key` in the host's language.
    fn phrase(&self, key: PhraseKey) -> &str;
}

/// English phrases.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPhrases;

impl PhraseLookup for DefaultPhrases {
    fn phrase(&self, key: PhraseKey) -> &str {
        match key {
            PhraseKey::KeyboardShortcuts => "Keyboard Shortcuts",
            PhraseKey::ShowKeyboardShortcutsPanel => "Open the keyboard shortcuts panel.",
            PhraseKey::HideKeyboardShortcutsPanel => "Close the shortcuts panel.",
            PhraseKey::EnterKey => "Enter key",
            PhraseKey::LeftArrowRightArrow => "Right and left arrow keys",
            PhraseKey::UpArrowDownArrow => "up and down arrow keys",
            PhraseKey::PageUpPageDown => "page up and page down keys",
            PhraseKey::HomeEnd => "Home and end keys",
            PhraseKey::Escape => "Escape key",
            PhraseKey::QuestionMark => "Question mark",
            PhraseKey::SelectFocusedDate => "Select the date in focus.",
            PhraseKey::MoveFocusByOneDay => "Move backward (left) and forward (right) by one day.",
            PhraseKey::MoveFocusByOneWeek => "Move backward (up) and forward (down) by one week.",
            PhraseKey::MoveFocusByOneMonth => "Switch months.",
            PhraseKey::MoveFocusToStartAndEndOfWeek => "Go to the first or last day of a week.",
            PhraseKey::ReturnFocusToInput => "Return to the date input field.",
            PhraseKey::OpenThisPanel => "Open this panel.",
        }
    }
}

/// One row of the shortcuts list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShortcutRow {
    /// Glyphs for the keys.
    pub glyph: &'static str,
    /// Accessible name of the keys.
    pub label: PhraseKey,
    /// What the keys do.
    pub action: PhraseKey,
}

impl ShortcutRow {
    /// Resolves the label and action through `phrases`.
    pub fn texts<'p>(&self, phrases: &'p impl PhraseLookup) -> (&'p str, &'p str) {
        (phrases.phrase(self.label), phrases.phrase(self.action))
    }
}

/// Rows shown in the panel, in display order.
pub const KEYBOARD_SHORTCUTS: &[ShortcutRow] = &[
    ShortcutRow {
        glyph: "↵",
        label: PhraseKey::EnterKey,
        action: PhraseKey::SelectFocusedDate,
    },
    ShortcutRow {
        glyph: "←/→",
        label: PhraseKey::LeftArrowRightArrow,
        action: PhraseKey::MoveFocusByOneDay,
    },
    ShortcutRow {
        glyph: "↑/↓",
        label: PhraseKey::UpArrowDownArrow,
        action: PhraseKey::MoveFocusByOneWeek,
    },
    ShortcutRow {
        glyph: "PgUp/PgDn",
        label: PhraseKey::PageUpPageDown,
        action: PhraseKey::MoveFocusByOneMonth,
    },
    ShortcutRow {
        glyph: "Home/End",
        label: PhraseKey::HomeEnd,
        action: PhraseKey::MoveFocusToStartAndEndOfWeek,
    },
    ShortcutRow {
        glyph: "Esc",
        label: PhraseKey::Escape,
        action: PhraseKey::ReturnFocusToInput,
    },
    ShortcutRow {
        glyph: "?",
        label: PhraseKey::QuestionMark,
        action: PhraseKey::OpenThisPanel,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq)]
    struct Element(&'static str);

    #[test]
    fn trap_scenario() {
        let mut overlay = KeyboardShortcutsOverlay::new();
        assert_eq!(
            overlay.open(Some(Element("E"))),
            Some(FocusIntent::ShortcutsCloseControl)
        );
        assert_eq!(overlay.state().restore_focus_to, Some(Element("E")));
        assert_eq!(overlay.handle_key(Key::Tab), OverlayKey::Suppressed);
        assert!(overlay.is_open());
        assert_eq!(overlay.handle_key(Key::Escape), OverlayKey::Close);
        assert_eq!(overlay.close(), Some(FocusIntent::Restore(Element("E"))));
        assert!(!overlay.is_open());
        // The handle was consumed.
        assert_eq!(overlay.state().restore_focus_to, None);
        assert_eq!(overlay.close(), None);
    }

    #[test]
    fn key_classes() {
        let overlay = KeyboardShortcutsOverlay::<()>::new();
        for key in [Key::Enter, Key::Space, Key::Escape] {
            assert_eq!(overlay.handle_key(key), OverlayKey::Close);
        }
        for key in [Key::ArrowUp, Key::ArrowDown] {
            assert_eq!(overlay.handle_key(key), OverlayKey::PassThrough);
        }
        for key in [
            Key::Tab,
            Key::Home,
            Key::End,
            Key::PageUp,
            Key::PageDown,
            Key::ArrowLeft,
            Key::ArrowRight,
        ] {
            assert_eq!(overlay.handle_key(key), OverlayKey::Suppressed);
        }
        assert_eq!(overlay.handle_key(Key::Character('x')), OverlayKey::Ignored);
    }

    #[test]
    fn reopening_keeps_the_first_handle() {
        let mut overlay = KeyboardShortcutsOverlay::new();
        overlay.open(Some(1_u32));
        assert_eq!(overlay.open(Some(2)), None);
        assert_eq!(overlay.close(), Some(FocusIntent::Restore(1)));
    }

    #[test]
    fn close_without_handle_restores_nothing() {
        let mut overlay = KeyboardShortcutsOverlay::<u32>::new();
        overlay.open(None);
        assert_eq!(overlay.close(), None);
        assert!(!overlay.is_open());
    }

    #[test]
    fn button_location() {
        assert_eq!(
            ButtonLocation::for_layout(Orientation::Horizontal, true),
            ButtonLocation::BottomRight
        );
        assert_eq!(
            ButtonLocation::for_layout(Orientation::Vertical, false),
            ButtonLocation::TopRight
        );
        assert_eq!(
            ButtonLocation::for_layout(Orientation::VerticalScrollable, true),
            ButtonLocation::TopLeft
        );
    }

    #[test]
    fn rows_resolve_through_phrases() {
        assert_eq!(KEYBOARD_SHORTCUTS.len(), 7);
        let (label, action) = KEYBOARD_SHORTCUTS[6].texts(&DefaultPhrases);
        assert_eq!(label, "Question mark");
        assert_eq!(action, "Open this panel.");
    }
}
