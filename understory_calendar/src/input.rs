// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key routing for the text field that sits next to the calendar.
//!
//! The field itself (parsing, formatting) belongs to the host. This module only
//! decides which picker-level action a key press in the field stands for,
//! behind the slower [`TEXT_INPUT_WINDOW_MS`](crate::TEXT_INPUT_WINDOW_MS) throttle.

use alloc::string::String;

use crate::key::{Key, KeyInput, Modifiers};
use crate::rate_limit::{KeyboardRateLimiter, RateLimit};

/// A picker-level action requested from the text field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Tab: move focus past the field, into the calendar or beyond.
    MoveFocusForward,
    /// Shift+Tab: move focus back out of the field.
    MoveFocusBack,
    /// Arrow down: open the calendar and focus a day.
    OpenCalendar,
    /// `?`: open the keyboard shortcuts panel.
    ShowShortcuts,
}

/// Outcome of an edit to the field's text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextChange {
    /// The text now ends in `?`; treat it as a request for the shortcuts
    /// panel and keep the previous text.
    ShowShortcuts,
    /// Regular edit; the host should parse the new text.
    Text(String),
}

/// Routes key presses and edits in the date text field.
#[derive(Clone, Debug)]
pub struct DateInputKeys {
    limiter: KeyboardRateLimiter,
    text: String,
}

impl Default for DateInputKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl DateInputKeys {
    /// Router using the text-input rate limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_limiter(KeyboardRateLimiter::text_input())
    }

    /// Router using a custom limiter.
    #[must_use]
    pub fn with_limiter(limiter: KeyboardRateLimiter) -> Self {
        Self {
            limiter,
            text: String::new(),
        }
    }

    /// The text typed so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Maps a key press at `now` (milliseconds) to an action.
    ///
    /// Returns `None` for modifiers, for keys dropped by the limiter, and for
    /// keys that are regular text entry.
    pub fn key_down(&mut self, input: KeyInput, now: u64) -> Option<InputAction> {
        if self.limiter.filter(input.key, now) != RateLimit::Dispatch {
            return None;
        }
        let action = match input.key {
            Key::Tab if input.modifiers.contains(Modifiers::SHIFT) => InputAction::MoveFocusBack,
            Key::Tab => InputAction::MoveFocusForward,
            Key::ArrowDown => InputAction::OpenCalendar,
            Key::Character('?') => InputAction::ShowShortcuts,
            _ => return None,
        };
        tracing::trace!(?action, "date input key routed");
        Some(action)
    }

    /// Handles a change to the field's text.
    ///
    /// Some engines deliver the edit before (or instead of) the key press, so
    /// a trailing `?` is treated as the shortcut here too.
    pub fn text_changed(&mut self, text: &str) -> TextChange {
        if ends_with_question_mark(text) {
            return TextChange::ShowShortcuts;
        }
        self.text.clear();
        self.text.push_str(text);
        TextChange::Text(self.text.clone())
    }

    /// Forgets the typed text, once the host displays a formatted value.
    pub fn clear_text(&mut self) {
        self.text.clear();
    }
}

/// Returns `true` if the last character of `text` is `?`.
#[must_use]
pub fn ends_with_question_mark(text: &str) -> bool {
    text.ends_with('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_map() {
        let mut keys = DateInputKeys::new();
        assert_eq!(
            keys.key_down(KeyInput::plain(Key::Tab), 0),
            Some(InputAction::MoveFocusForward)
        );
        assert_eq!(
            keys.key_down(KeyInput::with_modifiers(Key::Tab, Modifiers::SHIFT), 1_000),
            Some(InputAction::MoveFocusBack)
        );
        assert_eq!(
            keys.key_down(Key::ArrowDown.into(), 2_000),
            Some(InputAction::OpenCalendar)
        );
        assert_eq!(
            keys.key_down(Key::Character('?').into(), 3_000),
            Some(InputAction::ShowShortcuts)
        );
        assert_eq!(keys.key_down(Key::Character('1').into(), 4_000), None);
    }

    #[test]
    fn throttles_at_text_rate() {
        let mut keys = DateInputKeys::new();
        assert!(keys.key_down(Key::ArrowDown.into(), 0).is_some());
        assert!(keys.key_down(Key::ArrowDown.into(), 250).is_none());
        assert!(keys.key_down(Key::Shift.into(), 260).is_none());
        assert!(keys.key_down(Key::ArrowDown.into(), 300).is_some());
    }

    #[test]
    fn trailing_question_mark_opens_shortcuts() {
        let mut keys = DateInputKeys::new();
        assert_eq!(
            keys.text_changed("03/1"),
            TextChange::Text(String::from("03/1"))
        );
        assert_eq!(keys.text_changed("03/1?"), TextChange::ShowShortcuts);
        assert_eq!(keys.text(), "03/1");
        keys.clear_text();
        assert_eq!(keys.text(), "");
        assert!(!ends_with_question_mark(""));
    }
}
