// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard focus over calendar days.
//!
//! [`FocusTracker`] maps a [`NavCommand`] and the currently focused date to
//! the next date. When the next date lies outside the visible window the
//! tracker does not move focus; it asks for a month transition and hands the
//! date over as pending focus, to be applied when the transition commits.
//! Moving focus into a month that is about to slide out of view would
//! interrupt the animation.

use chrono::{NaiveDate, Weekday};

use crate::key::Key;
use crate::month::{self, CalendarMonth};
use crate::transition::CommittedTransition;
use crate::window::MonthWindow;

/// A calendar keyboard command, after rate limiting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavCommand {
    /// One week back.
    Up,
    /// One week forward.
    Down,
    /// One day toward the visual left.
    Left,
    /// One day toward the visual right.
    Right,
    /// Start of the focused week.
    Home,
    /// End of the focused week.
    End,
    /// One month back.
    PageUp,
    /// One month forward.
    PageDown,
    /// Open the keyboard shortcuts panel.
    ShowShortcuts,
    /// Close the shortcuts panel, or leave the calendar.
    Escape,
}

impl NavCommand {
    /// Maps a key to its calendar command, if it has one.
    #[must_use]
    pub const fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::ArrowUp => Self::Up,
            Key::ArrowDown => Self::Down,
            Key::ArrowLeft => Self::Left,
            Key::ArrowRight => Self::Right,
            Key::Home => Self::Home,
            Key::End => Self::End,
            Key::PageUp => Self::PageUp,
            Key::PageDown => Self::PageDown,
            Key::Character('?') => Self::ShowShortcuts,
            Key::Escape => Self::Escape,
            _ => return None,
        })
    }
}

/// Direction of a month transition in time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward earlier months.
    Prev,
    /// Toward later months.
    Next,
}

/// Host policy for which days may hold focus.
///
/// All methods have defaults, so an empty `impl` gives the standard behavior.
pub trait CalendarPolicy {
    /// Preferred initial focus when the calendar gains focus showing `month`.
    ///
    /// Returning `None`, or a date outside the visible window, falls back to
    /// the first day of `month`.
    fn first_focusable_day(&self, month: CalendarMonth) -> Option<NaiveDate> {
        let _ = month;
        None
    }

    /// Whether keyboard focus may move onto `date`.
    ///
    /// Commands whose target is rejected do nothing.
    fn is_day_focusable(&self, date: NaiveDate) -> bool {
        let _ = date;
        true
    }

    /// First day of the week for the host locale.
    fn locale_first_day_of_week(&self) -> Weekday {
        Weekday::Sun
    }
}

/// The standard [`CalendarPolicy`].
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultPolicy;

impl CalendarPolicy for DefaultPolicy {}

/// Where focus should go, for the rendering layer to carry out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FocusIntent<H> {
    /// Focus the cell for this day.
    Day(NaiveDate),
    /// Focus the close control of the keyboard shortcuts panel.
    ShortcutsCloseControl,
    /// Return focus to a host element captured earlier.
    Restore(H),
    /// Blur whatever element inside the calendar holds focus.
    ReleaseWithin,
}

/// Keyboard focus bookkeeping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusState {
    /// Day eligible for keyboard focus.
    pub focused_date: Option<NaiveDate>,
    /// Whether the last interaction came from a pointer.
    pub used_pointer: bool,
}

/// Outcome of a navigation command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FocusDecision {
    /// Nothing changes.
    Unchanged,
    /// Focus moves now.
    Immediate(NaiveDate),
    /// Focus moves after a transition in `direction` commits.
    Transition {
        /// Which way to page.
        direction: Direction,
        /// Date to focus at commit.
        pending: NaiveDate,
    },
}

/// Computes the date a command moves focus to, before any visibility check.
///
/// Returns `None` for commands that do not move focus and when the result
/// would leave the supported calendar range.
#[must_use]
pub fn candidate_date(
    command: NavCommand,
    focused: NaiveDate,
    is_rtl: bool,
    first_day_of_week: Weekday,
) -> Option<NaiveDate> {
    let day_step = if is_rtl { -1 } else { 1 };
    match command {
        NavCommand::Up => month::add_days(focused, -7),
        NavCommand::Down => month::add_days(focused, 7),
        NavCommand::Left => month::add_days(focused, -day_step),
        NavCommand::Right => month::add_days(focused, day_step),
        NavCommand::Home => month::start_of_week(focused, first_day_of_week),
        NavCommand::End => month::end_of_week(focused, first_day_of_week),
        NavCommand::PageUp => month::add_months(focused, -1),
        NavCommand::PageDown => month::add_months(focused, 1),
        NavCommand::ShowShortcuts | NavCommand::Escape => None,
    }
}

/// Tracks the focused day and resolves deferred focus.
#[derive(Clone, Debug, Default)]
pub struct FocusTracker {
    state: FocusState,
}

impl FocusTracker {
    /// Creates a tracker with no focused date.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with the given state.
    #[must_use]
    pub const fn with_state(state: FocusState) -> Self {
        Self { state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FocusState {
        &self.state
    }

    /// The focused date, if any.
    #[must_use]
    pub const fn focused_date(&self) -> Option<NaiveDate> {
        self.state.focused_date
    }

    /// Whether the last interaction was pointer-driven.
    #[must_use]
    pub const fn used_pointer(&self) -> bool {
        self.state.used_pointer
    }

    /// Decides what `command` does from the current focus.
    #[must_use]
    pub fn decide(
        &self,
        command: NavCommand,
        window: &MonthWindow,
        is_rtl: bool,
        first_day_of_week: Weekday,
        policy: &impl CalendarPolicy,
    ) -> FocusDecision {
        let Some(focused) = self.state.focused_date else {
            return FocusDecision::Unchanged;
        };
        let Some(candidate) = candidate_date(command, focused, is_rtl, first_day_of_week) else {
            return FocusDecision::Unchanged;
        };
        if !policy.is_day_focusable(candidate) {
            tracing::trace!(%candidate, "focus target rejected by policy");
            return FocusDecision::Unchanged;
        }
        let candidate_month = CalendarMonth::of(candidate);
        if candidate_month != CalendarMonth::of(focused) && !window.is_visible(candidate) {
            let direction = if candidate_month < window.current_month() {
                Direction::Prev
            } else {
                Direction::Next
            };
            return FocusDecision::Transition {
                direction,
                pending: candidate,
            };
        }
        FocusDecision::Immediate(candidate)
    }

    /// Default focus for a window starting at `month`.
    #[must_use]
    pub fn default_focus(
        month: CalendarMonth,
        window: &MonthWindow,
        policy: &impl CalendarPolicy,
    ) -> NaiveDate {
        policy
            .first_focusable_day(month)
            .filter(|&date| window.is_visible(date))
            .unwrap_or_else(|| month.first_day())
    }

    /// Sets the focused date.
    pub fn set_focused_date(&mut self, date: Option<NaiveDate>) {
        self.state.focused_date = date;
    }

    /// Focus entered the calendar from the keyboard; picks the default day.
    pub fn focus_in(&mut self, window: &MonthWindow, policy: &impl CalendarPolicy) -> NaiveDate {
        let date = Self::default_focus(window.current_month(), window, policy);
        self.state.focused_date = Some(date);
        self.state.used_pointer = false;
        date
    }

    /// Focus left the calendar entirely.
    pub fn focus_out(&mut self) {
        self.state.focused_date = None;
    }

    /// A pointer interaction happened inside the calendar.
    pub fn pointer_used(&mut self) {
        self.state.used_pointer = true;
    }

    /// A keyboard interaction happened inside the calendar.
    pub fn keyboard_used(&mut self) {
        self.state.used_pointer = false;
    }

    /// Seeds the default day if nothing is focused yet.
    ///
    /// Returns the seeded date, or `None` if a date was already focused.
    pub fn ensure_focus(
        &mut self,
        window: &MonthWindow,
        policy: &impl CalendarPolicy,
    ) -> Option<NaiveDate> {
        if self.state.focused_date.is_some() {
            return None;
        }
        let date = Self::default_focus(window.current_month(), window, policy);
        self.state.focused_date = Some(date);
        Some(date)
    }

    /// Applies a committed transition to the focus state.
    ///
    /// - Pending focus, when present, becomes the focused date.
    /// - Otherwise, after keyboard-driven paging, the default day of the new
    ///   window is focused.
    /// - Otherwise, after pointer-driven paging, no day is focused and any
    ///   element inside the calendar should be released.
    pub fn resolve_commit<H>(
        &mut self,
        committed: &CommittedTransition,
        window: &MonthWindow,
        policy: &impl CalendarPolicy,
    ) -> FocusIntent<H> {
        if let Some(date) = committed.pending_focus {
            self.state.focused_date = Some(date);
            return FocusIntent::Day(date);
        }
        if self.state.used_pointer {
            self.state.focused_date = None;
            return FocusIntent::ReleaseWithin;
        }
        let date = Self::default_focus(committed.month, window, policy);
        self.state.focused_date = Some(date);
        FocusIntent::Day(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::TransitionKind;
    use crate::window::Orientation;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn window(y: i32, m: u32, n: u16) -> MonthWindow {
        MonthWindow::new(CalendarMonth::from_ym(y, m).unwrap(), n, Orientation::Horizontal)
    }

    fn tracker(focused: NaiveDate) -> FocusTracker {
        FocusTracker::with_state(FocusState {
            focused_date: Some(focused),
            used_pointer: false,
        })
    }

    #[test]
    fn command_table() {
        // 2024-01-17 is a Wednesday.
        let wed = date(2024, 1, 17);
        let sun = Weekday::Sun;
        assert_eq!(candidate_date(NavCommand::Up, wed, false, sun), Some(date(2024, 1, 10)));
        assert_eq!(candidate_date(NavCommand::Down, wed, false, sun), Some(date(2024, 1, 24)));
        assert_eq!(candidate_date(NavCommand::Left, wed, false, sun), Some(date(2024, 1, 16)));
        assert_eq!(candidate_date(NavCommand::Right, wed, false, sun), Some(date(2024, 1, 18)));
        assert_eq!(candidate_date(NavCommand::Left, wed, true, sun), Some(date(2024, 1, 18)));
        assert_eq!(candidate_date(NavCommand::Right, wed, true, sun), Some(date(2024, 1, 16)));
        assert_eq!(candidate_date(NavCommand::Home, wed, false, sun), Some(date(2024, 1, 14)));
        assert_eq!(candidate_date(NavCommand::End, wed, false, sun), Some(date(2024, 1, 20)));
        assert_eq!(candidate_date(NavCommand::PageUp, wed, false, sun), Some(date(2023, 12, 17)));
        assert_eq!(candidate_date(NavCommand::PageDown, wed, false, sun), Some(date(2024, 2, 17)));
        assert_eq!(candidate_date(NavCommand::Escape, wed, false, sun), None);
        assert_eq!(candidate_date(NavCommand::ShowShortcuts, wed, false, sun), None);
    }

    #[test]
    fn visible_candidates_move_immediately() {
        let w = window(2024, 3, 2);
        let t = tracker(date(2024, 3, 31));
        assert_eq!(
            t.decide(NavCommand::Right, &w, false, Weekday::Sun, &DefaultPolicy),
            FocusDecision::Immediate(date(2024, 4, 1))
        );
    }

    #[test]
    fn hidden_candidates_request_a_transition() {
        let w = window(2024, 1, 1);
        let t = tracker(date(2024, 1, 31));
        assert_eq!(
            t.decide(NavCommand::Right, &w, false, Weekday::Sun, &DefaultPolicy),
            FocusDecision::Transition {
                direction: Direction::Next,
                pending: date(2024, 2, 1),
            }
        );
        let t = tracker(date(2024, 1, 3));
        assert_eq!(
            t.decide(NavCommand::Up, &w, false, Weekday::Sun, &DefaultPolicy),
            FocusDecision::Transition {
                direction: Direction::Prev,
                pending: date(2023, 12, 27),
            }
        );
    }

    #[test]
    fn rtl_left_pages_forward_in_time() {
        let w = window(2024, 1, 1);
        let t = tracker(date(2024, 1, 31));
        assert_eq!(
            t.decide(NavCommand::Left, &w, true, Weekday::Sun, &DefaultPolicy),
            FocusDecision::Transition {
                direction: Direction::Next,
                pending: date(2024, 2, 1),
            }
        );
    }

    #[test]
    fn no_focus_means_no_decision() {
        let w = window(2024, 1, 1);
        let t = FocusTracker::new();
        assert_eq!(
            t.decide(NavCommand::Down, &w, false, Weekday::Sun, &DefaultPolicy),
            FocusDecision::Unchanged
        );
    }

    struct WeekdaysOnly;

    impl CalendarPolicy for WeekdaysOnly {
        fn first_focusable_day(&self, month: CalendarMonth) -> Option<NaiveDate> {
            month::add_days(month.first_day(), 39)
        }

        fn is_day_focusable(&self, date: NaiveDate) -> bool {
            use chrono::Datelike;
            !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
        }
    }

    #[test]
    fn policy_rejection_is_a_no_op() {
        let w = window(2024, 1, 1);
        // 2024-01-19 is a Friday; the next day is a Saturday.
        let t = tracker(date(2024, 1, 19));
        assert_eq!(
            t.decide(NavCommand::Right, &w, false, Weekday::Sun, &WeekdaysOnly),
            FocusDecision::Unchanged
        );
    }

    #[test]
    fn default_focus_falls_back_when_policy_day_is_hidden() {
        let w = window(2024, 1, 1);
        let jan = w.current_month();
        // The policy suggests a day in February, which is not visible.
        assert_eq!(FocusTracker::default_focus(jan, &w, &WeekdaysOnly), date(2024, 1, 1));
        let wide = window(2024, 1, 2);
        assert_eq!(FocusTracker::default_focus(jan, &wide, &WeekdaysOnly), date(2024, 2, 9));
    }

    #[test]
    fn commit_resolution_rules() {
        let w = window(2024, 2, 1);
        let feb = w.current_month();
        let mut t = tracker(date(2024, 1, 31));
        let with_pending = CommittedTransition {
            kind: TransitionKind::Next,
            month: feb,
            pending_focus: Some(date(2024, 2, 1)),
        };
        assert_eq!(
            t.resolve_commit::<()>(&with_pending, &w, &DefaultPolicy),
            FocusIntent::Day(date(2024, 2, 1))
        );
        assert_eq!(t.focused_date(), Some(date(2024, 2, 1)));

        let without = CommittedTransition {
            pending_focus: None,
            ..with_pending
        };
        assert_eq!(
            t.resolve_commit::<()>(&without, &w, &DefaultPolicy),
            FocusIntent::Day(date(2024, 2, 1))
        );

        t.pointer_used();
        assert_eq!(
            t.resolve_commit::<()>(&without, &w, &DefaultPolicy),
            FocusIntent::ReleaseWithin
        );
        assert_eq!(t.focused_date(), None);
    }
}
