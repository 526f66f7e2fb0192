// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Calendar: navigation and keyboard focus for date pickers.
//!
//! This crate is the state machine beneath a calendar widget. It does not
//! draw day cells; it decides which months are on screen, how the month strip
//! moves between them, and which day holds keyboard focus. It is built from:
//! - A **month window** ([`MonthWindow`]) and the week counts measured for
//!   it and its two hidden neighbours ([`WeekBuffer`], [`MonthLayout`]).
//! - A **transition controller** ([`TransitionController`]) that allows one
//!   month transition at a time and commits it on an external signal.
//! - A **focus tracker** ([`FocusTracker`]) that maps keyboard commands to
//!   days and defers focus across month boundaries until the transition
//!   that reveals the target has committed.
//! - A **rate limiter** ([`KeyboardRateLimiter`]) so held keys cannot queue
//!   transitions past the intended month.
//! - The **keyboard shortcuts panel** ([`KeyboardShortcutsOverlay`]), a
//!   single-control focus trap.
//!
//! [`DayPicker`] composes all of them. Hosts feed it key presses with
//! millisecond timestamps and read back state, [`PickerEvent`]s, and
//! [`FocusIntent`]s that say where platform focus should go.
//!
//! ## Minimal example
//!
//! Moving focus past the last visible day pages forward, and focus follows
//! only once the transition commits:
//!
//! ```rust
//! use chrono::NaiveDate;
//! use understory_calendar::{CalendarMonth, DayPicker, Key, PickerConfig, PickerEvent};
//!
//! let jan = CalendarMonth::from_ym(2024, 1).unwrap();
//! let config = PickerConfig {
//!     number_of_months: 1,
//!     transition_duration: Some(300),
//!     ..PickerConfig::default()
//! };
//! let mut picker: DayPicker<&str> = DayPicker::new(jan, config);
//! picker.set_focused(true);
//!
//! let jan_31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//! assert!(picker.focus_date(jan_31));
//! picker.handle_key(Key::ArrowRight, 0, None);
//!
//! // February is not visible yet, so focus stays put while the strip slides.
//! assert!(picker.is_animating());
//! assert_eq!(picker.focused_date(), Some(jan_31));
//!
//! let ticket = picker
//!     .drain_events()
//!     .find_map(|event| match event {
//!         PickerEvent::TransitionStarted(ticket) => Some(ticket),
//!         _ => None,
//!     })
//!     .unwrap();
//!
//! // The host's timer fires after `ticket.duration` milliseconds.
//! picker.complete_transition(ticket.generation);
//! assert_eq!(picker.layout().window().current_month(), jan.plus_months(1).unwrap());
//! assert_eq!(picker.focused_date(), NaiveDate::from_ymd_opt(2024, 2, 1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod focus;
mod geometry;
mod input;
mod key;
mod layout;
mod month;
mod picker;
mod rate_limit;
mod shortcuts;
mod transition;
mod window;

pub use config::{ConfigError, MAX_NUMBER_OF_MONTHS, MIN_DAY_SIZE, PickerConfig};
pub use focus::{
    CalendarPolicy, DefaultPolicy, Direction, FocusDecision, FocusIntent, FocusState,
    FocusTracker, NavCommand, candidate_date,
};
pub use geometry::{
    CALENDAR_MONTH_PADDING, CalendarMetrics, DAY_PICKER_PADDING, DEFAULT_DAY_SIZE, MONTH_PADDING,
    WeekBuffer, compute_week_counts, weeks_in_month,
};
pub use input::{DateInputKeys, InputAction, TextChange, ends_with_question_mark};
pub use key::{Key, KeyInput, Modifiers};
pub use layout::MonthLayout;
pub use month::{CalendarMonth, end_of_week, start_of_week};
pub use picker::{DayPicker, PickerEvent, PickerState};
pub use rate_limit::{KeyboardRateLimiter, NAVIGATION_WINDOW_MS, RateLimit, TEXT_INPUT_WINDOW_MS};
pub use shortcuts::{
    ButtonLocation, DefaultPhrases, KEYBOARD_SHORTCUTS, KeyboardShortcutsOverlay, OverlayKey,
    OverlayState, PhraseKey, PhraseLookup, ShortcutRow,
};
pub use transition::{
    CommittedTransition, TransitionController, TransitionKind, TransitionState, TransitionTicket,
};
pub use window::{MonthWindow, Orientation};
