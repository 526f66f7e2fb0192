// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The composed day picker controller.
//!
//! [`DayPicker`] wires the pieces together in the order input flows through
//! them: rate limiter, shortcuts panel, focus tracker, transition controller.
//! It owns no rendering; the host reads its outputs, performs focus calls
//! from [`FocusIntent`]s, and drives transitions to completion.
//!
//! ## Driving transitions
//!
//! Every transition start is reported as [`PickerEvent::TransitionStarted`]
//! with a [`TransitionTicket`]. If the ticket has a duration, the host starts
//! a timer and calls [`DayPicker::complete_transition`] with the ticket's
//! generation when it fires. Without a duration the picker commits on its own
//! before returning.

use chrono::NaiveDate;
use kurbo::{Size, Vec2};
use smallvec::SmallVec;

use crate::config::{ConfigError, MAX_NUMBER_OF_MONTHS, MIN_DAY_SIZE, PickerConfig};
use crate::focus::{
    CalendarPolicy, DefaultPolicy, Direction, FocusDecision, FocusIntent, FocusState,
    FocusTracker, NavCommand,
};
use crate::geometry::{CalendarMetrics, MONTH_PADDING, WeekBuffer, weeks_in_month};
use crate::key::KeyInput;
use crate::layout::MonthLayout;
use crate::month::CalendarMonth;
use crate::rate_limit::{KeyboardRateLimiter, RateLimit};
use crate::shortcuts::{ButtonLocation, KeyboardShortcutsOverlay, OverlayKey, OverlayState};
use crate::transition::{
    CommittedTransition, TransitionController, TransitionKind, TransitionState, TransitionTicket,
};
use crate::window::{MonthWindow, Orientation};

/// Notifications for the host, drained with [`DayPicker::drain_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickerEvent<H> {
    /// A transition started; schedule its completion.
    TransitionStarted(TransitionTicket),
    /// Paging back committed; carries the new first visible month.
    PrevMonth(CalendarMonth),
    /// Paging forward committed; carries the new first visible month.
    NextMonth(CalendarMonth),
    /// A month selector jump committed.
    MonthChanged(CalendarMonth),
    /// A year selector jump committed.
    YearChanged(CalendarMonth),
    /// The keyboard shortcuts panel opened.
    OverlayOpened,
    /// The keyboard shortcuts panel closed.
    OverlayClosed,
    /// Escape was pressed with the panel closed; the calendar should be dismissed.
    BlurRequested,
    /// A scrollable calendar extended the number of rendered months.
    MultiplyScrollableMonths,
    /// Move platform focus.
    Focus(FocusIntent<H>),
}

/// Snapshot of everything the picker tracks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickerState<H> {
    /// Visible window and buffered week counts.
    pub layout: MonthLayout,
    /// In-flight transition, if any.
    pub transition: TransitionState,
    /// Keyboard focus.
    pub focus: FocusState,
    /// Keyboard shortcuts panel.
    pub overlay: OverlayState<H>,
    /// Whether the calendar holds focus.
    pub is_focused: bool,
}

/// Calendar navigation and focus controller.
///
/// `H` is the host's handle for a focusable element, used to return focus
/// after the shortcuts panel closes.
#[derive(Debug)]
pub struct DayPicker<H, P = DefaultPolicy> {
    config: PickerConfig,
    policy: P,
    layout: MonthLayout,
    transitions: TransitionController,
    focus: FocusTracker,
    overlay: KeyboardShortcutsOverlay<H>,
    limiter: KeyboardRateLimiter,
    is_focused: bool,
    torn_down: bool,
    events: SmallVec<[PickerEvent<H>; 4]>,
}

impl<H> DayPicker<H, DefaultPolicy> {
    /// Creates a picker showing `initial_month` first.
    ///
    /// Out-of-range configuration values are clamped with a warning.
    #[must_use]
    pub fn new(initial_month: CalendarMonth, config: PickerConfig) -> Self {
        Self::with_policy(initial_month, config, DefaultPolicy)
    }

    /// Creates a picker, rejecting invalid configuration.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] found by [`PickerConfig::validate`].
    pub fn try_new(initial_month: CalendarMonth, config: PickerConfig) -> Result<Self, ConfigError> {
        Self::try_with_policy(initial_month, config, DefaultPolicy)
    }
}

impl<H, P: CalendarPolicy> DayPicker<H, P> {
    /// Like [`DayPicker::new`], with a host [`CalendarPolicy`].
    #[must_use]
    pub fn with_policy(initial_month: CalendarMonth, config: PickerConfig, policy: P) -> Self {
        Self::build(initial_month, config.clamped(), policy)
    }

    /// Like [`DayPicker::try_new`], with a host [`CalendarPolicy`].
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] found by [`PickerConfig::validate`].
    pub fn try_with_policy(
        initial_month: CalendarMonth,
        config: PickerConfig,
        policy: P,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(initial_month, config, policy))
    }

    fn build(initial_month: CalendarMonth, config: PickerConfig, policy: P) -> Self {
        let first_day_of_week =
            config.effective_first_day_of_week(policy.locale_first_day_of_week());
        let layout = MonthLayout::new(
            MonthWindow::new(initial_month, config.number_of_months, config.orientation),
            CalendarMetrics::new(config.day_size),
            first_day_of_week,
            config.is_rtl,
        );
        let transitions = TransitionController::new(&layout, config.transition_duration);
        let mut overlay = KeyboardShortcutsOverlay::new();
        let mut events = SmallVec::new();
        // The calendar is unfocused at build, so only the open is reported.
        if config.show_keyboard_shortcuts
            && !config.hide_keyboard_shortcuts_panel
            && overlay.open(None).is_some()
        {
            events.push(PickerEvent::OverlayOpened);
        }
        tracing::debug!(
            month = %initial_month,
            number_of_months = config.number_of_months,
            orientation = ?config.orientation,
            "day picker created"
        );
        Self {
            config,
            policy,
            layout,
            transitions,
            focus: FocusTracker::new(),
            overlay,
            limiter: KeyboardRateLimiter::navigation(),
            is_focused: false,
            torn_down: false,
            events,
        }
    }

    /// Active configuration, after clamping.
    #[must_use]
    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// The host policy.
    #[must_use]
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Visible window and its week geometry.
    #[must_use]
    pub const fn layout(&self) -> &MonthLayout {
        &self.layout
    }

    /// Transition bookkeeping.
    #[must_use]
    pub const fn transition(&self) -> &TransitionState {
        self.transitions.state()
    }

    /// The keyboard-focus-eligible day.
    #[must_use]
    pub const fn focused_date(&self) -> Option<NaiveDate> {
        self.focus.focused_date()
    }

    /// Whether the calendar holds focus.
    #[must_use]
    pub const fn is_focused(&self) -> bool {
        self.is_focused
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.transitions.is_animating()
    }

    /// Returns `true` while the keyboard shortcuts panel is showing.
    #[must_use]
    pub const fn is_overlay_open(&self) -> bool {
        self.overlay.is_open()
    }

    /// The visible months.
    #[must_use]
    pub fn visible_range(&self) -> core::ops::RangeInclusive<CalendarMonth> {
        self.layout.window().visible_range()
    }

    /// Week counts for the visible months plus one buffered month on each side.
    #[must_use]
    pub const fn week_counts(&self) -> &WeekBuffer {
        self.layout.weeks()
    }

    /// Translation to apply to the month strip.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.transitions.translation(self.layout.orientation())
    }

    /// Buffer slot of the first month on screen.
    #[must_use]
    pub fn first_visible_index(&self) -> usize {
        self.transitions.first_visible_index(self.layout.orientation())
    }

    /// Size of the month grid container.
    ///
    /// Horizontal calendars are as tall as the tallest month visible once the
    /// current transition ends. Vertical calendars stack every rendered month.
    #[must_use]
    pub fn grid_size(&self) -> Size {
        let metrics = self.layout.metrics();
        let window = self.layout.window();
        match window.orientation() {
            Orientation::Horizontal => metrics.horizontal_grid_size(
                window.number_of_months(),
                self.transitions.target_max_weeks(&self.layout),
            ),
            Orientation::Vertical | Orientation::VerticalScrollable => {
                let first_day_of_week = self.layout.first_day_of_week();
                let height: f64 = (0..window.rendered_months())
                    .filter_map(|i| window.current_month().plus_months(u32::from(i)))
                    .map(|month| metrics.month_height(weeks_in_month(month, first_day_of_week)))
                    .sum();
                Size::new(metrics.wrapper_width(1), height + MONTH_PADDING)
            }
        }
    }

    /// Whether the day renderer should move platform focus onto the focused day.
    ///
    /// False while animating, so focus never lands on a cell that is sliding away.
    #[must_use]
    pub fn should_focus_date(&self) -> bool {
        self.is_focused && !self.is_animating() && self.focused_date().is_some()
    }

    /// Where to place the button that opens the shortcuts panel.
    #[must_use]
    pub const fn button_location(&self) -> ButtonLocation {
        ButtonLocation::for_layout(self.config.orientation, self.config.with_portal)
    }

    /// Takes the notifications queued since the last call.
    pub fn drain_events(&mut self) -> impl Iterator<Item = PickerEvent<H>> + '_ {
        self.events.drain(..)
    }

    /// The calendar gained or lost focus.
    ///
    /// Gaining focus picks the default day of the first visible month.
    /// Losing focus clears the focused day.
    pub fn set_focused(&mut self, focused: bool) {
        if self.torn_down || focused == self.is_focused {
            return;
        }
        self.is_focused = focused;
        if focused {
            let date = self.focus.focus_in(self.layout.window(), &self.policy);
            self.events.push(PickerEvent::Focus(FocusIntent::Day(date)));
        } else {
            self.focus.focus_out();
        }
    }

    /// Makes `date` the focused day, as when the user clicks or tabs onto it.
    ///
    /// Returns `false`, leaving focus alone, if the day is not visible or the
    /// policy rejects it, or after [`teardown`](Self::teardown).
    pub fn focus_date(&mut self, date: NaiveDate) -> bool {
        if self.torn_down {
            return false;
        }
        if !self.layout.window().is_visible(date) || !self.policy.is_day_focusable(date) {
            return false;
        }
        self.focus.set_focused_date(Some(date));
        true
    }

    /// A pointer was released inside the calendar.
    pub fn on_pointer_up(&mut self) {
        if self.torn_down {
            return;
        }
        self.focus.pointer_used();
    }

    /// Handles a key press on the calendar at `now` (milliseconds).
    ///
    /// `active` is the host's currently focused element, captured as the
    /// focus to restore if the key opens the shortcuts panel.
    ///
    /// Returns `true` if the host should suppress the key's default behavior.
    pub fn handle_key(&mut self, input: impl Into<KeyInput>, now: u64, active: Option<H>) -> bool {
        let input: KeyInput = input.into();
        let key = input.key;
        if self.torn_down {
            return false;
        }
        if self.overlay.is_open() {
            return match self.overlay.handle_key(key) {
                OverlayKey::Close => {
                    self.close_shortcuts();
                    true
                }
                OverlayKey::Suppressed => true,
                OverlayKey::PassThrough | OverlayKey::Ignored => false,
            };
        }
        if self.limiter.filter(key, now) != RateLimit::Dispatch {
            return false;
        }
        let Some(command) = NavCommand::from_key(key) else {
            return false;
        };
        self.focus.keyboard_used();
        match command {
            NavCommand::ShowShortcuts => self.open_shortcuts(active),
            NavCommand::Escape => {
                tracing::debug!("blur requested");
                self.events.push(PickerEvent::BlurRequested);
                true
            }
            _ => {
                self.navigate(command);
                true
            }
        }
    }

    fn navigate(&mut self, command: NavCommand) {
        if self.is_animating() {
            tracing::trace!(?command, "navigation ignored: transition in flight");
            return;
        }
        if let Some(date) = self.focus.ensure_focus(self.layout.window(), &self.policy) {
            if self.is_focused {
                self.events.push(PickerEvent::Focus(FocusIntent::Day(date)));
            }
            return;
        }
        match self.focus.decide(
            command,
            self.layout.window(),
            self.layout.is_rtl(),
            self.layout.first_day_of_week(),
            &self.policy,
        ) {
            FocusDecision::Unchanged => {}
            FocusDecision::Immediate(date) => {
                self.focus.set_focused_date(Some(date));
                if self.is_focused {
                    self.events.push(PickerEvent::Focus(FocusIntent::Day(date)));
                }
            }
            FocusDecision::Transition { direction, pending } => {
                self.page(direction, Some(pending));
            }
        }
    }

    /// The previous-month button was clicked.
    pub fn prev_month_click(&mut self) -> Option<TransitionTicket> {
        self.focus.pointer_used();
        self.page(Direction::Prev, None)
    }

    /// The next-month button was clicked.
    ///
    /// Scrollable calendars render more months instead of paging.
    pub fn next_month_click(&mut self) -> Option<TransitionTicket> {
        self.focus.pointer_used();
        if self.torn_down {
            return None;
        }
        if matches!(self.layout.orientation(), Orientation::VerticalScrollable) {
            self.layout.grow_scrollable();
            tracing::debug!(
                multiple = self.layout.window().scrollable_month_multiple(),
                "scrollable months extended"
            );
            self.events.push(PickerEvent::MultiplyScrollableMonths);
            return None;
        }
        self.page(Direction::Next, None)
    }

    /// A month was chosen in the month selector.
    pub fn select_month(&mut self, month: CalendarMonth) -> Option<TransitionTicket> {
        if self.torn_down {
            return None;
        }
        let ticket = self.transitions.begin_month_select(month, &self.layout)?;
        Some(self.started(ticket))
    }

    /// A month was chosen in the year selector.
    pub fn select_year(&mut self, month: CalendarMonth) -> Option<TransitionTicket> {
        if self.torn_down {
            return None;
        }
        let ticket = self.transitions.begin_year_select(month, &self.layout)?;
        Some(self.started(ticket))
    }

    fn page(&mut self, direction: Direction, pending: Option<NaiveDate>) -> Option<TransitionTicket> {
        if self.torn_down {
            return None;
        }
        let ticket = match direction {
            Direction::Prev => self.transitions.begin_prev(pending, &self.layout),
            Direction::Next => self.transitions.begin_next(pending, &self.layout),
        }?;
        Some(self.started(ticket))
    }

    fn started(&mut self, ticket: TransitionTicket) -> TransitionTicket {
        self.events.push(PickerEvent::TransitionStarted(ticket));
        if ticket.duration.is_none() {
            self.commit();
        }
        ticket
    }

    /// Commits the in-flight transition, whatever its generation.
    ///
    /// Returns `None` when idle or after [`teardown`](Self::teardown).
    pub fn commit(&mut self) -> Option<CommittedTransition> {
        if self.torn_down {
            return None;
        }
        let committed = self.transitions.commit(&mut self.layout)?;
        self.committed(committed);
        Some(committed)
    }

    /// Commits the transition named by `generation`, ignoring stale signals.
    pub fn complete_transition(&mut self, generation: u64) -> Option<CommittedTransition> {
        if self.torn_down {
            return None;
        }
        let committed = self
            .transitions
            .commit_generation(generation, &mut self.layout)?;
        self.committed(committed);
        Some(committed)
    }

    fn committed(&mut self, committed: CommittedTransition) {
        let event = match committed.kind {
            TransitionKind::Prev => PickerEvent::PrevMonth(committed.month),
            TransitionKind::Next => PickerEvent::NextMonth(committed.month),
            TransitionKind::MonthSelect => PickerEvent::MonthChanged(committed.month),
            TransitionKind::YearSelect => PickerEvent::YearChanged(committed.month),
            TransitionKind::None => return,
        };
        self.events.push(event);
        if committed.pending_focus.is_none() && !self.is_focused {
            return;
        }
        let intent = self
            .focus
            .resolve_commit(&committed, self.layout.window(), &self.policy);
        if self.is_focused {
            self.events.push(PickerEvent::Focus(intent));
        }
    }

    /// Opens the keyboard shortcuts panel, to return focus to `restore` on close.
    ///
    /// Returns `false` if the panel is disabled or already open.
    pub fn open_shortcuts(&mut self, restore: Option<H>) -> bool {
        if self.config.hide_keyboard_shortcuts_panel || self.torn_down {
            return false;
        }
        let Some(intent) = self.overlay.open(restore) else {
            return false;
        };
        self.events.push(PickerEvent::OverlayOpened);
        self.events.push(PickerEvent::Focus(intent));
        true
    }

    /// Closes the keyboard shortcuts panel.
    ///
    /// Returns `false` if it was not open.
    pub fn close_shortcuts(&mut self) -> bool {
        if !self.overlay.is_open() {
            return false;
        }
        let restore = self.overlay.close();
        self.events.push(PickerEvent::OverlayClosed);
        if let Some(intent) = restore {
            self.events.push(PickerEvent::Focus(intent));
        }
        true
    }

    /// Changes the number of visible months and re-measures the window.
    pub fn set_number_of_months(&mut self, number_of_months: u16) {
        if self.torn_down {
            return;
        }
        let clamped = number_of_months.clamp(1, MAX_NUMBER_OF_MONTHS);
        if clamped != number_of_months {
            tracing::warn!(number_of_months, clamped, "number_of_months out of range, clamping");
        }
        self.config.number_of_months = clamped;
        self.layout.set_number_of_months(clamped);
    }

    /// Changes the first day of week, `None` meaning the locale default.
    pub fn set_first_day_of_week(&mut self, first_day_of_week: Option<chrono::Weekday>) {
        if self.torn_down {
            return;
        }
        self.config.first_day_of_week = first_day_of_week;
        let effective = self
            .config
            .effective_first_day_of_week(self.policy.locale_first_day_of_week());
        self.layout.set_first_day_of_week(effective);
    }

    /// Changes the day cell size.
    pub fn set_day_size(&mut self, day_size: u32) {
        if self.torn_down {
            return;
        }
        let clamped = day_size.max(MIN_DAY_SIZE);
        if clamped != day_size {
            tracing::warn!(day_size, clamped, "day_size out of range, clamping");
        }
        self.config.day_size = clamped;
        self.layout.metrics_mut().day_size = clamped;
        self.transitions.sync_resting_offset(&self.layout);
    }

    /// Records the measured height of a month caption.
    pub fn set_month_title_height(&mut self, height: f64) {
        if self.torn_down {
            return;
        }
        self.layout.metrics_mut().month_title_height = Some(height);
    }

    /// Stops the picker before it is dropped.
    ///
    /// Input, focus changes and reconfiguration are ignored from then on.
    /// Returns the ticket of the in-flight transition so the host can cancel
    /// its timer. Every later commit or completion is ignored.
    pub fn teardown(&mut self) -> Option<TransitionTicket> {
        self.torn_down = true;
        self.events.clear();
        let ticket = self.transitions.cancel(&self.layout);
        tracing::debug!(canceled = ?ticket.map(|t| t.generation), "day picker torn down");
        ticket
    }
}

impl<H: Clone, P: CalendarPolicy> DayPicker<H, P> {
    /// A snapshot of the full picker state.
    #[must_use]
    pub fn state(&self) -> PickerState<H> {
        PickerState {
            layout: self.layout.clone(),
            transition: self.transitions.state().clone(),
            focus: *self.focus.state(),
            overlay: self.overlay.state().clone(),
            is_focused: self.is_focused,
        }
    }
}
