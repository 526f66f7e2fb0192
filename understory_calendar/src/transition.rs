// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Month transitions: at most one in flight, committed by an external signal.
//!
//! A transition starts with one of the `begin_*` methods, which computes the
//! offset the renderer should animate the month strip to and returns a
//! [`TransitionTicket`]. The host schedules a timer (or waits for an
//! animation-end notification) and then calls [`TransitionController::commit`]
//! or [`TransitionController::commit_generation`]. Only then does the
//! [`MonthLayout`] move.
//!
//! ```
//! use chrono::Weekday;
//! use understory_calendar::{
//!     CalendarMetrics, CalendarMonth, MonthLayout, MonthWindow, Orientation,
//!     TransitionController, TransitionKind,
//! };
//!
//! let jan = CalendarMonth::from_ym(2024, 1).unwrap();
//! let mut layout = MonthLayout::new(
//!     MonthWindow::new(jan, 1, Orientation::Horizontal),
//!     CalendarMetrics::default(),
//!     Weekday::Sun,
//!     false,
//! );
//! let mut transitions = TransitionController::new(&layout, Some(200));
//!
//! let ticket = transitions.begin_next(None, &layout).unwrap();
//! assert_eq!(ticket.duration, Some(200));
//! assert!(transitions.is_animating());
//! // A second request while animating is ignored.
//! assert!(transitions.begin_prev(None, &layout).is_none());
//!
//! let done = transitions.commit_generation(ticket.generation, &mut layout).unwrap();
//! assert_eq!(done.kind, TransitionKind::Next);
//! assert_eq!(layout.window().current_month(), jan.plus_months(1).unwrap());
//! assert!(!transitions.is_animating());
//! ```

use chrono::NaiveDate;
use kurbo::Vec2;

use crate::layout::MonthLayout;
use crate::month::CalendarMonth;
use crate::window::Orientation;

/// The kind of month transition currently in flight.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionKind {
    /// No transition is running.
    #[default]
    None,
    /// Paging back by one month.
    Prev,
    /// Paging forward by one month.
    Next,
    /// Jumping to a month chosen in a month selector.
    MonthSelect,
    /// Jumping to a month chosen in a year selector.
    YearSelect,
}

impl TransitionKind {
    /// Returns `true` for every kind except [`TransitionKind::None`].
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Transition bookkeeping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionState {
    /// Kind of the in-flight transition.
    pub kind: TransitionKind,
    /// Offset of the month strip along the layout axis, in logical pixels.
    pub offset: f64,
    /// Date to focus once the transition commits.
    pub pending_focus: Option<NaiveDate>,
    /// Destination of a month or year jump.
    pub target: Option<CalendarMonth>,
    /// Incremented by every transition start.
    ///
    /// Renderers compare this to detect a new transition even when the offset
    /// does not change, as with month and year jumps.
    pub generation: u64,
}

/// Handle for a started transition, used to schedule its completion signal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionTicket {
    /// Generation of the transition this ticket belongs to.
    pub generation: u64,
    /// How long to wait before committing, in milliseconds.
    ///
    /// `None` means the transition should be committed immediately.
    pub duration: Option<u64>,
}

/// Result of committing a transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CommittedTransition {
    /// Kind of the transition that finished.
    pub kind: TransitionKind,
    /// The new current month.
    pub month: CalendarMonth,
    /// Focus deferred until this commit, if any.
    pub pending_focus: Option<NaiveDate>,
}

/// State machine for month transitions.
#[derive(Clone, Debug)]
pub struct TransitionController {
    state: TransitionState,
    duration: Option<u64>,
}

impl TransitionController {
    /// Creates an idle controller resting at `layout`'s resting offset.
    #[must_use]
    pub fn new(layout: &MonthLayout, duration: Option<u64>) -> Self {
        Self {
            state: TransitionState {
                kind: TransitionKind::None,
                offset: layout.resting_offset(),
                pending_focus: None,
                target: None,
                generation: 0,
            },
            duration,
        }
    }

    /// Current transition state.
    #[must_use]
    pub const fn state(&self) -> &TransitionState {
        &self.state
    }

    /// Kind of the in-flight transition.
    #[must_use]
    pub const fn kind(&self) -> TransitionKind {
        self.state.kind
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        self.state.kind.is_active()
    }

    /// Configured transition duration in milliseconds.
    #[must_use]
    pub const fn duration(&self) -> Option<u64> {
        self.duration
    }

    /// Starts paging back one month.
    ///
    /// Returns `None` without changing anything if a transition is already in
    /// flight or the previous month is outside the calendar range.
    pub fn begin_prev(
        &mut self,
        pending_focus: Option<NaiveDate>,
        layout: &MonthLayout,
    ) -> Option<TransitionTicket> {
        if self.is_animating() {
            tracing::trace!(kind = ?self.state.kind, "prev ignored: transition in flight");
            return None;
        }
        layout.window().current_month().minus_months(1)?;
        let metrics = layout.metrics();
        let offset = match layout.orientation() {
            Orientation::Horizontal if layout.is_rtl() => -2.0 * metrics.month_width(),
            Orientation::Horizontal => metrics.month_width(),
            Orientation::Vertical | Orientation::VerticalScrollable => {
                metrics.month_height(layout.weeks().leading().unwrap_or(0))
            }
        };
        Some(self.start(TransitionKind::Prev, offset, pending_focus, None))
    }

    /// Starts paging forward one month.
    ///
    /// Returns `None` without changing anything if a transition is already in
    /// flight or the next month is outside the calendar range.
    pub fn begin_next(
        &mut self,
        pending_focus: Option<NaiveDate>,
        layout: &MonthLayout,
    ) -> Option<TransitionTicket> {
        if self.is_animating() {
            tracing::trace!(kind = ?self.state.kind, "next ignored: transition in flight");
            return None;
        }
        layout.window().current_month().plus_months(1)?;
        let metrics = layout.metrics();
        let offset = match layout.orientation() {
            Orientation::Horizontal if layout.is_rtl() => 0.0,
            Orientation::Horizontal => -metrics.month_width(),
            Orientation::Vertical | Orientation::VerticalScrollable => {
                // The first visible month scrolls out of view.
                -metrics.month_height(layout.weeks().get(1).unwrap_or(0))
            }
        };
        Some(self.start(TransitionKind::Next, offset, pending_focus, None))
    }

    /// Starts a jump to `target` chosen from a month selector.
    pub fn begin_month_select(
        &mut self,
        target: CalendarMonth,
        layout: &MonthLayout,
    ) -> Option<TransitionTicket> {
        self.begin_select(TransitionKind::MonthSelect, target, layout)
    }

    /// Starts a jump to `target` chosen from a year selector.
    pub fn begin_year_select(
        &mut self,
        target: CalendarMonth,
        layout: &MonthLayout,
    ) -> Option<TransitionTicket> {
        self.begin_select(TransitionKind::YearSelect, target, layout)
    }

    fn begin_select(
        &mut self,
        kind: TransitionKind,
        target: CalendarMonth,
        layout: &MonthLayout,
    ) -> Option<TransitionTicket> {
        if self.is_animating() {
            tracing::trace!(kind = ?self.state.kind, requested = ?kind, "select ignored: transition in flight");
            return None;
        }
        // No sliding happens; the generation bump alone marks the change.
        let offset = layout.resting_offset();
        Some(self.start(kind, offset, Some(target.first_day()), Some(target)))
    }

    fn start(
        &mut self,
        kind: TransitionKind,
        offset: f64,
        pending_focus: Option<NaiveDate>,
        target: Option<CalendarMonth>,
    ) -> TransitionTicket {
        self.state.generation = self.state.generation.wrapping_add(1);
        self.state.kind = kind;
        self.state.offset = offset;
        self.state.pending_focus = pending_focus;
        self.state.target = target;
        tracing::debug!(
            ?kind,
            offset,
            generation = self.state.generation,
            "transition started"
        );
        TransitionTicket {
            generation: self.state.generation,
            duration: self.duration,
        }
    }

    /// Finishes the in-flight transition and moves `layout` accordingly.
    ///
    /// Returns `None` when no transition is in flight; calling this after the
    /// transition already finished is harmless.
    pub fn commit(&mut self, layout: &mut MonthLayout) -> Option<CommittedTransition> {
        let kind = self.state.kind;
        let month = match kind {
            TransitionKind::None => {
                tracing::trace!("commit ignored: no transition in flight");
                return None;
            }
            TransitionKind::Prev => layout.shift_prev(),
            TransitionKind::Next => layout.shift_next(),
            TransitionKind::MonthSelect | TransitionKind::YearSelect => {
                self.state.target.inspect(|&target| layout.jump_to(target))
            }
        };
        let pending_focus = self.state.pending_focus.take();
        self.state.kind = TransitionKind::None;
        self.state.target = None;
        self.state.offset = layout.resting_offset();
        // `begin_*` refuses months outside the calendar range, so this only
        // falls back when the layout was changed underneath the transition.
        let month = month.unwrap_or_else(|| layout.window().current_month());
        tracing::debug!(
            ?kind,
            %month,
            generation = self.state.generation,
            "transition committed"
        );
        Some(CommittedTransition {
            kind,
            month,
            pending_focus,
        })
    }

    /// Commits only if `generation` names the in-flight transition.
    ///
    /// Completion signals from timers that outlived their transition are ignored.
    pub fn commit_generation(
        &mut self,
        generation: u64,
        layout: &mut MonthLayout,
    ) -> Option<CommittedTransition> {
        if !self.is_animating() || generation != self.state.generation {
            tracing::trace!(
                generation,
                current = self.state.generation,
                "stale transition completion ignored"
            );
            return None;
        }
        self.commit(layout)
    }

    /// Abandons the in-flight transition without moving the layout.
    ///
    /// Returns the ticket of the abandoned transition so its timer can be canceled.
    pub fn cancel(&mut self, layout: &MonthLayout) -> Option<TransitionTicket> {
        if !self.is_animating() {
            return None;
        }
        let ticket = TransitionTicket {
            generation: self.state.generation,
            duration: self.duration,
        };
        self.state.kind = TransitionKind::None;
        self.state.pending_focus = None;
        self.state.target = None;
        self.state.offset = layout.resting_offset();
        Some(ticket)
    }

    /// Resets the resting offset after the layout's metrics changed.
    pub(crate) fn sync_resting_offset(&mut self, layout: &MonthLayout) {
        if !self.is_animating() {
            self.state.offset = layout.resting_offset();
        }
    }

    /// Strip translation on the layout's axis.
    #[must_use]
    pub fn translation(&self, orientation: Orientation) -> Vec2 {
        if orientation.is_horizontal() {
            Vec2::new(self.state.offset, 0.0)
        } else {
            Vec2::new(0.0, self.state.offset)
        }
    }

    /// Index of the buffer slot that should be treated as the first visible month.
    ///
    /// Paged layouts render the leading buffer month at slot 0, so the first
    /// visible month is slot 1 at rest, and one slot earlier or later while
    /// paging. Scrollable layouts have no leading buffer month on screen.
    #[must_use]
    pub fn first_visible_index(&self, orientation: Orientation) -> usize {
        if matches!(orientation, Orientation::VerticalScrollable) {
            return 0;
        }
        match self.state.kind {
            TransitionKind::Prev => 0,
            TransitionKind::Next => 2,
            TransitionKind::None | TransitionKind::MonthSelect | TransitionKind::YearSelect => 1,
        }
    }

    /// Largest week count among the months visible once the current transition ends.
    #[must_use]
    pub fn target_max_weeks(&self, layout: &MonthLayout) -> u8 {
        let n = usize::from(layout.window().number_of_months());
        let start = match self.state.kind {
            TransitionKind::Prev => 0,
            TransitionKind::Next => 2,
            TransitionKind::None | TransitionKind::MonthSelect | TransitionKind::YearSelect => 1,
        };
        layout.weeks().max_in(start..start + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CalendarMetrics;
    use crate::window::MonthWindow;
    use chrono::Weekday;

    fn month(y: i32, m: u32) -> CalendarMonth {
        CalendarMonth::from_ym(y, m).unwrap()
    }

    fn layout(orientation: Orientation, is_rtl: bool) -> MonthLayout {
        let mut metrics = CalendarMetrics::default();
        metrics.month_title_height = Some(40.0);
        MonthLayout::new(
            MonthWindow::new(month(2015, 2), 2, orientation),
            metrics,
            Weekday::Sun,
            is_rtl,
        )
    }

    #[test]
    fn horizontal_offsets_flip_under_rtl() {
        let ltr = layout(Orientation::Horizontal, false);
        let width = ltr.metrics().month_width();
        let mut c = TransitionController::new(&ltr, None);
        c.begin_prev(None, &ltr).unwrap();
        assert_eq!(c.state().offset, width);
        c.cancel(&ltr);
        c.begin_next(None, &ltr).unwrap();
        assert_eq!(c.state().offset, -width);

        let rtl = layout(Orientation::Horizontal, true);
        let mut c = TransitionController::new(&rtl, None);
        assert_eq!(c.state().offset, -width);
        c.begin_prev(None, &rtl).unwrap();
        assert_eq!(c.state().offset, -2.0 * width);
        c.cancel(&rtl);
        c.begin_next(None, &rtl).unwrap();
        assert_eq!(c.state().offset, 0.0);
    }

    #[test]
    fn vertical_offsets_use_month_heights() {
        // Buffer is Jan, Feb, Mar, Apr 2015: [5, 4, 5, 5].
        let layout = layout(Orientation::Vertical, false);
        let metrics = *layout.metrics();
        let mut c = TransitionController::new(&layout, None);
        c.begin_prev(None, &layout).unwrap();
        assert_eq!(c.state().offset, metrics.month_height(5));
        assert_eq!(c.translation(Orientation::Vertical), Vec2::new(0.0, metrics.month_height(5)));
        c.cancel(&layout);
        c.begin_next(None, &layout).unwrap();
        assert_eq!(c.state().offset, -metrics.month_height(4));
    }

    #[test]
    fn begin_while_in_flight_is_a_no_op() {
        let layout = layout(Orientation::Horizontal, false);
        let mut c = TransitionController::new(&layout, Some(300));
        let ticket = c.begin_next(Some(NaiveDate::from_ymd_opt(2015, 4, 1).unwrap()), &layout);
        let before = c.state().clone();
        assert!(c.begin_prev(None, &layout).is_none());
        assert!(c.begin_next(None, &layout).is_none());
        assert!(c.begin_month_select(month(2020, 1), &layout).is_none());
        assert!(c.begin_year_select(month(2020, 1), &layout).is_none());
        assert_eq!(c.state(), &before);
        assert_eq!(ticket.unwrap().duration, Some(300));
    }

    #[test]
    fn commit_when_idle_is_a_no_op() {
        let mut layout = layout(Orientation::Horizontal, false);
        let before = layout.clone();
        let mut c = TransitionController::new(&layout, None);
        assert!(c.commit(&mut layout).is_none());
        assert_eq!(layout, before);
    }

    #[test]
    fn commit_shifts_buffer_and_returns_pending_focus() {
        let mut layout = layout(Orientation::Horizontal, false);
        let before = layout.weeks().to_vec();
        let mut c = TransitionController::new(&layout, None);
        let focus = NaiveDate::from_ymd_opt(2015, 4, 1).unwrap();
        c.begin_next(Some(focus), &layout).unwrap();
        let done = c.commit(&mut layout).unwrap();
        assert_eq!(done.kind, TransitionKind::Next);
        assert_eq!(done.month, month(2015, 3));
        assert_eq!(done.pending_focus, Some(focus));
        let after = layout.weeks().to_vec();
        assert_eq!(after[..3], before[1..]);
        assert_eq!(c.state().offset, 0.0);
        assert_eq!(c.kind(), TransitionKind::None);
    }

    #[test]
    fn select_jumps_on_commit_and_bumps_generation() {
        let mut layout = layout(Orientation::Horizontal, false);
        let mut c = TransitionController::new(&layout, None);
        let first = c.begin_month_select(month(2019, 7), &layout).unwrap();
        assert_eq!(c.state().offset, layout.resting_offset());
        assert_eq!(layout.window().current_month(), month(2015, 2));
        let done = c.commit(&mut layout).unwrap();
        assert_eq!(done.kind, TransitionKind::MonthSelect);
        assert_eq!(done.pending_focus, Some(month(2019, 7).first_day()));
        assert_eq!(layout.window().current_month(), month(2019, 7));

        let second = c.begin_year_select(month(2021, 7), &layout).unwrap();
        assert_ne!(first.generation, second.generation);
        c.commit(&mut layout).unwrap();
        assert_eq!(layout.window().current_month(), month(2021, 7));
        assert_eq!(layout.weeks(), MonthLayout::new(
            MonthWindow::new(month(2021, 7), 2, Orientation::Horizontal),
            CalendarMetrics::default(),
            Weekday::Sun,
            false,
        ).weeks());
    }

    #[test]
    fn stale_generation_is_ignored() {
        let mut layout = layout(Orientation::Horizontal, false);
        let mut c = TransitionController::new(&layout, Some(200));
        let old = c.begin_next(None, &layout).unwrap();
        c.commit(&mut layout).unwrap();
        let current = c.begin_next(None, &layout).unwrap();
        assert!(c.commit_generation(old.generation, &mut layout).is_none());
        assert!(c.is_animating());
        assert!(c.commit_generation(current.generation, &mut layout).is_some());
        assert_eq!(layout.window().current_month(), month(2015, 4));
    }

    #[test]
    fn visible_index_and_target_height_follow_direction() {
        let layout = layout(Orientation::Horizontal, false);
        let mut c = TransitionController::new(&layout, None);
        assert_eq!(c.first_visible_index(Orientation::Horizontal), 1);
        assert_eq!(c.target_max_weeks(&layout), 5);
        c.begin_prev(None, &layout).unwrap();
        assert_eq!(c.first_visible_index(Orientation::Horizontal), 0);
        assert_eq!(c.target_max_weeks(&layout), 5);
        c.cancel(&layout);
        c.begin_next(None, &layout).unwrap();
        assert_eq!(c.first_visible_index(Orientation::Horizontal), 2);
        assert_eq!(c.first_visible_index(Orientation::VerticalScrollable), 0);
    }

    #[test]
    fn paging_refuses_months_outside_the_range() {
        let last = CalendarMonth::of(NaiveDate::MAX);
        let layout = MonthLayout::new(
            MonthWindow::new(last, 1, Orientation::Horizontal),
            CalendarMetrics::default(),
            Weekday::Sun,
            false,
        );
        let mut c = TransitionController::new(&layout, None);
        assert!(c.begin_next(None, &layout).is_none());
        assert!(!c.is_animating());
    }
}
