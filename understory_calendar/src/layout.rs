// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The month window together with its buffered week geometry.

use chrono::Weekday;

use crate::geometry::{CalendarMetrics, WeekBuffer, buffer_slot_weeks, compute_week_counts};
use crate::month::CalendarMonth;
use crate::window::{MonthWindow, Orientation};

/// A [`MonthWindow`] and the [`WeekBuffer`] measured for it.
///
/// The two are kept consistent: every change of the current month, month
/// count, or first day of week updates the buffer, either by shifting it one
/// slot (paging) or by recomputing it (jumps and reconfiguration).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthLayout {
    window: MonthWindow,
    weeks: WeekBuffer,
    metrics: CalendarMetrics,
    first_day_of_week: Weekday,
    is_rtl: bool,
}

impl MonthLayout {
    /// Creates a layout and measures its week buffer.
    #[must_use]
    pub fn new(
        window: MonthWindow,
        metrics: CalendarMetrics,
        first_day_of_week: Weekday,
        is_rtl: bool,
    ) -> Self {
        let weeks = compute_week_counts(
            window.current_month(),
            window.number_of_months(),
            first_day_of_week,
        );
        Self {
            window,
            weeks,
            metrics,
            first_day_of_week,
            is_rtl,
        }
    }

    /// The month window.
    #[must_use]
    pub const fn window(&self) -> &MonthWindow {
        &self.window
    }

    /// Buffered week counts.
    #[must_use]
    pub const fn weeks(&self) -> &WeekBuffer {
        &self.weeks
    }

    /// Pixel metrics.
    #[must_use]
    pub const fn metrics(&self) -> &CalendarMetrics {
        &self.metrics
    }

    /// Effective first day of week.
    #[must_use]
    pub const fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Whether the layout is right-to-left.
    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        self.is_rtl
    }

    /// Layout orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.window.orientation()
    }

    /// Offset of the month strip when no transition is running.
    ///
    /// In a right-to-left horizontal layout the strip is laid out reversed, so
    /// it rests one panel to the left to keep the current month in view.
    #[must_use]
    pub fn resting_offset(&self) -> f64 {
        if self.is_rtl && self.orientation().is_horizontal() {
            -self.metrics.month_width()
        } else {
            0.0
        }
    }

    /// Moves the window one month back, reusing known week counts.
    ///
    /// Returns the new current month, or `None` at the start of the calendar range.
    pub(crate) fn shift_prev(&mut self) -> Option<CalendarMonth> {
        let month = self.window.current_month().minus_months(1)?;
        self.window.set_current_month(month);
        self.weeks
            .shift_prev(buffer_slot_weeks(month, 0, self.first_day_of_week));
        Some(month)
    }

    /// Moves the window one month forward, reusing known week counts.
    ///
    /// Returns the new current month, or `None` at the end of the calendar range.
    pub(crate) fn shift_next(&mut self) -> Option<CalendarMonth> {
        let month = self.window.current_month().plus_months(1)?;
        self.window.set_current_month(month);
        let trailing_slot = usize::from(self.window.number_of_months()) + 1;
        self.weeks.shift_next(buffer_slot_weeks(
            month,
            trailing_slot,
            self.first_day_of_week,
        ));
        Some(month)
    }

    /// Jumps the window to `month` and re-measures every slot.
    pub(crate) fn jump_to(&mut self, month: CalendarMonth) {
        self.window.set_current_month(month);
        self.refresh_weeks();
    }

    pub(crate) fn set_number_of_months(&mut self, number_of_months: u16) {
        self.window.set_number_of_months(number_of_months);
        self.refresh_weeks();
    }

    pub(crate) fn set_first_day_of_week(&mut self, first_day_of_week: Weekday) {
        if first_day_of_week != self.first_day_of_week {
            self.first_day_of_week = first_day_of_week;
            self.refresh_weeks();
        }
    }

    pub(crate) fn grow_scrollable(&mut self) {
        self.window.grow_scrollable();
    }

    pub(crate) fn metrics_mut(&mut self) -> &mut CalendarMetrics {
        &mut self.metrics
    }

    fn refresh_weeks(&mut self) {
        self.weeks = compute_week_counts(
            self.window.current_month(),
            self.window.number_of_months(),
            self.first_day_of_week,
        );
    }
}
