// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Week-row geometry for a buffered window of months.
//!
//! Layout height and vertical transition offsets both depend on how many
//! calendar-grid rows each month needs. [`WeekBuffer`] keeps those counts for
//! the visible months plus one hidden month on each side, so a transition can
//! be measured before the incoming month is on screen.
//!
//! [`CalendarMetrics`] turns week counts into logical-pixel sizes.

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::ops::Range;

use chrono::Weekday;
use kurbo::Size;

use crate::month::CalendarMonth;

/// Horizontal padding on each side of a month panel.
pub const CALENDAR_MONTH_PADDING: f64 = 13.0;
/// Extra vertical padding added around the month grid container.
pub const MONTH_PADDING: f64 = 23.0;
/// Horizontal padding on each side of the whole picker.
pub const DAY_PICKER_PADDING: f64 = 9.0;
/// Default day cell size in logical pixels.
pub const DEFAULT_DAY_SIZE: u32 = 39;

/// Number of grid rows needed to show `month` with weeks starting on `first_day_of_week`.
///
/// Always in `4..=6`.
#[must_use]
pub fn weeks_in_month(month: CalendarMonth, first_day_of_week: Weekday) -> u8 {
    let cells = month.leading_blank_days(first_day_of_week) + month.days();
    // At most 6 + 31 cells, so at most 6 rows.
    u8::try_from(cells.div_ceil(7)).unwrap_or(u8::MAX)
}

/// Computes week counts for `number_of_months + 2` consecutive months starting
/// one month before `start_month`.
///
/// Months beyond the representable calendar range are counted as empty rows
/// (`0`), which only happens at the extreme ends of `chrono`'s range.
#[must_use]
pub fn compute_week_counts(
    start_month: CalendarMonth,
    number_of_months: u16,
    first_day_of_week: Weekday,
) -> WeekBuffer {
    let len = usize::from(number_of_months) + 2;
    let mut counts = VecDeque::with_capacity(len);
    for i in 0..len {
        counts.push_back(buffer_slot_weeks(start_month, i, first_day_of_week));
    }
    WeekBuffer { counts }
}

/// Week count for buffer slot `i` relative to `current_month`.
pub(crate) fn buffer_slot_weeks(
    current_month: CalendarMonth,
    slot: usize,
    first_day_of_week: Weekday,
) -> u8 {
    let month = u32::try_from(slot).ok().and_then(|slot| {
        if slot == 0 {
            current_month.minus_months(1)
        } else {
            current_month.plus_months(slot - 1)
        }
    });
    month.map_or(0, |month| weeks_in_month(month, first_day_of_week))
}

/// Week counts for the visible months plus one buffer month on each side.
///
/// Slot `i` corresponds to `current_month - 1 + i`. Slot `0` is the leading
/// buffer month and the last slot is the trailing buffer month.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeekBuffer {
    counts: VecDeque<u8>,
}

impl WeekBuffer {
    /// Total number of slots, `number_of_months + 2`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if the buffer has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Week count for slot `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.counts.get(index).copied()
    }

    /// The hidden month before the visible window.
    #[must_use]
    pub fn leading(&self) -> Option<u8> {
        self.counts.front().copied()
    }

    /// The hidden month after the visible window.
    #[must_use]
    pub fn trailing(&self) -> Option<u8> {
        self.counts.back().copied()
    }

    /// Week counts of the visible months only.
    pub fn visible(&self) -> impl Iterator<Item = u8> + '_ {
        let end = self.counts.len().saturating_sub(1);
        self.counts.range(1.min(end)..end).copied()
    }

    /// Largest week count among the slots in `range` (clamped), or `0` if empty.
    #[must_use]
    pub fn max_in(&self, range: Range<usize>) -> u8 {
        let end = range.end.min(self.counts.len());
        let start = range.start.min(end);
        self.counts.range(start..end).copied().max().unwrap_or(0)
    }

    /// Drops the leading slot and appends `trailing`, after a move to the next month.
    pub fn shift_next(&mut self, trailing: u8) {
        self.counts.pop_front();
        self.counts.push_back(trailing);
    }

    /// Drops the trailing slot and prepends `leading`, after a move to the previous month.
    pub fn shift_prev(&mut self, leading: u8) {
        self.counts.pop_back();
        self.counts.push_front(leading);
    }

    /// Copies the counts into a `Vec`, leading slot first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.counts.iter().copied().collect()
    }
}

/// Pixel metrics for turning week counts into layout sizes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarMetrics {
    /// Day cell size in logical pixels. Adjacent cells share a 1px border.
    pub day_size: u32,
    /// Measured height of a month caption, or `None` before the renderer has measured it.
    pub month_title_height: Option<f64>,
}

impl CalendarMetrics {
    /// Creates metrics for `day_size` with no measured title height yet.
    #[must_use]
    pub const fn new(day_size: u32) -> Self {
        Self {
            day_size,
            month_title_height: None,
        }
    }

    fn row_height(&self) -> f64 {
        f64::from(self.day_size.saturating_sub(1))
    }

    /// Width of one month panel.
    #[must_use]
    pub fn month_width(&self) -> f64 {
        7.0 * self.row_height() + 2.0 * CALENDAR_MONTH_PADDING
    }

    /// Height of one month with `weeks` rows, including its title.
    #[must_use]
    pub fn month_height(&self, weeks: u8) -> f64 {
        self.month_title_height.unwrap_or(0.0) + f64::from(weeks) * self.row_height() + 1.0
    }

    /// Height of the month-grid container when its tallest month has `max_weeks` rows.
    #[must_use]
    pub fn grid_height(&self, max_weeks: u8) -> f64 {
        self.month_height(max_weeks) + MONTH_PADDING
    }

    /// Width of the picker wrapper showing `number_of_months` panels side by side.
    #[must_use]
    pub fn wrapper_width(&self, number_of_months: u16) -> f64 {
        self.month_width() * f64::from(number_of_months) + 2.0 * DAY_PICKER_PADDING
    }

    /// Size of a horizontal grid of `number_of_months` panels, `max_weeks` rows tall.
    #[must_use]
    pub fn horizontal_grid_size(&self, number_of_months: u16, max_weeks: u8) -> Size {
        Size::new(
            self.wrapper_width(number_of_months),
            self.grid_height(max_weeks),
        )
    }
}

impl Default for CalendarMetrics {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> CalendarMonth {
        CalendarMonth::from_ym(y, m).unwrap()
    }

    #[test]
    fn week_counts_span_four_to_six_rows() {
        // February 2015 starts on a Sunday and has 28 days.
        assert_eq!(weeks_in_month(month(2015, 2), Weekday::Sun), 4);
        assert_eq!(weeks_in_month(month(2015, 2), Weekday::Mon), 5);
        // August 2015 starts on a Saturday and has 31 days.
        assert_eq!(weeks_in_month(month(2015, 8), Weekday::Sun), 6);
        // March 2015 starts on a Sunday and has 31 days.
        assert_eq!(weeks_in_month(month(2015, 3), Weekday::Sun), 5);
    }

    #[test]
    fn buffer_covers_one_month_either_side() {
        let buffer = compute_week_counts(month(2015, 2), 2, Weekday::Sun);
        // Jan, Feb, Mar, Apr 2015 with Sunday-start weeks.
        assert_eq!(buffer.to_vec(), [5, 4, 5, 5]);
        assert_eq!(buffer.leading(), Some(5));
        assert_eq!(buffer.trailing(), Some(5));
        assert_eq!(buffer.visible().collect::<Vec<_>>(), [4, 5]);
    }

    #[test]
    fn shifting_keeps_middle_entries() {
        let mut buffer = compute_week_counts(month(2015, 1), 2, Weekday::Sun);
        let before = buffer.to_vec();
        // Dec, Jan, Feb, Mar become Jan, Feb, Mar, Apr.
        let april = weeks_in_month(month(2015, 4), Weekday::Sun);
        buffer.shift_next(april);
        let after = buffer.to_vec();
        assert_eq!(after[..3], before[1..]);
        assert_eq!(after[3], april);
        assert_eq!(buffer, compute_week_counts(month(2015, 2), 2, Weekday::Sun));

        let dec = weeks_in_month(month(2014, 12), Weekday::Sun);
        buffer.shift_prev(dec);
        assert_eq!(buffer.to_vec(), before);
    }

    #[test]
    fn max_in_clamps_range() {
        let buffer = compute_week_counts(month(2015, 8), 1, Weekday::Sun);
        // Jul, Aug, Sep 2015.
        assert_eq!(buffer.to_vec(), [5, 6, 5]);
        assert_eq!(buffer.max_in(0..1), 5);
        assert_eq!(buffer.max_in(1..2), 6);
        assert_eq!(buffer.max_in(2..10), 5);
        assert_eq!(buffer.max_in(5..10), 0);
    }

    #[test]
    fn metrics_match_default_day_size() {
        let mut metrics = CalendarMetrics::default();
        assert_eq!(metrics.month_width(), 7.0 * 38.0 + 26.0);
        assert_eq!(metrics.month_height(5), 5.0 * 38.0 + 1.0);
        metrics.month_title_height = Some(40.0);
        assert_eq!(metrics.month_height(5), 40.0 + 5.0 * 38.0 + 1.0);
        assert_eq!(metrics.grid_height(6), 40.0 + 6.0 * 38.0 + 1.0 + MONTH_PADDING);
        let size = metrics.horizontal_grid_size(2, 6);
        assert_eq!(size.width, 2.0 * metrics.month_width() + 18.0);
    }
}
