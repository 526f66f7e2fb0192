// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visible window of months.

use core::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::month::CalendarMonth;

/// How month panels are laid out and which axis transitions slide along.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Months side by side; paging slides by one panel width.
    #[default]
    Horizontal,
    /// Months stacked; paging slides by the height of the entering or leaving month.
    Vertical,
    /// Months stacked in a scroll container that grows instead of paging forward.
    VerticalScrollable,
}

impl Orientation {
    /// Returns `true` for [`Orientation::Horizontal`].
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Horizontal)
    }

    /// Returns `true` for both vertical layouts.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::VerticalScrollable)
    }
}

/// Which month is first on screen and how many are shown.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonthWindow {
    current_month: CalendarMonth,
    number_of_months: u16,
    orientation: Orientation,
    scrollable_month_multiple: u16,
}

impl MonthWindow {
    /// Creates a window starting at `current_month`.
    ///
    /// `number_of_months` is clamped to at least 1.
    #[must_use]
    pub fn new(current_month: CalendarMonth, number_of_months: u16, orientation: Orientation) -> Self {
        Self {
            current_month,
            number_of_months: number_of_months.max(1),
            orientation,
            scrollable_month_multiple: 1,
        }
    }

    /// The first visible month.
    #[must_use]
    pub const fn current_month(&self) -> CalendarMonth {
        self.current_month
    }

    /// Configured number of simultaneously visible months.
    #[must_use]
    pub const fn number_of_months(&self) -> u16 {
        self.number_of_months
    }

    /// Layout orientation.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// How many times the month count has been extended in a scrollable layout.
    #[must_use]
    pub const fn scrollable_month_multiple(&self) -> u16 {
        self.scrollable_month_multiple
    }

    /// Number of months actually rendered.
    ///
    /// Equal to [`number_of_months`](Self::number_of_months) except in
    /// [`Orientation::VerticalScrollable`], where each "show more" request adds
    /// another `number_of_months`.
    #[must_use]
    pub fn rendered_months(&self) -> u16 {
        match self.orientation {
            Orientation::VerticalScrollable => self
                .number_of_months
                .saturating_mul(self.scrollable_month_multiple),
            Orientation::Horizontal | Orientation::Vertical => self.number_of_months,
        }
    }

    /// The last visible month.
    #[must_use]
    pub fn last_month(&self) -> CalendarMonth {
        self.current_month
            .plus_months(u32::from(self.rendered_months().saturating_sub(1)))
            .unwrap_or(self.current_month)
    }

    /// Inclusive range of visible months.
    #[must_use]
    pub fn visible_range(&self) -> RangeInclusive<CalendarMonth> {
        self.current_month..=self.last_month()
    }

    /// Returns `true` if `date`'s month is within the visible window.
    #[must_use]
    pub fn is_visible(&self, date: NaiveDate) -> bool {
        let offset = self.current_month.months_until(CalendarMonth::of(date));
        (0..i64::from(self.rendered_months())).contains(&offset)
    }

    pub(crate) fn set_current_month(&mut self, month: CalendarMonth) {
        self.current_month = month;
    }

    pub(crate) fn set_number_of_months(&mut self, number_of_months: u16) {
        self.number_of_months = number_of_months.max(1);
    }

    pub(crate) fn grow_scrollable(&mut self) {
        self.scrollable_month_multiple = self.scrollable_month_multiple.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn two_month_window_from_march() {
        let march = CalendarMonth::from_ym(2024, 3).unwrap();
        let window = MonthWindow::new(march, 2, Orientation::Horizontal);
        assert!(window.is_visible(date(2024, 3, 1)));
        assert!(window.is_visible(date(2024, 4, 30)));
        assert!(!window.is_visible(date(2024, 2, 29)));
        assert!(!window.is_visible(date(2024, 5, 1)));
        assert_eq!(
            window.visible_range(),
            march..=CalendarMonth::from_ym(2024, 4).unwrap()
        );
    }

    #[test]
    fn zero_months_is_clamped() {
        let jan = CalendarMonth::from_ym(2024, 1).unwrap();
        let window = MonthWindow::new(jan, 0, Orientation::Vertical);
        assert_eq!(window.number_of_months(), 1);
        assert_eq!(window.last_month(), jan);
    }

    #[test]
    fn scrollable_window_grows() {
        let jan = CalendarMonth::from_ym(2024, 1).unwrap();
        let mut window = MonthWindow::new(jan, 2, Orientation::VerticalScrollable);
        assert!(!window.is_visible(date(2024, 3, 1)));
        window.grow_scrollable();
        assert_eq!(window.rendered_months(), 4);
        assert!(window.is_visible(date(2024, 4, 15)));
        assert!(!window.is_visible(date(2024, 5, 1)));

        // Growing has no effect on paged layouts.
        let mut paged = MonthWindow::new(jan, 2, Orientation::Vertical);
        paged.grow_scrollable();
        assert_eq!(paged.rendered_months(), 2);
    }

    #[test]
    fn orientation_axes() {
        assert!(Orientation::Horizontal.is_horizontal());
        assert!(!Orientation::Horizontal.is_vertical());
        assert!(Orientation::Vertical.is_vertical());
        assert!(Orientation::VerticalScrollable.is_vertical());
    }
}
