// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Month values and the week-grid date helpers built on `chrono`.

use core::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// A calendar month, stored as the first day of that month.
///
/// Every `CalendarMonth` is normalized to day 1 by construction, so two values
/// compare equal exactly when they name the same year and month.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "NaiveDate", into = "NaiveDate"))]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    /// Returns the month containing `date`.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        // Day 1 exists in every month, so `with_day(1)` cannot fail.
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Returns the month for `year`/`month` (1-based), if it is representable.
    #[must_use]
    pub fn from_ym(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The first day of this month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// The last day of this month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            // Only the very last representable month lacks a successor.
            .unwrap_or(NaiveDate::MAX)
    }

    /// The calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// The 1-based month number.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Number of days in this month.
    #[must_use]
    pub fn days(self) -> u32 {
        self.last_day().day()
    }

    /// Returns the month `n` months later, or `None` past the supported range.
    #[must_use]
    pub fn plus_months(self, n: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(n)).map(Self)
    }

    /// Returns the month `n` months earlier, or `None` past the supported range.
    #[must_use]
    pub fn minus_months(self, n: u32) -> Option<Self> {
        self.0.checked_sub_months(Months::new(n)).map(Self)
    }

    /// Signed number of months from `self` to `other`.
    #[must_use]
    pub fn months_until(self, other: Self) -> i64 {
        let years = i64::from(other.year()) - i64::from(self.year());
        years * 12 + i64::from(other.month()) - i64::from(self.month())
    }

    /// Returns `true` if `date` falls within this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::of(date) == self
    }

    /// Number of blank grid cells before day 1 when weeks start on `first_day_of_week`.
    #[must_use]
    pub fn leading_blank_days(self, first_day_of_week: Weekday) -> u32 {
        days_since_week_start(self.0, first_day_of_week)
    }
}

impl From<NaiveDate> for CalendarMonth {
    fn from(date: NaiveDate) -> Self {
        Self::of(date)
    }
}

impl From<CalendarMonth> for NaiveDate {
    fn from(month: CalendarMonth) -> Self {
        month.0
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Days between the start of `date`'s week and `date` itself.
fn days_since_week_start(date: NaiveDate, first_day_of_week: Weekday) -> u32 {
    let weekday = date.weekday().num_days_from_sunday();
    let start = first_day_of_week.num_days_from_sunday();
    (weekday + 7 - start) % 7
}

/// The first day of the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate, first_day_of_week: Weekday) -> Option<NaiveDate> {
    let back = days_since_week_start(date, first_day_of_week);
    date.checked_sub_days(Days::new(u64::from(back)))
}

/// The last day of the week containing `date`.
#[must_use]
pub fn end_of_week(date: NaiveDate, first_day_of_week: Weekday) -> Option<NaiveDate> {
    start_of_week(date, first_day_of_week)?.checked_add_days(Days::new(6))
}

/// Moves `date` by a signed number of days.
pub(crate) fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(magnitude)
    } else {
        date.checked_add_days(magnitude)
    }
}

/// Moves `date` by a signed number of months, clamping the day to the target month.
pub(crate) fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months < 0 {
        date.checked_sub_months(magnitude)
    } else {
        date.checked_add_months(magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn months_are_normalized_to_the_first() {
        let month = CalendarMonth::of(date(2024, 2, 17));
        assert_eq!(month.first_day(), date(2024, 2, 1));
        assert_eq!(month.last_day(), date(2024, 2, 29));
        assert_eq!(month.days(), 29);
        assert_eq!(month, CalendarMonth::from_ym(2024, 2).unwrap());
    }

    #[test]
    fn month_arithmetic_crosses_years() {
        let dec = CalendarMonth::from_ym(2023, 12).unwrap();
        let jan = dec.plus_months(1).unwrap();
        assert_eq!(jan, CalendarMonth::from_ym(2024, 1).unwrap());
        assert_eq!(jan.minus_months(1), Some(dec));
        assert_eq!(dec.months_until(jan), 1);
        assert_eq!(jan.months_until(dec), -1);
        assert_eq!(dec.months_until(CalendarMonth::from_ym(2025, 3).unwrap()), 15);
    }

    #[test]
    fn week_bounds_follow_first_day_of_week() {
        // 2015-02-11 is a Wednesday.
        let wed = date(2015, 2, 11);
        assert_eq!(start_of_week(wed, Weekday::Sun), Some(date(2015, 2, 8)));
        assert_eq!(end_of_week(wed, Weekday::Sun), Some(date(2015, 2, 14)));
        assert_eq!(start_of_week(wed, Weekday::Mon), Some(date(2015, 2, 9)));
        assert_eq!(end_of_week(wed, Weekday::Mon), Some(date(2015, 2, 15)));
    }

    #[test]
    fn signed_day_and_month_steps() {
        assert_eq!(add_days(date(2024, 1, 31), 1), Some(date(2024, 2, 1)));
        assert_eq!(add_days(date(2024, 3, 1), -1), Some(date(2024, 2, 29)));
        // Month steps clamp to the end of shorter months.
        assert_eq!(add_months(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_months(date(2024, 3, 31), -1), Some(date(2024, 2, 29)));
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn leading_blanks() {
        // 2015-02-01 is a Sunday.
        let feb = CalendarMonth::from_ym(2015, 2).unwrap();
        assert_eq!(feb.leading_blank_days(Weekday::Sun), 0);
        assert_eq!(feb.leading_blank_days(Weekday::Mon), 6);
    }
}
