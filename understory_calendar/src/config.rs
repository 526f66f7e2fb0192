// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Picker configuration.

use chrono::Weekday;

use crate::geometry::DEFAULT_DAY_SIZE;
use crate::window::Orientation;

/// Largest accepted `number_of_months`.
pub const MAX_NUMBER_OF_MONTHS: u16 = 24;

/// Smallest day size that leaves room for a cell inside its shared border.
pub const MIN_DAY_SIZE: u32 = 2;

/// Options consumed from the host widget.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PickerConfig {
    /// Months shown at once. Must be at least 1.
    pub number_of_months: u16,
    /// Layout orientation.
    pub orientation: Orientation,
    /// First day of the week, or `None` for the locale default.
    pub first_day_of_week: Option<Weekday>,
    /// Day cell size in logical pixels.
    pub day_size: u32,
    /// Right-to-left layout.
    pub is_rtl: bool,
    /// Month transition duration in milliseconds, or `None` to commit immediately.
    pub transition_duration: Option<u64>,
    /// Open the keyboard shortcuts panel when the picker is created.
    pub show_keyboard_shortcuts: bool,
    /// Disable the keyboard shortcuts panel entirely.
    pub hide_keyboard_shortcuts_panel: bool,
    /// The picker is displayed in a full-screen portal.
    pub with_portal: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            number_of_months: 2,
            orientation: Orientation::Horizontal,
            first_day_of_week: None,
            day_size: DEFAULT_DAY_SIZE,
            is_rtl: false,
            transition_duration: None,
            show_keyboard_shortcuts: false,
            hide_keyboard_shortcuts_panel: false,
            with_portal: false,
        }
    }
}

/// A rejected [`PickerConfig`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// `number_of_months` was 0.
    #[error("number_of_months must be at least 1")]
    ZeroMonths,
    /// `day_size` is too small to lay out a cell.
    #[error("day_size must be at least 2, got {0}")]
    DaySizeTooSmall(u32),
    /// `number_of_months` exceeds [`MAX_NUMBER_OF_MONTHS`].
    #[error("number_of_months {requested} exceeds the maximum of {max}")]
    TooManyMonths {
        /// The requested count.
        requested: u16,
        /// The largest accepted count.
        max: u16,
    },
}

impl PickerConfig {
    /// Checks the configuration without modifying it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.number_of_months == 0 {
            return Err(ConfigError::ZeroMonths);
        }
        if self.number_of_months > MAX_NUMBER_OF_MONTHS {
            return Err(ConfigError::TooManyMonths {
                requested: self.number_of_months,
                max: MAX_NUMBER_OF_MONTHS,
            });
        }
        if self.day_size < MIN_DAY_SIZE {
            return Err(ConfigError::DaySizeTooSmall(self.day_size));
        }
        Ok(())
    }

    /// Returns a copy with every out-of-range value clamped into range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        let clamped = Self {
            number_of_months: self.number_of_months.clamp(1, MAX_NUMBER_OF_MONTHS),
            day_size: self.day_size.max(MIN_DAY_SIZE),
            ..self.clone()
        };
        if clamped != *self {
            tracing::warn!(
                number_of_months = self.number_of_months,
                day_size = self.day_size,
                "picker configuration out of range, clamping"
            );
        }
        clamped
    }

    /// First day of week, falling back to `locale_default`.
    #[must_use]
    pub fn effective_first_day_of_week(&self, locale_default: Weekday) -> Weekday {
        self.first_day_of_week.unwrap_or(locale_default)
    }
}
