// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leading-edge keyboard throttling.
//!
//! A held arrow key produces a stream of repeats much faster than a month
//! transition can animate. [`KeyboardRateLimiter`] lets the first key of a
//! window through and drops the rest, so a burst collapses into a single
//! command instead of queuing transitions past the intended month.
//!
//! Time is passed in by the caller as milliseconds on any monotonic clock,
//! which keeps the limiter deterministic under test.
//!
//! ```
//! use understory_calendar::{Key, KeyboardRateLimiter, RateLimit};
//!
//! let mut limiter = KeyboardRateLimiter::navigation();
//! assert_eq!(limiter.filter(Key::ArrowRight, 1_000), RateLimit::Dispatch);
//! assert_eq!(limiter.filter(Key::ArrowRight, 1_050), RateLimit::Dropped);
//! assert_eq!(limiter.filter(Key::Shift, 1_060), RateLimit::Modifier);
//! assert_eq!(limiter.filter(Key::ArrowRight, 1_200), RateLimit::Dispatch);
//! ```

use crate::key::Key;

/// Default window for calendar navigation keys, in milliseconds.
pub const NAVIGATION_WINDOW_MS: u64 = 200;
/// Default window for keys handled by a date text input, in milliseconds.
pub const TEXT_INPUT_WINDOW_MS: u64 = 300;

/// What to do with a key after rate limiting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RateLimit {
    /// The key opened a new window and should be handled.
    Dispatch,
    /// The key arrived inside the current window and should be discarded.
    Dropped,
    /// The key is a bare modifier; it is neither handled nor counted.
    Modifier,
}

/// Leading-edge throttle over key presses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyboardRateLimiter {
    window_ms: u64,
    last_dispatch: Option<u64>,
}

impl KeyboardRateLimiter {
    /// Creates a limiter with a window of `window_ms` milliseconds.
    #[must_use]
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            last_dispatch: None,
        }
    }

    /// Limiter using [`NAVIGATION_WINDOW_MS`].
    #[must_use]
    pub const fn navigation() -> Self {
        Self::new(NAVIGATION_WINDOW_MS)
    }

    /// Limiter using [`TEXT_INPUT_WINDOW_MS`].
    #[must_use]
    pub const fn text_input() -> Self {
        Self::new(TEXT_INPUT_WINDOW_MS)
    }

    /// Window length in milliseconds.
    #[must_use]
    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Classifies a key press at time `now` (milliseconds).
    ///
    /// A window starts at each dispatched key; dropped keys do not extend it.
    /// A timestamp earlier than the last dispatch (a clock reset) starts a new window.
    pub fn filter(&mut self, key: Key, now: u64) -> RateLimit {
        if key.is_modifier() {
            return RateLimit::Modifier;
        }
        match self.last_dispatch {
            Some(last) if now >= last && now - last < self.window_ms => {
                tracing::trace!(?key, elapsed = now - last, "key dropped by rate limiter");
                RateLimit::Dropped
            }
            _ => {
                self.last_dispatch = Some(now);
                RateLimit::Dispatch
            }
        }
    }

    /// Forgets the current window so the next key dispatches.
    pub fn reset(&mut self) {
        self.last_dispatch = None;
    }
}

impl Default for KeyboardRateLimiter {
    fn default() -> Self {
        Self::navigation()
    }
}
