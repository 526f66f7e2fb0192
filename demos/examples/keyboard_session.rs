// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A simulated keyboard session against a two-month day picker.
//!
//! The host side of the contract is played by a tiny scheduler: every
//! transition ticket is queued with its deadline, and the clock advances in
//! fixed steps, completing transitions whose timers have expired.
//!
//! Run:
//! - `cargo run -p understory_calendar_demos --example keyboard_session`
//! - `RUST_LOG=understory_calendar=trace cargo run -p understory_calendar_demos --example keyboard_session`

use std::collections::VecDeque;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;
use understory_calendar::{
    CalendarMonth, DayPicker, DefaultPhrases, FocusIntent, KEYBOARD_SHORTCUTS, Key, PickerConfig,
    PickerEvent,
};

/// Host focus handles.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Element {
    DateInput,
}

#[derive(Debug)]
struct Host {
    now: u64,
    timers: VecDeque<(u64, u64)>,
}

impl Host {
    fn pump(&mut self, picker: &mut DayPicker<Element>) {
        for event in picker.drain_events() {
            match event {
                PickerEvent::TransitionStarted(ticket) => {
                    if let Some(duration) = ticket.duration {
                        self.timers.push_back((self.now + duration, ticket.generation));
                    }
                    println!("  [{:>5}ms] transition #{} started", self.now, ticket.generation);
                }
                PickerEvent::Focus(FocusIntent::Day(date)) => {
                    println!("  [{:>5}ms] focus day {date}", self.now);
                }
                PickerEvent::Focus(intent) => println!("  [{:>5}ms] focus {intent:?}", self.now),
                other => println!("  [{:>5}ms] {other:?}", self.now),
            }
        }
    }

    fn advance(&mut self, picker: &mut DayPicker<Element>, millis: u64) {
        self.now += millis;
        while let Some(&(deadline, generation)) = self.timers.front() {
            if deadline > self.now {
                break;
            }
            self.timers.pop_front();
            picker.complete_transition(generation);
        }
        self.pump(picker);
    }

    fn press(&mut self, picker: &mut DayPicker<Element>, key: Key) {
        println!("{key:?}");
        picker.handle_key(key, self.now, Some(Element::DateInput));
        self.pump(picker);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(march) = CalendarMonth::from_ym(2024, 3) else {
        return;
    };
    let config = PickerConfig {
        transition_duration: Some(300),
        ..PickerConfig::default()
    };
    tracing::info!(month = %march, ?config, "starting keyboard session");
    let mut picker: DayPicker<Element> = DayPicker::new(march, config);
    let mut host = Host {
        now: 0,
        timers: VecDeque::new(),
    };

    picker.set_focused(true);
    host.pump(&mut picker);
    if let Some(date) = NaiveDate::from_ymd_opt(2024, 4, 29) {
        picker.focus_date(date);
    }

    // Paging past April defers focus until the transition commits.
    host.press(&mut picker, Key::ArrowRight);
    host.press(&mut picker, Key::ArrowRight);
    host.advance(&mut picker, 250);
    host.press(&mut picker, Key::ArrowRight);
    println!(
        "  focused {:?} while animating={}",
        picker.focused_date(),
        picker.is_animating()
    );
    host.advance(&mut picker, 350);

    // A held key: ten repeats inside one window move focus once.
    for _ in 0..10 {
        host.press(&mut picker, Key::ArrowDown);
        host.now += 15;
    }
    host.advance(&mut picker, 400);

    // The shortcuts panel traps focus until closed.
    host.press(&mut picker, Key::Character('?'));
    for row in KEYBOARD_SHORTCUTS {
        let (label, action) = row.texts(&DefaultPhrases);
        println!("    {:>10}  {label}: {action}", row.glyph);
    }
    host.press(&mut picker, Key::Tab);
    host.press(&mut picker, Key::Escape);

    let range = picker.visible_range();
    println!(
        "visible {}..={}, weeks {:?}, grid {:?}",
        range.start(),
        range.end(),
        picker.week_counts().to_vec(),
        picker.grid_size()
    );
    if let Some(ticket) = picker.teardown() {
        println!("canceled transition #{}", ticket.generation);
    }
}
