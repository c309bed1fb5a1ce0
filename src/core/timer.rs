//! Named timers
//!
//! Timers stay registered until explicitly stopped. Start instants come
//! from the logger's clock; with the wall clock, repeated readings only
//! decrease if the system time is stepped backwards, and never go below 0.

use super::clock::seconds_between;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Marker values accepted by [`TimerRegistry::command`]
pub const TIMER_START: &str = "start";
pub const TIMER_RESET: &str = "reset";

#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, DateTime<Utc>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` as the start of `name`, overwriting any prior entry
    pub fn start(&mut self, name: impl Into<String>, now: DateTime<Utc>) {
        self.timers.insert(name.into(), now);
    }

    pub fn reset(&mut self, name: impl Into<String>, now: DateTime<Utc>) {
        self.start(name, now);
    }

    /// Remove `name`; returns whether it was registered
    pub fn stop(&mut self, name: &str) -> bool {
        self.timers.remove(name).is_some()
    }

    /// Apply a `"start"` / `"reset"` marker; other markers are ignored
    pub fn command(&mut self, name: impl Into<String>, marker: &str, now: DateTime<Utc>) -> bool {
        match marker {
            TIMER_START | TIMER_RESET => {
                self.start(name, now);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    /// Seconds since `name` was started, `None` when not registered
    pub fn elapsed(&self, name: &str, now: DateTime<Utc>) -> Option<f64> {
        self.timers
            .get(name)
            .map(|start| seconds_between(start, &now))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
