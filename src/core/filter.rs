//! Record filter chain applied before line formatting

use super::record::{format_number, Record, TimerField};
use std::fmt;

/// Name of the filter entry every chain carries
pub const DEFAULT_FILTER: &str = "default";

/// Fractional-second digits kept by the default filter
pub const MS_DIGITS: usize = 2;

/// Decimal places of a rendered timer
pub const TIMER_DECIMALS: usize = 4;

/// A record transform
pub trait RecordFilter: Send + Sync {
    fn apply(&self, record: Record) -> Record;
}

impl<F> RecordFilter for F
where
    F: Fn(Record) -> Record + Send + Sync,
{
    fn apply(&self, record: Record) -> Record {
        self(record)
    }
}

/// Truncates fractional seconds and renders numeric timers.
///
/// Timer text (such as a not-found marker) is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilter;

impl RecordFilter for DefaultFilter {
    fn apply(&self, mut record: Record) -> Record {
        record.ms = record.ms.chars().take(MS_DIGITS).collect();
        if let Some(TimerField::Seconds(secs)) = record.timer {
            record.timer = Some(TimerField::Text(format_number(secs, TIMER_DECIMALS)));
        }
        record
    }
}

/// Ordered chain of named filters.
///
/// Setting an existing name replaces that entry in place; a new name is
/// appended. The `default` entry can be replaced but never removed.
pub struct RecordFilterChain {
    filters: Vec<(String, Box<dyn RecordFilter>)>,
}

impl RecordFilterChain {
    pub fn new() -> Self {
        let default: Box<dyn RecordFilter> = Box::new(DefaultFilter);
        Self {
            filters: vec![(DEFAULT_FILTER.to_string(), default)],
        }
    }

    pub fn set<F: RecordFilter + 'static>(&mut self, name: impl Into<String>, filter: F) {
        let name = name.into();
        let filter: Box<dyn RecordFilter> = Box::new(filter);
        match self.filters.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = filter,
            None => self.filters.push((name, filter)),
        }
    }

    /// Remove a named filter. Returns `false` for unknown names and for
    /// the default entry.
    pub fn remove(&mut self, name: &str) -> bool {
        if name == DEFAULT_FILTER {
            return false;
        }
        let before = self.filters.len();
        self.filters.retain(|(n, _)| n != name);
        self.filters.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Apply every filter in registration order
    pub fn apply(&self, record: Record) -> Record {
        self.filters
            .iter()
            .fold(record, |record, (_, filter)| filter.apply(record))
    }
}

impl Default for RecordFilterChain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordFilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFilterChain")
            .field("filters", &self.names())
            .finish()
    }
}
