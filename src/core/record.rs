//! Intermediate record built for every emitted log call

use std::collections::BTreeMap;
use std::fmt;

/// Elapsed-timer slot of a record
#[derive(Debug, Clone, PartialEq)]
pub enum TimerField {
    /// Seconds since the timer was started
    Seconds(f64),
    /// Preformatted text: a rendered duration or a not-found marker
    Text(String),
}

impl TimerField {
    /// Marker rendered in place of a timer that is not registered
    pub fn not_found(name: &str) -> Self {
        TimerField::Text(format!("[timer_{}_not_found]", name))
    }
}

impl fmt::Display for TimerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerField::Seconds(secs) => write!(f, "{}", secs),
            TimerField::Text(text) => write!(f, "{}", text),
        }
    }
}

/// The record passed through the filter chain and the formatter.
///
/// `level` is the name given by the caller and may be unrecognized;
/// `context` is the serialized context (possibly empty).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: String,
    /// Fractional-second digits
    pub ms: String,
    pub timer: Option<TimerField>,
    pub level: String,
    pub context: String,
    pub text: String,
    /// Additional named fields attached by filters
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Look up a field by name; `None` when absent or null
    pub fn field(&self, key: &str) -> Option<String> {
        match key {
            "date" => Some(self.date.clone()),
            "ms" => Some(self.ms.clone()),
            "timer" => self.timer.as_ref().map(ToString::to_string),
            "level" => Some(self.level.clone()),
            "context" => Some(self.context.clone()),
            "text" => Some(self.text.clone()),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Attach a named field
    pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra.insert(key.into(), value.into());
    }
}

/// Read-only field helper handed to line formatters
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a> {
    record: &'a Record,
}

impl<'a> FieldAccessor<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self { record }
    }

    /// `before + value + after` when the field is present, else `""`
    pub fn get(&self, key: &str, before: &str, after: &str) -> String {
        match self.record.field(key) {
            Some(value) => format!("{}{}{}", before, value, after),
            None => String::new(),
        }
    }

    /// Field value without decoration, `""` when absent
    pub fn value(&self, key: &str) -> String {
        self.get(key, "", "")
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }
}

/// Format `value` with `decimals` fraction digits and `,` thousands grouping
pub fn format_number(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}
