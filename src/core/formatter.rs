//! Final line formatting

use super::record::{FieldAccessor, Record};

/// Turns a filtered record into the final text line
pub trait LineFormatter: Send + Sync {
    fn format(&self, record: &Record, fields: &FieldAccessor<'_>) -> String;
}

impl<F> LineFormatter for F
where
    F: Fn(&Record, &FieldAccessor<'_>) -> String + Send + Sync,
{
    fn format(&self, record: &Record, fields: &FieldAccessor<'_>) -> String {
        self(record, fields)
    }
}

/// `[date.ms] timer_s Level: text context` followed by a newline.
///
/// The timer segment is omitted when the record carries no timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter;

impl LineFormatter for DefaultFormatter {
    fn format(&self, record: &Record, get: &FieldAccessor<'_>) -> String {
        format!(
            "[{}{}] {}{}: {} {}\n",
            get.value("date"),
            get.get("ms", ".", ""),
            get.get("timer", "", "s "),
            capitalize(&record.level),
            get.value("text"),
            get.value("context"),
        )
    }
}

/// Uppercase the first character
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
