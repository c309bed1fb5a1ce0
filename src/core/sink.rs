//! Sink trait for log line destinations

use super::{error::Result, record::Record};

/// A destination for formatted lines.
///
/// Sinks are invoked synchronously on the logging thread; an error is
/// returned to the caller of `Logger::log` unchanged.
pub trait Sink: Send + Sync {
    fn write(&mut self, line: &str, record: &Record) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
