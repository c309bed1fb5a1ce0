//! Callable hook sink

use crate::core::{Record, Result, Sink};
use std::fmt;
use std::sync::Arc;

/// Hook signature: formatted line plus the filtered record
pub type HookFn = Arc<dyn Fn(&str, &Record) + Send + Sync>;

pub struct HookSink {
    hook: HookFn,
}

impl HookSink {
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&str, &Record) + Send + Sync + 'static,
    {
        Self {
            hook: Arc::new(hook),
        }
    }

    pub fn from_arc(hook: HookFn) -> Self {
        Self { hook }
    }
}

impl Sink for HookSink {
    fn write(&mut self, line: &str, record: &Record) -> Result<()> {
        (self.hook)(line, record);
        Ok(())
    }

    fn name(&self) -> &str {
        "hook"
    }
}

impl fmt::Debug for HookSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSink").finish_non_exhaustive()
    }
}
