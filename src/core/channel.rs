//! Level-selected channels
//!
//! A channel pairs a selector with an ordered list of sinks. A selector is
//! either a threshold (`"warning"`: that level or more severe) or an exact
//! form (`"=warning"`: that level only).

use super::{
    error::Result,
    level::{Level, EXACT_PREFIX},
    record::Record,
    sink::Sink,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSelector {
    raw: String,
    name: String,
    exact: bool,
    threshold: Option<Level>,
}

impl ChannelSelector {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (exact, name) = match raw.strip_prefix(EXACT_PREFIX) {
            Some(rest) => (true, rest.to_string()),
            None => (false, raw.clone()),
        };
        let threshold = Level::from_name(&name);
        Self {
            raw,
            name,
            exact,
            threshold,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Whether the selector names a known level
    pub fn is_recognized(&self) -> bool {
        self.threshold.is_some()
    }

    /// Whether a record at `level` is delivered to this channel.
    ///
    /// In strict mode only a selector equal to the level name matches;
    /// an exact selector matches its own level in either mode; a threshold
    /// selector matches recognized levels at least as severe, outside
    /// strict mode.
    pub fn matches(&self, level: &str, strict: bool) -> bool {
        if strict && level == self.raw {
            return true;
        }
        if self.exact {
            return self.name == level;
        }
        if strict {
            return false;
        }
        match (Level::from_name(level), self.threshold) {
            (Some(level), Some(threshold)) => level >= threshold,
            _ => false,
        }
    }
}

impl fmt::Display for ChannelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A sink shared between the channel table and in-flight deliveries
pub type SharedSink = Arc<Mutex<Box<dyn Sink>>>;

struct Channel {
    selector: ChannelSelector,
    sinks: Vec<SharedSink>,
}

/// Ordered channel table.
///
/// The table only hands out sink handles; writing happens through
/// [`deliver`] once the caller has released its lock on the table, so a
/// hook may log back through the logger that owns it.
#[derive(Default)]
pub struct ChannelRouter {
    channels: Vec<Channel>,
}

impl ChannelRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sink to the channel keyed by `selector`, creating the
    /// channel at the end of the table if needed
    pub fn add(&mut self, selector: ChannelSelector, sink: Box<dyn Sink>) {
        let sink = Arc::new(Mutex::new(sink));
        match self
            .channels
            .iter_mut()
            .find(|channel| channel.selector == selector)
        {
            Some(channel) => channel.sinks.push(sink),
            None => self.channels.push(Channel {
                selector,
                sinks: vec![sink],
            }),
        }
    }

    pub fn selectors(&self) -> Vec<&str> {
        self.channels
            .iter()
            .map(|channel| channel.selector.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Sinks of every channel matching `level`, in registration order
    pub fn matching(&self, level: &str, strict: bool) -> Vec<SharedSink> {
        self.channels
            .iter()
            .filter(|channel| channel.selector.matches(level, strict))
            .flat_map(|channel| channel.sinks.iter().cloned())
            .collect()
    }

    /// Every registered sink
    pub fn sinks(&self) -> Vec<SharedSink> {
        self.channels
            .iter()
            .flat_map(|channel| channel.sinks.iter().cloned())
            .collect()
    }
}

impl fmt::Debug for ChannelRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelRouter")
            .field("selectors", &self.selectors())
            .finish()
    }
}

/// Write `line` to each sink in order.
///
/// Stops at the first failing sink. Returns the number of sinks written.
pub fn deliver(sinks: &[SharedSink], line: &str, record: &Record) -> Result<usize> {
    for sink in sinks {
        sink.lock().write(line, record)?;
    }
    Ok(sinks.len())
}

pub fn flush(sinks: &[SharedSink]) -> Result<()> {
    for sink in sinks {
        sink.lock().flush()?;
    }
    Ok(())
}
