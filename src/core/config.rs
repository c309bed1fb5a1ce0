//! Serializable logger configuration
//!
//! ```
//! use epilog::LoggerConfig;
//!
//! let config = LoggerConfig::from_json(r#"{
//!     "level": "debug",
//!     "buffer_size": 100,
//!     "channels": [
//!         { "selector": "debug", "sinks": ["logger://buffer"] },
//!         { "selector": "=error", "sinks": ["std://err"] }
//!     ],
//!     "context": { "service": "billing" }
//! }"#).unwrap();
//!
//! assert_eq!(config.channels.len(), 2);
//! assert_eq!(config.date_format, "%Y-%m-%d %H:%M:%S");
//! ```

use super::{
    channel::ChannelSelector,
    clock::{is_valid_date_format, DEFAULT_DATE_FORMAT},
    context::Context,
    error::{LoggerError, Result},
    value::ContextValue,
};
use serde::{Deserialize, Serialize};

/// One channel: a selector and the addresses of its sinks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub selector: String,
    pub sinks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level spec: `"info"`, `"=warning"` or `"off"`
    pub level: String,
    /// strftime pattern for the record date
    pub date_format: String,
    /// Ring buffer capacity, 0 = unbounded
    pub buffer_size: usize,
    /// Channels in delivery order; empty means stdout at the minimum level
    pub channels: Vec<ChannelConfig>,
    /// Context merged under every call's context
    pub context: serde_json::Map<String, serde_json::Value>,
}

impl LoggerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject an unrenderable date pattern and threshold selectors that
    /// name no level.
    ///
    /// An unrecognized minimum level is not rejected here; the logger
    /// falls back to `info` with a warning.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_date_format(&self.date_format) {
            return Err(LoggerError::config(
                "date_format",
                format!("'{}' is not a valid strftime pattern", self.date_format),
            ));
        }
        for channel in &self.channels {
            let selector = ChannelSelector::parse(channel.selector.as_str());
            if !selector.is_exact() && !selector.is_recognized() {
                return Err(LoggerError::config(
                    "channels",
                    format!("selector '{}' names no log level", channel.selector),
                ));
            }
            if channel.sinks.is_empty() {
                return Err(LoggerError::config(
                    "channels",
                    format!("channel '{}' has no sinks", channel.selector),
                ));
            }
        }
        Ok(())
    }

    /// The configured default context
    pub fn default_context(&self) -> Context {
        self.context
            .iter()
            .map(|(key, value)| (key.clone(), ContextValue::from(value.clone())))
            .collect()
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            buffer_size: 0,
            channels: Vec::new(),
            context: serde_json::Map::new(),
        }
    }
}
