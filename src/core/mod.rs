//! Core logger types and traits

pub mod channel;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod filter;
pub mod formatter;
pub mod interpolate;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod sink;
pub mod timer;
pub mod value;

pub use channel::{ChannelRouter, ChannelSelector, SharedSink};
pub use clock::{Clock, FixedClock, SystemClock, DEFAULT_DATE_FORMAT};
pub use config::{ChannelConfig, LoggerConfig};
pub use context::Context;
pub use error::{LoggerError, Result};
pub use filter::{DefaultFilter, RecordFilter, RecordFilterChain, DEFAULT_FILTER};
pub use formatter::{DefaultFormatter, LineFormatter};
pub use interpolate::interpolate;
pub use level::{Level, LevelSpec, TURN_OFF};
pub use logger::{raw, Logger, LoggerBuilder, Scoped, RAW_MARKER};
pub use metrics::LoggerMetrics;
pub use record::{FieldAccessor, Record, TimerField};
pub use sink::Sink;
pub use timer::TimerRegistry;
pub use value::{ContextValue, ObjectValue, ValueConverter, ValueStringifier};
