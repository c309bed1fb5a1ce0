//! # Epilog
//!
//! A configurable leveled logger. Each call formats a message plus optional
//! structured context into a line of text and routes it to the channels
//! selected by its level.
//!
//! ## Features
//!
//! - **Level routing**: threshold channels (`"warning"`) and exact channels (`"=error"`)
//! - **Placeholders**: `{key}` tokens filled from the call's context
//! - **Pipeline hooks**: named record filters, value converters and a pluggable formatter
//! - **Timers**: named timers rendered as elapsed seconds inside a line
//! - **Ring buffer**: a bounded in-memory channel readable back from the logger
//!
//! ## Example
//!
//! ```
//! use epilog::prelude::*;
//!
//! let logger = Logger::builder()
//!     .level("debug")
//!     .sink(BUFFER_ADDRESS)
//!     .buffer_size(50)
//!     .build();
//!
//! logger
//!     .log("User {id} failed", &Context::new().with("id", 42), "error", None)
//!     .unwrap();
//!
//! assert!(logger.to_string().contains("Error: User 42 failed"));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        raw, Clock, Context, ContextValue, FieldAccessor, FixedClock, Level, LineFormatter,
        Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Record, RecordFilter,
        Result, Scoped, Sink, SystemClock, TimerField, ValueConverter,
    };
    pub use crate::sinks::{Destination, BUFFER_ADDRESS, STDERR_ADDRESS, STDOUT_ADDRESS};
}

pub use core::{
    raw, ChannelConfig, ChannelSelector, Clock, Context, ContextValue, DefaultFilter,
    DefaultFormatter, FieldAccessor, FixedClock, Level, LevelSpec, LineFormatter, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, Record, RecordFilter,
    RecordFilterChain, Result, Scoped, Sink, SystemClock, TimerField, TimerRegistry,
    ValueConverter, ValueStringifier, RAW_MARKER,
};
pub use sinks::{
    BufferSink, ConsoleSink, Destination, FileSink, HookSink, RingBuffer, BUFFER_ADDRESS,
    STDERR_ADDRESS, STDOUT_ADDRESS,
};
