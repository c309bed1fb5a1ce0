//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Each expands to a
//! call returning `epilog::Result<()>`.
//!
//! # Examples
//!
//! ```
//! use epilog::prelude::*;
//! use epilog::{context, info};
//!
//! let logger = Logger::with_channel(BUFFER_ADDRESS, "debug");
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//!
//! // Placeholders filled from a context
//! logger
//!     .log("User {id} logged in", &context! { "id" => 42 }, "info", None)
//!     .unwrap();
//! ```

/// Build a [`Context`](crate::Context) from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use epilog::context;
///
/// let ctx = context! { "user" => "bob", "attempts" => 3 };
/// assert_eq!(ctx.len(), 2);
/// ```
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Context::new()$(.with($key, $value))+
    };
}

/// Log a message at a level given by name.
///
/// # Examples
///
/// ```
/// # use epilog::prelude::*;
/// # let logger = Logger::with_channel(BUFFER_ADDRESS, "debug");
/// use epilog::log;
/// log!(logger, "info", "Simple message").unwrap();
/// log!(logger, "error", "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(format!($($arg)+), &$crate::Context::new(), $level, None)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug.name(), $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use epilog::prelude::*;
/// # let logger = Logger::with_channel(BUFFER_ADDRESS, "debug");
/// use epilog::info;
/// info!(logger, "Application started").unwrap();
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info.name(), $($arg)+)
    };
}

/// Log a notice-level message.
#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice.name(), $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use epilog::prelude::*;
/// # let logger = Logger::with_channel(BUFFER_ADDRESS, "debug");
/// use epilog::warning;
/// warning!(logger, "Low disk space").unwrap();
/// warning!(logger, "Retry attempt {} of {}", 3, 5).unwrap();
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warning.name(), $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error.name(), $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical.name(), $($arg)+)
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert.name(), $($arg)+)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Emergency.name(), $($arg)+)
    };
}
