//! Sink implementations and destination addresses

pub mod buffer;
pub mod console;
pub mod file;
pub mod hook;

pub use buffer::{BufferSink, RingBuffer, BUFFER_ADDRESS};
pub use console::{ConsoleSink, ConsoleTarget, STDERR_ADDRESS, STDOUT_ADDRESS};
pub use file::FileSink;
pub use hook::{HookFn, HookSink};

pub use crate::core::Sink;

use crate::core::Record;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a channel delivers its lines.
///
/// `Buffer` resolves to the logger's own ring buffer when the logger is built.
pub enum Destination {
    Buffer,
    Stdout,
    Stderr,
    File(PathBuf),
    Hook(HookFn),
    Custom(Box<dyn Sink>),
}

impl Destination {
    /// Resolve an address: the reserved buffer and console addresses,
    /// otherwise a file path
    pub fn from_address(address: &str) -> Self {
        match address {
            BUFFER_ADDRESS => Destination::Buffer,
            STDOUT_ADDRESS => Destination::Stdout,
            STDERR_ADDRESS => Destination::Stderr,
            path => Destination::File(PathBuf::from(path)),
        }
    }

    pub fn hook<F>(hook: F) -> Self
    where
        F: Fn(&str, &Record) + Send + Sync + 'static,
    {
        Destination::Hook(Arc::new(hook))
    }

    pub fn custom<S: Sink + 'static>(sink: S) -> Self {
        Destination::Custom(Box::new(sink))
    }
}

impl From<&str> for Destination {
    fn from(address: &str) -> Self {
        Destination::from_address(address)
    }
}

impl From<String> for Destination {
    fn from(address: String) -> Self {
        Destination::from_address(&address)
    }
}

impl From<PathBuf> for Destination {
    fn from(path: PathBuf) -> Self {
        Destination::File(path)
    }
}

impl fmt::Debug for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Buffer => write!(f, "Buffer"),
            Destination::Stdout => write!(f, "Stdout"),
            Destination::Stderr => write!(f, "Stderr"),
            Destination::File(path) => f.debug_tuple("File").field(path).finish(),
            Destination::Hook(_) => write!(f, "Hook(..)"),
            Destination::Custom(sink) => f.debug_tuple("Custom").field(&sink.name()).finish(),
        }
    }
}
