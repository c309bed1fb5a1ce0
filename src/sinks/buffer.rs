//! In-memory ring buffer sink

use crate::core::{Record, Result, Sink};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Reserved address selecting the ring buffer
pub const BUFFER_ADDRESS: &str = "logger://buffer";

/// Bounded sequence of the most recent lines.
///
/// A capacity of 0 never evicts.
#[derive(Debug, Clone, Default)]
pub struct RingBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    /// Append a line, evicting the oldest lines past capacity
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
        self.evict();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity; excess lines are evicted right away
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.evict();
    }

    fn evict(&mut self) {
        if self.capacity == 0 {
            return;
        }
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines concatenated in insertion order
    pub fn concat(&self) -> String {
        self.lines.iter().map(String::as_str).collect()
    }
}

/// Sink appending to a ring buffer shared with its logger
#[derive(Debug, Clone)]
pub struct BufferSink {
    buffer: Arc<Mutex<RingBuffer>>,
}

impl BufferSink {
    pub fn new(buffer: Arc<Mutex<RingBuffer>>) -> Self {
        Self { buffer }
    }
}

impl Sink for BufferSink {
    fn write(&mut self, line: &str, _record: &Record) -> Result<()> {
        self.buffer.lock().push(line);
        Ok(())
    }

    fn name(&self) -> &str {
        BUFFER_ADDRESS
    }
}
