//! File sink implementation

use crate::core::{LoggerError, Record, Result, Sink};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends every line to a file.
///
/// The file is opened in append mode on each write, so nothing is
/// buffered between calls and the file is created on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    name: String,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write(&mut self, line: &str, _record: &Record) -> Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|e| LoggerError::sink_write(&self.name, e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
