//! Console sink implementation

use crate::core::{LoggerError, Record, Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Reserved addresses selecting the console streams
pub const STDOUT_ADDRESS: &str = "std://out";
pub const STDERR_ADDRESS: &str = "std://err";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleTarget {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone)]
pub struct ConsoleSink {
    target: ConsoleTarget,
    use_colors: bool,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self {
            target: ConsoleTarget::Stdout,
            use_colors: false,
        }
    }

    pub fn stderr() -> Self {
        Self {
            target: ConsoleTarget::Stderr,
            use_colors: false,
        }
    }

    /// Color each line by its level (requires the `console` feature)
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn target(&self) -> ConsoleTarget {
        self.target
    }

    #[cfg(feature = "console")]
    fn render(&self, line: &str, record: &Record) -> String {
        use crate::core::Level;

        match Level::from_name(&record.level) {
            Some(level) if self.use_colors => {
                let body = line.strip_suffix('\n').unwrap_or(line);
                let colored = body.color(level.color_code()).to_string();
                if body.len() == line.len() {
                    colored
                } else {
                    colored + "\n"
                }
            }
            _ => line.to_string(),
        }
    }

    #[cfg(not(feature = "console"))]
    fn render(&self, line: &str, _record: &Record) -> String {
        line.to_string()
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Sink for ConsoleSink {
    fn write(&mut self, line: &str, record: &Record) -> Result<()> {
        let output = self.render(line, record);
        let written = match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(output.as_bytes()),
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(output.as_bytes()),
        };
        written.map_err(|e| LoggerError::sink_write(self.name(), e))
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stdout => STDOUT_ADDRESS,
            ConsoleTarget::Stderr => STDERR_ADDRESS,
        }
    }
}
