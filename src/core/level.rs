//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Level spec that disables every output of a logger.
pub const TURN_OFF: &str = "off";

/// Prefix marking a level spec or a channel selector as exact-match.
pub const EXACT_PREFIX: char = '=';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Level {
    Debug = 100,
    #[default]
    Info = 200,
    Notice = 300,
    Warning = 400,
    Error = 500,
    Critical = 600,
    Alert = 700,
    Emergency = 800,
}

impl Level {
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Notice => "notice",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Critical => "critical",
            Level::Alert => "alert",
            Level::Emergency => "emergency",
        }
    }

    /// Numeric severity (`debug` = 100 ... `emergency` = 800)
    #[inline]
    pub fn severity(&self) -> u16 {
        *self as u16
    }

    /// Look up a level by its exact lowercase name.
    ///
    /// Level names are case-sensitive: `"Error"` is not a recognized level.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|level| level.name() == name)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Level::Debug => BrightBlack,
            Level::Info => Green,
            Level::Notice => Cyan,
            Level::Warning => Yellow,
            Level::Error => Red,
            Level::Critical | Level::Alert | Level::Emergency => BrightRed,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_name(s).ok_or_else(|| format!("Invalid log level: '{}'", s))
    }
}

/// A parsed minimum-level specification: `"info"`, `"=warning"` or `"off"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSpec {
    pub level: Level,
    /// Exact-match routing instead of "at least this severe"
    pub strict: bool,
    pub off: bool,
}

impl LevelSpec {
    /// Parse a level spec, substituting `info` for an unrecognized name.
    ///
    /// The second element carries the rejected name so the caller can
    /// report it; parsing itself never fails.
    pub fn parse(spec: &str) -> (Self, Option<String>) {
        if spec == TURN_OFF {
            return (
                Self {
                    level: Level::Info,
                    strict: false,
                    off: true,
                },
                None,
            );
        }

        let (strict, name) = match spec.strip_prefix(EXACT_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, spec),
        };

        match Level::from_name(name) {
            Some(level) => (
                Self {
                    level,
                    strict,
                    off: false,
                },
                None,
            ),
            None => (
                Self {
                    level: Level::Info,
                    strict,
                    off: false,
                },
                Some(name.to_string()),
            ),
        }
    }

    /// Whether a call at `level` passes the minimum-level gate.
    ///
    /// Unrecognized level names always pass; strict mode never gates here.
    pub fn admits(&self, level: &str) -> bool {
        match Level::from_name(level) {
            Some(level) => level.severity() >= self.level.severity(),
            None => true,
        }
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            level: Level::Info,
            strict: false,
            off: false,
        }
    }
}

impl fmt::Display for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            write!(f, "{}{}", EXACT_PREFIX, self.level)
        } else {
            write!(f, "{}", self.level)
        }
    }
}
