//! Severity levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LogbookError;

/// Severity of a log entry, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Details needed to determine causes of known issues while debugging.
    Debug = 0,
    /// Non-primary details of an operation while it is running.
    Verbose = 1,
    /// Useful information about operation results and completion.
    Info = 2,
    /// A non-critical issue that does not block anything but needs attention.
    Warning = 3,
    /// An expected, handled error that cancelled the current operation.
    Error = 4,
    /// A critical error leading to undefined behavior or a crash.
    Severe = 5,
}

impl LogLevel {
    /// All levels in rank order.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Debug,
        LogLevel::Verbose,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Severe,
    ];

    /// Integer rank, `0` for debug up to `5` for severe.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Glyph used by the iconic decorator style.
    pub fn icon(self) -> &'static str {
        match self {
            LogLevel::Debug => "⚙️",
            LogLevel::Verbose => "📝",
            LogLevel::Info => "ℹ️",
            LogLevel::Warning => "⚠️",
            LogLevel::Error => "‼️",
            LogLevel::Severe => "🆘",
        }
    }

    /// Upper-cased level name used by the textual decorator style.
    pub fn text(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Severe => "SEVERE",
        }
    }

    /// Icon followed by the text name.
    pub fn mixed(self) -> String {
        format!("{} {}", self.icon(), self.text())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

impl FromStr for LogLevel {
    type Err = LogbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|level| level.text().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogbookError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_ordered_by_rank() {
        for pair in LogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].rank() + 1, pair[1].rank());
        }
        assert_eq!(LogLevel::Debug.rank(), 0);
        assert_eq!(LogLevel::Severe.rank(), 5);
    }

    #[test]
    fn test_display_metadata() {
        assert_eq!(LogLevel::Warning.text(), "WARNING");
        assert_eq!(LogLevel::Info.icon(), "ℹ️");
        assert_eq!(LogLevel::Severe.mixed(), "🆘 SEVERE");
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("verbose".parse::<LogLevel>().unwrap(), LogLevel::Verbose);
        assert_eq!(" Severe ".parse::<LogLevel>().unwrap(), LogLevel::Severe);
        assert!(matches!(
            "loud".parse::<LogLevel>(),
            Err(LogbookError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_serde_lowercase_names() {
        let json = serde_json::to_string(&LogLevel::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let level: LogLevel = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, LogLevel::Debug);
    }
}
