//! Entry decorators.
//!
//! A decorator turns a [`LogEntry`] into the single line of text a writer
//! emits. [`EntryDecorator`] renders a configurable, ordered list of
//! bracketed fields followed by the message:
//!
//! ```text
//! [14:30:45.123] [⚙️] [peer.rs] [42] [connect] [net] [sync] : Connected
//!  timestamp      level file     line method   custom......   message
//! ```

use std::fmt::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;
use crate::level::LogLevel;

/// Default timestamp pattern (`HH:mm:ss.SSS`).
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";

/// Formats an entry into display text.
pub trait Decorator: Send + Sync {
    fn decorate(&self, entry: &LogEntry) -> String;
}

/// How the level field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStyle {
    /// Icon glyph only
    #[default]
    Iconic,
    /// Upper-cased level name
    Textual,
    /// Icon followed by the level name
    Mixed,
}

impl LevelStyle {
    pub fn render(self, level: LogLevel) -> String {
        match self {
            LevelStyle::Iconic => level.icon().to_string(),
            LevelStyle::Textual => level.text().to_string(),
            LevelStyle::Mixed => level.mixed(),
        }
    }
}

/// A field of the decorated prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Timestamp,
    Level,
    /// Last path component of the source file
    File,
    Line,
    /// Calling function name
    Method,
    /// Entry tags, one bracketed segment each
    Custom,
}

impl Field {
    /// All fields in their default order.
    pub const ALL: [Field; 6] = [
        Field::Timestamp,
        Field::Level,
        Field::File,
        Field::Line,
        Field::Method,
        Field::Custom,
    ];
}

/// Decorator with configurable level style, field order and timestamp pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDecorator {
    style: LevelStyle,
    fields: Vec<Field>,
    timestamp_format: String,
}

impl EntryDecorator {
    /// Iconic style, every field in default order, `HH:mm:ss.SSS` timestamps.
    pub fn new() -> Self {
        Self {
            style: LevelStyle::default(),
            fields: Field::ALL.to_vec(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_style(mut self, style: LevelStyle) -> Self {
        self.style = style;
        self
    }

    /// Set which fields appear, in the given order.
    pub fn with_fields(mut self, fields: impl Into<Vec<Field>>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Set the chrono `strftime` pattern used for the timestamp field.
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    pub fn style(&self) -> LevelStyle {
        self.style
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Invalid patterns fall back to RFC 3339 instead of failing the write.
    fn render_timestamp(&self, entry: &LogEntry) -> String {
        let mut out = String::new();
        let formatted = entry.timestamp().format(&self.timestamp_format);
        if write!(out, "{}", formatted).is_err() {
            return entry.timestamp().to_rfc3339();
        }
        out
    }

    fn segments(&self, entry: &LogEntry) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|field| match field {
                Field::Timestamp => vec![self.render_timestamp(entry)],
                Field::Level => vec![self.style.render(entry.level())],
                Field::File => vec![file_component(entry.file_name()).to_string()],
                Field::Line => vec![entry.line_number().to_string()],
                Field::Method => vec![entry.function_name().to_string()],
                Field::Custom => entry.tags().to_vec(),
            })
            .collect()
    }
}

impl Default for EntryDecorator {
    fn default() -> Self {
        Self::new()
    }
}

impl Decorator for EntryDecorator {
    fn decorate(&self, entry: &LogEntry) -> String {
        let prefix = self
            .segments(entry)
            .iter()
            .map(|segment| format!("[{}]", segment))
            .collect::<Vec<_>>()
            .join(" ");

        format!("{} : {}", prefix, entry.message())
    }
}

impl<F> Decorator for F
where
    F: Fn(&LogEntry) -> String + Send + Sync,
{
    fn decorate(&self, entry: &LogEntry) -> String {
        self(entry)
    }
}

/// Last component of a path, or the input itself when it has none.
fn file_component(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
