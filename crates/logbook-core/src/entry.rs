//! Log entry and call-site types.
//!
//! A [`LogEntry`] is built once per accepted log call and is never mutated
//! afterwards; it lives only for the duration of that call's dispatch.

use chrono::{DateTime, Local};

use crate::level::LogLevel;

/// Where a log call was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    /// Function or module path of the caller
    pub function: String,
    /// Source file path
    pub file: String,
    /// Source line
    pub line: u32,
}

impl CallSite {
    /// Create a call site from explicit parts.
    pub fn new(function: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            function: function.into(),
            file: file.into(),
            line,
        }
    }

    /// File and line of the caller, with an empty function name.
    ///
    /// Prefer [`call_site!`](crate::call_site) when the function name matters.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(String::new(), location.file(), location.line())
    }
}

/// Capture the current function, file and line as a [`CallSite`].
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __logbook_here() {}
        fn __logbook_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __logbook_name_of(__logbook_here);
        let name = name.strip_suffix("::__logbook_here").unwrap_or(name);
        let name = name.trim_end_matches("::{{closure}}");
        $crate::CallSite::new(name.rsplit("::").next().unwrap_or(name), file!(), line!())
    }};
}

/// One immutable record of a single log call.
#[derive(Debug, Clone)]
pub struct LogEntry {
    message: String,
    timestamp: DateTime<Local>,
    tags: Vec<String>,
    level: LogLevel,
    function_name: String,
    file_name: String,
    line_number: u32,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(
        level: LogLevel,
        message: impl Into<String>,
        tags: Vec<String>,
        site: CallSite,
    ) -> Self {
        Self::with_timestamp(level, message, tags, site, Local::now())
    }

    /// Create an entry with an explicit timestamp.
    pub fn with_timestamp(
        level: LogLevel,
        message: impl Into<String>,
        tags: Vec<String>,
        site: CallSite,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            message: message.into(),
            timestamp,
            tags,
            level,
            function_name: site.function,
            file_name: site.file,
            line_number: site.line,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Tags in call-site argument order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn line_number(&self) -> u32 {
        self.line_number
    }
}
