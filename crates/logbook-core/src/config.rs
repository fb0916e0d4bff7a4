//! Declarative logger setup.
//!
//! A [`LogbookConfig`] describes the console and file sinks, their
//! decorators and filters, and builds a ready [`Logger`]. Every field is
//! optional; an empty document gives a console logger with the default
//! decorator.
//!
//! ```json
//! {
//!   "ignored_levels": ["debug"],
//!   "console": { "decorator": { "style": "mixed" } },
//!   "file": { "session": { "directory": "/var/log/app", "max_files": 5 } }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::decorator::{EntryDecorator, Field, LevelStyle, DEFAULT_TIMESTAMP_FORMAT};
use crate::diagnostics;
use crate::error::{LogbookError, LogbookResult};
use crate::interceptor::{
    Interceptor, InterceptorChain, LevelInterceptor, MinimumLevelInterceptor, TagInterceptor,
};
use crate::level::LogLevel;
use crate::logger::Logger;
use crate::session::SessionConfig;
use crate::writer::{ConsoleWriter, FileWriter, LogWriter};

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogbookConfig {
    /// Logger-level filters, applied before any writer.
    #[serde(flatten)]
    pub filters: FilterConfig,
    pub console: ConsoleConfig,
    /// File sink; absent means no file output.
    pub file: Option<FileConfig>,
    /// Install a stderr subscriber for the library's own diagnostics when
    /// the host has not set a global one.
    pub fallback_diagnostics: bool,
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            console: ConsoleConfig::default(),
            file: None,
            fallback_diagnostics: true,
        }
    }
}

/// Interceptors expressed as data. Empty settings add no interceptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub ignored_levels: Vec<LogLevel>,
    pub ignored_tags: Vec<String>,
    pub min_level: Option<LogLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub decorator: DecoratorConfig,
    #[serde(flatten)]
    pub filters: FilterConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Explicit file to append to. When absent a session file is used.
    pub path: Option<PathBuf>,
    pub session: SessionConfig,
    pub decorator: DecoratorConfig,
    #[serde(flatten)]
    pub filters: FilterConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoratorConfig {
    pub style: LevelStyle,
    /// Fields in output order; absent means all of them.
    pub fields: Option<Vec<Field>>,
    /// chrono `strftime` pattern; absent means `%H:%M:%S%.3f`.
    pub timestamp_format: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            decorator: DecoratorConfig::default(),
            filters: FilterConfig::default(),
        }
    }
}

impl FilterConfig {
    pub fn is_empty(&self) -> bool {
        self.ignored_levels.is_empty() && self.ignored_tags.is_empty() && self.min_level.is_none()
    }

    /// Interceptor chain for these filters.
    pub fn build(&self) -> InterceptorChain {
        let mut chain: Vec<Arc<dyn Interceptor>> = Vec::new();

        if !self.ignored_levels.is_empty() {
            chain.push(Arc::new(LevelInterceptor::new(
                self.ignored_levels.iter().copied(),
            )));
        }
        if !self.ignored_tags.is_empty() {
            chain.push(Arc::new(TagInterceptor::new(&self.ignored_tags)));
        }
        if let Some(min) = self.min_level {
            chain.push(Arc::new(MinimumLevelInterceptor::new(min)));
        }

        InterceptorChain::new(chain)
    }
}

impl DecoratorConfig {
    /// Build the decorator, rejecting invalid timestamp patterns.
    pub fn build(&self) -> LogbookResult<EntryDecorator> {
        let format = self
            .timestamp_format
            .as_deref()
            .unwrap_or(DEFAULT_TIMESTAMP_FORMAT);

        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            return Err(LogbookError::Config(format!(
                "invalid timestamp format: {:?}",
                format
            )));
        }

        let fields = self.fields.clone().unwrap_or_else(|| Field::ALL.to_vec());

        Ok(EntryDecorator::new()
            .with_style(self.style)
            .with_fields(fields)
            .with_timestamp_format(format))
    }
}

impl LogbookConfig {
    /// Parse a JSON document.
    pub fn from_json_str(json: &str) -> LogbookResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> LogbookResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> LogbookResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a logger with the configured sinks.
    ///
    /// Invalid decorator settings are an error. A file sink whose file cannot
    /// be opened is skipped with a diagnostic, and the logger still gets the
    /// remaining sinks. Unless `fallback_diagnostics` is off, diagnostics go
    /// to stderr when the host has no subscriber of its own.
    pub fn build(&self) -> LogbookResult<Logger> {
        if self.fallback_diagnostics {
            diagnostics::install_fallback();
        }

        let logger = Logger::with_interceptors(self.filters.build());

        if self.console.enabled {
            let writer = ConsoleWriter::new()
                .with_decorator(self.console.decorator.build()?)
                .with_interceptors(self.console.filters.build());
            logger.add_writer(Arc::new(writer));
        }

        if let Some(file) = &self.file {
            let decorator = file.decorator.build()?;
            let opened = match &file.path {
                Some(path) => FileWriter::open(path),
                None => FileWriter::for_session(&file.session),
            };

            match opened {
                Ok(writer) => {
                    let writer = writer
                        .with_decorator(decorator)
                        .with_interceptors(file.filters.build());
                    logger.add_writer(Arc::new(writer) as Arc<dyn LogWriter>);
                }
                Err(e) => {
                    tracing::warn!(
                        target: diagnostics::TARGET,
                        error = %e,
                        "file sink unavailable, continuing without it"
                    );
                }
            }
        }

        Ok(logger)
    }
}
