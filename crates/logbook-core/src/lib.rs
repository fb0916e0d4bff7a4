//! Logbook Core Library
//!
//! Leveled, tagged logging façade with pluggable filters, formatters and
//! sinks.
//!
//! ## Overview
//!
//! A [`Logger`] turns each log call into a [`LogEntry`] (message, level,
//! ordered tags, call site, timestamp) and fans it out to its writers.
//! Interceptors on the logger and on each writer decide whether an entry is
//! emitted; each writer's decorator decides how it looks.
//!
//! ```text
//! call ─► LogEntry ─► logger interceptors ─► writer interceptors ─► decorator ─► sink
//! ```
//!
//! - **Levels**: debug < verbose < info < warning < error < severe
//! - **Writers**: console, file (per-session files with retention), memory
//! - **Configuration**: JSON documents via [`LogbookConfig`]
//! - **Bridge**: [`LogbookLayer`] routes `tracing` events into a logger
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use logbook_core::{call_site, ConsoleWriter, FileWriter, Logger, SessionConfig};
//!
//! let logger = Logger::new();
//! logger.add_writer(Arc::new(ConsoleWriter::new()));
//! logger.add_writer(Arc::new(FileWriter::for_session(&SessionConfig::default())?));
//!
//! logger.info("Connected", ["net"], call_site!());
//! ```

pub mod config;
pub mod decorator;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod interceptor;
pub mod layer;
pub mod level;
pub mod logger;
pub mod registry;
pub mod session;
pub mod tag;
pub mod writer;

// Re-exports
pub use config::{ConsoleConfig, DecoratorConfig, FileConfig, FilterConfig, LogbookConfig};
pub use decorator::{Decorator, EntryDecorator, Field, LevelStyle};
pub use entry::{CallSite, LogEntry};
pub use error::{LogbookError, LogbookResult};
pub use interceptor::{
    Interceptor, InterceptorChain, LevelInterceptor, MinimumLevelInterceptor, TagInterceptor,
};
pub use layer::LogbookLayer;
pub use level::LogLevel;
pub use logger::Logger;
pub use registry::{Loggable, LoggerRegistry};
pub use session::SessionConfig;
pub use tag::{IntoTag, Tag};
pub use writer::{ConsoleWriter, FileWriter, LogWriter, MemoryWriter, WriterSettings};
