//! Process-wide logger registry.
//!
//! Loggers are looked up by key (usually a type name) and created on first
//! use by a factory. The factory runs at most once per key; every later
//! lookup returns the same shared logger.
//!
//! ```ignore
//! struct SyncService;
//! impl Loggable for SyncService {}
//!
//! SyncService::logger().info("started", ["sync"], call_site!());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::diagnostics;
use crate::error::{LogbookError, LogbookResult};
use crate::logger::Logger;
use crate::tag::short_type_name;
use crate::writer::ConsoleWriter;

type LoggerFactory = Box<dyn Fn(&str) -> Logger + Send + Sync>;

static GLOBAL: OnceLock<LoggerRegistry> = OnceLock::new();

/// Keyed cache of shared loggers.
pub struct LoggerRegistry {
    factory: LoggerFactory,
    loggers: RwLock<HashMap<String, Arc<Logger>>>,
}

impl LoggerRegistry {
    /// Registry building each new logger with `factory`, given the key.
    pub fn new(factory: impl Fn(&str) -> Logger + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            loggers: RwLock::new(HashMap::new()),
        }
    }

    /// Registry whose loggers write to stdout with the default decorator.
    pub fn with_console() -> Self {
        Self::new(|_| {
            let logger = Logger::new();
            logger.add_writer(Arc::new(ConsoleWriter::new()));
            logger
        })
    }

    /// Make `registry` the process-wide registry.
    ///
    /// Fails if a global registry was already installed or lazily created by
    /// [`LoggerRegistry::global`].
    pub fn install(registry: LoggerRegistry) -> LogbookResult<()> {
        GLOBAL
            .set(registry)
            .map_err(|_| LogbookError::RegistryAlreadyInitialized)
    }

    /// The process-wide registry, created with [`LoggerRegistry::with_console`]
    /// if none was installed.
    pub fn global() -> &'static LoggerRegistry {
        GLOBAL.get_or_init(Self::with_console)
    }

    /// Logger for `key`, created by the factory on first request.
    pub fn logger(&self, key: &str) -> Arc<Logger> {
        if let Some(logger) = self.loggers.read().get(key) {
            return logger.clone();
        }

        // Factory runs under the write lock: one logger per key.
        let mut loggers = self.loggers.write();
        loggers
            .entry(key.to_string())
            .or_insert_with(|| {
                tracing::debug!(target: diagnostics::TARGET, key, "creating logger");
                Arc::new((self.factory)(key))
            })
            .clone()
    }

    /// Logger keyed by the short name of type `T`.
    pub fn logger_for<T: ?Sized>(&self) -> Arc<Logger> {
        self.logger(&short_type_name(std::any::type_name::<T>()))
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Keys of every logger created so far, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.loggers.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("keys", &self.keys())
            .finish_non_exhaustive()
    }
}

/// Types that own a logger in the global registry, keyed by their type name.
pub trait Loggable {
    /// The logger shared by every value of this type.
    fn logger() -> Arc<Logger>
    where
        Self: Sized,
    {
        LoggerRegistry::global().logger_for::<Self>()
    }

    /// Same logger, reachable from an instance.
    fn log(&self) -> Arc<Logger>
    where
        Self: Sized,
    {
        Self::logger()
    }
}
