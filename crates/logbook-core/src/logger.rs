//! The logger: entry construction, filtering and fan-out to writers.
//!
//! ## Dispatch
//!
//! ```text
//! logger.info(message, tags, site)
//!   │  message absent? ──► return (nothing happens)
//!   ▼
//! LogEntry { timestamp: now, tags (order kept, None dropped), level, site }
//!   │  logger interceptors all approve? ──► no: drop
//!   ▼
//! snapshot of writers (read lock released before any I/O)
//!   │  for each writer: its interceptors all approve? ──► writer.write(&entry)
//!   ▼
//! a failing or panicking writer is reported and skipped
//! ```

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::diagnostics;
use crate::entry::{CallSite, LogEntry};
use crate::interceptor::{Interceptor, InterceptorChain};
use crate::level::LogLevel;
use crate::tag::{resolve_tags, IntoTag};
use crate::writer::LogWriter;

/// Routes log calls to a set of writers.
///
/// Safe to share between threads. The writer list can be changed while other
/// threads are logging; every dispatch works on a consistent snapshot.
#[derive(Default)]
pub struct Logger {
    writers: RwLock<Vec<Arc<dyn LogWriter>>>,
    interceptors: RwLock<InterceptorChain>,
}

impl Logger {
    /// Logger without writers or interceptors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logger with a logger-level interceptor chain.
    pub fn with_interceptors(interceptors: impl Into<InterceptorChain>) -> Self {
        Self {
            writers: RwLock::new(Vec::new()),
            interceptors: RwLock::new(interceptors.into()),
        }
    }

    // ------------------------------------------------------------------------
    // Writers
    // ------------------------------------------------------------------------

    pub fn add_writer(&self, writer: Arc<dyn LogWriter>) {
        self.writers.write().push(writer);
    }

    /// Replace the whole writer list at once.
    pub fn set_writers(&self, writers: Vec<Arc<dyn LogWriter>>) {
        *self.writers.write() = writers;
    }

    pub fn clear_writers(&self) {
        self.writers.write().clear();
    }

    /// Snapshot of the current writers.
    pub fn writers(&self) -> Vec<Arc<dyn LogWriter>> {
        self.writers.read().clone()
    }

    pub fn writer_count(&self) -> usize {
        self.writers.read().len()
    }

    // ------------------------------------------------------------------------
    // Interceptors
    // ------------------------------------------------------------------------

    pub fn add_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.write().push(interceptor);
    }

    pub fn set_interceptors(&self, interceptors: impl Into<InterceptorChain>) {
        *self.interceptors.write() = interceptors.into();
    }

    /// Snapshot of the logger-level interceptor chain.
    pub fn interceptors(&self) -> InterceptorChain {
        self.interceptors.read().clone()
    }

    // ------------------------------------------------------------------------
    // Logging
    // ------------------------------------------------------------------------

    /// Log `message` at `level`.
    ///
    /// An absent message is a no-op. Absent tags are dropped; the rest keep
    /// their order.
    pub fn log<'a, I>(
        &self,
        level: LogLevel,
        message: impl Into<Option<&'a str>>,
        tags: I,
        site: CallSite,
    ) where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        let Some(message) = message.into() else {
            return;
        };

        let entry = LogEntry::new(level, message, resolve_tags(tags), site);
        self.dispatch(&entry);
    }

    /// Run an already-built entry through the interceptors and writers.
    pub fn dispatch(&self, entry: &LogEntry) {
        if !self.interceptors.read().allows(entry) {
            return;
        }

        let writers = self.writers();
        for writer in writers.iter().filter(|w| w.settings().accepts(entry)) {
            let result = panic::catch_unwind(AssertUnwindSafe(|| writer.write(entry)));
            if result.is_err() {
                tracing::error!(
                    target: diagnostics::TARGET,
                    writer = writer.name(),
                    "log writer panicked; entry skipped for this writer"
                );
            }
        }
    }

    pub fn debug<'a, I>(&self, message: impl Into<Option<&'a str>>, tags: I, site: CallSite)
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        self.log(LogLevel::Debug, message, tags, site);
    }

    pub fn verbose<'a, I>(&self, message: impl Into<Option<&'a str>>, tags: I, site: CallSite)
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        self.log(LogLevel::Verbose, message, tags, site);
    }

    pub fn info<'a, I>(&self, message: impl Into<Option<&'a str>>, tags: I, site: CallSite)
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        self.log(LogLevel::Info, message, tags, site);
    }

    pub fn warning<'a, I>(&self, message: impl Into<Option<&'a str>>, tags: I, site: CallSite)
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        self.log(LogLevel::Warning, message, tags, site);
    }

    pub fn error<'a, I>(&self, message: impl Into<Option<&'a str>>, tags: I, site: CallSite)
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        self.log(LogLevel::Error, message, tags, site);
    }

    pub fn severe<'a, I>(&self, message: impl Into<Option<&'a str>>, tags: I, site: CallSite)
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        self.log(LogLevel::Severe, message, tags, site);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("writers", &self.writer_count())
            .field("interceptors", &*self.interceptors.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::Tag;
    use crate::writer::{MemoryWriter, WriterSettings};

    /// Renders only tags and message, like `[TG1][TG2] test`.
    fn raw(entry: &LogEntry) -> String {
        let tags: String = entry.tags().iter().map(|t| format!("[{}]", t)).collect();
        if tags.is_empty() {
            entry.message().to_string()
        } else {
            format!("{} {}", tags, entry.message())
        }
    }

    fn setup() -> (Logger, Arc<MemoryWriter>) {
        let logger = Logger::new();
        let writer = Arc::new(MemoryWriter::new().with_decorator(raw));
        logger.add_writer(writer.clone());
        (logger, writer)
    }

    const NO_TAGS: [Tag; 0] = [];

    struct Convertible;

    impl fmt::Display for Convertible {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("converted")
        }
    }

    #[test]
    fn test_tagless() {
        let (logger, writer) = setup();
        logger.debug("test", NO_TAGS, CallSite::caller());
        assert_eq!(writer.contents(), "test\n");
    }

    #[test]
    fn test_single_string_tag() {
        let (logger, writer) = setup();
        logger.debug("test", ["TG"], CallSite::caller());
        assert_eq!(writer.contents(), "[TG] test\n");
    }

    #[test]
    fn test_single_type_tag() {
        let (logger, writer) = setup();
        logger.debug("test", [Tag::of_type::<MemoryWriter>()], CallSite::caller());
        assert_eq!(writer.contents(), "[MemoryWriter] test\n");
    }

    #[test]
    fn test_multiple_mixed_tags() {
        let (logger, writer) = setup();
        logger.debug(
            "test",
            [
                Tag::from("TG1"),
                Tag::of_value(&*writer),
                Tag::described(&Convertible),
            ],
            CallSite::caller(),
        );
        assert_eq!(writer.contents(), "[TG1][MemoryWriter][converted] test\n");
    }

    #[test]
    fn test_optional_tags_dropped() {
        let (logger, writer) = setup();
        let missing: Option<Tag> = None;
        logger.debug(
            "test",
            [
                missing.clone(),
                Some(Tag::from("TG1")),
                Some(Tag::from("TG3")),
                missing,
                Some(Tag::of_type::<MemoryWriter>()),
            ],
            CallSite::caller(),
        );
        assert_eq!(writer.contents(), "[TG1][TG3][MemoryWriter] test\n");
    }

    #[test]
    fn test_absent_message_is_noop() {
        let (logger, writer) = setup();
        let called = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = called.clone();
        logger.add_interceptor(Arc::new(move |_: &LogEntry| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            true
        }));

        logger.info(None::<&str>, ["TG"], CallSite::caller());

        assert!(writer.is_empty());
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_each_level_method() {
        let (logger, writer) = setup();
        writer.settings().set_decorator(Arc::new(|e: &LogEntry| e.level().text().to_string()));

        let site = CallSite::caller;
        logger.debug("m", NO_TAGS, site());
        logger.verbose("m", NO_TAGS, site());
        logger.info("m", NO_TAGS, site());
        logger.warning("m", NO_TAGS, site());
        logger.error("m", NO_TAGS, site());
        logger.severe("m", NO_TAGS, site());

        assert_eq!(
            writer.lines(),
            vec!["DEBUG", "VERBOSE", "INFO", "WARNING", "ERROR", "SEVERE"]
        );
    }

    #[test]
    fn test_logger_interceptors_and_combined() {
        let (logger, writer) = setup();
        logger.set_interceptors(vec![
            Arc::new(|_: &LogEntry| true) as Arc<dyn Interceptor>,
            Arc::new(|_: &LogEntry| false) as Arc<dyn Interceptor>,
        ]);

        for level in LogLevel::ALL {
            logger.log(level, "test", ["TG"], CallSite::caller());
        }
        assert!(writer.is_empty());
    }

    #[test]
    fn test_writer_interceptors_are_per_writer() {
        let (logger, quiet) = setup();
        let loud = Arc::new(MemoryWriter::new().with_decorator(raw));
        logger.add_writer(loud.clone());
        quiet
            .settings()
            .add_interceptor(Arc::new(|e: &LogEntry| e.level() >= LogLevel::Warning));

        logger.info("info", NO_TAGS, CallSite::caller());
        logger.error("error", NO_TAGS, CallSite::caller());

        assert_eq!(quiet.lines(), vec!["error"]);
        assert_eq!(loud.lines(), vec!["info", "error"]);
    }

    struct PanickingWriter {
        settings: WriterSettings,
    }

    impl LogWriter for PanickingWriter {
        fn settings(&self) -> &WriterSettings {
            &self.settings
        }

        fn write(&self, _entry: &LogEntry) {
            panic!("sink exploded");
        }
    }

    #[test]
    fn test_panicking_writer_is_isolated() {
        let logger = Logger::new();
        let after = Arc::new(MemoryWriter::new().with_decorator(raw));
        logger.add_writer(Arc::new(PanickingWriter {
            settings: WriterSettings::default(),
        }));
        logger.add_writer(after.clone());

        logger.info("still here", NO_TAGS, CallSite::caller());

        assert_eq!(after.lines(), vec!["still here"]);
    }

    #[test]
    fn test_set_writers_replaces_list() {
        let (logger, first) = setup();
        let second = Arc::new(MemoryWriter::new().with_decorator(raw));

        logger.set_writers(vec![second.clone()]);
        logger.info("test", NO_TAGS, CallSite::caller());

        assert!(first.is_empty());
        assert_eq!(second.lines(), vec!["test"]);
        assert_eq!(logger.writer_count(), 1);

        logger.clear_writers();
        assert_eq!(logger.writer_count(), 0);
    }
}
