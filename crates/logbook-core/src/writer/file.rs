//! File writer.
//!
//! Appends each decorated entry, prefixed with a newline, to a single file:
//!
//! ```text
//! <empty first line>
//! [14:30:45.123] [ℹ️] [peer.rs] [42] [connect] [net] : Connected
//! [14:30:45.301] [⚠️] [peer.rs] [57] [connect] [net] : Retrying
//! ```
//!
//! The handle is opened once, owned exclusively by the writer, and closed
//! exactly once, either by [`FileWriter::close`] or on drop.
//!
//! Write and close failures never reach the log call. They are reported as
//! `tracing` events under [`diagnostics::TARGET`], which are only visible
//! once a subscriber is installed: call [`diagnostics::init`], or build the
//! logger through [`LogbookConfig`](crate::LogbookConfig), which installs a
//! stderr fallback when the host has none.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use super::{LogWriter, WriterSettings};
use crate::decorator::Decorator;
use crate::diagnostics;
use crate::entry::LogEntry;
use crate::error::{LogbookError, LogbookResult};
use crate::interceptor::InterceptorChain;
use crate::session::SessionConfig;

/// Writer that appends log entries to a file.
pub struct FileWriter {
    settings: WriterSettings,

    /// Open handle; `None` once closed. Every append happens under this lock.
    file: Mutex<Option<File>>,

    /// Path to the log file
    path: PathBuf,
}

impl FileWriter {
    /// Open `path` for appending.
    ///
    /// Creates missing parent directories and the file itself. On any
    /// failure no writer is produced and no handle stays open.
    pub fn open(path: impl AsRef<Path>) -> LogbookResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LogbookError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Append mode keeps every write positioned at end of file.
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogbookError::OpenFile {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(target: diagnostics::TARGET, path = %path.display(), "opened log file");

        Ok(Self {
            settings: WriterSettings::default(),
            file: Mutex::new(Some(file)),
            path,
        })
    }

    /// Open the current session's file, rotating old session files first.
    pub fn for_session(config: &SessionConfig) -> LogbookResult<Self> {
        let path = config.prepare()?;
        Self::open(path)
    }

    pub fn with_decorator(self, decorator: impl Decorator + 'static) -> Self {
        self.settings.set_decorator(Arc::new(decorator));
        self
    }

    pub fn with_interceptors(self, interceptors: impl Into<InterceptorChain>) -> Self {
        self.settings.set_interceptors(interceptors);
        self
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.file.lock().is_none()
    }

    /// Append raw text in a single write.
    pub fn append(&self, text: &str) -> LogbookResult<()> {
        let mut file = self.file.lock();
        let file = file
            .as_mut()
            .ok_or_else(|| LogbookError::WriterClosed(self.path.clone()))?;

        file.write_all(text.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Flush and release the handle. Later calls and writes are no-ops.
    pub fn close(&self) -> LogbookResult<()> {
        let file = self.file.lock().take();
        if let Some(mut file) = file {
            file.flush()?;
            file.sync_all()?;
            tracing::debug!(target: diagnostics::TARGET, path = %self.path.display(), "closed log file");
        }
        Ok(())
    }
}

impl LogWriter for FileWriter {
    fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    fn write(&self, entry: &LogEntry) {
        let line = format!("\n{}", self.settings.render(entry));

        if let Err(e) = self.append(&line) {
            tracing::warn!(
                target: diagnostics::TARGET,
                path = %self.path.display(),
                error = %e,
                "failed to write log entry"
            );
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(
                target: diagnostics::TARGET,
                path = %self.path.display(),
                error = %e,
                "failed to close log file"
            );
        }
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CallSite;
    use crate::level::LogLevel;
    use tempfile::TempDir;

    fn entry(msg: &str) -> LogEntry {
        LogEntry::new(LogLevel::Info, msg, vec![], CallSite::new("f", "x.rs", 1))
    }

    fn message_only(e: &LogEntry) -> String {
        e.message().to_string()
    }

    /// Collects the messages of diagnostic events.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Captured {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            struct Message<'a>(&'a mut String);

            impl tracing::field::Visit for Message<'_> {
                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.0.push_str(&format!("{:?}", value));
                    }
                }
            }

            if event.metadata().target() == diagnostics::TARGET {
                let mut message = String::new();
                event.record(&mut Message(&mut message));
                self.0.lock().push(message);
            }
        }
    }

    #[test]
    fn test_open_creates_directories_and_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("logs").join("nested").join("app.txt");

        let writer = FileWriter::open(&path).unwrap();

        assert!(path.exists());
        assert_eq!(writer.path(), path);
        assert!(!writer.is_closed());
    }

    #[test]
    fn test_writes_prefix_newline() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.txt");

        let writer = FileWriter::open(&path).unwrap().with_decorator(message_only);
        writer.write(&entry("First message"));
        writer.write(&entry("Second message"));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\nFirst message\nSecond message");
    }

    #[test]
    fn test_appends_to_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.txt");
        fs::write(&path, "previous session").unwrap();

        let writer = FileWriter::open(&path).unwrap().with_decorator(message_only);
        writer.write(&entry("new"));

        assert_eq!(fs::read_to_string(&path).unwrap(), "previous session\nnew");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = FileWriter::open(blocker.join("app.txt"));
        assert!(matches!(result, Err(LogbookError::CreateDirectory { .. })));
    }

    #[test]
    fn test_open_fails_when_path_is_a_directory() {
        let temp = TempDir::new().unwrap();
        let result = FileWriter::open(temp.path());
        assert!(matches!(result, Err(LogbookError::OpenFile { .. })));
    }

    #[test]
    fn test_close_is_idempotent_and_stops_writes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.txt");

        let writer = FileWriter::open(&path).unwrap().with_decorator(message_only);
        writer.write(&entry("kept"));
        writer.close().unwrap();
        writer.close().unwrap();
        assert!(writer.is_closed());

        writer.write(&entry("dropped"));
        assert!(matches!(writer.append("x"), Err(LogbookError::WriterClosed(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "\nkept");
    }

    #[test]
    fn test_write_after_close_is_reported() {
        use tracing_subscriber::prelude::*;

        let temp = TempDir::new().unwrap();
        let writer = FileWriter::open(temp.path().join("app.txt")).unwrap();
        writer.close().unwrap();

        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        tracing::subscriber::with_default(subscriber, || writer.write(&entry("late")));

        assert_eq!(*captured.0.lock(), vec!["failed to write log entry"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_drop_reports_close_failure() {
        use tracing_subscriber::prelude::*;

        // fsync is not supported on /dev/null on most kernels; whatever close
        // returns here, drop must report the same outcome.
        let reference = FileWriter::open("/dev/null").unwrap();
        let close_fails = reference.close().is_err();

        let captured = Captured::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        tracing::subscriber::with_default(subscriber, || {
            drop(FileWriter::open("/dev/null").unwrap());
        });

        let reported = captured
            .0
            .lock()
            .iter()
            .any(|m| m == "failed to close log file");
        assert_eq!(reported, close_fails);
    }
}
