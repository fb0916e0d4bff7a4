//! Standard output writer.

use std::io::Write;
use std::sync::Arc;

use super::{LogWriter, WriterSettings};
use crate::decorator::Decorator;
use crate::diagnostics;
use crate::entry::LogEntry;
use crate::interceptor::InterceptorChain;

/// Prints one decorated line per entry to stdout.
///
/// Each line is written under the stdout lock, so lines from concurrent
/// log calls never interleave.
#[derive(Debug, Default)]
pub struct ConsoleWriter {
    settings: WriterSettings,
}

impl ConsoleWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decorator(self, decorator: impl Decorator + 'static) -> Self {
        self.settings.set_decorator(Arc::new(decorator));
        self
    }

    pub fn with_interceptors(self, interceptors: impl Into<InterceptorChain>) -> Self {
        self.settings.set_interceptors(interceptors);
        self
    }
}

impl LogWriter for ConsoleWriter {
    fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    fn write(&self, entry: &LogEntry) {
        let line = self.settings.render(entry);
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
            tracing::warn!(target: diagnostics::TARGET, error = %e, "console write failed");
        }
    }

    fn name(&self) -> &str {
        "console"
    }
}
