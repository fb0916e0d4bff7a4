//! In-memory writer.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::{LogWriter, WriterSettings};
use crate::decorator::Decorator;
use crate::entry::LogEntry;
use crate::interceptor::InterceptorChain;

/// Keeps decorated lines in memory, oldest first.
///
/// Useful for capturing output in tests or showing recent logs in a host UI.
/// Unbounded by default; with [`MemoryWriter::with_capacity`] only the most
/// recent lines are kept.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    settings: WriterSettings,
    lines: Mutex<VecDeque<String>>,
    capacity: Option<usize>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `capacity` lines, dropping the oldest first.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn with_decorator(self, decorator: impl Decorator + 'static) -> Self {
        self.settings.set_decorator(Arc::new(decorator));
        self
    }

    pub fn with_interceptors(self, interceptors: impl Into<InterceptorChain>) -> Self {
        self.settings.set_interceptors(interceptors);
        self
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Copy of every captured line.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().iter().cloned().collect()
    }

    /// Captured lines, each followed by a newline.
    pub fn contents(&self) -> String {
        self.lines
            .lock()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl LogWriter for MemoryWriter {
    fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    fn write(&self, entry: &LogEntry) {
        let line = self.settings.render(entry);
        let mut lines = self.lines.lock();

        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while lines.len() >= capacity {
                lines.pop_front();
            }
        }
        lines.push_back(line);
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::CallSite;
    use crate::level::LogLevel;

    fn write_all(writer: &MemoryWriter, messages: &[&str]) {
        for msg in messages {
            writer.write(&LogEntry::new(LogLevel::Info, *msg, vec![], CallSite::caller()));
        }
    }

    #[test]
    fn test_memory_writer_captures_lines() {
        let writer = MemoryWriter::new().with_decorator(|e: &LogEntry| e.message().to_string());

        write_all(&writer, &["first", "second"]);

        assert_eq!(writer.lines(), vec!["first", "second"]);
        assert_eq!(writer.contents(), "first\nsecond\n");
        assert_eq!(writer.capacity(), None);

        writer.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let writer =
            MemoryWriter::with_capacity(2).with_decorator(|e: &LogEntry| e.message().to_string());

        write_all(&writer, &["one", "two", "three", "four"]);

        assert_eq!(writer.lines(), vec!["three", "four"]);
        assert_eq!(writer.len(), 2);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let writer = MemoryWriter::with_capacity(0);
        write_all(&writer, &["one"]);
        assert!(writer.is_empty());
    }
}
