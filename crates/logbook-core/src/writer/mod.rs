//! Output sinks.
//!
//! Every writer owns a [`WriterSettings`]: a replaceable decorator and its
//! own interceptor chain. The logger consults [`WriterSettings::accepts`]
//! before calling [`LogWriter::write`], so a writer only sees entries that
//! passed both the logger's chain and its own.
//!
//! ```text
//! Logger ──► ConsoleWriter  (stdout, one line per entry)
//!        ├─► FileWriter     (append "\n" + line to a file)
//!        └─► MemoryWriter   (in-process buffer)
//! ```

pub mod console;
pub mod file;
pub mod memory;

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::decorator::{Decorator, EntryDecorator};
use crate::entry::LogEntry;
use crate::interceptor::{Interceptor, InterceptorChain};

pub use console::ConsoleWriter;
pub use file::FileWriter;
pub use memory::MemoryWriter;

/// A sink for decorated log entries.
///
/// `write` must not panic or report errors to the caller; failures are
/// handled locally and reported through [`crate::diagnostics`].
pub trait LogWriter: Send + Sync {
    /// Decorator and interceptors for this writer.
    fn settings(&self) -> &WriterSettings;

    /// Decorate and emit `entry`.
    fn write(&self, entry: &LogEntry);

    /// Short name used in diagnostics.
    fn name(&self) -> &str {
        "writer"
    }
}

/// Runtime-replaceable decorator and interceptor chain of a writer.
pub struct WriterSettings {
    decorator: RwLock<Arc<dyn Decorator>>,
    interceptors: RwLock<InterceptorChain>,
}

impl WriterSettings {
    pub fn new(decorator: Arc<dyn Decorator>) -> Self {
        Self {
            decorator: RwLock::new(decorator),
            interceptors: RwLock::new(InterceptorChain::default()),
        }
    }

    pub fn decorator(&self) -> Arc<dyn Decorator> {
        self.decorator.read().clone()
    }

    pub fn set_decorator(&self, decorator: Arc<dyn Decorator>) {
        *self.decorator.write() = decorator;
    }

    /// Snapshot of the interceptor chain.
    pub fn interceptors(&self) -> InterceptorChain {
        self.interceptors.read().clone()
    }

    pub fn set_interceptors(&self, interceptors: impl Into<InterceptorChain>) {
        *self.interceptors.write() = interceptors.into();
    }

    pub fn add_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.write().push(interceptor);
    }

    /// Whether every interceptor of this writer approves `entry`.
    pub fn accepts(&self, entry: &LogEntry) -> bool {
        self.interceptors.read().allows(entry)
    }

    /// Decorate `entry` with the current decorator.
    pub fn render(&self, entry: &LogEntry) -> String {
        let decorator = self.decorator();
        decorator.decorate(entry)
    }
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self::new(Arc::new(EntryDecorator::new()))
    }
}

impl fmt::Debug for WriterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSettings")
            .field("interceptors", &*self.interceptors.read())
            .finish_non_exhaustive()
    }
}
