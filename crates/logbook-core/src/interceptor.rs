//! Interceptors decide whether an entry gets logged.
//!
//! Interceptors are combined with logical AND: an [`InterceptorChain`]
//! approves an entry only if every interceptor in it does, and an empty chain
//! approves everything. The logger and every writer each own a chain.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::entry::LogEntry;
use crate::level::LogLevel;
use crate::tag::{resolve_tags, IntoTag};

/// A predicate over log entries.
pub trait Interceptor: Send + Sync {
    /// Whether `entry` should be logged.
    fn should_log(&self, entry: &LogEntry) -> bool;
}

impl<F> Interceptor for F
where
    F: Fn(&LogEntry) -> bool + Send + Sync,
{
    fn should_log(&self, entry: &LogEntry) -> bool {
        self(entry)
    }
}

/// Suppresses entries whose level is in the ignored set.
///
/// Set membership only: ignoring `Info` does not ignore `Debug`.
#[derive(Debug, Clone, Default)]
pub struct LevelInterceptor {
    ignored: HashSet<LogLevel>,
}

impl LevelInterceptor {
    pub fn new(ignored: impl IntoIterator<Item = LogLevel>) -> Self {
        Self {
            ignored: ignored.into_iter().collect(),
        }
    }

    pub fn ignored_levels(&self) -> &HashSet<LogLevel> {
        &self.ignored
    }
}

impl Interceptor for LevelInterceptor {
    fn should_log(&self, entry: &LogEntry) -> bool {
        !self.ignored.contains(&entry.level())
    }
}

/// Suppresses entries carrying any of the ignored tags.
#[derive(Debug, Clone, Default)]
pub struct TagInterceptor {
    ignored: HashSet<String>,
}

impl TagInterceptor {
    /// Absent tags are dropped, as they are for log calls.
    pub fn new<I>(ignored: I) -> Self
    where
        I: IntoIterator,
        I::Item: IntoTag,
    {
        Self {
            ignored: resolve_tags(ignored).into_iter().collect(),
        }
    }

    pub fn ignored_tags(&self) -> &HashSet<String> {
        &self.ignored
    }
}

impl Interceptor for TagInterceptor {
    fn should_log(&self, entry: &LogEntry) -> bool {
        !entry.tags().iter().any(|tag| self.ignored.contains(tag))
    }
}

/// Suppresses entries below a minimum level.
#[derive(Debug, Clone, Copy)]
pub struct MinimumLevelInterceptor {
    minimum: LogLevel,
}

impl MinimumLevelInterceptor {
    pub fn new(minimum: LogLevel) -> Self {
        Self { minimum }
    }

    pub fn minimum(&self) -> LogLevel {
        self.minimum
    }
}

impl Interceptor for MinimumLevelInterceptor {
    fn should_log(&self, entry: &LogEntry) -> bool {
        entry.level() >= self.minimum
    }
}

/// Ordered, AND-combined list of interceptors.
#[derive(Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self { interceptors }
    }

    pub fn push(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    /// True iff every interceptor approves. Stops at the first rejection.
    pub fn allows(&self, entry: &LogEntry) -> bool {
        self.interceptors.iter().all(|i| i.should_log(entry))
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Interceptor>> {
        self.interceptors.iter()
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorChain")
            .field("len", &self.interceptors.len())
            .finish()
    }
}

impl From<Vec<Arc<dyn Interceptor>>> for InterceptorChain {
    fn from(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self::new(interceptors)
    }
}

impl FromIterator<Arc<dyn Interceptor>> for InterceptorChain {
    fn from_iter<T: IntoIterator<Item = Arc<dyn Interceptor>>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
