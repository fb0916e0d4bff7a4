//! `tracing` bridge.
//!
//! [`LogbookLayer`] forwards `tracing` events to a [`Logger`], so code that
//! already uses `tracing::info!` and friends ends up in the same sinks:
//!
//! ```text
//! tracing::warn!(target: "net", peer = 7, "retrying")
//!   → logger.warning("retrying peer=7", ["net", <span names, root first>], site)
//! ```
//!
//! Events from the library's own targets (`logbook::*`, `logbook_core::*`)
//! are skipped so diagnostics never loop back into the pipeline.

use std::fmt::Write as FmtWrite;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::diagnostics;
use crate::entry::CallSite;
use crate::level::LogLevel;
use crate::logger::Logger;

/// Whether `target` belongs to this library rather than the host.
///
/// Matches whole path segments only, so host targets like
/// `logbooks_app::orders` still pass.
fn is_own_target(target: &str) -> bool {
    let crate_root = target.split("::").next().unwrap_or(target);
    target == diagnostics::TARGET || crate_root == "logbook" || crate_root == "logbook_core"
}

/// A tracing Layer that forwards events to a [`Logger`].
pub struct LogbookLayer {
    logger: Arc<Logger>,
}

impl LogbookLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// The logger receiving bridged events.
    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }
}

impl<S> Layer<S> for LogbookLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if is_own_target(target) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let mut tags = vec![target.to_string()];
        if let Some(scope) = ctx.event_scope(event) {
            tags.extend(scope.from_root().map(|span| span.name().to_string()));
        }

        let site = CallSite::new(
            metadata.module_path().unwrap_or_default(),
            metadata.file().unwrap_or_default(),
            metadata.line().unwrap_or_default(),
        );

        self.logger
            .log(map_level(metadata.level()), visitor.finish().as_str(), tags, site);
    }
}

/// TRACE has no counterpart and shares DEBUG.
pub fn map_level(level: &Level) -> LogLevel {
    if *level == Level::ERROR {
        LogLevel::Error
    } else if *level == Level::WARN {
        LogLevel::Warning
    } else if *level == Level::INFO {
        LogLevel::Info
    } else {
        LogLevel::Debug
    }
}

/// Collects the `message` field, with other fields appended as ` key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            self.message + &self.fields
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(&mut self.message, "{:?}", value);
        } else {
            let _ = write!(&mut self.fields, " {}={:?}", field.name(), value);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(&mut self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        let _ = write!(&mut self.fields, " {}={}", field.name(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogEntry;
    use crate::writer::MemoryWriter;
    use tracing_subscriber::prelude::*;

    fn describe(e: &LogEntry) -> String {
        format!("{:?} {:?} {}", e.level(), e.tags(), e.message())
    }

    #[test]
    fn test_layer_forwards_events() {
        let logger = Arc::new(Logger::new());
        let sink = Arc::new(MemoryWriter::new().with_decorator(describe));
        logger.add_writer(sink.clone());

        let subscriber = tracing_subscriber::registry().with(LogbookLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "net", "Connected");
            tracing::warn!(target: "net", attempt = 2, peer = "love", "Retrying");
            let span = tracing::info_span!("sync");
            let _guard = span.enter();
            let inner = tracing::info_span!("realm");
            let _inner = inner.enter();
            tracing::error!(target: "storage", "write failed");
            tracing::trace!(target: "storage", "detail");
        });

        assert_eq!(
            sink.lines(),
            vec![
                r#"Info ["net"] Connected"#,
                r#"Warning ["net"] Retrying attempt=2 peer=love"#,
                r#"Error ["storage", "sync", "realm"] write failed"#,
                r#"Debug ["storage", "sync", "realm"] detail"#,
            ]
        );
    }

    #[test]
    fn test_layer_skips_own_diagnostics() {
        let logger = Arc::new(Logger::new());
        let sink = Arc::new(MemoryWriter::new());
        logger.add_writer(sink.clone());

        let subscriber = tracing_subscriber::registry().with(LogbookLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: crate::diagnostics::TARGET, "file write failed");
        });

        assert!(sink.is_empty());
    }

    #[test]
    fn test_layer_keeps_lookalike_host_targets() {
        let logger = Arc::new(Logger::new());
        let sink = Arc::new(MemoryWriter::new().with_decorator(describe));
        logger.add_writer(sink.clone());

        let subscriber = tracing_subscriber::registry().with(LogbookLayer::new(logger));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "logbooks_app::orders", "order placed");
            tracing::info!(target: "logbook_coreish", "near miss");
            tracing::info!(target: "logbook_core::session", "internal");
            tracing::info!(target: "logbook", "internal");
        });

        assert_eq!(
            sink.lines(),
            vec![
                r#"Info ["logbooks_app::orders"] order placed"#,
                r#"Info ["logbook_coreish"] near miss"#,
            ]
        );
    }

    #[test]
    fn test_own_target_matching() {
        assert!(is_own_target(crate::diagnostics::TARGET));
        assert!(is_own_target("logbook_core::writer::file"));
        assert!(!is_own_target("logbooks_app"));
        assert!(!is_own_target("net"));
    }

    #[test]
    fn test_level_mapping() {
        assert_eq!(map_level(&Level::TRACE), LogLevel::Debug);
        assert_eq!(map_level(&Level::DEBUG), LogLevel::Debug);
        assert_eq!(map_level(&Level::INFO), LogLevel::Info);
        assert_eq!(map_level(&Level::WARN), LogLevel::Warning);
        assert_eq!(map_level(&Level::ERROR), LogLevel::Error);
    }
}
