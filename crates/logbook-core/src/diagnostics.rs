//! The library's own fallback diagnostics channel.
//!
//! Problems inside the pipeline (a failed file append, a write after close,
//! a panicking writer) are never logged through a [`crate::Logger`]; that
//! could recurse forever. They are emitted as `tracing` events under
//! [`TARGET`] instead. Hosts without a subscriber can call [`init`] to get
//! them on stderr.

use tracing_subscriber::EnvFilter;

use crate::error::{LogbookError, LogbookResult};

/// Target of every diagnostic event emitted by this crate.
pub const TARGET: &str = "logbook::diagnostics";

/// Default filter used by [`init`] when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "logbook=warn";

/// Install a stderr `fmt` subscriber for diagnostics.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already set.
pub fn init(default_filter: Option<&str>) -> LogbookResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_FILTER)));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| LogbookError::Config(format!("diagnostics subscriber: {}", e)))
}

/// Install the stderr subscriber only if the process has no global one yet.
///
/// Returns whether this call installed it. A host subscriber is never
/// replaced.
pub fn install_fallback() -> bool {
    if tracing::dispatcher::has_been_set() {
        return false;
    }
    init(None).is_ok()
}
