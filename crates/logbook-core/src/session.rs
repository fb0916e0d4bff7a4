//! Session log files and retention.
//!
//! Each process run writes to one session file named after the moment the
//! session started:
//!
//! ```text
//! ~/Documents/Logs/
//! ├── log--2026-10-17 09:12:03.txt
//! ├── log--2026-10-18 18:40:55.txt
//! └── log--2026-10-19 08:01:27.txt   # current session
//! ```
//!
//! When the session file is first created, older files with the same prefix
//! are trimmed so that at most `max_files` remain, newest first by creation
//! time.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::diagnostics;
use crate::error::{LogbookError, LogbookResult};

/// Prefix identifying session log files.
pub const DEFAULT_PREFIX: &str = "log--";

/// Session log file extension.
pub const DEFAULT_EXTENSION: &str = ".txt";

/// Number of session files kept by default.
pub const DEFAULT_MAX_FILES: usize = 3;

/// Directory, relative to the documents directory, holding session logs.
pub const LOGS_DIRECTORY: &str = "Logs";

/// Timestamp pattern of session file names (`yyyy-MM-dd HH:mm:ss`).
pub const SESSION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static SESSION_STARTED_AT: OnceLock<DateTime<Local>> = OnceLock::new();

/// The instant this process's session started, fixed on first call.
pub fn session_started_at() -> DateTime<Local> {
    *SESSION_STARTED_AT.get_or_init(Local::now)
}

/// `<documents>/Logs`, or `./Logs` when there is no documents directory.
pub fn default_logs_dir() -> Option<PathBuf> {
    dirs::document_dir()
        .or_else(|| std::env::current_dir().ok())
        .map(|dir| dir.join(LOGS_DIRECTORY))
}

/// Build a session file name, e.g. `log--2026-10-19 08:01:27.txt`.
pub fn session_file_name(prefix: &str, started_at: DateTime<Local>, extension: &str) -> String {
    format!(
        "{}{}{}",
        prefix,
        started_at.format(SESSION_TIME_FORMAT),
        extension
    )
}

/// Where and how session files are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Log directory; `None` means [`default_logs_dir`].
    pub directory: Option<PathBuf>,
    pub prefix: String,
    pub extension: String,
    /// Session files retained, the current one included. The current
    /// session file is never removed, so `0` behaves like `1`.
    pub max_files: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            directory: None,
            prefix: DEFAULT_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            max_files: DEFAULT_MAX_FILES,
        }
    }
}

impl SessionConfig {
    /// Default naming and retention in an explicit directory.
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ..Self::default()
        }
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// The configured directory, or the default one.
    pub fn directory(&self) -> LogbookResult<PathBuf> {
        self.directory
            .clone()
            .or_else(default_logs_dir)
            .ok_or(LogbookError::NoLogDirectory)
    }

    /// Path of this process's session file.
    pub fn session_path(&self) -> LogbookResult<PathBuf> {
        let name = session_file_name(&self.prefix, session_started_at(), &self.extension);
        Ok(self.directory()?.join(name))
    }

    /// Create the log directory and session file, trimming old sessions.
    ///
    /// Trimming runs only when this call created the file, so it happens
    /// once per session no matter how many writers open it.
    pub fn prepare(&self) -> LogbookResult<PathBuf> {
        let dir = self.directory()?;
        fs::create_dir_all(&dir).map_err(|source| LogbookError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;

        let path = self.session_path()?;
        let created = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => false,
            Err(source) => return Err(LogbookError::OpenFile { path, source }),
        };

        if created {
            match prune_older_sessions(&dir, &self.prefix, self.max_files, &path) {
                Ok(removed) if !removed.is_empty() => {
                    tracing::debug!(
                        target: diagnostics::TARGET,
                        removed = removed.len(),
                        "trimmed old session logs"
                    );
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        target: diagnostics::TARGET,
                        dir = %dir.display(),
                        error = %e,
                        "failed to trim old session logs"
                    );
                }
            }
        }

        Ok(path)
    }
}

/// Session files in `dir` whose name starts with `prefix`, newest first.
///
/// Ordered by creation time, or modification time on platforms without
/// one. Ties are broken by name, descending.
pub fn list_session_files(dir: impl AsRef<Path>, prefix: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(prefix))
            .unwrap_or(false);

        if matches && path.is_file() {
            files.push((created_at(&path), path));
        }
    }

    files.sort_by(|(a_time, a_path), (b_time, b_path)| {
        b_time.cmp(a_time).then_with(|| b_path.cmp(a_path))
    });

    Ok(files.into_iter().map(|(_, path)| path).collect())
}

/// Keep the `max_files` most recent session files and delete the rest.
///
/// Returns the deleted paths. A file that cannot be deleted is reported and
/// skipped.
pub fn prune_session_files(
    dir: impl AsRef<Path>,
    prefix: &str,
    max_files: usize,
) -> io::Result<Vec<PathBuf>> {
    let files = list_session_files(dir, prefix)?;
    Ok(remove_files(files.into_iter().skip(max_files)))
}

/// Trim around the current session file, which is always kept and counts
/// toward `max_files` even when `max_files` is zero.
fn prune_older_sessions(
    dir: &Path,
    prefix: &str,
    max_files: usize,
    current: &Path,
) -> io::Result<Vec<PathBuf>> {
    let older = list_session_files(dir, prefix)?
        .into_iter()
        .filter(|path| path.as_path() != current);
    Ok(remove_files(older.skip(max_files.saturating_sub(1))))
}

fn remove_files(paths: impl Iterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut removed = Vec::new();

    for path in paths {
        match fs::remove_file(&path) {
            Ok(()) => removed.push(path),
            Err(e) => {
                tracing::warn!(
                    target: diagnostics::TARGET,
                    path = %path.display(),
                    error = %e,
                    "failed to remove old session log"
                );
            }
        }
    }

    removed
}

fn created_at(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .unwrap_or(UNIX_EPOCH)
}
