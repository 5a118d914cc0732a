//! Change-marker bookkeeping.

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Rewrites the change marker with the current timestamp.
///
/// The marker exists purely so downstream change detection (a committing CI
/// job) observes a repository delta on every run, even when the tracked
/// artifact bytes are unchanged or the fetch failed. Errors propagate: a
/// marker that cannot be written is an environment failure, not something
/// to retry or swallow.
pub fn write_marker(dir: &Path, name: &str) -> io::Result<PathBuf> {
    let path = dir.join(name);
    let stamp = humantime::format_rfc3339_seconds(SystemTime::now());
    std::fs::write(&path, format!("last fetch attempt: {stamp}\n"))?;
    Ok(path)
}
