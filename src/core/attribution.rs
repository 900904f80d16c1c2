//! core::attribution
//!
//! Line-level history attribution.
//!
//! An attributor answers one question: which commit last wrote line `n` of a
//! file, given the exact content that was scanned to find `n`. The content is
//! passed in alongside the path so the caller's read and the attribution
//! always observe the same lines.
//!
//! The production implementation lives in [`crate::git`] and is backed by
//! blame. Tests substitute their own.

use std::path::Path;

use thiserror::Error;

use super::types::Oid;
use crate::git::GitError;

/// Errors from attributing a line.
#[derive(Debug, Error)]
pub enum AttributionError {
    /// No blame hunk covers the requested line.
    #[error("no blame hunk covers line {line}")]
    NoHunk {
        /// The 1-based line that was requested
        line: usize,
    },

    /// The line was last written by uncommitted changes.
    #[error("line {line} has uncommitted changes; commit the manifest before tagging")]
    Uncommitted {
        /// The 1-based line that was requested
        line: usize,
    },

    /// The repository could not compute blame.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// Finds the commit that last modified a line.
pub trait HistoryAttributor {
    /// Attribute 1-based `line` of `path`, as it appears in `snapshot`.
    ///
    /// `path` is relative to the repository work directory.
    fn attribute_line(&self, path: &Path, snapshot: &str, line: usize)
        -> Result<Oid, AttributionError>;
}
