//! git::blame
//!
//! Blame-backed [`HistoryAttributor`].
//!
//! Blame is computed for the file at HEAD and then overlaid with the caller's
//! snapshot via `blame_buffer`, so the hunks describe exactly the lines the
//! caller scanned. Lines that differ from the committed file land in hunks
//! with a zero commit id; those are reported as uncommitted rather than
//! attributed to anything.
//!
//! A snapshot read through a CRLF checkout (`core.autocrlf`) of a file
//! committed with LF endings is overlaid with LF endings, so a clean work
//! tree does not read as every line changed.

use std::borrow::Cow;
use std::path::Path;

use super::interface::{to_oid, Git, GitError};
use crate::core::attribution::{AttributionError, HistoryAttributor};
use crate::core::types::Oid;

impl HistoryAttributor for Git {
    fn attribute_line(
        &self,
        path: &Path,
        snapshot: &str,
        line: usize,
    ) -> Result<Oid, AttributionError> {
        let context = path.display().to_string();

        let committed = self
            .repo
            .blame_file(path, None)
            .map_err(|e| GitError::from_git2(e, &context))?;
        let buffer = self.match_committed_line_endings(path, snapshot)?;
        let blame = committed
            .blame_buffer(buffer.as_bytes())
            .map_err(|e| GitError::from_git2(e, &context))?;

        let hunk = blame
            .get_line(line)
            .ok_or(AttributionError::NoHunk { line })?;

        let commit = to_oid(hunk.final_commit_id())?;
        if commit.is_zero() {
            return Err(AttributionError::Uncommitted { line });
        }

        Ok(commit)
    }
}

impl Git {
    /// Strip carriage returns from `snapshot` when the blob at HEAD has none.
    fn match_committed_line_endings<'a>(
        &self,
        path: &Path,
        snapshot: &'a str,
    ) -> Result<Cow<'a, str>, GitError> {
        if !snapshot.contains('\r') {
            return Ok(Cow::Borrowed(snapshot));
        }

        let context = path.display().to_string();
        let tree = self
            .repo
            .head()
            .and_then(|head| head.peel_to_tree())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        let entry = tree
            .get_path(path)
            .map_err(|e| GitError::from_git2(e, &context))?;
        let blob = self
            .repo
            .find_blob(entry.id())
            .map_err(|e| GitError::from_git2(e, &context))?;

        if blob.content().contains(&b'\r') {
            Ok(Cow::Borrowed(snapshot))
        } else {
            Ok(Cow::Owned(snapshot.replace("\r\n", "\n")))
        }
    }
}
