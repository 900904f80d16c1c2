//! engine::gateway
//!
//! The repository capabilities a release workflow depends on.
//!
//! Workflows are written against [`Gateway`] rather than [`Git`] so they can
//! be exercised against an in-memory repository in tests. [`Git`] is the
//! only production implementation.

use std::path::{Path, PathBuf};

use crate::core::types::{BranchName, Oid, RefName, TagName};
use crate::git::{CredentialSource, Git, GitError};

/// Repository operations used by the release workflows.
pub trait Gateway {
    /// Express `path` relative to the work directory.
    fn relative_path(&self, path: &Path) -> Result<PathBuf, GitError>;

    /// The checked-out branch, or `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<BranchName>, GitError>;

    /// The commit HEAD points at.
    fn head_oid(&self) -> Result<Oid, GitError>;

    /// Whether commits should be signed (`commit.gpgsign`).
    fn gpgsign_enabled(&self) -> Result<bool, GitError>;

    fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError>;

    fn checkout_branch(&self, name: &BranchName) -> Result<(), GitError>;

    /// Commit exactly `paths` on top of HEAD.
    fn commit_files(&self, paths: &[PathBuf], message: &str) -> Result<Oid, GitError>;

    /// Re-create HEAD with a signature, keeping message and tree.
    fn amend_head_signed(&self) -> Result<Oid, GitError>;

    fn create_annotated_tag(
        &self,
        name: &TagName,
        target: &Oid,
        message: &str,
    ) -> Result<Oid, GitError>;

    /// Full names of every reference in the repository.
    fn reference_names(&self) -> Result<Vec<String>, GitError>;

    fn remote_url(&self, remote: &str) -> Result<String, GitError>;

    fn push(
        &self,
        remote: &str,
        refname: &RefName,
        credentials: &dyn CredentialSource,
    ) -> Result<(), GitError>;
}

impl Gateway for Git {
    fn relative_path(&self, path: &Path) -> Result<PathBuf, GitError> {
        Git::relative_path(self, path)
    }

    fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        Git::current_branch(self)
    }

    fn head_oid(&self) -> Result<Oid, GitError> {
        Git::head_oid(self)
    }

    fn gpgsign_enabled(&self) -> Result<bool, GitError> {
        Git::gpgsign_enabled(self)
    }

    fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError> {
        Git::create_branch(self, name, target)
    }

    fn checkout_branch(&self, name: &BranchName) -> Result<(), GitError> {
        Git::checkout_branch(self, name)
    }

    fn commit_files(&self, paths: &[PathBuf], message: &str) -> Result<Oid, GitError> {
        Git::commit_files(self, paths, message)
    }

    fn amend_head_signed(&self) -> Result<Oid, GitError> {
        Git::amend_head_signed(self)
    }

    fn create_annotated_tag(
        &self,
        name: &TagName,
        target: &Oid,
        message: &str,
    ) -> Result<Oid, GitError> {
        Git::create_annotated_tag(self, name, target, message)
    }

    fn reference_names(&self) -> Result<Vec<String>, GitError> {
        Git::reference_names(self)
    }

    fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        Git::remote_url(self, remote)
    }

    fn push(
        &self,
        remote: &str,
        refname: &RefName,
        credentials: &dyn CredentialSource,
    ) -> Result<(), GitError> {
        Git::push(self, remote, refname, credentials)
    }
}
