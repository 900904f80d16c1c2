//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all repository reads and
//! writes a release performs. It returns structured results and normalizes
//! errors into typed failure categories.
//!
//! # Architecture
//!
//! The `Git` struct is the only way to interact with a Git repository.
//! No other module should import `git2` directly.
//!
//! Everything goes through libgit2 except the signed amend, which runs
//! `git commit --amend` so that the user's configured signing program is
//! honoured.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::AlreadyExists`]: Branch or tag already exists
//! - [`GitError::RemoteNotFound`]: Named remote is not configured
//! - [`GitError::PushRejected`]: The remote refused a ref update
//!
//! # Example
//!
//! ```ignore
//! use realease::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head_oid()?;
//! println!("HEAD is at {}", head.short(7));
//! ```

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use super::credentials::{AllowedCredentials, CredentialRequest, CredentialSource};
use crate::core::types::{BranchName, Oid, RefName, TagName, TypeError};

/// How many times a push may ask for credentials before giving up.
pub const MAX_CREDENTIAL_ATTEMPTS: usize = 3;

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// A branch or tag with this name already exists.
    #[error("ref already exists: {refname}")]
    AlreadyExists {
        /// The ref that already exists
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// The named remote is not configured.
    #[error("remote '{name}' not found")]
    RemoteNotFound {
        /// The remote name
        name: String,
    },

    /// The remote has no URL configured.
    #[error("remote '{name}' has no URL")]
    RemoteWithoutUrl {
        /// The remote name
        name: String,
    },

    /// The push itself failed (transport, authentication).
    #[error("push to '{remote}' failed: {message}")]
    PushFailed {
        /// The remote pushed to
        remote: String,
        /// Description of the failure
        message: String,
    },

    /// The remote rejected a ref update.
    #[error("remote rejected {refname}: {reason}")]
    PushRejected {
        /// The ref that was rejected
        refname: String,
        /// The reason reported by the remote
        reason: String,
    },

    /// A path is not inside the repository work tree.
    #[error("path is outside the work tree: {path}")]
    PathOutsideWorkTree {
        /// The offending path
        path: PathBuf,
    },

    /// A `git` subprocess failed.
    #[error("`git {command}` failed: {message}")]
    CommandFailed {
        /// The git subcommand and arguments
        command: String,
        /// stderr or spawn error
        message: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    pub(super) fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => {
                if context.starts_with("refs/") || context.contains("ref") || context == "HEAD" {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::UnbornBranch => GitError::RefNotFound {
                refname: context.to_string(),
            },
            git2::ErrorCode::Exists => GitError::AlreadyExists {
                refname: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RefNotFound {
                refname: err.message().to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: err.message().to_string(),
            },
            _ => GitError::Internal {
                message: err.message().to_string(),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg)
            | TypeError::InvalidBranchName(msg)
            | TypeError::InvalidTagName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// Convert a git2 oid into the crate's [`Oid`].
pub(super) fn to_oid(oid: git2::Oid) -> Result<Oid, GitError> {
    Ok(Oid::new(oid.to_string())?)
}

fn to_git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// should import `git2` directly.
pub struct Git {
    /// The underlying git2 repository
    pub(super) repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        // Releases rewrite a file in the work tree
        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Get the working directory.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    /// Express `path` relative to the work directory.
    ///
    /// Relative paths are taken as already relative to the work directory.
    /// Absolute paths are canonicalized and must lie inside it.
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf, GitError> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let outside = || GitError::PathOutsideWorkTree {
            path: path.to_path_buf(),
        };
        let work_dir = self
            .work_dir()?
            .canonicalize()
            .map_err(|e| GitError::AccessError {
                message: e.to_string(),
            })?;
        let path = path.canonicalize().map_err(|_| outside())?;

        path.strip_prefix(&work_dir)
            .map(Path::to_path_buf)
            .map_err(|_| outside())
    }

    // =========================================================================
    // HEAD and Configuration
    // =========================================================================

    /// Get HEAD commit OID.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (new repository)
    pub fn head_oid(&self) -> Result<Oid, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let oid = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?
            .id();

        to_oid(oid)
    }

    /// Get the current branch name, if on a branch.
    ///
    /// Returns `None` if HEAD is detached or unborn.
    pub fn current_branch(&self) -> Result<Option<BranchName>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(Some(BranchName::new(name)?));
            }
        }

        Ok(None) // Detached HEAD
    }

    /// Check whether `commit.gpgsign` is enabled.
    ///
    /// A missing key counts as disabled.
    pub fn gpgsign_enabled(&self) -> Result<bool, GitError> {
        let config = self
            .repo
            .config()
            .map_err(|e| GitError::from_git2(e, "config"))?;

        match config.get_bool("commit.gpgsign") {
            Ok(value) => Ok(value),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(false),
            Err(e) => Err(GitError::from_git2(e, "commit.gpgsign")),
        }
    }

    // =========================================================================
    // Branches
    // =========================================================================

    /// Create a branch pointing at `target`.
    ///
    /// # Errors
    ///
    /// - [`GitError::AlreadyExists`] if the branch exists
    pub fn create_branch(&self, name: &BranchName, target: &Oid) -> Result<(), GitError> {
        let commit = self
            .repo
            .find_commit(to_git2_oid(target)?)
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;

        self.repo
            .branch(name.as_str(), &commit, false)
            .map_err(|e| GitError::from_git2(e, RefName::for_branch(name).as_str()))?;

        Ok(())
    }

    /// Check out a local branch.
    ///
    /// Uses a safe checkout: files with local modifications that would be
    /// overwritten cause an error rather than being clobbered.
    pub fn checkout_branch(&self, name: &BranchName) -> Result<(), GitError> {
        let refname = RefName::for_branch(name);
        let target = self
            .repo
            .revparse_single(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.safe();

        self.repo
            .checkout_tree(&target, Some(&mut checkout))
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;
        self.repo
            .set_head(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;

        Ok(())
    }

    // =========================================================================
    // Commits and Tags
    // =========================================================================

    /// Commit `paths` on top of HEAD.
    ///
    /// Only the listed paths are staged. Author and committer are the
    /// repository's default signature (`user.name` / `user.email`).
    ///
    /// Paths must be relative to the work directory.
    pub fn commit_files(&self, paths: &[PathBuf], message: &str) -> Result<Oid, GitError> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;

        for path in paths {
            index
                .add_path(path)
                .map_err(|e| GitError::from_git2(e, &path.display().to_string()))?;
        }
        index
            .write()
            .map_err(|e| GitError::from_git2(e, "index"))?;

        let tree_id = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "index"))?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| GitError::from_git2(e, &tree_id.to_string()))?;

        let signature = self
            .repo
            .signature()
            .map_err(|e| GitError::from_git2(e, "signature"))?;
        let parent = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let oid = self
            .repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &[&parent],
            )
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        to_oid(oid)
    }

    /// Amend HEAD in place, signing it with the user's configured signer.
    ///
    /// Runs `git commit --amend --no-verify --no-edit` in the work
    /// directory and returns the new HEAD.
    pub fn amend_head_signed(&self) -> Result<Oid, GitError> {
        let args = ["commit", "--amend", "--no-verify", "--no-edit"];
        let output = Command::new("git")
            .args(args)
            .current_dir(self.work_dir()?)
            .output()
            .map_err(|e| GitError::CommandFailed {
                command: args.join(" "),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: args.join(" "),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        self.head_oid()
    }

    /// Create an annotated tag at `target`.
    ///
    /// The tagger is the repository's default signature.
    ///
    /// # Errors
    ///
    /// - [`GitError::AlreadyExists`] if the tag exists
    pub fn create_annotated_tag(
        &self,
        name: &TagName,
        target: &Oid,
        message: &str,
    ) -> Result<Oid, GitError> {
        let object = self
            .repo
            .find_object(to_git2_oid(target)?, Some(git2::ObjectType::Commit))
            .map_err(|e| GitError::from_git2(e, target.as_str()))?;
        let tagger = self
            .repo
            .signature()
            .map_err(|e| GitError::from_git2(e, "signature"))?;

        let oid = self
            .repo
            .tag(name.as_str(), &object, &tagger, message, false)
            .map_err(|e| GitError::from_git2(e, RefName::for_tag(name).as_str()))?;

        to_oid(oid)
    }

    /// List the full names of all references.
    pub fn reference_names(&self) -> Result<Vec<String>, GitError> {
        let references = self
            .repo
            .references()
            .map_err(|e| GitError::from_git2(e, "references"))?;

        let mut names = Vec::new();
        for reference in references {
            let reference = reference.map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
            if let Some(name) = reference.name() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Get the URL for a remote.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if the remote doesn't exist
    pub fn remote_url(&self, name: &str) -> Result<String, GitError> {
        let remote = self.find_remote(name)?;
        remote
            .url()
            .map(String::from)
            .ok_or_else(|| GitError::RemoteWithoutUrl {
                name: name.to_string(),
            })
    }

    /// Push `refname` to the same name on `remote`.
    ///
    /// Credentials are requested from `credentials` at most
    /// [`MAX_CREDENTIAL_ATTEMPTS`] times.
    ///
    /// # Errors
    ///
    /// - [`GitError::RemoteNotFound`] if the remote doesn't exist
    /// - [`GitError::PushFailed`] on transport or authentication failure
    /// - [`GitError::PushRejected`] if the remote refuses the update
    pub fn push(
        &self,
        remote: &str,
        refname: &RefName,
        credentials: &dyn CredentialSource,
    ) -> Result<(), GitError> {
        let mut handle = self.find_remote(remote)?;

        let attempts = Cell::new(0usize);
        let rejection: RefCell<Option<(String, String)>> = RefCell::new(None);

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|url, username, allowed| {
            attempts.set(attempts.get() + 1);
            if attempts.get() > MAX_CREDENTIAL_ATTEMPTS {
                return Err(git2::Error::from_str(
                    "credentials rejected; no usable key found",
                ));
            }

            let request = CredentialRequest {
                url,
                username,
                allowed: AllowedCredentials::from_git2(allowed),
            };
            match credentials.credential(&request) {
                Some(credential) => credential.into_git2(),
                None => Err(git2::Error::from_str("no usable credentials")),
            }
        });
        callbacks.push_update_reference(|name, status| {
            if let Some(reason) = status {
                *rejection.borrow_mut() = Some((name.to_string(), reason.to_string()));
            }
            Ok(())
        });

        let mut options = git2::PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("{0}:{0}", refname.as_str());
        handle
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|e| GitError::PushFailed {
                remote: remote.to_string(),
                message: e.message().to_string(),
            })?;

        if let Some((refname, reason)) = rejection.take() {
            return Err(GitError::PushRejected { refname, reason });
        }

        Ok(())
    }

    fn find_remote(&self, name: &str) -> Result<git2::Remote<'_>, GitError> {
        self.repo.find_remote(name).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec => {
                GitError::RemoteNotFound {
                    name: name.to_string(),
                }
            }
            _ => GitError::from_git2(e, name),
        })
    }
}
