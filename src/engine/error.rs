//! engine::error
//!
//! The release error taxonomy.
//!
//! Every fallible step of a workflow is wrapped with a description of what
//! was being attempted, via [`Describe::describe`]:
//!
//! ```ignore
//! gateway.checkout_branch(&branch).describe("checking out release branch")?;
//! ```
//!
//! which renders as `checking out release branch: ref not found: ...`.

use thiserror::Error;

use crate::core::attribution::AttributionError;
use crate::core::manifest::ManifestError;
use crate::core::remote::RemoteError;
use crate::forge::ForgeError;
use crate::git::GitError;

/// Errors from the release workflows.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Malformed invocation detected after argument parsing.
    #[error("{0}")]
    Usage(String),

    /// The repository is not in a state releases may be cut from.
    #[error("{0}")]
    PolicyViolation(String),

    #[error("{action}: {source}")]
    Manifest {
        action: String,
        source: ManifestError,
    },

    #[error("{action}: {source}")]
    Attribution {
        action: String,
        source: AttributionError,
    },

    #[error("{action}: {source}")]
    Repository { action: String, source: GitError },

    #[error("{action}: {source}")]
    Remote { action: String, source: RemoteError },

    #[error("{action}: {source}")]
    RemoteApi { action: String, source: ForgeError },
}

/// An error a workflow step can fail with.
pub trait ReleaseSource {
    /// Wrap `self` with the action that was being attempted.
    fn during(self, action: String) -> ReleaseError;
}

impl ReleaseSource for ManifestError {
    fn during(self, action: String) -> ReleaseError {
        ReleaseError::Manifest {
            action,
            source: self,
        }
    }
}

impl ReleaseSource for AttributionError {
    fn during(self, action: String) -> ReleaseError {
        ReleaseError::Attribution {
            action,
            source: self,
        }
    }
}

impl ReleaseSource for GitError {
    fn during(self, action: String) -> ReleaseError {
        ReleaseError::Repository {
            action,
            source: self,
        }
    }
}

impl ReleaseSource for RemoteError {
    fn during(self, action: String) -> ReleaseError {
        ReleaseError::Remote {
            action,
            source: self,
        }
    }
}

impl ReleaseSource for ForgeError {
    fn during(self, action: String) -> ReleaseError {
        ReleaseError::RemoteApi {
            action,
            source: self,
        }
    }
}

/// Attach an action description to a fallible step.
pub trait Describe<T> {
    fn describe(self, action: impl Into<String>) -> Result<T, ReleaseError>;
}

impl<T, E: ReleaseSource> Describe<T> for Result<T, E> {
    fn describe(self, action: impl Into<String>) -> Result<T, ReleaseError> {
        self.map_err(|e| e.during(action.into()))
    }
}
