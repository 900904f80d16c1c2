//! forge::factory
//!
//! Forge creation for a parsed remote.
//!
//! # Design
//!
//! The tag workflow only learns which repository to address after it has
//! read the remote URL, so it receives a [`ForgeFactory`] rather than a
//! ready-made forge. Commands pass a [`GitHubFactory`]; tests pass a
//! [`MockForge`](super::mock::MockForge), which hands out clones of itself.
//!
//! # Example
//!
//! ```
//! use realease::core::remote::RemoteDescriptor;
//! use realease::forge::{Forge, ForgeFactory, GitHubFactory};
//!
//! let factory = GitHubFactory::new("ghp_token", "https://github.example.com/api/v3");
//! let remote = RemoteDescriptor::parse("git@github.example.com:acme/widget.git").unwrap();
//! let forge = factory.create(&remote).unwrap();
//! assert_eq!(forge.name(), "github");
//! ```

use super::github::GitHubForge;
use super::traits::{Forge, ForgeError};
use crate::core::remote::RemoteDescriptor;

/// Creates a forge addressing one repository.
pub trait ForgeFactory: Send + Sync {
    /// Create a forge for `remote`.
    fn create(&self, remote: &RemoteDescriptor) -> Result<Box<dyn Forge>, ForgeError>;
}

/// Creates [`GitHubForge`]s sharing one token and API base.
pub struct GitHubFactory {
    token: String,
    api_base: String,
}

impl std::fmt::Debug for GitHubFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubFactory")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubFactory {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into(),
        }
    }
}

impl ForgeFactory for GitHubFactory {
    fn create(&self, remote: &RemoteDescriptor) -> Result<Box<dyn Forge>, ForgeError> {
        if self.token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        Ok(Box::new(GitHubForge::with_api_base(
            self.token.clone(),
            remote.org.clone(),
            remote.name.clone(),
            self.api_base.clone(),
        )))
    }
}
