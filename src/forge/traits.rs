//! forge::traits
//!
//! Forge trait definition for interacting with remote hosting services.
//!
//! # Design
//!
//! The `Forge` trait is async because forge operations involve network I/O.
//! All methods return `Result` to handle API errors gracefully.
//!
//! A release only needs one hosted operation: creating a tag reference that
//! points at an existing commit. The forge never creates tag objects, never
//! pushes, and is used only when an API token is supplied.
//!
//! # Example
//!
//! ```ignore
//! use realease::forge::{CreateTagRefRequest, Forge, ForgeError};
//!
//! async fn tag(forge: &dyn Forge, sha: &str) -> Result<(), ForgeError> {
//!     let created = forge
//!         .create_tag_ref(CreateTagRefRequest::new("v1.2.0", sha))
//!         .await?;
//!     println!("created {}", created.ref_name);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Errors from forge operations.
///
/// These error types map to common failure modes when interacting
/// with remote hosting services like GitHub.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Authentication is required but not available.
    #[error("authentication required")]
    AuthRequired,

    /// Authentication failed (invalid token, expired, insufficient permissions).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("rate limited")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// Request to create a tag reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTagRefRequest {
    /// Full reference name (`refs/tags/<tag>`)
    pub ref_name: String,
    /// Commit SHA the reference points at
    pub sha: String,
}

impl CreateTagRefRequest {
    /// Build a request for tag `tag` at `sha`.
    ///
    /// # Example
    ///
    /// ```
    /// use realease::forge::CreateTagRefRequest;
    ///
    /// let request = CreateTagRefRequest::new("v2.0.0", "abc123");
    /// assert_eq!(request.ref_name, "refs/tags/v2.0.0");
    /// ```
    pub fn new(tag: &str, sha: impl Into<String>) -> Self {
        Self {
            ref_name: format!("refs/tags/{}", tag),
            sha: sha.into(),
        }
    }
}

/// A reference as reported by the forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRefInfo {
    /// Full reference name
    pub ref_name: String,
    /// SHA the reference points at
    pub sha: String,
}

/// The Forge trait for interacting with remote hosting services.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Nothing is retried; every
/// failure surfaces to the caller.
#[async_trait]
pub trait Forge: Send + Sync {
    /// Get the forge name (e.g., "github").
    fn name(&self) -> &'static str;

    /// Create a lightweight tag reference at an existing commit.
    ///
    /// # Errors
    ///
    /// - `AuthFailed` if the token is invalid or lacks permissions
    /// - `NotFound` if the repository or commit doesn't exist
    /// - `ApiError` with status 422 if the reference already exists
    async fn create_tag_ref(&self, request: CreateTagRefRequest)
        -> Result<GitRefInfo, ForgeError>;
}
