//! forge::mock
//!
//! Mock forge implementation for deterministic testing.
//!
//! # Design
//!
//! The mock forge stores created references in memory, records every call,
//! and can be configured to fail. Creating a reference that already exists
//! fails the way GitHub does (422).
//!
//! # Example
//!
//! ```
//! use realease::forge::mock::MockForge;
//! use realease::forge::{CreateTagRefRequest, Forge};
//!
//! # tokio_test::block_on(async {
//! let forge = MockForge::new();
//!
//! let created = forge
//!     .create_tag_ref(CreateTagRefRequest::new("v1.0.0", "abc123"))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(created.ref_name, "refs/tags/v1.0.0");
//! assert_eq!(forge.refs().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use super::factory::ForgeFactory;
use super::traits::{CreateTagRefRequest, Forge, ForgeError, GitRefInfo};
use crate::core::remote::RemoteDescriptor;

/// Mock forge for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockForge {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockForgeInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockForgeInner {
    /// References created so far.
    refs: Vec<GitRefInfo>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail create_tag_ref with the given error.
    CreateTagRef(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    CreateTagRef { ref_name: String, sha: String },
}

impl MockForge {
    /// Create a new empty mock forge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock forge with pre-existing references.
    pub fn with_refs(refs: Vec<GitRefInfo>) -> Self {
        let forge = Self::new();
        forge.lock().refs = refs;
        forge
    }

    /// Configure the mock to fail on a specific operation.
    ///
    /// # Example
    ///
    /// ```
    /// use realease::forge::mock::{FailOn, MockForge};
    /// use realease::forge::ForgeError;
    ///
    /// let forge = MockForge::new()
    ///     .fail_on(FailOn::CreateTagRef(ForgeError::RateLimited));
    /// ```
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.lock().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.lock().fail_on = None;
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Get all references (for test verification).
    pub fn refs(&self) -> Vec<GitRefInfo> {
        self.lock().refs.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockForgeInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Forge for MockForge {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_tag_ref(
        &self,
        request: CreateTagRefRequest,
    ) -> Result<GitRefInfo, ForgeError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::CreateTagRef {
            ref_name: request.ref_name.clone(),
            sha: request.sha.clone(),
        });

        if let Some(FailOn::CreateTagRef(e)) = &inner.fail_on {
            return Err(e.clone());
        }

        if inner.refs.iter().any(|r| r.ref_name == request.ref_name) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }

        let created = GitRefInfo {
            ref_name: request.ref_name,
            sha: request.sha,
        };
        inner.refs.push(created.clone());
        Ok(created)
    }
}

/// Every created forge shares this mock's state.
impl ForgeFactory for MockForge {
    fn create(&self, _remote: &RemoteDescriptor) -> Result<Box<dyn Forge>, ForgeError> {
        Ok(Box::new(self.clone()))
    }
}
