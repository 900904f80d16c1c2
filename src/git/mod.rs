//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads and writes
//! flow through this interface. No other module should import `git2`.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Branch creation and checkout
//! - Commit creation (and signed amend through the `git` CLI)
//! - Annotated tag creation and reference listing
//! - Line attribution via blame
//! - Remote URL lookup and push with pluggable credentials
//!
//! # Invariants
//!
//! - No other module calls git2 directly
//! - All operations return strong types (Oid, BranchName, RefName)

mod blame;
pub mod credentials;
mod interface;

pub use credentials::{Credential, CredentialRequest, CredentialSource, SshAgentCredentials};
pub use interface::{Git, GitError, MAX_CREDENTIAL_ATTEMPTS};
