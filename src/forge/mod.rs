//! forge
//!
//! Abstraction for the hosted repository API.
//!
//! # Architecture
//!
//! The `Forge` trait defines the one hosted operation a release needs:
//! creating a tag reference at an existing commit. Forge operations are
//! invoked only after the local work (version read, line attribution) has
//! succeeded.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`factory`]: Forge creation once the remote is known
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing

pub mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{ForgeFactory, GitHubFactory};
pub use traits::*;
