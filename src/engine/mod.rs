//! engine
//!
//! The two release workflows.
//!
//! # Workflows
//!
//! - [`branch_release`]: bump the manifest version, commit it on a fresh
//!   release branch, optionally push, and return to the original branch.
//! - [`tag`]: tag the commit that last changed the manifest's version line,
//!   either locally (and push) or through the hosted API.
//!
//! # Architecture
//!
//! Workflows depend on the [`Gateway`] trait for repository access, on
//! [`HistoryAttributor`](crate::core::attribution::HistoryAttributor) for
//! blame, and on [`Forge`](crate::forge::Forge) for the API path. The CLI
//! wires in the production implementations; tests substitute fakes.
//!
//! # Invariants
//!
//! - Releases are cut from the trunk branch unless forced
//! - Once a release branch may have been checked out, the original branch is
//!   restored on every exit path ([`BranchGuard`])
//! - Nothing is rolled back: a failure after a mutation leaves that mutation
//!   in place and reports which step failed

pub mod branch_release;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod tag;

#[cfg(test)]
mod testing;

pub use branch_release::{BranchReleaseOutcome, BranchReleaseRequest};
pub use error::{Describe, ReleaseError};
pub use gateway::Gateway;
pub use guard::BranchGuard;
pub use tag::TagOutcome;

use std::path::PathBuf;

use crate::core::template::Templates;
use crate::core::types::BranchName;
use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags that affect output.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Output verbosity for this invocation.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Settings shared by both workflows, after config and flags are merged.
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Branch releases must start from
    pub trunk: BranchName,
    /// Skip the trunk check
    pub force: bool,
    /// Remote to push to
    pub remote: String,
    /// Whether to push the new branch or tag
    pub push: bool,
    /// Absolute path to the manifest
    pub manifest: PathBuf,
    /// Name and message templates
    pub templates: Templates,
}

/// Check the trunk policy and return the current branch.
///
/// A detached HEAD passes only when `allow_detached` is set and the policy
/// is forced.
fn check_branch_policy<G: Gateway + ?Sized>(
    gateway: &G,
    options: &ReleaseOptions,
    allow_detached: bool,
) -> Result<Option<BranchName>, ReleaseError> {
    let current = gateway
        .current_branch()
        .describe("reading current branch")?;

    match current {
        Some(branch) if branch == options.trunk || options.force => Ok(Some(branch)),
        Some(branch) => Err(ReleaseError::PolicyViolation(format!(
            "on branch '{}', releases are cut from '{}' (use --force to override)",
            branch, options.trunk
        ))),
        None if allow_detached && options.force => Ok(None),
        None if allow_detached => Err(ReleaseError::PolicyViolation(
            "HEAD is detached (use --force to override)".to_string(),
        )),
        None => Err(ReleaseError::PolicyViolation(
            "HEAD is detached; check out a branch to release from".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{options, FakeRepo};
    use super::*;

    #[test]
    fn trunk_passes() {
        let repo = FakeRepo::on_branch("master");
        let current = check_branch_policy(&repo, &options(&repo), false).unwrap();
        assert_eq!(current.unwrap().as_str(), "master");
    }

    #[test]
    fn other_branch_refused_without_force() {
        let repo = FakeRepo::on_branch("feature");
        let err = check_branch_policy(&repo, &options(&repo), false).unwrap_err();
        assert!(matches!(err, ReleaseError::PolicyViolation(_)));
        assert!(err.to_string().contains("'feature'"));
    }

    #[test]
    fn other_branch_allowed_with_force() {
        let repo = FakeRepo::on_branch("feature");
        let mut opts = options(&repo);
        opts.force = true;
        assert!(check_branch_policy(&repo, &opts, false).is_ok());
    }

    #[test]
    fn detached_head() {
        let repo = FakeRepo::detached();
        let mut opts = options(&repo);

        assert!(check_branch_policy(&repo, &opts, true).is_err());
        opts.force = true;
        assert_eq!(check_branch_policy(&repo, &opts, true).unwrap(), None);
        assert!(check_branch_policy(&repo, &opts, false).is_err());
    }

    #[test]
    fn verbosity_from_context() {
        let ctx = Context {
            debug: true,
            quiet: false,
        };
        assert_eq!(ctx.verbosity(), Verbosity::Debug);
        let ctx = Context {
            debug: true,
            quiet: true,
        };
        assert_eq!(ctx.verbosity(), Verbosity::Quiet);
    }
}
