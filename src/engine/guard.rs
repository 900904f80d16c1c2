//! engine::guard
//!
//! Scoped restoration of the originally checked-out branch.
//!
//! A [`BranchGuard`] is taken before a workflow may switch branches. On the
//! happy path the workflow calls [`BranchGuard::restore`] and sees any
//! failure. If the workflow bails out early, `Drop` performs the checkout
//! instead and downgrades a failure to a warning, since an error is already
//! propagating.

use super::gateway::Gateway;
use crate::core::types::BranchName;
use crate::git::GitError;
use crate::ui::output::{self, Verbosity};

/// Restores `original` when dropped.
pub struct BranchGuard<'a, G: Gateway + ?Sized> {
    gateway: &'a G,
    original: BranchName,
    verbosity: Verbosity,
    done: bool,
}

impl<'a, G: Gateway + ?Sized> BranchGuard<'a, G> {
    pub fn new(gateway: &'a G, original: BranchName, verbosity: Verbosity) -> Self {
        Self {
            gateway,
            original,
            verbosity,
            done: false,
        }
    }

    /// The branch that will be restored.
    pub fn original(&self) -> &BranchName {
        &self.original
    }

    /// Check the original branch out now.
    pub fn restore(mut self) -> Result<(), GitError> {
        self.done = true;
        output::debug(
            format!("Restoring branch {}", self.original),
            self.verbosity,
        );
        self.gateway.checkout_branch(&self.original)
    }
}

impl<G: Gateway + ?Sized> Drop for BranchGuard<'_, G> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Err(e) = self.gateway.checkout_branch(&self.original) {
            output::warn(
                format!("could not restore branch '{}': {}", self.original, e),
                self.verbosity,
            );
        }
    }
}
