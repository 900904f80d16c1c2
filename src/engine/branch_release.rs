//! engine::branch_release
//!
//! Cut a release branch with a bumped manifest version.
//!
//! # Steps
//!
//! 1. Check the trunk policy and take a [`BranchGuard`] on the current branch
//! 2. Read the manifest and compute the bumped version
//! 3. Rewrite the manifest
//! 4. Create the release branch at HEAD and check it out
//! 5. Commit the manifest and any extra files
//! 6. Re-sign the commit if `commit.gpgsign` is set
//! 7. Push the branch and print the compare URL (unless push is disabled)
//! 8. Check the original branch back out
//!
//! Nothing is rolled back. If step 5 fails, the manifest stays rewritten and
//! the release branch stays created, but the original branch is still
//! restored.

use std::path::PathBuf;

use semver::Version;

use super::error::{Describe, ReleaseError};
use super::gateway::Gateway;
use super::guard::BranchGuard;
use super::{check_branch_policy, Context, ReleaseOptions};
use crate::core::manifest::{Bump, ManifestSnapshot};
use crate::core::remote::RemoteDescriptor;
use crate::core::types::{BranchName, Oid, RefName};
use crate::git::CredentialSource;
use crate::ui::output::{self, Verbosity};

/// What to release.
#[derive(Debug, Clone)]
pub struct BranchReleaseRequest {
    /// Which version component to increment
    pub bump: Bump,
    /// Extra files to include in the release commit (absolute paths)
    pub extra_files: Vec<PathBuf>,
}

/// Result of a branch release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchReleaseOutcome {
    /// Version before the bump
    pub previous: Version,
    /// Released version
    pub version: Version,
    /// The release branch
    pub branch: BranchName,
    /// Tip of the release branch
    pub commit: Oid,
    /// Whether the commit was re-signed
    pub signed: bool,
    /// Whether the branch was pushed
    pub pushed: bool,
    /// Pull request URL, when the remote could be parsed
    pub compare_url: Option<String>,
}

/// Run the branch-release workflow.
pub fn run<G: Gateway + ?Sized>(
    gateway: &G,
    credentials: &dyn CredentialSource,
    ctx: &Context,
    options: &ReleaseOptions,
    request: &BranchReleaseRequest,
) -> Result<BranchReleaseOutcome, ReleaseError> {
    let verbosity = ctx.verbosity();

    let original = check_branch_policy(gateway, options, false)?.ok_or_else(|| {
        ReleaseError::PolicyViolation("HEAD is detached; check out a branch to release from".into())
    })?;
    let guard = BranchGuard::new(gateway, original, verbosity);
    output::debug(
        format!("Releasing from branch {}", guard.original()),
        verbosity,
    );

    let snapshot = ManifestSnapshot::read(&options.manifest).describe("reading manifest")?;
    let previous = snapshot.version().describe("reading manifest version")?;
    let version = request.bump.apply(&previous);
    let target = options
        .templates
        .expand(&version.to_string())
        .map_err(|e| ReleaseError::Usage(e.to_string()))?;

    let manifest = gateway
        .relative_path(&options.manifest)
        .describe("resolving manifest path")?;
    let mut paths = vec![manifest.clone()];
    for file in &request.extra_files {
        let relative = gateway
            .relative_path(file)
            .describe(format!("resolving {}", file.display()))?;
        if !paths.contains(&relative) {
            paths.push(relative);
        }
    }

    let head = gateway.head_oid().describe("reading HEAD")?;

    output::print(
        format!("Updating {} to version {}", manifest.display(), version),
        verbosity,
    );
    snapshot
        .write_version(&version)
        .describe("writing manifest")?;

    output::print(
        format!("Creating release branch {}", target.branch_name),
        verbosity,
    );
    gateway
        .create_branch(&target.branch_name, &head)
        .describe("creating release branch")?;
    gateway
        .checkout_branch(&target.branch_name)
        .describe("checking out release branch")?;

    output::print(format!("Committing \"{}\"", target.message), verbosity);
    let mut commit = gateway
        .commit_files(&paths, &target.message)
        .describe("committing release")?;

    let signed = gateway
        .gpgsign_enabled()
        .describe("reading commit.gpgsign")?;
    if signed {
        output::print("Signing release commit", verbosity);
        commit = gateway
            .amend_head_signed()
            .describe("signing release commit")?;
    }
    output::debug(format!("Release commit {}", commit.short(7)), verbosity);

    let mut compare_url = None;
    if options.push {
        output::print(
            format!("Pushing {} to {}", target.branch_name, options.remote),
            verbosity,
        );
        gateway
            .push(
                &options.remote,
                &RefName::for_branch(&target.branch_name),
                credentials,
            )
            .describe("pushing release branch")?;

        compare_url = compare_link(gateway, &options.remote, &target.branch_name, verbosity);
        if let Some(url) = &compare_url {
            output::success(format!("Open a pull request: {}", url), verbosity);
        }
    } else {
        output::debug("Push disabled", verbosity);
    }

    guard.restore().describe("restoring original branch")?;

    Ok(BranchReleaseOutcome {
        previous,
        version,
        branch: target.branch_name,
        commit,
        signed,
        pushed: options.push,
        compare_url,
    })
}

/// Build the compare URL for `branch`, or warn if the remote can't be parsed.
///
/// The branch is already pushed at this point, so a failure here is not
/// fatal.
fn compare_link<G: Gateway + ?Sized>(
    gateway: &G,
    remote: &str,
    branch: &BranchName,
    verbosity: Verbosity,
) -> Option<String> {
    let url = match gateway.remote_url(remote) {
        Ok(url) => url,
        Err(e) => {
            output::warn(format!("cannot read URL of '{}': {}", remote, e), verbosity);
            return None;
        }
    };
    match RemoteDescriptor::parse(&url) {
        Ok(descriptor) => Some(descriptor.compare_url(branch.as_str())),
        Err(e) => {
            output::warn(e, verbosity);
            None
        }
    }
}
