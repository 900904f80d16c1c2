//! bump commands - Cut a release branch (`major`, `minor`, `patch`)

use crate::cli::args::{BranchArgs, Cli};
use crate::core::manifest::Bump;
use crate::engine::{branch_release, BranchReleaseRequest, Context};
use crate::git::SshAgentCredentials;
use crate::ui::output;
use anyhow::Result;

use super::Session;

/// Bump the manifest version and cut a release branch.
///
/// # Arguments
///
/// * `cli` - Parsed global flags
/// * `ctx` - Execution context
/// * `kind` - Which version component to increment
/// * `args` - `--add` files and `--branch` template
pub fn bump(cli: &Cli, ctx: &Context, kind: Bump, args: &BranchArgs) -> Result<()> {
    let session = Session::open(cli, ctx, args.branch.as_deref(), None)?;

    let request = BranchReleaseRequest {
        bump: kind,
        extra_files: args.add.iter().map(|file| session.resolve(file)).collect(),
    };
    output::debug(format!("{} release", kind), ctx.verbosity());

    let outcome = branch_release::run(
        &session.git,
        &SshAgentCredentials,
        ctx,
        &session.options,
        &request,
    )?;

    output::success(
        format!(
            "Released {} -> {} on {}",
            outcome.previous, outcome.version, outcome.branch
        ),
        ctx.verbosity(),
    );
    Ok(())
}
