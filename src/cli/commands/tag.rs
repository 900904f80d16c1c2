//! tag command - Tag the commit that last changed the manifest version

use crate::cli::args::Cli;
use crate::engine::{self, Context, ReleaseError};
use crate::forge::{ForgeFactory, GitHubFactory};
use crate::git::SshAgentCredentials;
use crate::ui::output;
use anyhow::Result;

use super::Session;

/// Run the tag command.
///
/// This is a synchronous wrapper that uses tokio to run the async workflow.
///
/// # Arguments
///
/// * `cli` - Parsed global flags
/// * `ctx` - Execution context
/// * `tag` - `--tag` template override
/// * `api` - GitHub token; when set the tag is created through the API
pub fn tag(cli: &Cli, ctx: &Context, tag: Option<&str>, api: Option<&str>) -> Result<()> {
    let session = Session::open(cli, ctx, None, tag)?;

    let factory = match api {
        Some(token) if token.trim().is_empty() => {
            return Err(ReleaseError::Usage("--api token must not be empty".into()).into())
        }
        Some(token) => {
            let api_base = session.config.github_api_base();
            output::debug(format!("Using GitHub API at {}", api_base), ctx.verbosity());
            Some(GitHubFactory::new(token, api_base))
        }
        None => None,
    };

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(engine::tag::run(
        &session.git,
        &session.git,
        &SshAgentCredentials,
        factory.as_ref().map(|f| f as &dyn ForgeFactory),
        ctx,
        &session.options,
    ))?;

    output::debug(format!("{:?}", outcome), ctx.verbosity());
    Ok(())
}
