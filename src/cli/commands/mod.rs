//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Opens a [`Session`]: repository, configuration, merged options
//! 2. Calls the engine workflow
//! 3. Reports the outcome
//!
//! Handlers do NOT perform repository mutations directly.
//!
//! # Async Commands
//!
//! `tag` may call the GitHub API, so its handler creates a tokio runtime and
//! blocks on the workflow.

mod bump;
mod session;
mod tag;

pub use bump::bump;
pub use session::Session;
pub use tag::tag;

use crate::cli::args::{Cli, Command};
use crate::core::manifest::Bump;
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(cli: &Cli, ctx: &Context) -> Result<()> {
    match &cli.command {
        Command::Major(args) => bump::bump(cli, ctx, Bump::Major, args),
        Command::Minor(args) => bump::bump(cli, ctx, Bump::Minor, args),
        Command::Patch(args) => bump::bump(cli, ctx, Bump::Patch, args),
        Command::Tag { tag, api } => tag::tag(cli, ctx, tag.as_deref(), api.as_deref()),
    }
}
