//! cli
//!
//! Command-line interface layer for realease.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Merge flags with configuration (flag > repo config > global config > default)
//! - Delegate to the workflows in [`crate::engine`]
//!
//! # Architecture
//!
//! The CLI layer is thin. It opens the repository, wires the production
//! [`Git`](crate::git::Git), credential source, and forge factory into the
//! engine, and converts engine errors into `anyhow` errors for `main`.

pub mod args;
pub mod commands;

pub use args::Cli;

use crate::engine;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs` once arguments are
/// parsed.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
    };

    commands::dispatch(&cli, &ctx)
}
