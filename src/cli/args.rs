//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--repo <path>`: Repository to release (default `.`)
//! - `--force`: Release from a branch other than trunk
//! - `--remote <name>`: Remote to push to
//! - `--message <template>`: Commit and tag message
//! - `--no-push`: Keep the release local
//! - `--manifest <file>`: Manifest holding the version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//!
//! Flags left unset fall back to repo config, then global config, then the
//! built-in defaults.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Realease - cut release branches and tag the commit that bumped the version
#[derive(Parser, Debug)]
#[command(name = "realease")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the repository
    #[arg(long, global = true, default_value = ".", value_name = "PATH")]
    pub repo: PathBuf,

    /// Allow releasing from a branch other than trunk (and, for tag, a detached HEAD)
    #[arg(long, global = true)]
    pub force: bool,

    /// Remote to push to [default: origin]
    #[arg(long, global = true, value_name = "NAME")]
    pub remote: Option<String>,

    /// Commit and tag message; {version} is replaced [default: "Release version {version}"]
    #[arg(long, global = true, value_name = "TEMPLATE")]
    pub message: Option<String>,

    /// Don't push the release branch or tag
    #[arg(long, global = true)]
    pub no_push: bool,

    /// Manifest file, relative to --repo [default: package.json]
    #[arg(long, global = true, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments, returning clap's error instead of exiting.
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Parser::try_parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cut a release branch with the major version bumped
    #[command(after_help = "\
EXAMPLES:
    # 1.4.2 -> 2.0.0 on branch release/2.0.0
    realease major

    # Include the changelog in the release commit
    realease major --add CHANGELOG.md")]
    Major(BranchArgs),

    /// Cut a release branch with the minor version bumped
    Minor(BranchArgs),

    /// Cut a release branch with the patch version bumped
    Patch(BranchArgs),

    /// Tag the commit that last changed the manifest version
    #[command(
        long_about = "Tag the commit that last changed the manifest version.\n\n\
            The tag target is found by blaming the manifest's version line, so commits \
            made after the bump don't move the tag. Running tag again once the tag \
            exists is a no-op.",
        after_help = "\
EXAMPLES:
    # Create an annotated tag locally and push it
    realease tag

    # Create the tag reference through the GitHub API instead
    realease tag --api \"$GITHUB_TOKEN\""
    )]
    Tag {
        /// Tag name; {version} is replaced [default: v{version}]
        #[arg(long, value_name = "TEMPLATE")]
        tag: Option<String>,

        /// Create the tag through the GitHub API with this token
        #[arg(long, value_name = "TOKEN")]
        api: Option<String>,
    },
}

/// Arguments shared by the branch-release commands.
#[derive(Args, Debug, Default)]
pub struct BranchArgs {
    /// Also commit this file (repeatable)
    #[arg(long = "add", value_name = "FILE")]
    pub add: Vec<PathBuf>,

    /// Release branch name; {version} is replaced [default: release/{version}]
    #[arg(long, value_name = "TEMPLATE")]
    pub branch: Option<String>,
}
