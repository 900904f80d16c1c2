//! cli::commands::session
//!
//! Everything a command needs before it can hand off to the engine: the
//! opened repository, loaded configuration, and the merged
//! [`ReleaseOptions`].

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::cli::args::Cli;
use crate::core::config::Config;
use crate::core::types::BranchName;
use crate::engine::{Context, ReleaseError, ReleaseOptions};
use crate::git::Git;
use crate::ui::output;

/// An opened repository with merged settings.
pub struct Session {
    /// The repository
    pub git: Git,
    /// Loaded configuration
    pub config: Config,
    /// Options after merging flags over configuration
    pub options: ReleaseOptions,
    /// `--repo`, canonicalized; relative paths on the command line resolve here
    pub repo_dir: PathBuf,
}

impl Session {
    /// Open the repository named by `--repo` and merge settings.
    ///
    /// `branch` and `tag` are the command-specific template flags.
    pub fn open(
        cli: &Cli,
        ctx: &Context,
        branch: Option<&str>,
        tag: Option<&str>,
    ) -> Result<Self> {
        let verbosity = ctx.verbosity();

        let repo_dir = cli.repo.canonicalize().map_err(|e| {
            anyhow!("cannot access repository path '{}': {}", cli.repo.display(), e)
        })?;
        let git = Git::open(&repo_dir)?;
        let work_dir = git.work_dir()?.to_path_buf();
        output::debug(format!("Repository at {}", work_dir.display()), verbosity);

        let config = Config::load(Some(&work_dir))?;
        if let Some(path) = config.global_config_loaded_from() {
            output::debug(format!("Loaded config {}", path.display()), verbosity);
        }
        if let Some(path) = config.repo_config_loaded_from() {
            output::debug(format!("Loaded config {}", path.display()), verbosity);
        }

        let mut templates = config.templates();
        if let Some(message) = &cli.message {
            templates.message = non_empty("--message", message)?;
        }
        if let Some(branch) = branch {
            templates.branch = non_empty("--branch", branch)?;
        }
        if let Some(tag) = tag {
            templates.tag = non_empty("--tag", tag)?;
        }

        let remote = match &cli.remote {
            Some(remote) => non_empty("--remote", remote)?,
            None => config.remote().to_string(),
        };
        let manifest = match &cli.manifest {
            Some(manifest) => manifest.clone(),
            None => PathBuf::from(config.manifest()),
        };

        let options = ReleaseOptions {
            trunk: BranchName::new(config.trunk())?,
            force: cli.force,
            remote,
            push: !cli.no_push && config.push(),
            manifest: resolve(&repo_dir, &manifest),
            templates,
        };
        output::debug(format!("{:?}", options), verbosity);

        Ok(Self {
            git,
            config,
            options,
            repo_dir,
        })
    }

    /// Resolve a command-line path against `--repo`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        resolve(&self.repo_dir, path)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn non_empty(flag: &str, value: &str) -> Result<String, ReleaseError> {
    if value.trim().is_empty() {
        return Err(ReleaseError::Usage(format!("{} must not be empty", flag)));
    }
    Ok(value.to_string())
}
