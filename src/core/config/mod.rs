//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! realease has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REALEASE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/realease/config.toml`
//! 3. `~/.realease/config.toml`
//!
//! # Repo Config Location
//!
//! `.git/realease/config.toml`
//!
//! The GitHub API token is never read from configuration.
//!
//! # Example
//!
//! ```no_run
//! use realease::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! println!("Trunk: {}", config.trunk());
//! println!("Remote: {}", config.remote());
//! ```

pub mod schema;

pub use schema::{GitHubConfig, GlobalConfig, RepoConfig, TemplatesConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::manifest::DEFAULT_MANIFEST;
use crate::core::template::Templates;

/// Default trunk branch.
pub const DEFAULT_TRUNK: &str = "master";

/// Default remote.
pub const DEFAULT_REMOTE: &str = "origin";

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo config overrides global
/// config, which overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_path` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or fail
    /// validation. Missing config files are not an error.
    pub fn load(repo_path: Option<&Path>) -> Result<Self, ConfigError> {
        let global_path = Self::find_global();
        Self::load_from(global_path.as_deref(), repo_path)
    }

    /// Load configuration from an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        repo_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let (global, global_path) = match global_path {
            Some(path) if path.exists() => {
                (read_config::<GlobalConfig>(path)?, Some(path.to_path_buf()))
            }
            _ => (GlobalConfig::default(), None),
        };

        let (repo, repo_path_found) = match repo_path {
            Some(path) => {
                let candidate = Self::repo_config_path(path);
                if candidate.exists() {
                    (Some(read_config::<RepoConfig>(&candidate)?), Some(candidate))
                } else {
                    (None, None)
                }
            }
            None => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path: repo_path_found,
        })
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        // 1. $REALEASE_CONFIG
        if let Ok(path) = std::env::var("REALEASE_CONFIG") {
            return Some(PathBuf::from(path));
        }

        // 2. $XDG_CONFIG_HOME/realease/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("realease/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.realease/config.toml
        dirs::home_dir()
            .map(|home| home.join(".realease/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for repo config.
    ///
    /// Returns `.git/realease/config.toml` relative to the given repo path.
    pub fn repo_config_path(repo_path: &Path) -> PathBuf {
        repo_path.join(".git/realease/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Get the trunk branch name.
    ///
    /// Defaults to "master" if not configured.
    pub fn trunk(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.trunk.as_deref())
            .or(self.global.trunk.as_deref())
            .unwrap_or(DEFAULT_TRUNK)
    }

    /// Get the remote name.
    ///
    /// Defaults to "origin" if not configured.
    pub fn remote(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.remote.as_deref())
            .or(self.global.remote.as_deref())
            .unwrap_or(DEFAULT_REMOTE)
    }

    /// Get the manifest path, relative to the repository root.
    pub fn manifest(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.manifest.as_deref())
            .unwrap_or(DEFAULT_MANIFEST)
    }

    /// Check if pushing is enabled.
    ///
    /// Defaults to `true` if not configured.
    pub fn push(&self) -> bool {
        self.repo
            .as_ref()
            .and_then(|r| r.push)
            .or(self.global.push)
            .unwrap_or(true)
    }

    /// Get the effective templates.
    pub fn templates(&self) -> Templates {
        let repo = self.repo.as_ref().and_then(|r| r.templates.as_ref());
        let global = self.global.templates.as_ref();
        let pick = |field: fn(&TemplatesConfig) -> Option<&String>| {
            repo.and_then(field).or_else(|| global.and_then(field)).cloned()
        };

        let defaults = Templates::default();
        Templates {
            branch: pick(|t| t.branch.as_ref()).unwrap_or(defaults.branch),
            tag: pick(|t| t.tag.as_ref()).unwrap_or(defaults.tag),
            message: pick(|t| t.message.as_ref()).unwrap_or(defaults.message),
        }
    }

    /// Get the GitHub API base URL.
    pub fn github_api_base(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.github.as_ref())
            .and_then(|g| g.api_base.as_deref())
            .or_else(|| {
                self.global
                    .github
                    .as_ref()
                    .and_then(|g| g.api_base.as_deref())
            })
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

/// Read and parse a config file.
fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
