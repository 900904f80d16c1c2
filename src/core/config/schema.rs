//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$REALEASE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/realease/config.toml`
//! 3. `~/.realease/config.toml`
//!
//! # Repo Config
//!
//! Located at `.git/realease/config.toml`.
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., trunk must be a valid branch name).

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::BranchName;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// trunk = "main"
/// push = true
///
/// [templates]
/// tag = "v{version}"
///
/// [github]
/// api_base = "https://github.example.com/api/v3"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Branch releases are cut from
    pub trunk: Option<String>,

    /// Remote to push to and to derive org/repo from
    pub remote: Option<String>,

    /// Whether to push after creating a branch or tag
    pub push: Option<bool>,

    /// Name and message templates
    pub templates: Option<TemplatesConfig>,

    /// Hosted API settings
    pub github: Option<GitHubConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_common(
            self.trunk.as_deref(),
            self.remote.as_deref(),
            self.templates.as_ref(),
            self.github.as_ref(),
        )
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// trunk = "main"
/// remote = "upstream"
/// manifest = "web/package.json"
///
/// [templates]
/// branch = "rel-{version}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Trunk branch name
    pub trunk: Option<String>,

    /// Remote name (default: "origin")
    pub remote: Option<String>,

    /// Manifest path relative to the repository root
    pub manifest: Option<String>,

    /// Whether to push after creating a branch or tag
    pub push: Option<bool>,

    /// Name and message templates
    pub templates: Option<TemplatesConfig>,

    /// Hosted API settings
    pub github: Option<GitHubConfig>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_common(
            self.trunk.as_deref(),
            self.remote.as_deref(),
            self.templates.as_ref(),
            self.github.as_ref(),
        )?;

        if let Some(manifest) = &self.manifest {
            if manifest.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "manifest cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn validate_common(
    trunk: Option<&str>,
    remote: Option<&str>,
    templates: Option<&TemplatesConfig>,
    github: Option<&GitHubConfig>,
) -> Result<(), ConfigError> {
    // Trunk must be usable as a branch name
    if let Some(trunk) = trunk {
        BranchName::new(trunk).map_err(|e| {
            ConfigError::InvalidValue(format!("invalid trunk branch name: {}", e))
        })?;
    }

    if let Some(remote) = remote {
        if remote.is_empty() {
            return Err(ConfigError::InvalidValue(
                "remote cannot be empty".to_string(),
            ));
        }
    }

    if let Some(templates) = templates {
        templates.validate()?;
    }

    if let Some(github) = github {
        github.validate()?;
    }

    Ok(())
}

/// Template overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Release branch template
    pub branch: Option<String>,

    /// Tag name template
    pub tag: Option<String>,

    /// Commit and tag message template
    pub message: Option<String>,
}

impl TemplatesConfig {
    /// Validate the templates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("branch", &self.branch),
            ("tag", &self.tag),
            ("message", &self.message),
        ] {
            if let Some(value) = value {
                if value.trim().is_empty() {
                    return Err(ConfigError::InvalidValue(format!(
                        "{} template cannot be empty",
                        field
                    )));
                }
            }
        }
        Ok(())
    }
}

/// GitHub API configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// API base URL (GitHub Enterprise)
    pub api_base: Option<String>,
}

impl GitHubConfig {
    /// Validate the GitHub configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(base) = &self.api_base {
            if !(base.starts_with("https://") || base.starts_with("http://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid github api_base '{}', must be an http(s) URL",
                    base
                )));
            }
        }
        Ok(())
    }
}
