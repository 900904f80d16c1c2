//! core::template
//!
//! `{version}` substitution for branch names, tag names, and messages.
//!
//! Substitution is textual and happens once per template: only the first
//! `{version}` token is replaced. A template without the token is returned
//! unchanged.

use super::types::{BranchName, TagName, TypeError};

/// The token replaced by the release version.
pub const VERSION_TOKEN: &str = "{version}";

/// Default release branch template.
pub const DEFAULT_BRANCH_TEMPLATE: &str = "release/{version}";

/// Default tag template.
pub const DEFAULT_TAG_TEMPLATE: &str = "v{version}";

/// Default commit and tag message template.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "Release version {version}";

/// Substitute `version` for the first `{version}` token in `template`.
///
/// # Example
///
/// ```
/// use realease::core::template::substitute;
///
/// assert_eq!(substitute("release/{version}", "2.3.0"), "release/2.3.0");
/// assert_eq!(substitute("stable", "2.3.0"), "stable");
/// ```
pub fn substitute(template: &str, version: &str) -> String {
    template.replacen(VERSION_TOKEN, version, 1)
}

/// The templates a release is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub branch: String,
    pub tag: String,
    pub message: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH_TEMPLATE.to_string(),
            tag: DEFAULT_TAG_TEMPLATE.to_string(),
            message: DEFAULT_MESSAGE_TEMPLATE.to_string(),
        }
    }
}

impl Templates {
    /// Expand every template for `version`.
    ///
    /// # Errors
    ///
    /// Returns a [`TypeError`] if the expanded branch or tag name is not a
    /// valid Git ref name.
    pub fn expand(&self, version: &str) -> Result<ReleaseTarget, TypeError> {
        Ok(ReleaseTarget {
            version: version.to_string(),
            branch_name: BranchName::new(substitute(&self.branch, version))?,
            tag_name: TagName::new(substitute(&self.tag, version))?,
            message: substitute(&self.message, version),
        })
    }
}

/// Names and messages for one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseTarget {
    /// The version being released
    pub version: String,
    /// Release branch name
    pub branch_name: BranchName,
    /// Tag name
    pub tag_name: TagName,
    /// Commit message (branch release) and tag message (tag)
    pub message: String,
}
