//! core::remote
//!
//! Parsing `org/name` out of a remote URL.
//!
//! The parse is host-agnostic: it takes the trailing `org/repo` segment of
//! any SSH (`git@host:org/repo.git`) or HTTPS (`https://host/org/repo`) URL.
//! The result is only used to build human-facing URLs and to address the
//! hosted API.

use regex::Regex;
use thiserror::Error;

/// Base URL for web links to hosted repositories.
pub const WEB_BASE: &str = "https://github.com";

/// Errors from remote URL parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("cannot parse org/repo from remote URL '{0}'")]
    Unrecognized(String),

    #[error("invalid remote pattern: {0}")]
    InvalidPattern(String),
}

/// The organisation and repository a remote points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    pub org: String,
    pub name: String,
}

impl RemoteDescriptor {
    /// Parse a remote URL.
    ///
    /// # Example
    ///
    /// ```
    /// use realease::core::remote::RemoteDescriptor;
    ///
    /// let remote = RemoteDescriptor::parse("git@github.com:acme/widget.git").unwrap();
    /// assert_eq!(remote.org, "acme");
    /// assert_eq!(remote.name, "widget");
    /// ```
    pub fn parse(url: &str) -> Result<Self, RemoteError> {
        let pattern = Regex::new(r"([^/:]+)/([^/]+?)(?:\.git)?/?$")
            .map_err(|e| RemoteError::InvalidPattern(e.to_string()))?;

        let captures = pattern
            .captures(url.trim())
            .ok_or_else(|| RemoteError::Unrecognized(url.to_string()))?;

        Ok(Self {
            org: captures[1].to_string(),
            name: captures[2].to_string(),
        })
    }

    /// URL for opening a pull request from `branch`.
    ///
    /// # Example
    ///
    /// ```
    /// use realease::core::remote::RemoteDescriptor;
    ///
    /// let remote = RemoteDescriptor::parse("https://github.com/acme/widget").unwrap();
    /// assert_eq!(
    ///     remote.compare_url("release/1.0.1"),
    ///     "https://github.com/acme/widget/compare/release/1.0.1?expand=1"
    /// );
    /// ```
    pub fn compare_url(&self, branch: &str) -> String {
        format!(
            "{}/{}/{}/compare/{}?expand=1",
            WEB_BASE, self.org, self.name, branch
        )
    }
}

impl std::fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.org, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(url: &str) -> (String, String) {
        let remote = RemoteDescriptor::parse(url).unwrap();
        (remote.org, remote.name)
    }

    fn pair(org: &str, name: &str) -> (String, String) {
        (org.to_string(), name.to_string())
    }

    #[test]
    fn ssh_with_git_suffix() {
        assert_eq!(parsed("git@github.com:octocat/hello-world.git"), pair("octocat", "hello-world"));
    }

    #[test]
    fn ssh_without_git_suffix() {
        assert_eq!(parsed("git@github.com:octocat/hello-world"), pair("octocat", "hello-world"));
    }

    #[test]
    fn https_variants() {
        assert_eq!(parsed("https://github.com/octocat/hello-world.git"), pair("octocat", "hello-world"));
        assert_eq!(parsed("https://github.com/octocat/hello-world"), pair("octocat", "hello-world"));
        assert_eq!(parsed("https://github.com/octocat/hello-world/"), pair("octocat", "hello-world"));
    }

    #[test]
    fn ssh_scheme_url() {
        assert_eq!(parsed("ssh://git@github.com/octocat/hello-world.git"), pair("octocat", "hello-world"));
    }

    #[test]
    fn other_hosts_use_trailing_segment() {
        assert_eq!(parsed("git@git.example.com:team/service.git"), pair("team", "service"));
        assert_eq!(parsed("https://gitlab.com/group/sub/project.git"), pair("sub", "project"));
    }

    #[test]
    fn repo_with_dots() {
        assert_eq!(parsed("git@github.com:owner/repo.name.git"), pair("owner", "repo.name"));
    }

    #[test]
    fn unparseable_urls() {
        assert!(matches!(
            RemoteDescriptor::parse("not-a-url"),
            Err(RemoteError::Unrecognized(_))
        ));
        assert!(RemoteDescriptor::parse("").is_err());
    }

    #[test]
    fn compare_url_format() {
        let remote = RemoteDescriptor {
            org: "acme".into(),
            name: "widget".into(),
        };
        assert_eq!(
            remote.compare_url("release/2.0.0"),
            "https://github.com/acme/widget/compare/release/2.0.0?expand=1"
        );
        assert_eq!(remote.to_string(), "acme/widget");
    }
}
