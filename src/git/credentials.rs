//! git::credentials
//!
//! Credential discovery for pushes.
//!
//! Credential lookup is a strategy injected into [`Git::push`](super::Git::push).
//! Strategies return a [`Credential`] description; conversion into libgit2
//! credentials happens inside this module so that no caller needs `git2`.
//!
//! The default strategy, [`SshAgentCredentials`], asks the running SSH agent
//! for a key and falls back to libgit2's default credentials (e.g. Negotiate)
//! when the transport does not accept SSH keys.

/// Which credential kinds the transport will accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllowedCredentials {
    pub ssh_key: bool,
    pub default: bool,
}

/// A transport's request for credentials.
#[derive(Debug, Clone, Copy)]
pub struct CredentialRequest<'a> {
    /// URL being authenticated against
    pub url: &'a str,
    /// Username embedded in the URL, if any
    pub username: Option<&'a str>,
    /// Credential kinds the transport accepts
    pub allowed: AllowedCredentials,
}

/// A credential to present to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Ask the SSH agent for a key for `username`.
    SshAgent { username: String },
    /// libgit2 default credentials.
    Default,
}

/// Strategy for answering credential requests.
pub trait CredentialSource {
    /// Produce a credential for `request`, or `None` if this source has
    /// nothing usable.
    fn credential(&self, request: &CredentialRequest<'_>) -> Option<Credential>;
}

/// Username used for SSH when the URL carries none.
pub const DEFAULT_SSH_USER: &str = "git";

/// SSH agent credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshAgentCredentials;

impl CredentialSource for SshAgentCredentials {
    fn credential(&self, request: &CredentialRequest<'_>) -> Option<Credential> {
        if request.allowed.ssh_key {
            return Some(Credential::SshAgent {
                username: request.username.unwrap_or(DEFAULT_SSH_USER).to_string(),
            });
        }
        if request.allowed.default {
            return Some(Credential::Default);
        }
        None
    }
}

impl AllowedCredentials {
    pub(super) fn from_git2(allowed: git2::CredentialType) -> Self {
        Self {
            ssh_key: allowed.contains(git2::CredentialType::SSH_KEY),
            default: allowed.contains(git2::CredentialType::DEFAULT),
        }
    }
}

impl Credential {
    pub(super) fn into_git2(self) -> Result<git2::Cred, git2::Error> {
        match self {
            Credential::SshAgent { username } => git2::Cred::ssh_key_from_agent(&username),
            Credential::Default => git2::Cred::default(),
        }
    }
}
