//! core::manifest
//!
//! Reading, bumping, and rewriting the versioned JSON manifest.
//!
//! # Snapshots
//!
//! A manifest is read from disk exactly once per invocation into a
//! [`ManifestSnapshot`]. The parsed JSON, the located version line, and the
//! buffer handed to blame all come from that one string, so the line number
//! and the attributed content can never disagree.
//!
//! # Rewriting
//!
//! Bumping rewrites the document pretty-printed with 2-space indentation.
//! Key order is preserved and so is the presence (or absence) of a trailing
//! newline.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use semver::Version;
use serde_json::Value;
use thiserror::Error;

use super::locator::{LocateError, VersionLine, VersionLocator, VERSION_KEY};

/// Default manifest file name, relative to the repository root.
pub const DEFAULT_MANIFEST: &str = "package.json";

/// Errors from manifest operations.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write manifest '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("manifest '{path}' has no string \"version\" field")]
    MissingVersion { path: PathBuf },

    #[error("manifest version '{value}' is not a semantic version: {message}")]
    InvalidVersion { value: String, message: String },

    #[error(transparent)]
    Locate(#[from] LocateError),
}

/// A version increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl Bump {
    /// Apply the bump to a version.
    ///
    /// Pre-release and build metadata are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use realease::core::manifest::Bump;
    /// use semver::Version;
    ///
    /// let v = Version::new(1, 2, 3);
    /// assert_eq!(Bump::Major.apply(&v), Version::new(2, 0, 0));
    /// assert_eq!(Bump::Minor.apply(&v), Version::new(1, 3, 0));
    /// assert_eq!(Bump::Patch.apply(&v), Version::new(1, 2, 4));
    /// ```
    pub fn apply(&self, version: &Version) -> Version {
        match self {
            Bump::Major => Version::new(version.major + 1, 0, 0),
            Bump::Minor => Version::new(version.major, version.minor + 1, 0),
            Bump::Patch => Version::new(version.major, version.minor, version.patch + 1),
        }
    }
}

impl std::fmt::Display for Bump {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bump::Major => write!(f, "major"),
            Bump::Minor => write!(f, "minor"),
            Bump::Patch => write!(f, "patch"),
        }
    }
}

/// One read of the manifest file.
#[derive(Debug, Clone)]
pub struct ManifestSnapshot {
    path: PathBuf,
    content: String,
    document: Value,
}

impl ManifestSnapshot {
    /// Read and parse the manifest at `path`.
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|e| ManifestError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(path, content)
    }

    /// Parse manifest text that was already read from `path`.
    pub fn parse(path: &Path, content: String) -> Result<Self, ManifestError> {
        let document: Value =
            serde_json::from_str(&content).map_err(|e| ManifestError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            content,
            document,
        })
    }

    /// Path the snapshot was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw text of the snapshot.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The version string exactly as written.
    pub fn raw_version(&self) -> Result<&str, ManifestError> {
        self.document
            .get(VERSION_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| ManifestError::MissingVersion {
                path: self.path.clone(),
            })
    }

    /// The parsed semantic version.
    pub fn version(&self) -> Result<Version, ManifestError> {
        let raw = self.raw_version()?;
        Version::parse(raw).map_err(|e| ManifestError::InvalidVersion {
            value: raw.to_string(),
            message: e.to_string(),
        })
    }

    /// Locate the version line in this snapshot.
    pub fn version_line(&self) -> Result<VersionLine, ManifestError> {
        Ok(VersionLocator::new()?.locate(&self.content)?)
    }

    /// Render the manifest with `version` substituted.
    pub fn render_with_version(&self, version: &Version) -> Result<String, ManifestError> {
        let mut document = self.document.clone();
        match document.as_object_mut() {
            Some(object) => {
                object.insert(VERSION_KEY.to_string(), Value::String(version.to_string()));
            }
            None => {
                return Err(ManifestError::MissingVersion {
                    path: self.path.clone(),
                })
            }
        }

        let mut rendered =
            serde_json::to_string_pretty(&document).map_err(|e| ManifestError::Parse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;
        if self.content.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }

    /// Rewrite the manifest on disk with `version`.
    ///
    /// Uses atomic write (write to temp file, then rename).
    pub fn write_version(&self, version: &Version) -> Result<(), ManifestError> {
        let rendered = self.render_with_version(version)?;
        write_atomic(&self.path, rendered.as_bytes())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ManifestError> {
    let write_err = |path: &Path, source: std::io::Error| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    };

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).map_err(|e| write_err(&temp_path, e))?;
    file.write_all(contents)
        .map_err(|e| write_err(&temp_path, e))?;
    file.sync_all().map_err(|e| write_err(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| write_err(path, e))?;
    Ok(())
}
