//! core::locator
//!
//! Locates the single manifest line that carries the version field.
//!
//! # Design
//!
//! The locator works on raw text, not on parsed JSON, because its output is a
//! line number that is handed to blame. Line numbers are 1-based to match the
//! convention blame uses.
//!
//! Exactly one line must match `"version"\s*:\s*"<non-empty>"`. Zero matches
//! and multiple matches are both errors; there is no partial result.
//!
//! # Example
//!
//! ```
//! use realease::core::locator::VersionLocator;
//!
//! let manifest = "{\n  \"name\": \"app\",\n  \"version\": \"1.4.0\"\n}\n";
//! let line = VersionLocator::new().unwrap().locate(manifest).unwrap();
//! assert_eq!(line.line_number, 3);
//! assert_eq!(line.raw_text, "  \"version\": \"1.4.0\"");
//! ```

use regex::Regex;
use thiserror::Error;

/// Field name the locator searches for by default.
pub const VERSION_KEY: &str = "version";

/// Errors from locating the version line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    /// No line carries the version field.
    #[error("cannot find \"{key}\" line in manifest")]
    Missing {
        /// The field that was searched for
        key: String,
    },

    /// More than one line looks like the version field.
    #[error("ambiguous \"{key}\" line in manifest: found on lines {}", format_lines(.lines))]
    Ambiguous {
        /// The field that was searched for
        key: String,
        /// 1-based numbers of every matching line
        lines: Vec<usize>,
    },

    /// The search pattern could not be built for the requested key.
    #[error("invalid version pattern: {0}")]
    InvalidPattern(String),
}

fn format_lines(lines: &[usize]) -> String {
    lines
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The located version line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionLine {
    /// 1-based line number within the manifest
    pub line_number: usize,
    /// The matched line, without its line terminator
    pub raw_text: String,
}

/// Finds the line carrying a quoted version field.
#[derive(Debug, Clone)]
pub struct VersionLocator {
    key: String,
    pattern: Regex,
}

impl VersionLocator {
    /// Create a locator for the standard `version` field.
    pub fn new() -> Result<Self, LocateError> {
        Self::for_key(VERSION_KEY)
    }

    /// Create a locator for an arbitrary field name.
    pub fn for_key(key: &str) -> Result<Self, LocateError> {
        let pattern = format!(r#""{}"\s*:\s*"[^"]+""#, regex::escape(key));
        let pattern =
            Regex::new(&pattern).map_err(|e| LocateError::InvalidPattern(e.to_string()))?;

        Ok(Self {
            key: key.to_string(),
            pattern,
        })
    }

    /// Locate the version line in `content`.
    ///
    /// # Errors
    ///
    /// - [`LocateError::Missing`] if no line matches
    /// - [`LocateError::Ambiguous`] if two or more lines match
    pub fn locate(&self, content: &str) -> Result<VersionLine, LocateError> {
        let matches: Vec<(usize, &str)> = content
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .enumerate()
            .filter(|(_, line)| self.pattern.is_match(line))
            .map(|(index, line)| (index + 1, line))
            .collect();

        match matches.as_slice() {
            [] => Err(LocateError::Missing {
                key: self.key.clone(),
            }),
            [(line_number, raw_text)] => Ok(VersionLine {
                line_number: *line_number,
                raw_text: (*raw_text).to_string(),
            }),
            many => Err(LocateError::Ambiguous {
                key: self.key.clone(),
                lines: many.iter().map(|(n, _)| *n).collect(),
            }),
        }
    }
}
