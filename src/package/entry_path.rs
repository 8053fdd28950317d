//! Entry path handling for OpenDocument packages

use crate::error::{Error, Result};
use std::fmt;

/// Path of an entry inside a package ZIP.
///
/// Entry paths are POSIX-style and relative to the package root, e.g.
/// `content.xml` or `Pictures/img1.png`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryPath {
    path: String,
}

impl EntryPath {
    /// Create an EntryPath from a string.
    ///
    /// A leading '/' (as written in some manifests) and a trailing '/'
    /// (directory entries) are stripped.
    pub fn new(path: &str) -> Result<Self> {
        let normalized = path.trim().trim_start_matches('/').trim_end_matches('/');

        if normalized.is_empty() {
            return Err(Error::InvalidEntryPath(format!("'{}': empty path", path)));
        }

        if normalized.contains('\\') {
            return Err(Error::InvalidEntryPath(format!(
                "'{}': contains a backslash",
                path
            )));
        }

        if normalized
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return Err(Error::InvalidEntryPath(format!(
                "'{}': empty, '.' or '..' segment",
                path
            )));
        }

        Ok(Self {
            path: normalized.to_string(),
        })
    }

    /// Create EntryPath without validation (for internal use)
    pub(crate) fn from_static(path: &'static str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for EntryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

impl std::str::FromStr for EntryPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        EntryPath::new(s)
    }
}

/// Well-known entry paths
pub mod well_known {
    use super::EntryPath;

    pub fn mimetype() -> EntryPath {
        EntryPath::from_static("mimetype")
    }

    pub fn content() -> EntryPath {
        EntryPath::from_static("content.xml")
    }

    pub fn styles() -> EntryPath {
        EntryPath::from_static("styles.xml")
    }

    pub fn meta() -> EntryPath {
        EntryPath::from_static("meta.xml")
    }

    pub fn manifest() -> EntryPath {
        EntryPath::from_static("META-INF/manifest.xml")
    }
}
