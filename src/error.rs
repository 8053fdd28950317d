//! Error types for odf-restyle

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(
        "Malformed XML{}: {message}",
        .part.as_deref().map(|p| format!(" in {}", p)).unwrap_or_default()
    )]
    MalformedXml {
        part: Option<String>,
        message: String,
    },

    #[error("Container not found: {}", .0.display())]
    ContainerNotFound(PathBuf),

    #[error("Container '{}' is corrupt: {message}", .path.display())]
    ContainerCorrupt { path: PathBuf, message: String },

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Invalid entry path: {0}")]
    InvalidEntryPath(String),

    #[error("No style named '{0}' found")]
    NoMatchingStyle(String),

    #[error("Unknown style family: {0}")]
    InvalidFamily(String),

    #[error("Unknown formatting: {0}")]
    InvalidFormatting(String),

    #[error("Failed to write '{}': {message}", .path.display())]
    Write { path: PathBuf, message: String },
}

impl Error {
    /// Build a `MalformedXml` error not yet attributed to a package entry
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedXml {
            part: None,
            message: message.into(),
        }
    }

    /// Attribute a `MalformedXml` error to the entry it came from
    pub(crate) fn in_part(self, name: &str) -> Self {
        match self {
            Error::MalformedXml { part: None, message } => Error::MalformedXml {
                part: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
