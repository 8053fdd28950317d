//! Document kind detection from the package media type

use std::fmt;

const MEDIA_TYPE_PREFIX: &str = "application/vnd.oasis.opendocument.";

/// Kind of OpenDocument package
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocumentKind {
    /// Writer document (odt)
    Text,
    /// Calc spreadsheet (ods)
    Spreadsheet,
    /// Impress presentation (odp)
    Presentation,
    /// Draw graphics (odg)
    Drawing,
    /// Any other media type, kept verbatim
    Other(String),
}

impl DocumentKind {
    /// Classify a media type such as `application/vnd.oasis.opendocument.text`.
    ///
    /// Templates (`...text-template`) map to the same kind as the document.
    pub fn from_media_type(media_type: &str) -> Self {
        let media_type = media_type.trim();
        let sub = media_type
            .strip_prefix(MEDIA_TYPE_PREFIX)
            .map(|s| s.strip_suffix("-template").unwrap_or(s));

        match sub {
            Some("text") => DocumentKind::Text,
            Some("spreadsheet") => DocumentKind::Spreadsheet,
            Some("presentation") => DocumentKind::Presentation,
            Some("graphics") => DocumentKind::Drawing,
            _ => DocumentKind::Other(media_type.to_string()),
        }
    }

    /// Conventional file extension
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            DocumentKind::Text => Some("odt"),
            DocumentKind::Spreadsheet => Some("ods"),
            DocumentKind::Presentation => Some("odp"),
            DocumentKind::Drawing => Some("odg"),
            DocumentKind::Other(_) => None,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Text => write!(f, "Writer document"),
            DocumentKind::Spreadsheet => write!(f, "Calc spreadsheet"),
            DocumentKind::Presentation => write!(f, "Impress presentation"),
            DocumentKind::Drawing => write!(f, "Draw graphics"),
            DocumentKind::Other(media_type) => write!(f, "unknown ({})", media_type),
        }
    }
}
