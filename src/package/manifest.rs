//! Package manifest (`META-INF/manifest.xml`)

use crate::error::Result;
use crate::package::well_known;
use crate::xml::{self, XmlElement, MANIFEST};

/// Parsed manifest, entries in document order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    /// `manifest:version` of the root element
    pub version: Option<String>,
    entries: Vec<ManifestEntry>,
}

/// One `manifest:file-entry`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub full_path: String,
    pub media_type: String,
    pub version: Option<String>,
}

impl Manifest {
    /// Parse from raw manifest bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = xml::parse(bytes).map_err(|e| e.in_part(well_known::manifest().as_str()))?;
        Ok(Self::parse(&root))
    }

    /// Collect file entries from a parsed manifest tree
    pub fn parse(root: &XmlElement) -> Self {
        let entries = root
            .descendants()
            .filter(|e| e.is(MANIFEST, "file-entry"))
            .filter_map(|e| {
                let full_path = e.attr(MANIFEST, "full-path")?;
                Some(ManifestEntry {
                    full_path: full_path.to_string(),
                    media_type: e.attr(MANIFEST, "media-type").unwrap_or_default().to_string(),
                    version: e.attr(MANIFEST, "version").map(str::to_string),
                })
            })
            .collect();

        Self {
            version: root.attr(MANIFEST, "version").map(str::to_string),
            entries,
        }
    }

    /// Number of file entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the manifest lists no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Entry by full path
    pub fn get(&self, full_path: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.full_path == full_path)
    }

    /// Media type of the package itself (the `/` entry)
    pub fn media_type(&self) -> Option<&str> {
        self.get("/").map(|e| e.media_type.as_str())
    }
}
