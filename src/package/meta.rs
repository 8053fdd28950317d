//! Document metadata (`meta.xml`)

use crate::error::Result;
use crate::package::well_known;
use crate::xml::{self, XmlElement, DC, META, OFFICE};
use std::collections::BTreeMap;

/// Metadata of an OpenDocument package
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub creator: Option<String>,
    pub initial_creator: Option<String>,
    pub generator: Option<String>,
    pub language: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub editing_cycles: Option<u32>,
    pub editing_duration: Option<String>,
    pub keywords: Vec<String>,
    /// Attributes of `meta:document-statistic`, e.g. `page-count`
    pub statistics: BTreeMap<String, u64>,
}

impl DocumentMeta {
    /// Parse from raw `meta.xml` bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let root = xml::parse(bytes).map_err(|e| e.in_part(well_known::meta().as_str()))?;
        Ok(Self::parse(&root))
    }

    /// Read metadata from a parsed `office:document-meta` tree
    pub fn parse(root: &XmlElement) -> Self {
        let mut meta = Self::default();
        let Some(container) = root.child(OFFICE, "meta") else {
            return meta;
        };

        for elem in container.child_elements() {
            let text = || Some(elem.text().trim().to_string()).filter(|t| !t.is_empty());
            let ns = elem.name.namespace.as_deref().unwrap_or_default();

            match (ns, elem.name.local_name()) {
                (DC, "title") => meta.title = text(),
                (DC, "subject") => meta.subject = text(),
                (DC, "description") => meta.description = text(),
                (DC, "creator") => meta.creator = text(),
                (DC, "date") => meta.modification_date = text(),
                (DC, "language") => meta.language = text(),
                (META, "initial-creator") => meta.initial_creator = text(),
                (META, "generator") => meta.generator = text(),
                (META, "creation-date") => meta.creation_date = text(),
                (META, "editing-cycles") => {
                    meta.editing_cycles = text().and_then(|t| t.parse().ok())
                }
                (META, "editing-duration") => meta.editing_duration = text(),
                (META, "keyword") => meta.keywords.extend(text()),
                (META, "document-statistic") => {
                    for attr in &elem.attributes {
                        if let Ok(value) = attr.value.parse() {
                            meta.statistics
                                .insert(attr.name.local_name().to_string(), value);
                        }
                    }
                }
                _ => {}
            }
        }

        meta
    }

    /// A single statistic, e.g. `"word-count"`
    pub fn statistic(&self, name: &str) -> Option<u64> {
        self.statistics.get(name).copied()
    }
}
