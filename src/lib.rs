//! # odf-restyle
//!
//! Structure-preserving style renaming for OpenDocument packages
//! (ODT, ODS, ODP, ODG).
//!
//! ## Features
//!
//! - Lossless XML round-trip (unknown elements and vendor extensions are kept intact)
//! - Family-aware renaming of every attribute that names a style
//! - Untouched package entries are copied without recompression
//! - Direct bold/italic/super/subscript formatting turned into character styles
//! - Atomic commit: output appears only once fully written
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use odf_restyle::{RenameRequest, Restyler, StyleFamily};
//!
//! let request = RenameRequest::new("Preformatted_20_Text", "Code", StyleFamily::Paragraph);
//! let report = Restyler::default().rename("in.odt", "out.odt", &[request])?;
//!
//! if !report.committed {
//!     println!("nothing to rename");
//! }
//!
//! // List the styles of a document
//! let inventory = Restyler::default().inventory("in.odt")?;
//! for (family, styles) in inventory.by_family() {
//!     for style in styles {
//!         println!("{}: {} ({})", family, style.name, style.display_name);
//!     }
//! }
//!
//! // Replace hand-applied bold with a character style
//! let map = odf_restyle::styles::parse_mappings("Bold,Strong_20_Emphasis");
//! Restyler::default().convert_formatting("in.odt", "out.odt", &map)?;
//! ```

pub mod content;
pub mod error;
pub mod package;
pub mod restyle;
pub mod styles;
pub mod xml;

pub use error::{Error, Result};
pub use package::{Container, DocumentKind, DocumentMeta, EntryPath, Manifest};
pub use content::{ContentStats, TextBlock};
pub use restyle::{ConversionReport, RestyleOptions, RestyleReport, Restyler};
pub use styles::{
    ConversionOutcome, Formatting, FormattingMap, RenameRequest, RewriteOutcome, StyleFamily,
    StyleInfo, StyleInventory,
};
