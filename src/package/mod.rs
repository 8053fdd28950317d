//! OpenDocument package (ZIP container) handling
//!
//! Reads named entries, writes replaced entries and copies everything else
//! through unchanged.

mod container;
mod entry_path;
mod kind;
mod manifest;
mod meta;

pub use container::{Container, Replacements};
pub use entry_path::{well_known, EntryPath};
pub use kind::DocumentKind;
pub use manifest::{Manifest, ManifestEntry};
pub use meta::DocumentMeta;
