//! Style naming: families, the catalog of style-name attributes, the rename
//! engine, the style inventory and direct formatting conversion

pub mod catalog;
mod family;
mod formatting;
mod inventory;
mod rewrite;

pub use family::StyleFamily;
pub use formatting::{
    convert_direct_formatting, parse_mappings, ConversionOutcome, CreatedStyle, Formatting,
    FormattingMap,
};
pub use inventory::{StyleInfo, StyleInventory, StyleOrigin};
pub use rewrite::{rewrite, rewrite_all, RenameRequest, RewriteOutcome};
