//! Style families

use crate::error::{Error, Result};
use std::fmt;

/// Namespace partitioning style names by the content they apply to.
///
/// Names are unique only within a family: a paragraph style and a list
/// style may both be called `Header`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleFamily {
    Paragraph,
    Text,
    Section,
    Table,
    TableColumn,
    TableRow,
    TableCell,
    Graphic,
    Presentation,
    DrawingPage,
    Chart,
    Ruby,
    /// `text:list-style`
    List,
    /// `style:page-layout`
    PageLayout,
    /// `style:master-page`
    MasterPage,
    /// `number:*-style`
    DataStyle,
}

impl StyleFamily {
    /// Token as used in `style:family` (or a descriptive token for families
    /// that are defined by their element instead)
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleFamily::Paragraph => "paragraph",
            StyleFamily::Text => "text",
            StyleFamily::Section => "section",
            StyleFamily::Table => "table",
            StyleFamily::TableColumn => "table-column",
            StyleFamily::TableRow => "table-row",
            StyleFamily::TableCell => "table-cell",
            StyleFamily::Graphic => "graphic",
            StyleFamily::Presentation => "presentation",
            StyleFamily::DrawingPage => "drawing-page",
            StyleFamily::Chart => "chart",
            StyleFamily::Ruby => "ruby",
            StyleFamily::List => "list",
            StyleFamily::PageLayout => "page-layout",
            StyleFamily::MasterPage => "master-page",
            StyleFamily::DataStyle => "data-style",
        }
    }

    /// Parse a family token, `None` if unknown
    pub fn parse(token: &str) -> Option<Self> {
        let family = match token.trim() {
            "paragraph" => StyleFamily::Paragraph,
            "text" => StyleFamily::Text,
            "section" => StyleFamily::Section,
            "table" => StyleFamily::Table,
            "table-column" => StyleFamily::TableColumn,
            "table-row" => StyleFamily::TableRow,
            "table-cell" => StyleFamily::TableCell,
            "graphic" => StyleFamily::Graphic,
            "presentation" => StyleFamily::Presentation,
            "drawing-page" => StyleFamily::DrawingPage,
            "chart" => StyleFamily::Chart,
            "ruby" => StyleFamily::Ruby,
            "list" => StyleFamily::List,
            "page-layout" => StyleFamily::PageLayout,
            "master-page" => StyleFamily::MasterPage,
            "data-style" => StyleFamily::DataStyle,
            _ => return None,
        };
        Some(family)
    }
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StyleFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        StyleFamily::parse(s).ok_or_else(|| Error::InvalidFamily(s.to_string()))
    }
}
