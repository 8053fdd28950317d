//! Text and statistics of a document body

use crate::xml::{XmlElement, XmlNode, OFFICE, TABLE, TEXT};

/// Counts over `office:body`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContentStats {
    /// `text:p` elements, including those in tables, frames and notes
    pub paragraphs: usize,
    /// `text:h` elements
    pub headings: usize,
    /// `table:table` elements
    pub tables: usize,
    /// Whitespace-separated words of the body text
    pub words: usize,
}

impl ContentStats {
    /// Count the body of a parsed `content.xml`
    pub fn collect(content: &XmlElement) -> Self {
        let mut stats = Self::default();
        for element in body(content).descendants() {
            if element.is(TEXT, "p") {
                stats.paragraphs += 1;
            } else if element.is(TEXT, "h") {
                stats.headings += 1;
            } else if element.is(TABLE, "table") {
                stats.tables += 1;
            }
        }
        stats.words = extract_text(content).split_whitespace().count();
        stats
    }
}

/// Kind of a text block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// Heading with its outline level, 1 when not given
    Heading(u32),
}

/// One paragraph or heading, in document order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    /// Paragraph style it references, if any
    pub style: Option<String>,
    pub text: String,
}

/// Paragraphs and headings of the body, with their text.
///
/// Blocks nested in other blocks (frames, notes) come after their container.
pub fn blocks(content: &XmlElement) -> Vec<TextBlock> {
    body(content)
        .descendants()
        .filter_map(|element| {
            let kind = if element.is(TEXT, "p") {
                BlockKind::Paragraph
            } else if element.is(TEXT, "h") {
                let level = element
                    .attr(TEXT, "outline-level")
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(1);
                BlockKind::Heading(level)
            } else {
                return None;
            };

            let mut text = String::new();
            collect_text(element, &mut text);
            Some(TextBlock {
                kind,
                style: element.attr(TEXT, "style-name").map(str::to_string),
                text,
            })
        })
        .collect()
}

/// All text of the body on one line, runs of whitespace collapsed to a
/// single space
pub fn extract_text(content: &XmlElement) -> String {
    let mut text = String::new();
    collect_text(body(content), &mut text);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn body(content: &XmlElement) -> &XmlElement {
    content.child(OFFICE, "body").unwrap_or(content)
}

/// Text of an element with `text:s`, `text:tab` and `text:line-break`
/// expanded; paragraphs end with a newline
fn collect_text(element: &XmlElement, out: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
            XmlNode::Element(e) if e.is(TEXT, "s") => {
                let count = e.attr(TEXT, "c").and_then(|c| c.parse().ok()).unwrap_or(1);
                out.extend(std::iter::repeat(' ').take(count));
            }
            XmlNode::Element(e) if e.is(TEXT, "tab") => out.push('\t'),
            XmlNode::Element(e) if e.is(TEXT, "line-break") => out.push('\n'),
            XmlNode::Element(e) => {
                collect_text(e, out);
                if e.is(TEXT, "p") || e.is(TEXT, "h") {
                    out.push('\n');
                }
            }
            XmlNode::Comment(_) | XmlNode::ProcessingInstruction(_) => {}
        }
    }
}
