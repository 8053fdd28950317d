//! Generic XML tree for lossless round-trip of OpenDocument parts

use quick_xml::escape::minimal_escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::BufRead;

use crate::error::{Error, Result};

/// Qualified XML name.
///
/// `raw` is the name exactly as written in the source (prefix included) and is
/// what gets serialized. `namespace` is the URI the prefix was bound to when
/// the part was parsed; matching always goes through it, never the prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlName {
    /// Name as written, e.g. `text:style-name`
    pub raw: String,
    /// Resolved namespace URI, if the name was bound
    pub namespace: Option<String>,
}

impl XmlName {
    /// Create an unbound name
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            namespace: None,
        }
    }

    /// Create a name bound to a namespace URI
    pub fn bound(raw: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            namespace: Some(namespace.into()),
        }
    }

    /// Prefix part of the raw name
    pub fn prefix(&self) -> Option<&str> {
        self.raw.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Local part of the raw name
    pub fn local_name(&self) -> &str {
        self.raw
            .split_once(':')
            .map(|(_, local)| local)
            .unwrap_or(&self.raw)
    }

    /// Check (namespace URI, local name) identity
    pub fn matches(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name() == local
    }

    /// Namespace declarations (`xmlns`, `xmlns:*`)
    pub fn is_namespace_declaration(&self) -> bool {
        self.raw == "xmlns" || self.raw.starts_with("xmlns:")
    }
}

/// One attribute of an element
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    /// Unescaped value
    pub value: String,
}

/// Child content of an element, kept in document order
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    /// Element node
    Element(XmlElement),
    /// Text run (unescaped)
    Text(String),
    /// CDATA section
    CData(String),
    /// Comment node
    Comment(String),
    /// Processing instruction, target and content as written
    ProcessingInstruction(String),
}

/// XML element with ordered attributes and mixed children
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    pub name: XmlName,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create a new empty element with an unbound name
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_name(XmlName::new(name))
    }

    /// Create a new empty element
    pub fn with_name(name: XmlName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute {
            name: XmlName::new(name),
            value: value.into(),
        });
        self
    }

    /// Add a child element
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Add a text child
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Check element identity by (namespace URI, local name)
    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.name.matches(namespace, local)
    }

    /// Attribute value by (namespace URI, local name)
    pub fn attr(&self, namespace: &str, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.matches(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// Attribute value by name as written
    pub fn attr_raw(&self, raw: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.raw == raw)
            .map(|a| a.value.as_str())
    }

    /// Replace the value of an attribute in place, or append it
    pub fn set_attr(&mut self, name: XmlName, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name.raw == name.raw) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(XmlAttribute { name, value }),
        }
    }

    /// Prefix this element binds to `namespace` through an `xmlns:*`
    /// declaration
    pub fn declared_prefix(&self, namespace: &str) -> Option<&str> {
        self.attributes
            .iter()
            .filter(|a| a.name.is_namespace_declaration() && a.value == namespace)
            .find_map(|a| a.name.raw.strip_prefix("xmlns:"))
    }

    /// Direct child elements
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First direct child element with the given identity
    pub fn child(&self, namespace: &str, local: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.is(namespace, local))
    }

    /// Mutable access to the first direct child element with the given identity
    pub fn child_mut(&mut self, namespace: &str, local: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|c| match c {
            XmlNode::Element(e) if e.is(namespace, local) => Some(e),
            _ => None,
        })
    }

    /// This element and all descendant elements, pre-order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Concatenated text of all descendant text runs
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                XmlNode::Element(e) => e.collect_text(out),
                XmlNode::Text(t) | XmlNode::CData(t) => out.push_str(t),
                XmlNode::Comment(_) | XmlNode::ProcessingInstruction(_) => {}
            }
        }
    }

    /// Write element to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.raw.as_str());
        for attr in &self.attributes {
            let value = escape_attribute_value(&attr.value);
            start.push_attribute(Attribute::from((
                attr.name.raw.as_bytes(),
                value.as_bytes(),
            )));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
        } else {
            writer.write_event(Event::Start(start))?;
            for child in &self.children {
                child.write_to(writer)?;
            }
            writer.write_event(Event::End(BytesEnd::new(self.name.raw.as_str())))?;
        }

        Ok(())
    }
}

impl XmlNode {
    /// Write node to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        match self {
            XmlNode::Element(e) => e.write_to(writer),
            XmlNode::Text(t) => {
                let escaped = escape_text(t);
                writer.write_event(Event::Text(BytesText::from_escaped(escaped)))?;
                Ok(())
            }
            XmlNode::CData(c) => {
                writer.write_event(Event::CData(BytesCData::new(c.as_str())))?;
                Ok(())
            }
            XmlNode::Comment(c) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?;
                Ok(())
            }
            XmlNode::ProcessingInstruction(p) => {
                writer.write_event(Event::PI(BytesPI::new(p.as_str())))?;
                Ok(())
            }
        }
    }
}

/// Pre-order iterator over an element and its descendant elements
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.child_elements().rev());
        Some(next)
    }
}

/// Parse one XML part into its root element.
///
/// Every opened element must be closed; premature end of input, stray end
/// tags, a second root element and non-whitespace text outside the root are
/// all reported as [`Error::MalformedXml`].
pub fn parse(bytes: &[u8]) -> Result<XmlElement> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            Error::malformed(format!("{} (at byte {})", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                let element = element_from_start(&reader, &e)?;
                stack.push(element);
            }
            Event::Empty(e) => {
                let element = element_from_start(&reader, &e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::malformed("end tag without matching start tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| Error::malformed(e.to_string()))?;
                if !text.is_empty() {
                    push_content(&mut stack, XmlNode::Text(text.into_owned()))?;
                }
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                push_content(&mut stack, XmlNode::CData(text))?;
            }
            Event::Comment(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                push_content(&mut stack, XmlNode::Comment(text))?;
            }
            Event::PI(p) => {
                let text = String::from_utf8_lossy(&p).into_owned();
                push_content(&mut stack, XmlNode::ProcessingInstruction(text))?;
            }
            Event::Eof => break,
            // The declaration is always re-emitted by `serialize`
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(Error::malformed(format!(
            "unexpected end of input: <{}> is never closed",
            open.name.raw
        )));
    }

    root.ok_or_else(|| Error::malformed("document has no root element"))
}

/// Serialize a tree back to bytes, with a leading XML declaration
pub fn serialize(root: &XmlElement) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.get_mut().push(b'\n');
    root.write_to(&mut writer)?;
    Ok(writer.into_inner())
}

fn element_from_start<R: BufRead>(
    reader: &NsReader<R>,
    start: &BytesStart,
) -> Result<XmlElement> {
    let (namespace, _) = reader.resolve_element(start.name());
    let name = XmlName {
        raw: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        namespace: bound_namespace(namespace),
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::malformed(e.to_string()))?;
        let (namespace, _) = reader.resolve_attribute(attr.key);
        let value = attr
            .unescape_value()
            .map_err(|e| Error::malformed(e.to_string()))?;
        attributes.push(XmlAttribute {
            name: XmlName {
                raw: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                namespace: bound_namespace(namespace),
            },
            value: value.into_owned(),
        });
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn bound_namespace(result: ResolveResult) -> Option<String> {
    match result {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    }
}

/// Hand a completed element to its parent, or make it the root
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::malformed(format!(
            "second root element <{}>",
            element.name.raw
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_content(stack: &mut [XmlElement], node: XmlNode) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        }
        None => match node {
            XmlNode::Text(t) if !t.trim().is_empty() => {
                Err(Error::malformed("text content outside the root element"))
            }
            other => {
                log::debug!("dropping top-level node outside the root: {:?}", other);
                Ok(())
            }
        },
    }
}

/// Escape a text run with the fewest entities that re-parse to the same
/// string: `&` and `<` always, `>` only where it would close `]]>`.
fn escape_text(text: &str) -> Cow<'_, str> {
    let escaped = minimal_escape(text);
    if escaped.contains("]]>") {
        Cow::Owned(escaped.replace("]]>", "]]&gt;"))
    } else {
        escaped
    }
}

/// Escape an attribute value for a double-quoted attribute so that it
/// re-parses to the same string.
///
/// Literal tab/newline/CR must be written as character references, otherwise
/// attribute-value normalization turns them into spaces on the next read.
fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    let escaped = minimal_escape(value);
    if escaped.contains(['"', '\t', '\n', '\r']) {
        Cow::Owned(
            escaped
                .replace('"', "&quot;")
                .replace('\t', "&#9;")
                .replace('\n', "&#10;")
                .replace('\r', "&#13;"),
        )
    } else {
        escaped
    }
}
