//! Generic XML document tree with round-trip preservation

mod namespace;
mod node;

pub use namespace::*;
pub use node::{parse, serialize, Descendants, XmlAttribute, XmlElement, XmlName, XmlNode};
