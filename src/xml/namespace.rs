//! XML namespaces used in OpenDocument

/// Office namespace
pub const OFFICE: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
/// Style namespace
pub const STYLE: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";
/// Text namespace
pub const TEXT: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
/// Table namespace
pub const TABLE: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";
/// Drawing namespace
pub const DRAW: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";
/// XSL-FO compatible namespace
pub const FO: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";
/// Data style namespace
pub const NUMBER: &str = "urn:oasis:names:tc:opendocument:xmlns:datastyle:1.0";
/// Presentation namespace
pub const PRESENTATION: &str = "urn:oasis:names:tc:opendocument:xmlns:presentation:1.0";
/// Chart namespace
pub const CHART: &str = "urn:oasis:names:tc:opendocument:xmlns:chart:1.0";
/// SVG compatible namespace
pub const SVG: &str = "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0";
/// Meta namespace
pub const META: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";
/// Manifest namespace
pub const MANIFEST: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";
/// Dublin Core namespace
pub const DC: &str = "http://purl.org/dc/elements/1.1/";
/// XLink namespace
pub const XLINK: &str = "http://www.w3.org/1999/xlink";
/// LibreOffice extension namespace
pub const LOEXT: &str = "urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0";

/// Conventional prefix bindings, for building parts from scratch
pub fn document_namespaces() -> Vec<(&'static str, &'static str)> {
    vec![
        ("xmlns:office", OFFICE),
        ("xmlns:style", STYLE),
        ("xmlns:text", TEXT),
        ("xmlns:table", TABLE),
        ("xmlns:draw", DRAW),
        ("xmlns:fo", FO),
    ]
}
