//! Shared helpers: build small but realistic ODT packages

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

pub const MIMETYPE: &str = "application/vnd.oasis.opendocument.text";

pub const PNG: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d, b'I', b'H', b'D', b'R', 0xde,
    0xad, 0xbe, 0xef,
];

const NS: &str = concat!(
    r#"xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" "#,
    r#"xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" "#,
    r#"xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" "#,
    r#"xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" "#,
    r#"xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" "#,
    r#"xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" "#,
    r#"xmlns:xlink="http://www.w3.org/1999/xlink" "#,
    r#"xmlns:loext="urn:org:documentfoundation:names:experimental:office:xmlns:loext:1.0""#
);

pub const MANIFEST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<manifest:manifest xmlns:manifest="urn:oasis:names:tc:opendocument:xmlns:manifest:1.0" manifest:version="1.3">
 <manifest:file-entry manifest:full-path="/" manifest:version="1.3" manifest:media-type="application/vnd.oasis.opendocument.text"/>
 <manifest:file-entry manifest:full-path="Pictures/img1.png" manifest:media-type="image/png"/>
 <manifest:file-entry manifest:full-path="content.xml" manifest:media-type="text/xml"/>
 <manifest:file-entry manifest:full-path="styles.xml" manifest:media-type="text/xml"/>
 <manifest:file-entry manifest:full-path="meta.xml" manifest:media-type="text/xml"/>
</manifest:manifest>"#;

pub const META: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-meta xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:meta="urn:oasis:names:tc:opendocument:xmlns:meta:1.0" xmlns:dc="http://purl.org/dc/elements/1.1/" office:version="1.3"><office:meta><meta:generator>LibreOffice/7.6.4.1</meta:generator><dc:title>Style test</dc:title><meta:document-statistic meta:paragraph-count="9"/></office:meta></office:document-meta>"#;

pub fn styles_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles {NS} office:version="1.3">
 <office:styles>
  <style:default-style style:family="paragraph"><style:paragraph-properties fo:hyphenation-ladder-count="no-limit"/></style:default-style>
  <style:style style:name="Standard" style:family="paragraph" style:class="text"/>
  <style:style style:name="Text_20_body" style:display-name="Text body" style:family="paragraph" style:parent-style-name="Standard"/>
  <style:style style:name="Header 1" style:family="paragraph" style:parent-style-name="Standard" style:next-style-name="Text_20_body"/>
  <style:style style:name="Preformatted_20_Text" style:display-name="Preformatted Text" style:family="paragraph" style:parent-style-name="Standard" style:class="html">
   <style:paragraph-properties fo:margin-top="0in" fo:margin-bottom="0in" loext:contextual-spacing="false"/>
   <style:text-properties style:font-name="Liberation Mono" fo:font-size="10pt"/>
  </style:style>
  <style:style style:name="Footer" style:family="paragraph" style:parent-style-name="Standard"/>
  <text:list-style style:name="Footer"><text:list-level-style-bullet text:level="1" text:bullet-char="•"/></text:list-style>
 </office:styles>
 <office:automatic-styles>
  <style:page-layout style:name="pm1"/>
 </office:automatic-styles>
 <office:master-styles>
  <style:master-page style:name="Standard" style:page-layout-name="pm1">
   <style:footer><text:p text:style-name="Footer">Page</text:p></style:footer>
  </style:master-page>
 </office:master-styles>
</office:document-styles>"#
    )
}

pub fn content_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content {NS} office:version="1.3">
 <office:automatic-styles>
  <style:style style:name="P1" style:family="paragraph" style:parent-style-name="Preformatted_20_Text"><style:text-properties fo:font-weight="bold"/></style:style>
  <style:style style:name="T1" style:family="text"><style:text-properties fo:font-weight="bold" style:font-weight-asian="bold" style:font-weight-complex="bold"/></style:style>
 </office:automatic-styles>
 <office:body>
  <office:text>
   <text:h text:style-name="Header 1" text:outline-level="1">Header 1</text:h>
   <text:p text:style-name="Text_20_body">Body with <text:span text:style-name="Header 1">a span</text:span> &amp; an <text:span text:style-name="T1">entity</text:span>.</text:p>
   <text:p text:style-name="Preformatted_20_Text">fn main() {{}}</text:p>
   <text:p text:style-name="P1">let x = 1;</text:p>
   <table:table table:name="Table1">
    <table:table-row>
     <table:table-cell><text:p text:style-name="Header 1">cell</text:p></table:table-cell>
    </table:table-row>
   </table:table>
   <text:list text:style-name="Footer"><text:list-item><text:p text:style-name="Footer">item</text:p></text:list-item></text:list>
   <text:p text:style-name="Text_20_body"><draw:frame draw:name="img1"><draw:image xlink:href="Pictures/img1.png"/></draw:frame></text:p>
   <text:p text:style-name="Header 10">not a match</text:p>
  </office:text>
 </office:body>
</office:document-content>"#
    )
}

/// A complete text document, entries in the order LibreOffice writes them
pub fn sample_odt() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let content = content_xml();
    let styles = styles_xml();
    let entries: [(&str, &[u8], SimpleFileOptions); 6] = [
        ("mimetype", MIMETYPE.as_bytes(), stored),
        ("Pictures/img1.png", PNG, stored),
        ("content.xml", content.as_bytes(), deflated),
        ("styles.xml", styles.as_bytes(), deflated),
        ("meta.xml", META.as_bytes(), deflated),
        ("META-INF/manifest.xml", MANIFEST.as_bytes(), deflated),
    ];
    for (name, data, options) in entries {
        zip.start_file(name, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Write the sample document into `dir`
pub fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("sample.odt");
    fs::write(&path, sample_odt()).unwrap();
    path
}

/// (name, compression, uncompressed bytes) of every entry, in archive order
pub fn entries(bytes: &[u8]) -> Vec<(String, CompressionMethod, Vec<u8>)> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut data = Vec::new();
            file.read_to_end(&mut data).unwrap();
            (file.name().to_string(), file.compression(), data)
        })
        .collect()
}

/// Uncompressed bytes of one entry
pub fn entry(bytes: &[u8], name: &str) -> Vec<u8> {
    entries(bytes)
        .into_iter()
        .find(|(n, _, _)| n == name)
        .map(|(_, _, data)| data)
        .unwrap()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
