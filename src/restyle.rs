//! Restyle transaction
//!
//! Opens a package, renames styles across its XML parts (or converts direct
//! formatting to character styles) and commits the result, or writes nothing
//! when no part changed.

use crate::content::{self, ContentStats};
use crate::error::{Error, Result};
use crate::package::{well_known, Container, DocumentKind, EntryPath, Replacements};
use crate::styles::{
    convert_direct_formatting, rewrite, ConversionOutcome, FormattingMap, RenameRequest,
    RewriteOutcome, StyleInventory,
};
use crate::xml::{self, XmlElement};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::io::{Read, Seek};
use std::path::Path;

/// Which parts to process and how strictly
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestyleOptions {
    /// Parts that must exist; a missing one aborts the transaction
    pub required_parts: Vec<EntryPath>,
    /// Parts processed when present
    pub optional_parts: Vec<EntryPath>,
    /// Fill in the family of family-less requests from the inventory
    pub infer_family: bool,
    /// Treat a transaction that changes nothing as an error
    pub fail_on_no_match: bool,
}

impl Default for RestyleOptions {
    fn default() -> Self {
        Self {
            required_parts: vec![well_known::content()],
            optional_parts: vec![well_known::styles(), well_known::meta()],
            infer_family: true,
            fail_on_no_match: false,
        }
    }
}

impl RestyleOptions {
    /// Also process `path` when the package has it
    pub fn with_optional_part(mut self, path: EntryPath) -> Self {
        self.optional_parts.push(path);
        self
    }

    /// Require `path` to be present
    pub fn with_required_part(mut self, path: EntryPath) -> Self {
        self.required_parts.push(path);
        self
    }

    pub fn infer_family(mut self, infer: bool) -> Self {
        self.infer_family = infer;
        self
    }

    pub fn fail_on_no_match(mut self, fail: bool) -> Self {
        self.fail_on_no_match = fail;
        self
    }
}

/// Result of a restyle transaction
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestyleReport {
    /// Outcome per processed part
    pub parts: BTreeMap<EntryPath, RewriteOutcome>,
    /// Requests whose style is not defined in the package
    pub missing: Vec<RenameRequest>,
    /// Whether a new package was written
    pub committed: bool,
}

impl RestyleReport {
    /// Whether any part changed
    pub fn changed(&self) -> bool {
        self.parts.values().any(RewriteOutcome::changed)
    }

    /// Outcome for one part
    pub fn outcome(&self, path: &EntryPath) -> Option<&RewriteOutcome> {
        self.parts.get(path)
    }

    /// Parts that changed
    pub fn changed_parts(&self) -> impl Iterator<Item = &EntryPath> {
        self.parts
            .iter()
            .filter(|(_, outcome)| outcome.changed())
            .map(|(path, _)| path)
    }

    /// Sum over all parts
    pub fn total(&self) -> RewriteOutcome {
        let mut total = RewriteOutcome::default();
        for outcome in self.parts.values() {
            total += *outcome;
        }
        total
    }
}

/// Result of a direct formatting conversion
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub outcome: ConversionOutcome,
    /// Whether a new package was written
    pub committed: bool,
}

/// Runs rename transactions over packages
#[derive(Clone, Debug, Default)]
pub struct Restyler {
    options: RestyleOptions,
}

impl Restyler {
    pub fn new(options: RestyleOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RestyleOptions {
        &self.options
    }

    /// Rename styles in the package at `input` and write the result to
    /// `output`.
    ///
    /// `output` may equal `input`. Nothing is written when no part changes.
    pub fn rename<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        requests: &[RenameRequest],
    ) -> Result<RestyleReport> {
        let mut container = Container::open(input)?;
        let (mut report, replacements) = self.plan(&mut container, requests)?;

        if replacements.is_empty() {
            info!("no style references matched, nothing written");
            return Ok(report);
        }

        container.commit(&replacements, output)?;
        report.committed = true;
        Ok(report)
    }

    /// Rename styles in an in-memory package.
    ///
    /// Returns the new package bytes, or `None` when no part changed.
    pub fn rename_bytes(
        &self,
        bytes: Vec<u8>,
        requests: &[RenameRequest],
    ) -> Result<(RestyleReport, Option<Vec<u8>>)> {
        let mut container = Container::from_bytes(bytes)?;
        let (mut report, replacements) = self.plan(&mut container, requests)?;

        if replacements.is_empty() {
            return Ok((report, None));
        }

        let output = container.to_bytes(&replacements)?;
        report.committed = true;
        Ok((report, Some(output)))
    }

    /// Apply the requests to the parts of `container` without writing
    /// anything; returns the serialized parts that changed
    pub fn plan<R: Read + Seek>(
        &self,
        container: &mut Container<R>,
        requests: &[RenameRequest],
    ) -> Result<(RestyleReport, Replacements)> {
        if let Some(media_type) = container.mimetype()? {
            debug!("package type: {}", DocumentKind::from_media_type(&media_type));
        }

        let mut parts = self.load_parts(container)?;
        let inventory = build_inventory(&parts);
        let mut report = RestyleReport::default();

        for request in requests {
            let request = self.resolve(request, &inventory, &mut report);
            for (path, tree) in parts.iter_mut() {
                let outcome = rewrite(tree, &request);
                *report.parts.entry(path.clone()).or_default() += outcome;
            }
        }

        let mut replacements = Replacements::new();
        for (path, tree) in &parts {
            if report.outcome(path).is_some_and(RewriteOutcome::changed) {
                replacements.insert(path.clone(), xml::serialize(tree)?);
            }
        }

        if replacements.is_empty() && self.options.fail_on_no_match {
            let names: Vec<_> = requests.iter().map(|r| r.old_name.as_str()).collect();
            return Err(Error::NoMatchingStyle(names.join(", ")));
        }

        Ok((report, replacements))
    }

    /// Replace direct formatting in the package at `input` with the
    /// character styles of `map` and write the result to `output`.
    ///
    /// `output` may equal `input`. Nothing is written when nothing matches.
    pub fn convert_formatting<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
        map: &FormattingMap,
    ) -> Result<ConversionReport> {
        let mut container = Container::open(input)?;
        let (outcome, replacements) = self.plan_formatting(&mut container, map)?;
        let mut report = ConversionReport {
            outcome,
            committed: false,
        };

        if replacements.is_empty() {
            info!("no direct formatting matched, nothing written");
            return Ok(report);
        }

        container.commit(&replacements, output)?;
        report.committed = true;
        Ok(report)
    }

    /// Convert direct formatting in an in-memory package.
    ///
    /// Returns the new package bytes, or `None` when nothing changed.
    pub fn convert_formatting_bytes(
        &self,
        bytes: Vec<u8>,
        map: &FormattingMap,
    ) -> Result<(ConversionReport, Option<Vec<u8>>)> {
        let mut container = Container::from_bytes(bytes)?;
        let (outcome, replacements) = self.plan_formatting(&mut container, map)?;
        let mut report = ConversionReport {
            outcome,
            committed: false,
        };

        if replacements.is_empty() {
            return Ok((report, None));
        }

        let output = container.to_bytes(&replacements)?;
        report.committed = true;
        Ok((report, Some(output)))
    }

    /// Convert direct formatting in `content.xml` without writing anything;
    /// returns the serialized parts that changed
    pub fn plan_formatting<R: Read + Seek>(
        &self,
        container: &mut Container<R>,
        map: &FormattingMap,
    ) -> Result<(ConversionOutcome, Replacements)> {
        let content_path = well_known::content();
        let styles_path = well_known::styles();

        let mut content = parse_part(&content_path, &container.read_entry(&content_path)?)?;
        let mut styles = match container.read_optional_entry(&styles_path)? {
            Some(bytes) => Some(parse_part(&styles_path, &bytes)?),
            None => None,
        };

        let outcome = convert_direct_formatting(&mut content, styles.as_mut(), map);

        let mut replacements = Replacements::new();
        if outcome.changed() {
            replacements.insert(content_path, xml::serialize(&content)?);
        }
        if let Some(styles) = styles.filter(|_| outcome.touches_styles()) {
            replacements.insert(styles_path, xml::serialize(&styles)?);
        }

        if replacements.is_empty() && self.options.fail_on_no_match {
            let names: Vec<_> = map.values().map(String::as_str).collect();
            return Err(Error::NoMatchingStyle(names.join(", ")));
        }

        Ok((outcome, replacements))
    }

    /// Paragraph, heading, table and word counts of the package at `input`
    pub fn stats<P: AsRef<Path>>(&self, input: P) -> Result<ContentStats> {
        let content = read_content(input)?;
        Ok(ContentStats::collect(&content))
    }

    /// Body text of the package at `input`, whitespace collapsed
    pub fn text<P: AsRef<Path>>(&self, input: P) -> Result<String> {
        let content = read_content(input)?;
        Ok(content::extract_text(&content))
    }

    /// Inventory of the styles defined in the package at `input`
    pub fn inventory<P: AsRef<Path>>(&self, input: P) -> Result<StyleInventory> {
        let mut container = Container::open(input)?;
        let parts = self.load_parts(&mut container)?;
        Ok(build_inventory(&parts))
    }

    fn load_parts<R: Read + Seek>(
        &self,
        container: &mut Container<R>,
    ) -> Result<Vec<(EntryPath, XmlElement)>> {
        let mut parts = Vec::new();

        for path in &self.options.required_parts {
            let bytes = container.read_entry(path)?;
            parts.push((path.clone(), parse_part(path, &bytes)?));
        }
        for path in &self.options.optional_parts {
            if let Some(bytes) = container.read_optional_entry(path)? {
                parts.push((path.clone(), parse_part(path, &bytes)?));
            }
        }

        Ok(parts)
    }

    fn resolve(
        &self,
        request: &RenameRequest,
        inventory: &StyleInventory,
        report: &mut RestyleReport,
    ) -> RenameRequest {
        let mut request = request.clone();
        if self.options.infer_family {
            request.infer_family(inventory);
        }
        if request.family.is_none() {
            warn!(
                "renaming '{}' -> '{}' across all style families",
                request.old_name, request.new_name
            );
        }

        if !inventory.contains(&request.old_name, request.family) {
            match request.family {
                Some(family) => warn!("no {} style named '{}'", family, request.old_name),
                None => warn!("no style named '{}'", request.old_name),
            }
            report.missing.push(request.clone());
        }

        request
    }
}

fn read_content<P: AsRef<Path>>(input: P) -> Result<XmlElement> {
    let mut container = Container::open(input)?;
    let path = well_known::content();
    let bytes = container.read_entry(&path)?;
    parse_part(&path, &bytes)
}

fn parse_part(path: &EntryPath, bytes: &[u8]) -> Result<XmlElement> {
    xml::parse(bytes).map_err(|e| e.in_part(path.as_str()))
}

fn build_inventory(parts: &[(EntryPath, XmlElement)]) -> StyleInventory {
    let find = |wanted: EntryPath| {
        parts
            .iter()
            .find(|(path, _)| *path == wanted)
            .map(|(_, tree)| tree)
    };
    StyleInventory::build(find(well_known::styles()), find(well_known::content()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles::{Formatting, StyleFamily};
    use pretty_assertions::assert_eq;
    use std::io::{Cursor, Write};
    use zip::write::{SimpleFileOptions, ZipWriter};

    const CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:body><office:text><text:p text:style-name="Body">x</text:p></office:text></office:body>
</office:document-content>"#;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0">
  <office:styles><style:style style:name="Body" style:family="paragraph"/></office:styles>
</office:document-styles>"#;

    fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_rename_reports_per_part() {
        let bytes = package(&[("content.xml", CONTENT), ("styles.xml", STYLES)]);
        let restyler = Restyler::default();

        let request = RenameRequest::new("Body", "Text", StyleFamily::Paragraph);
        let (report, output) = restyler.rename_bytes(bytes, &[request]).unwrap();

        assert!(report.committed);
        assert!(output.is_some());
        assert_eq!(report.outcome(&well_known::content()).unwrap().references, 1);
        assert_eq!(report.outcome(&well_known::styles()).unwrap().definitions, 1);
        assert_eq!(report.changed_parts().count(), 2);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_family_inferred() {
        let bytes = package(&[("content.xml", CONTENT), ("styles.xml", STYLES)]);

        let request = RenameRequest::all_families("Body", "Text");
        let mut container = Container::from_bytes(bytes).unwrap();
        let (report, replacements) = Restyler::default().plan(&mut container, &[request]).unwrap();

        assert_eq!(report.total().total(), 2);
        assert_eq!(replacements.len(), 2);
    }

    #[test]
    fn test_nothing_to_do() {
        let bytes = package(&[("content.xml", CONTENT), ("styles.xml", STYLES)]);

        let request = RenameRequest::new("Nope", "Other", StyleFamily::Paragraph);
        let (report, output) = Restyler::default().rename_bytes(bytes, &[request.clone()]).unwrap();

        assert!(!report.committed);
        assert!(!report.changed());
        assert!(output.is_none());
        assert_eq!(report.missing, vec![request]);
    }

    #[test]
    fn test_fail_on_no_match() {
        let bytes = package(&[("content.xml", CONTENT)]);
        let restyler = Restyler::new(RestyleOptions::default().fail_on_no_match(true));

        let request = RenameRequest::new("Nope", "Other", StyleFamily::Paragraph);
        let err = restyler.rename_bytes(bytes, &[request]).unwrap_err();
        assert!(matches!(err, Error::NoMatchingStyle(name) if name == "Nope"));
    }

    #[test]
    fn test_content_is_required() {
        let bytes = package(&[("styles.xml", STYLES)]);

        let request = RenameRequest::new("Body", "Text", StyleFamily::Paragraph);
        let err = Restyler::default().rename_bytes(bytes, &[request]).unwrap_err();
        assert!(matches!(err, Error::EntryNotFound(ref name) if name == "content.xml"));
    }

    #[test]
    fn test_malformed_part_aborts() {
        let bytes = package(&[
            ("content.xml", CONTENT),
            ("styles.xml", "<office:document-styles>"),
        ]);

        let request = RenameRequest::new("Body", "Text", StyleFamily::Paragraph);
        let err = Restyler::default().rename_bytes(bytes, &[request]).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedXml { part: Some(ref part), .. } if part == "styles.xml"
        ));
    }

    const FORMATTED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0">
  <office:automatic-styles><style:style style:name="T1" style:family="text"><style:text-properties fo:font-style="italic"/></style:style></office:automatic-styles>
  <office:body><office:text><text:p text:style-name="Body">x <text:span text:style-name="T1">y</text:span></text:p></office:text></office:body>
</office:document-content>"#;

    #[test]
    fn test_convert_formatting_parts() {
        let bytes = package(&[("content.xml", FORMATTED), ("styles.xml", STYLES)]);
        let map = FormattingMap::from([(Formatting::Italic, "Emphasis".to_string())]);

        let mut container = Container::from_bytes(bytes).unwrap();
        let (outcome, replacements) = Restyler::default()
            .plan_formatting(&mut container, &map)
            .unwrap();

        assert_eq!(outcome.total(), 1);
        assert!(outcome.touches_styles());
        assert_eq!(
            replacements.keys().cloned().collect::<Vec<_>>(),
            vec![well_known::content(), well_known::styles()]
        );
    }

    #[test]
    fn test_convert_formatting_nothing_to_do() {
        let bytes = package(&[("content.xml", CONTENT), ("styles.xml", STYLES)]);
        let map = FormattingMap::from([(Formatting::Bold, "Strong".to_string())]);

        let (report, output) = Restyler::default()
            .convert_formatting_bytes(bytes.clone(), &map)
            .unwrap();
        assert!(!report.committed);
        assert!(output.is_none());

        let restyler = Restyler::new(RestyleOptions::default().fail_on_no_match(true));
        let err = restyler.convert_formatting_bytes(bytes, &map).unwrap_err();
        assert!(matches!(err, Error::NoMatchingStyle(name) if name == "Strong"));
    }

    #[test]
    fn test_default_options() {
        let options = RestyleOptions::default();
        assert_eq!(options.required_parts, vec![well_known::content()]);
        assert!(options.infer_family);
        assert!(!options.fail_on_no_match);

        let options = options.with_optional_part(EntryPath::new("settings.xml").unwrap());
        assert_eq!(options.optional_parts.len(), 3);
    }
}
