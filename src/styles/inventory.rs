//! Style inventory
//!
//! Lists the styles a document defines, from `styles.xml` and the automatic
//! styles of `content.xml`.

use crate::error::Result;
use crate::package::well_known;
use crate::styles::catalog::{self, AttributeRole};
use crate::styles::StyleFamily;
use crate::xml::{self, XmlElement, OFFICE};
use std::collections::BTreeMap;

/// Section of the document a style is defined in
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleOrigin {
    /// `office:styles`, the user-visible styles
    Common,
    /// `office:automatic-styles`
    Automatic,
    /// `office:master-styles`
    Master,
    Other,
}

/// One style definition
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleInfo {
    pub name: String,
    /// Label shown to users; the name itself when none is given
    pub display_name: String,
    /// `None` when `style:family` is missing or not recognised
    pub family: Option<StyleFamily>,
    pub origin: StyleOrigin,
}

/// All style definitions of a document, keyed by name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleInventory {
    styles: BTreeMap<String, Vec<StyleInfo>>,
}

impl StyleInventory {
    /// Build from parsed `styles.xml` and `content.xml`, either of which may
    /// be absent
    pub fn build(styles: Option<&XmlElement>, content: Option<&XmlElement>) -> Self {
        let mut inventory = Self::default();
        for root in styles.into_iter().chain(content) {
            inventory.scan(root);
        }
        inventory
    }

    /// Build from raw part bytes
    pub fn from_bytes(styles: Option<&[u8]>, content: Option<&[u8]>) -> Result<Self> {
        let styles = styles
            .map(|b| xml::parse(b).map_err(|e| e.in_part(well_known::styles().as_str())))
            .transpose()?;
        let content = content
            .map(|b| xml::parse(b).map_err(|e| e.in_part(well_known::content().as_str())))
            .transpose()?;
        Ok(Self::build(styles.as_ref(), content.as_ref()))
    }

    fn scan(&mut self, root: &XmlElement) {
        let mut stack = vec![(root, None, StyleOrigin::Other)];

        while let Some((element, inherited, origin)) = stack.pop() {
            let context = catalog::context_family(element, inherited);
            let origin = if element.is(OFFICE, "styles") {
                StyleOrigin::Common
            } else if element.is(OFFICE, "automatic-styles") {
                StyleOrigin::Automatic
            } else if element.is(OFFICE, "master-styles") {
                StyleOrigin::Master
            } else {
                origin
            };

            for attr in &element.attributes {
                let Some(rule) = catalog::rule_for(&element.name, &attr.name) else {
                    continue;
                };
                if rule.role != AttributeRole::Definition {
                    continue;
                }
                let display_name = catalog::display_name_rule(&element.name)
                    .and_then(|r| element.attr(r.attribute.0, r.attribute.1))
                    .unwrap_or(&attr.value);

                self.insert(StyleInfo {
                    name: attr.value.clone(),
                    display_name: display_name.to_string(),
                    family: rule.family(context),
                    origin,
                });
            }

            stack.extend(element.child_elements().rev().map(|c| (c, context, origin)));
        }
    }

    fn insert(&mut self, info: StyleInfo) {
        let entries = self.styles.entry(info.name.clone()).or_default();
        if !entries.contains(&info) {
            entries.push(info);
        }
    }

    /// All definitions with this name, across families
    pub fn lookup(&self, name: &str) -> &[StyleInfo] {
        self.styles.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// First definition with this name in the given family
    pub fn find(&self, name: &str, family: StyleFamily) -> Option<&StyleInfo> {
        self.lookup(name).iter().find(|s| s.family == Some(family))
    }

    /// Whether a style of this name exists, optionally in a given family
    pub fn contains(&self, name: &str, family: Option<StyleFamily>) -> bool {
        match family {
            Some(family) => self.find(name, family).is_some(),
            None => !self.lookup(name).is_empty(),
        }
    }

    /// Distinct known families defining this name, sorted
    pub fn families_of(&self, name: &str) -> Vec<StyleFamily> {
        let mut families: Vec<_> = self.lookup(name).iter().filter_map(|s| s.family).collect();
        families.sort();
        families.dedup();
        families
    }

    /// Definitions grouped by family; styles without a known family are left out
    pub fn by_family(&self) -> BTreeMap<StyleFamily, Vec<&StyleInfo>> {
        let mut groups: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for info in self.iter() {
            if let Some(family) = info.family {
                groups.entry(family).or_default().push(info);
            }
        }
        groups
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.styles.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// All definitions, ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &StyleInfo> {
        self.styles.values().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const STYLES: &str = r#"<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:styles>
    <style:default-style style:family="paragraph"/>
    <style:style style:name="Standard" style:family="paragraph"/>
    <style:style style:name="Preformatted_20_Text" style:display-name="Preformatted Text" style:family="paragraph" style:parent-style-name="Standard"/>
    <style:style style:name="Footer" style:family="paragraph"/>
    <text:list-style style:name="Footer"/>
    <style:style style:name="Odd" style:family="vendor-thing"/>
  </office:styles>
  <office:automatic-styles>
    <style:page-layout style:name="pm1"/>
  </office:automatic-styles>
  <office:master-styles>
    <style:master-page style:name="Standard" style:page-layout-name="pm1"/>
  </office:master-styles>
</office:document-styles>"#;

    const CONTENT: &str = r#"<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
  <office:automatic-styles>
    <style:style style:name="P1" style:family="paragraph" style:parent-style-name="Standard"/>
    <style:style style:name="T1" style:family="text"/>
  </office:automatic-styles>
  <office:body><office:text><text:p text:style-name="P1"/></office:text></office:body>
</office:document-content>"#;

    fn inventory() -> StyleInventory {
        StyleInventory::from_bytes(Some(STYLES.as_bytes()), Some(CONTENT.as_bytes())).unwrap()
    }

    #[test]
    fn test_collects_both_parts() {
        let inv = inventory();

        assert_eq!(inv.len(), 9);
        let p1 = inv.find("P1", StyleFamily::Paragraph).unwrap();
        assert_eq!(p1.origin, StyleOrigin::Automatic);
        assert!(inv.contains("T1", Some(StyleFamily::Text)));
        assert!(!inv.contains("T1", Some(StyleFamily::Paragraph)));
        assert!(!inv.contains("Missing", None));
    }

    #[test]
    fn test_display_name_defaults_to_name() {
        let inv = inventory();

        let pre = inv.find("Preformatted_20_Text", StyleFamily::Paragraph).unwrap();
        assert_eq!(pre.display_name, "Preformatted Text");
        assert_eq!(pre.origin, StyleOrigin::Common);

        let footer = inv.find("Footer", StyleFamily::Paragraph).unwrap();
        assert_eq!(footer.display_name, "Footer");
    }

    #[test]
    fn test_same_name_in_several_families() {
        let inv = inventory();

        assert_eq!(
            inv.families_of("Footer"),
            vec![StyleFamily::Paragraph, StyleFamily::List]
        );
        assert_eq!(
            inv.families_of("Standard"),
            vec![StyleFamily::Paragraph, StyleFamily::MasterPage]
        );
        let master = inv.find("Standard", StyleFamily::MasterPage).unwrap();
        assert_eq!(master.origin, StyleOrigin::Master);
    }

    #[test]
    fn test_unknown_family_kept_without_family() {
        let inv = inventory();

        let odd = inv.lookup("Odd");
        assert_eq!(odd.len(), 1);
        assert_eq!(odd[0].family, None);
        assert!(inv.families_of("Odd").is_empty());
        assert!(inv.contains("Odd", None));
    }

    #[test]
    fn test_by_family() {
        let inv = inventory();
        let groups = inv.by_family();

        let paragraph: Vec<_> = groups[&StyleFamily::Paragraph]
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(paragraph, vec!["Footer", "P1", "Preformatted_20_Text", "Standard"]);
        assert_eq!(groups[&StyleFamily::PageLayout].len(), 1);
    }

    #[test]
    fn test_missing_parts() {
        let inv = StyleInventory::build(None, None);
        assert!(inv.is_empty());
        assert_eq!(inv.len(), 0);
    }

    #[test]
    fn test_malformed_part_is_attributed() {
        let err = StyleInventory::from_bytes(Some(b"<office:document-styles>"), None).unwrap_err();
        assert!(err.to_string().contains("styles.xml"));
    }
}
