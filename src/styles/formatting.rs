//! Direct formatting to character styles
//!
//! Bold, italic, superscript and subscript applied by hand are stored as
//! automatic text styles (`T1`, `T2`, ...) in `content.xml`. Conversion points
//! the text using them at named character styles, creating those styles when
//! the document lacks them, and drops the automatic styles left unused.

use crate::error::{Error, Result};
use crate::styles::{rewrite, RenameRequest, StyleFamily, StyleInventory, StyleOrigin};
use crate::xml::{document_namespaces, XmlAttribute, XmlElement, XmlName, XmlNode};
use crate::xml::{FO, OFFICE, STYLE};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of direct formatting, in detection priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formatting {
    BoldItalic,
    Bold,
    Italic,
    Superscript,
    Subscript,
}

/// Character style to use for each kind of formatting
pub type FormattingMap = BTreeMap<Formatting, String>;

impl Formatting {
    pub const ALL: [Formatting; 5] = [
        Formatting::BoldItalic,
        Formatting::Bold,
        Formatting::Italic,
        Formatting::Superscript,
        Formatting::Subscript,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Formatting::BoldItalic => "Bold Italic",
            Formatting::Bold => "Bold",
            Formatting::Italic => "Italic",
            Formatting::Superscript => "Superscript",
            Formatting::Subscript => "Subscript",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Formatting expressed by a `style:text-properties` element.
    ///
    /// Weight and slant win over text position.
    pub fn detect(properties: &XmlElement) -> Option<Self> {
        let bold = properties.attr(FO, "font-weight") == Some("bold");
        let italic = properties.attr(FO, "font-style") == Some("italic");
        let position = properties.attr(STYLE, "text-position").unwrap_or_default();

        match (bold, italic) {
            (true, true) => Some(Formatting::BoldItalic),
            (true, false) => Some(Formatting::Bold),
            (false, true) => Some(Formatting::Italic),
            _ if position.starts_with("super") => Some(Formatting::Superscript),
            _ if position.starts_with("sub") => Some(Formatting::Subscript),
            _ => None,
        }
    }

    /// `style:text-properties` of a character style applying this formatting
    fn properties(&self) -> &'static [((&'static str, &'static str), &'static str)] {
        match self {
            Formatting::BoldItalic => &[
                ((FO, "font-weight"), "bold"),
                ((FO, "font-style"), "italic"),
            ],
            Formatting::Bold => &[((FO, "font-weight"), "bold")],
            Formatting::Italic => &[((FO, "font-style"), "italic")],
            Formatting::Superscript => &[((STYLE, "text-position"), "super 58%")],
            Formatting::Subscript => &[((STYLE, "text-position"), "sub 58%")],
        }
    }

    /// Whether a text property is part of this formatting
    fn accounts_for(&self, attr: &XmlAttribute) -> bool {
        let value = attr.value.as_str();
        let weight = || is_font_property(&attr.name, "font-weight") && value == "bold";
        let slant = || is_font_property(&attr.name, "font-style") && value == "italic";
        let position =
            |prefix: &str| attr.name.matches(STYLE, "text-position") && value.starts_with(prefix);

        match self {
            Formatting::BoldItalic => weight() || slant(),
            Formatting::Bold => weight(),
            Formatting::Italic => slant(),
            Formatting::Superscript => position("super"),
            Formatting::Subscript => position("sub"),
        }
    }
}

impl fmt::Display for Formatting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Formatting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Formatting::parse(s).ok_or_else(|| Error::InvalidFormatting(s.to_string()))
    }
}

/// `fo:<property>` or its `style:<property>-asian` / `-complex` variants
fn is_font_property(name: &XmlName, property: &str) -> bool {
    if name.matches(FO, property) {
        return true;
    }
    name.namespace.as_deref() == Some(STYLE)
        && name
            .local_name()
            .strip_prefix(property)
            .is_some_and(|rest| rest == "-asian" || rest == "-complex")
}

/// Read `formatting,style` lines such as `Bold,Strong_20_Emphasis`.
///
/// Blank lines and lines starting with `#` are skipped, as are lines with
/// an unknown formatting or no style (with a warning).
pub fn parse_mappings(text: &str) -> FormattingMap {
    let mut map = FormattingMap::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((formatting, style)) = line.split_once(',') else {
            warn!("mapping line {}: expected 'formatting,style'", index + 1);
            continue;
        };
        let style = style.trim().trim_matches('"');
        match formatting.trim().trim_matches('"').parse::<Formatting>() {
            Ok(_) if style.is_empty() => warn!("mapping line {}: no style given", index + 1),
            Ok(formatting) => {
                map.insert(formatting, style.to_string());
            }
            Err(e) => warn!("mapping line {}: {}", index + 1, e),
        }
    }

    map
}

/// A character style added during conversion
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedStyle {
    pub name: String,
    pub formatting: Formatting,
    /// `Common` when added to `styles.xml`, `Automatic` when added to the
    /// automatic styles of `content.xml`
    pub origin: StyleOrigin,
}

/// What a conversion changed
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// References moved onto each character style
    pub retargeted: BTreeMap<String, usize>,
    pub created: Vec<CreatedStyle>,
    /// Automatic styles replaced and removed
    pub replaced: Vec<String>,
}

impl ConversionOutcome {
    pub fn changed(&self) -> bool {
        !self.retargeted.is_empty()
    }

    /// Number of retargeted references
    pub fn total(&self) -> usize {
        self.retargeted.values().sum()
    }

    /// Whether a style was added to `styles.xml`
    pub fn touches_styles(&self) -> bool {
        self.created.iter().any(|c| c.origin == StyleOrigin::Common)
    }
}

/// Replace automatic text styles that carry nothing but one kind of direct
/// formatting with the character style `map` names for it.
///
/// Missing character styles are added to the common styles of `styles`, or
/// to the automatic styles of `content` when no styles tree is given.
/// Automatic styles with any other property or a parent style are left
/// alone.
pub fn convert_direct_formatting(
    content: &mut XmlElement,
    mut styles: Option<&mut XmlElement>,
    map: &FormattingMap,
) -> ConversionOutcome {
    let inventory = StyleInventory::build(styles.as_deref(), Some(&*content));
    let mut outcome = ConversionOutcome::default();

    for (automatic, formatting) in formatting_styles(content) {
        let Some(target) = map.get(&formatting) else {
            debug!("no character style for {} ({})", formatting, automatic);
            continue;
        };
        if *target == automatic {
            continue;
        }

        let request = RenameRequest::new(automatic.as_str(), target.as_str(), StyleFamily::Text)
            .references_only();
        let references = rewrite(content, &request).references;
        if references == 0 {
            continue;
        }
        info!(
            "direct {} formatting ({}) -> '{}': {} references",
            formatting, automatic, target, references
        );
        *outcome.retargeted.entry(target.clone()).or_default() += references;
        remove_automatic_style(content, &automatic);
        outcome.replaced.push(automatic);

        let known = inventory.contains(target, Some(StyleFamily::Text))
            || outcome.created.iter().any(|c| c.name == *target);
        if known {
            continue;
        }

        let in_styles = match styles.as_deref_mut() {
            Some(styles) => insert_style(styles, "styles", target, formatting),
            None => false,
        };
        let origin = if in_styles {
            StyleOrigin::Common
        } else {
            ensure_automatic_styles(content);
            insert_style(content, "automatic-styles", target, formatting);
            StyleOrigin::Automatic
        };
        info!("created character style '{}'", target);
        outcome.created.push(CreatedStyle {
            name: target.clone(),
            formatting,
            origin,
        });
    }

    outcome
}

/// Automatic text styles of `content` made of a single kind of formatting
fn formatting_styles(content: &XmlElement) -> Vec<(String, Formatting)> {
    content
        .child(OFFICE, "automatic-styles")
        .into_iter()
        .flat_map(XmlElement::child_elements)
        .filter(|e| e.is(STYLE, "style") && e.attr(STYLE, "family") == Some("text"))
        .filter_map(|e| Some((e.attr(STYLE, "name")?.to_string(), plain_formatting(e)?)))
        .collect()
}

fn plain_formatting(style: &XmlElement) -> Option<Formatting> {
    if style.attr(STYLE, "parent-style-name").is_some() {
        return None;
    }
    let mut children = style.child_elements();
    let properties = children.next()?;
    if !properties.is(STYLE, "text-properties") || children.next().is_some() {
        return None;
    }

    let formatting = Formatting::detect(properties)?;
    if properties.attributes.iter().all(|a| formatting.accounts_for(a)) {
        Some(formatting)
    } else {
        debug!(
            "'{}' mixes {} with other properties",
            style.attr(STYLE, "name").unwrap_or_default(),
            formatting
        );
        None
    }
}

fn remove_automatic_style(content: &mut XmlElement, name: &str) {
    if let Some(section) = content.child_mut(OFFICE, "automatic-styles") {
        section.children.retain(|c| {
            !matches!(c, XmlNode::Element(e)
                if e.is(STYLE, "style")
                    && e.attr(STYLE, "name") == Some(name)
                    && e.attr(STYLE, "family") == Some("text"))
        });
    }
}

/// Add `office:automatic-styles` ahead of the body when the part has none
fn ensure_automatic_styles(content: &mut XmlElement) {
    if content.child(OFFICE, "automatic-styles").is_some() {
        return;
    }
    let prefix = bind_prefix(content, OFFICE);
    let section = XmlElement::with_name(XmlName::bound(
        format!("{}:automatic-styles", prefix),
        OFFICE,
    ));
    let position = content
        .children
        .iter()
        .position(|c| matches!(c, XmlNode::Element(e) if e.is(OFFICE, "body")))
        .unwrap_or(content.children.len());
    content.children.insert(position, XmlNode::Element(section));
}

/// Append a character style to the `office:<section>` child of `root`
fn insert_style(root: &mut XmlElement, section: &str, name: &str, formatting: Formatting) -> bool {
    if root.child(OFFICE, section).is_none() {
        return false;
    }
    let style = character_style(root, name, formatting);
    match root.child_mut(OFFICE, section) {
        Some(section) => {
            section.children.push(XmlNode::Element(style));
            true
        }
        None => false,
    }
}

fn character_style(root: &mut XmlElement, name: &str, formatting: Formatting) -> XmlElement {
    let style_prefix = bind_prefix(root, STYLE);
    let fo_prefix = bind_prefix(root, FO);
    let qualified = |ns: &str, local: &str| {
        let prefix = if ns == FO { &fo_prefix } else { &style_prefix };
        XmlName::bound(format!("{}:{}", prefix, local), ns)
    };

    let mut properties = XmlElement::with_name(qualified(STYLE, "text-properties"));
    for ((ns, local), value) in formatting.properties() {
        properties.set_attr(qualified(ns, local), *value);
    }

    let mut style = XmlElement::with_name(qualified(STYLE, "style"));
    style.set_attr(qualified(STYLE, "name"), name);
    let display_name = name.replace("_20_", " ");
    if display_name != name {
        style.set_attr(qualified(STYLE, "display-name"), display_name);
    }
    style.set_attr(qualified(STYLE, "family"), StyleFamily::Text.as_str());
    style.children.push(XmlNode::Element(properties));
    style
}

/// Prefix bound to `namespace` on `root`, declaring the conventional one
/// when there is none
fn bind_prefix(root: &mut XmlElement, namespace: &str) -> String {
    if let Some(prefix) = root.declared_prefix(namespace) {
        return prefix.to_string();
    }

    let preferred = document_namespaces()
        .into_iter()
        .find(|(_, uri)| *uri == namespace)
        .map(|(declaration, _)| declaration.trim_start_matches("xmlns:"))
        .unwrap_or("ns");
    let mut prefix = preferred.to_string();
    let mut suffix = 1;
    while root.attr_raw(&format!("xmlns:{}", prefix)).is_some() {
        prefix = format!("{}{}", preferred, suffix);
        suffix += 1;
    }

    root.set_attr(XmlName::new(format!("xmlns:{}", prefix)), namespace);
    prefix
}
