//! Catalog of attributes that name styles
//!
//! Static table of which (element, attribute) pairs hold a style name, which
//! family that name lives in, and whether the attribute defines the style,
//! references it, or carries its display label.

use crate::styles::StyleFamily;
use crate::xml::{XmlElement, XmlName, CHART, DRAW, NUMBER, PRESENTATION, STYLE, TABLE, TEXT};

/// Which elements a rule applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementMatch {
    /// Element with this (namespace URI, local name)
    Named(&'static str, &'static str),
    /// Any element
    Any,
}

/// How the family of the named style is determined
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FamilyScope {
    Fixed(StyleFamily),
    /// The element's own `style:family`, else that of the nearest ancestor
    /// declaring one
    Contextual,
}

/// What the attribute value means
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeRole {
    /// Defines the style (`style:name`)
    Definition,
    /// Points at a style defined elsewhere
    Reference,
    /// Human-facing label of the style being defined
    DisplayName,
}

/// One catalog entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReferenceRule {
    pub element: ElementMatch,
    /// (namespace URI, local name)
    pub attribute: (&'static str, &'static str),
    pub scope: FamilyScope,
    pub role: AttributeRole,
}

impl ReferenceRule {
    /// Check whether the rule covers this attribute on this element
    pub fn applies_to(&self, element: &XmlName, attribute: &XmlName) -> bool {
        let (ns, local) = self.attribute;
        if !attribute.matches(ns, local) {
            return false;
        }
        match self.element {
            ElementMatch::Named(ns, local) => element.matches(ns, local),
            ElementMatch::Any => true,
        }
    }

    /// Family of the style named by the attribute, given the element's family context
    pub fn family(&self, context: Option<StyleFamily>) -> Option<StyleFamily> {
        match self.scope {
            FamilyScope::Fixed(family) => Some(family),
            FamilyScope::Contextual => context,
        }
    }
}

use AttributeRole::{Definition, DisplayName, Reference};
use FamilyScope::{Contextual, Fixed};

const fn on(
    element: (&'static str, &'static str),
    attribute: (&'static str, &'static str),
    scope: FamilyScope,
    role: AttributeRole,
) -> ReferenceRule {
    ReferenceRule {
        element: ElementMatch::Named(element.0, element.1),
        attribute,
        scope,
        role,
    }
}

const fn any(attribute: (&'static str, &'static str), family: StyleFamily) -> ReferenceRule {
    ReferenceRule {
        element: ElementMatch::Any,
        attribute,
        scope: Fixed(family),
        role: Reference,
    }
}

const STYLE_NAME: (&str, &str) = (STYLE, "name");
const STYLE_DISPLAY_NAME: (&str, &str) = (STYLE, "display-name");
const TEXT_STYLE_NAME: (&str, &str) = (TEXT, "style-name");
const TABLE_STYLE_NAME: (&str, &str) = (TABLE, "style-name");
const TABLE_DEFAULT_CELL: (&str, &str) = (TABLE, "default-cell-style-name");
const DRAW_STYLE_NAME: (&str, &str) = (DRAW, "style-name");

/// All rules, element-specific ones before wildcards. The first matching
/// rule wins.
#[rustfmt::skip]
pub const CATALOG: &[ReferenceRule] = &[
    // Style definitions and their references to other styles
    on((STYLE, "style"), STYLE_NAME, Contextual, Definition),
    on((STYLE, "style"), STYLE_DISPLAY_NAME, Contextual, DisplayName),
    on((STYLE, "style"), (STYLE, "parent-style-name"), Contextual, Reference),
    on((STYLE, "style"), (STYLE, "next-style-name"), Contextual, Reference),
    on((STYLE, "style"), (STYLE, "list-style-name"), Fixed(StyleFamily::List), Reference),
    on((STYLE, "style"), (STYLE, "master-page-name"), Fixed(StyleFamily::MasterPage), Reference),
    on((STYLE, "style"), (STYLE, "data-style-name"), Fixed(StyleFamily::DataStyle), Reference),
    on((STYLE, "style"), (STYLE, "percentage-data-style-name"), Fixed(StyleFamily::DataStyle), Reference),
    on((STYLE, "map"), (STYLE, "apply-style-name"), Contextual, Reference),
    on((TEXT, "list-style"), STYLE_NAME, Fixed(StyleFamily::List), Definition),
    on((TEXT, "list-style"), STYLE_DISPLAY_NAME, Fixed(StyleFamily::List), DisplayName),
    on((TEXT, "outline-style"), STYLE_NAME, Fixed(StyleFamily::List), Definition),
    on((STYLE, "page-layout"), STYLE_NAME, Fixed(StyleFamily::PageLayout), Definition),
    on((STYLE, "master-page"), STYLE_NAME, Fixed(StyleFamily::MasterPage), Definition),
    on((STYLE, "master-page"), STYLE_DISPLAY_NAME, Fixed(StyleFamily::MasterPage), DisplayName),
    on((STYLE, "master-page"), (STYLE, "page-layout-name"), Fixed(StyleFamily::PageLayout), Reference),
    on((STYLE, "master-page"), (STYLE, "next-style-name"), Fixed(StyleFamily::MasterPage), Reference),
    on((STYLE, "master-page"), DRAW_STYLE_NAME, Fixed(StyleFamily::DrawingPage), Reference),
    on((STYLE, "handout-master"), (STYLE, "page-layout-name"), Fixed(StyleFamily::PageLayout), Reference),
    on((STYLE, "handout-master"), DRAW_STYLE_NAME, Fixed(StyleFamily::DrawingPage), Reference),
    on((NUMBER, "number-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((NUMBER, "currency-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((NUMBER, "percentage-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((NUMBER, "date-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((NUMBER, "time-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((NUMBER, "boolean-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((NUMBER, "text-style"), STYLE_NAME, Fixed(StyleFamily::DataStyle), Definition),
    on((TEXT, "list-level-style-number"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "list-level-style-bullet"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "outline-level-style"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "notes-configuration"), (TEXT, "citation-style-name"), Fixed(StyleFamily::Text), Reference),
    on((TEXT, "notes-configuration"), (TEXT, "citation-body-style-name"), Fixed(StyleFamily::Text), Reference),
    on((TEXT, "notes-configuration"), (TEXT, "default-style-name"), Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "notes-configuration"), (TEXT, "master-page-name"), Fixed(StyleFamily::MasterPage), Reference),
    on((TEXT, "linenumbering-configuration"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    // Text content
    on((TEXT, "p"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "p"), (TEXT, "cond-style-name"), Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "h"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "h"), (TEXT, "cond-style-name"), Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "span"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "a"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "a"), (TEXT, "visited-style-name"), Fixed(StyleFamily::Text), Reference),
    on((TEXT, "ruby"), TEXT_STYLE_NAME, Fixed(StyleFamily::Ruby), Reference),
    on((TEXT, "ruby-text"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "list"), TEXT_STYLE_NAME, Fixed(StyleFamily::List), Reference),
    on((TEXT, "list-item"), (TEXT, "style-override"), Fixed(StyleFamily::List), Reference),
    on((TEXT, "numbered-paragraph"), TEXT_STYLE_NAME, Fixed(StyleFamily::List), Reference),
    on((TEXT, "section"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "table-of-content"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "alphabetical-index"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "bibliography"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "illustration-index"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "table-index"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "object-index"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "user-index"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "index-title"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    on((TEXT, "index-body"), TEXT_STYLE_NAME, Fixed(StyleFamily::Section), Reference),
    // Index templates
    on((TEXT, "index-title-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "index-source-style"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "table-of-content-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "illustration-index-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "table-index-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "object-index-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "user-index-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "alphabetical-index-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "bibliography-entry-template"), TEXT_STYLE_NAME, Fixed(StyleFamily::Paragraph), Reference),
    on((TEXT, "alphabetical-index-source"), (TEXT, "main-entry-style-name"), Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-chapter"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-page-number"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-text"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-span"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-tab-stop"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-link-start"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    on((TEXT, "index-entry-bibliography"), TEXT_STYLE_NAME, Fixed(StyleFamily::Text), Reference),
    // Tables
    on((TABLE, "table"), TABLE_STYLE_NAME, Fixed(StyleFamily::Table), Reference),
    on((TABLE, "table-column"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableColumn), Reference),
    on((TABLE, "table-column"), TABLE_DEFAULT_CELL, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "table-row"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableRow), Reference),
    on((TABLE, "table-row"), TABLE_DEFAULT_CELL, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "table-cell"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "covered-table-cell"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    // Table templates
    on((TABLE, "first-row"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "last-row"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "first-column"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "last-column"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "body"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "even-rows"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "odd-rows"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "even-columns"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "odd-columns"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    on((TABLE, "background"), TABLE_STYLE_NAME, Fixed(StyleFamily::TableCell), Reference),
    // Drawing pages
    on((DRAW, "page"), DRAW_STYLE_NAME, Fixed(StyleFamily::DrawingPage), Reference),
    on((DRAW, "page"), (DRAW, "master-page-name"), Fixed(StyleFamily::MasterPage), Reference),
    // Wildcards
    any(DRAW_STYLE_NAME, StyleFamily::Graphic),
    any((DRAW, "text-style-name"), StyleFamily::Paragraph),
    any((PRESENTATION, "style-name"), StyleFamily::Presentation),
    any((CHART, "style-name"), StyleFamily::Chart),
    // Fields (`text:date`, `text:page-number`, ...)
    any((STYLE, "data-style-name"), StyleFamily::DataStyle),
];

/// First rule covering this attribute on this element
pub fn rule_for(element: &XmlName, attribute: &XmlName) -> Option<&'static ReferenceRule> {
    CATALOG.iter().find(|r| r.applies_to(element, attribute))
}

/// Family context of an element: its own `style:family` when declared
/// (even if unrecognised), otherwise the inherited one
pub fn context_family(
    element: &XmlElement,
    inherited: Option<StyleFamily>,
) -> Option<StyleFamily> {
    match element.attr(STYLE, "family") {
        Some(token) => StyleFamily::parse(token),
        None => inherited,
    }
}

/// The display-name rule for an element, if the element can carry one
pub fn display_name_rule(element: &XmlName) -> Option<&'static ReferenceRule> {
    CATALOG.iter().find(|r| {
        r.role == DisplayName
            && matches!(r.element, ElementMatch::Named(ns, local) if element.matches(ns, local))
    })
}
