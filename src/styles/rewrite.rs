//! Style rename engine
//!
//! Walks a parsed part and retargets every catalogued attribute that names
//! the requested style. Matching is by exact attribute value on catalogued
//! attributes only, never by substring.

use crate::styles::catalog::{self, AttributeRole};
use crate::styles::{StyleFamily, StyleInventory};
use crate::xml::{XmlElement, XmlName, XmlNode};
use log::debug;
use std::ops::AddAssign;

/// A request to rename one style
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenameRequest {
    pub old_name: String,
    pub new_name: String,
    /// Family the rename is confined to; `None` touches every family
    pub family: Option<StyleFamily>,
    /// New display name for the renamed definition; left alone when `None`
    pub display_name: Option<String>,
    /// Retarget references only, leaving the definitions in place
    pub references_only: bool,
}

impl RenameRequest {
    /// Rename a style within one family
    pub fn new(
        old_name: impl Into<String>,
        new_name: impl Into<String>,
        family: StyleFamily,
    ) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            family: Some(family),
            display_name: None,
            references_only: false,
        }
    }

    /// Rename every style called `old_name`, whatever its family.
    ///
    /// Styles of different families may share a name; this renames all of
    /// them.
    pub fn all_families(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
            family: None,
            display_name: None,
            references_only: false,
        }
    }

    /// Also set the display name of the renamed definition
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Point references at `new_name` without renaming the definition of
    /// `old_name` (e.g. switch paragraphs from one existing style to another)
    pub fn references_only(mut self) -> Self {
        self.references_only = true;
        self
    }

    /// Fill in the family from the inventory when the old name exists in
    /// exactly one family. Returns the resulting family.
    pub fn infer_family(&mut self, inventory: &StyleInventory) -> Option<StyleFamily> {
        if self.family.is_none() {
            if let [family] = inventory.families_of(&self.old_name)[..] {
                debug!("inferred family {} for style '{}'", family, self.old_name);
                self.family = Some(family);
            }
        }
        self.family
    }

    fn accepts(&self, family: Option<StyleFamily>) -> bool {
        match self.family {
            Some(wanted) => family == Some(wanted),
            None => true,
        }
    }
}

/// What a rewrite changed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteOutcome {
    pub definitions: usize,
    pub references: usize,
    pub display_names: usize,
}

impl RewriteOutcome {
    /// Whether any attribute was modified
    pub fn changed(&self) -> bool {
        self.total() > 0
    }

    /// Number of modified attributes
    pub fn total(&self) -> usize {
        self.definitions + self.references + self.display_names
    }
}

impl AddAssign for RewriteOutcome {
    fn add_assign(&mut self, other: Self) {
        self.definitions += other.definitions;
        self.references += other.references;
        self.display_names += other.display_names;
    }
}

/// Apply one rename to a tree, visiting every element once.
///
/// The tree is left untouched when nothing matches.
pub fn rewrite(root: &mut XmlElement, request: &RenameRequest) -> RewriteOutcome {
    if request.family.is_none() {
        debug!(
            "renaming '{}' -> '{}' across all style families",
            request.old_name, request.new_name
        );
    }

    let mut outcome = RewriteOutcome::default();
    let mut stack: Vec<(&mut XmlElement, Option<StyleFamily>)> = vec![(root, None)];

    while let Some((element, inherited)) = stack.pop() {
        let context = catalog::context_family(element, inherited);
        rewrite_element(element, context, request, &mut outcome);

        let children = element.children.iter_mut().rev().filter_map(|c| match c {
            XmlNode::Element(e) => Some((e, context)),
            _ => None,
        });
        stack.extend(children);
    }

    outcome
}

/// Apply several renames in order; later requests see earlier results
pub fn rewrite_all(root: &mut XmlElement, requests: &[RenameRequest]) -> RewriteOutcome {
    let mut outcome = RewriteOutcome::default();
    for request in requests {
        outcome += rewrite(root, request);
    }
    outcome
}

fn rewrite_element(
    element: &mut XmlElement,
    context: Option<StyleFamily>,
    request: &RenameRequest,
    outcome: &mut RewriteOutcome,
) {
    let mut renamed_definition: Option<XmlName> = None;

    for attr in element.attributes.iter_mut() {
        if attr.value != request.old_name {
            continue;
        }
        let Some(rule) = catalog::rule_for(&element.name, &attr.name) else {
            continue;
        };
        if !request.accepts(rule.family(context)) {
            continue;
        }

        match rule.role {
            AttributeRole::Definition if request.references_only => continue,
            AttributeRole::Definition => {
                outcome.definitions += 1;
                renamed_definition = Some(attr.name.clone());
            }
            AttributeRole::Reference => outcome.references += 1,
            AttributeRole::DisplayName => continue,
        }

        debug!(
            "<{} {}=\"{}\"> -> \"{}\"",
            element.name.raw, attr.name.raw, attr.value, request.new_name
        );
        attr.value.clone_from(&request.new_name);
    }

    if let (Some(definition), Some(display_name)) = (renamed_definition, &request.display_name) {
        if set_display_name(element, &definition, display_name) {
            outcome.display_names += 1;
        }
    }
}

/// Set the display-name attribute next to a renamed definition attribute,
/// adding it with the definition's prefix when absent
fn set_display_name(element: &mut XmlElement, definition: &XmlName, value: &str) -> bool {
    let Some(rule) = catalog::display_name_rule(&element.name) else {
        return false;
    };
    let (ns, local) = rule.attribute;

    if let Some(attr) = element
        .attributes
        .iter_mut()
        .find(|a| a.name.matches(ns, local))
    {
        if attr.value == value {
            return false;
        }
        attr.value = value.to_string();
        return true;
    }

    let raw = match definition.prefix() {
        Some(prefix) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    };
    element.set_attr(XmlName::bound(raw, ns), value);
    true
}
