//! Stylesheet instances.
//!
//! A [`StyleSheet`] is built in one pass:
//!
//! 1. Top-level `$` entries are split off into a [`VariableTable`]
//! 2. Variable references in the remaining groups are substituted
//! 3. The substituted tree is handed to the [`StyleRegistrar`]
//!
//! The raw description is kept so the sheet can later be
//! [extended](StyleSheet::extend). A sheet is never modified after it is
//! built; extension always produces a new, independent sheet.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::description::StyleDescription;
use crate::merge::deep_merge;
use crate::registrar::{RegisteredStyles, StyleRegistrar};
use crate::variables::VariableTable;

/// An entry on a stylesheet's flat lookup surface.
#[derive(Debug, PartialEq)]
pub enum Entry<'a, H> {
    /// A variable's raw, declared value.
    Variable(&'a Value),
    /// A registered style group's handle.
    Style(&'a H),
}

impl<'a, H> Entry<'a, H> {
    pub fn as_variable(&self) -> Option<&'a Value> {
        match *self {
            Entry::Variable(value) => Some(value),
            Entry::Style(_) => None,
        }
    }

    pub fn as_style(&self) -> Option<&'a H> {
        match *self {
            Entry::Style(handle) => Some(handle),
            Entry::Variable(_) => None,
        }
    }
}

/// A built stylesheet: its variables plus the registrar's handles.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use extensible_stylesheet::{PlainRegistrar, StyleDescription, StyleSheet};
/// use serde_json::json;
///
/// let base = StyleSheet::create(
///     Arc::new(PlainRegistrar),
///     StyleDescription::try_from(json!({
///         "$color": "#ff0000",
///         "container": { "color": "$color", "fontSize": 12 }
///     })).unwrap(),
/// ).unwrap();
///
/// assert_eq!(base.variable("$color"), Some(&json!("#ff0000")));
/// assert_eq!(base.style("container"), Some(&json!({ "color": "#ff0000", "fontSize": 12 })));
///
/// let themed = base.extend(
///     StyleDescription::try_from(json!({
///         "$color": "#00ffff",
///         "container": { "fontWeight": "bold" }
///     })).unwrap(),
/// ).unwrap();
///
/// assert_eq!(
///     themed.style("container"),
///     Some(&json!({ "color": "#00ffff", "fontSize": 12, "fontWeight": "bold" }))
/// );
/// // The parent is untouched.
/// assert_eq!(base.variable("$color"), Some(&json!("#ff0000")));
/// ```
pub struct StyleSheet<R: StyleRegistrar> {
    registrar: Arc<R>,
    raw: Arc<StyleDescription>,
    variables: VariableTable,
    styles: RegisteredStyles<R::Handle>,
}

impl<R: StyleRegistrar> StyleSheet<R> {
    /// Builds a stylesheet from `description`.
    ///
    /// An empty description yields an empty, valid sheet.
    ///
    /// # Errors
    ///
    /// Returns the registrar's error unchanged if registration fails.
    pub fn new(registrar: Arc<R>, description: StyleDescription) -> Result<Self, R::Error> {
        let (variables, groups) = VariableTable::extract(&description);
        let tree = variables.substitute_tree(groups);
        let styles = registrar.register(&tree)?;

        tracing::debug!(
            variables = variables.len(),
            groups = styles.len(),
            "built stylesheet"
        );

        Ok(Self {
            registrar,
            raw: Arc::new(description),
            variables,
            styles,
        })
    }

    /// Same as [`new`](Self::new).
    pub fn create(registrar: Arc<R>, description: StyleDescription) -> Result<Self, R::Error> {
        Self::new(registrar, description)
    }

    /// Builds a stylesheet with no variables and no groups.
    ///
    /// # Errors
    ///
    /// Returns the registrar's error if it rejects an empty tree.
    pub fn empty(registrar: Arc<R>) -> Result<Self, R::Error> {
        Self::new(registrar, StyleDescription::new())
    }

    /// Derives a new stylesheet by deep-merging `overrides` over this sheet's
    /// raw description.
    ///
    /// Variables and style properties in `overrides` add to or replace the
    /// inherited ones at any depth. Variable references are resolved against
    /// the merged variables, so overriding a variable restyles every inherited
    /// group that refers to it. `self` is not modified.
    ///
    /// # Errors
    ///
    /// Returns the registrar's error unchanged if registration fails.
    pub fn extend(&self, overrides: StyleDescription) -> Result<Self, R::Error> {
        tracing::debug!(
            keys = ?overrides.keys().collect::<Vec<_>>(),
            "extending stylesheet"
        );
        let merged = deep_merge(&self.raw, &overrides);
        Self::new(Arc::clone(&self.registrar), merged)
    }

    /// Rebuilds this stylesheet as a new, independent sheet.
    ///
    /// # Errors
    ///
    /// Returns the registrar's error unchanged if registration fails.
    pub fn extend_empty(&self) -> Result<Self, R::Error> {
        self.extend(StyleDescription::new())
    }

    /// Looks up a variable or style group by name.
    ///
    /// If a name is both a variable and a group, the group wins. Variable
    /// names start with `$`, so this only happens when a registrar returns
    /// such a key itself.
    pub fn get(&self, name: &str) -> Option<Entry<'_, R::Handle>> {
        self.styles
            .get(name)
            .map(Entry::Style)
            .or_else(|| self.variables.get(name).map(Entry::Variable))
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn style(&self, name: &str) -> Option<&R::Handle> {
        self.styles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name) || self.variables.contains(name)
    }

    /// Every name on the lookup surface, variables and groups.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let styles = &self.styles;
        self.variables
            .names()
            .filter(move |name| !styles.contains_key(*name))
            .chain(self.styles.keys().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.keys().count()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.variables.is_empty()
    }

    pub fn variables(&self) -> &VariableTable {
        &self.variables
    }

    pub fn styles(&self) -> &RegisteredStyles<R::Handle> {
        &self.styles
    }

    /// The description this sheet was built from, variables included.
    pub fn raw_description(&self) -> &StyleDescription {
        &self.raw
    }

    pub fn registrar(&self) -> &Arc<R> {
        &self.registrar
    }
}

impl<R: StyleRegistrar> Clone for StyleSheet<R>
where
    R::Handle: Clone,
{
    fn clone(&self) -> Self {
        Self {
            registrar: Arc::clone(&self.registrar),
            raw: Arc::clone(&self.raw),
            variables: self.variables.clone(),
            styles: self.styles.clone(),
        }
    }
}

impl<R: StyleRegistrar> fmt::Debug for StyleSheet<R>
where
    R::Handle: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleSheet")
            .field("variables", &self.variables)
            .field("styles", &self.styles)
            .finish_non_exhaustive()
    }
}
