//! Variable extraction and substitution.
//!
//! Variables are top-level entries of a [`StyleDescription`] whose key starts
//! with [`VARIABLE_PREFIX`](crate::VARIABLE_PREFIX). Anywhere else in the
//! description, a string value equal to a variable name is replaced by that
//! variable's value.
//!
//! Substitution is single-pass: a variable whose value is itself a variable
//! name is not resolved further, and a string that looks like a variable but
//! names nothing passes through unchanged.

use serde_json::{Map, Value};

use crate::description::{is_variable_name, StyleDescription};
use crate::registrar::WorkingStyleTree;

/// The variables declared by one stylesheet.
///
/// Built by [`VariableTable::extract`] and never modified afterwards.
///
/// # Example
///
/// ```rust
/// use extensible_stylesheet::{StyleDescription, VariableTable};
/// use serde_json::json;
///
/// let description = StyleDescription::try_from(json!({
///     "$color": "#ff0000",
///     "label": { "color": "$color", "fontSize": 12 }
/// })).unwrap();
///
/// let (variables, rest) = VariableTable::extract(&description);
/// assert_eq!(variables.get("$color"), Some(&json!("#ff0000")));
///
/// let tree = variables.substitute_tree(rest);
/// assert_eq!(tree["label"], json!({ "color": "#ff0000", "fontSize": 12 }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableTable {
    values: Map<String, Value>,
}

impl VariableTable {
    /// Splits a description into its variables and the remaining entries.
    ///
    /// Only top-level keys are inspected. Nested keys that start with the
    /// prefix are ordinary properties. The input is left untouched.
    pub fn extract(description: &StyleDescription) -> (VariableTable, StyleDescription) {
        let mut values = Map::new();
        let mut rest = Map::new();

        for (key, value) in description {
            if is_variable_name(key) {
                values.insert(key.clone(), value.clone());
            } else {
                rest.insert(key.clone(), value.clone());
            }
        }

        (VariableTable { values }, StyleDescription::from(rest))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.values.iter()
    }

    /// Returns the declared variable names, prefix included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Replaces variable references in `value`.
    ///
    /// - Mappings are rebuilt with every entry substituted.
    /// - A string equal to a declared name becomes that variable's value.
    /// - Anything else, arrays included, is returned as-is.
    pub fn substitute(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.substitute_map(map)),
            Value::String(reference) => match self.values.get(reference) {
                Some(resolved) => {
                    tracing::trace!(variable = %reference, "substituted variable");
                    resolved.clone()
                }
                None => {
                    if is_variable_name(reference) {
                        tracing::trace!(reference = %reference, "unresolved variable reference");
                    }
                    value.clone()
                }
            },
            other => other.clone(),
        }
    }

    /// Substitutes every entry of a description, producing the tree handed to
    /// a registrar.
    pub fn substitute_tree(&self, description: StyleDescription) -> WorkingStyleTree {
        description
            .into_iter()
            .map(|(name, group)| {
                let group = self.substitute(&group);
                (name, group)
            })
            .collect()
    }

    fn substitute_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| (key.clone(), self.substitute(value)))
            .collect()
    }
}

impl<'a> IntoIterator for &'a VariableTable {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
