//! Entry point bound to one registrar.
//!
//! [`StyleSheets`] creates stylesheets against a shared registrar and forwards
//! whatever extra constants and operations the registrar exports. The
//! forwarding table is filled once, when the namespace is built. Names the
//! namespace defines itself ([`RESERVED_NAMES`]) are never forwarded.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use crate::description::StyleDescription;
use crate::error::SourceError;
use crate::registrar::{Export, StyleRegistrar};
use crate::sheet::StyleSheet;

/// Names the namespace owns; registrar exports with these names are dropped.
pub const RESERVED_NAMES: &[&str] = &["create", "extend"];

/// Creates stylesheets and forwards registrar exports.
///
/// # Example
///
/// ```rust
/// use extensible_stylesheet::{IdRegistrar, StyleDescription, StyleSheets};
/// use serde_json::json;
///
/// let sheets = StyleSheets::new(IdRegistrar::new());
///
/// let sheet = sheets.create(StyleDescription::try_from(json!({
///     "$border": 2,
///     "card": { "borderWidth": "$border" },
///     "title": { "fontSize": 20 }
/// })).unwrap()).unwrap();
///
/// // Registrar constants are reachable through the namespace.
/// assert_eq!(sheets.constant("hairlineWidth"), Some(&json!(1.0)));
///
/// // So are registrar operations.
/// let ids = [json!(sheet.style("card").unwrap().get()), json!(sheet.style("title").unwrap().get())];
/// let flat = sheets.call("flatten", &ids).unwrap().unwrap();
/// assert_eq!(flat, json!({ "borderWidth": 2, "fontSize": 20 }));
/// ```
pub struct StyleSheets<R: StyleRegistrar> {
    registrar: Arc<R>,
    exports: HashMap<String, Export<R::Error>>,
}

impl<R: StyleRegistrar> StyleSheets<R> {
    /// Builds a namespace for `registrar`, collecting its exports.
    pub fn new(registrar: R) -> Self {
        Self::from_shared(Arc::new(registrar))
    }

    /// Builds a namespace around an already shared registrar.
    pub fn from_shared(registrar: Arc<R>) -> Self {
        let exports: HashMap<_, _> = registrar
            .exports()
            .into_iter()
            .filter(|(name, _)| {
                let reserved = RESERVED_NAMES.contains(&name.as_str());
                if reserved {
                    tracing::debug!(name = %name, "skipping reserved registrar export");
                }
                !reserved
            })
            .collect();

        tracing::debug!(exports = exports.len(), "initialized stylesheet namespace");
        Self { registrar, exports }
    }

    /// Builds a stylesheet from `description`.
    ///
    /// # Errors
    ///
    /// Returns the registrar's error unchanged if registration fails.
    pub fn create(&self, description: StyleDescription) -> Result<StyleSheet<R>, R::Error> {
        StyleSheet::create(Arc::clone(&self.registrar), description)
    }

    /// Parses YAML and builds a stylesheet from it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Load`] if the YAML is invalid and
    /// [`SourceError::Register`] if the registrar fails.
    pub fn create_from_yaml(&self, yaml: &str) -> Result<StyleSheet<R>, SourceError<R::Error>> {
        let description = StyleDescription::from_yaml(yaml)?;
        self.create(description).map_err(SourceError::Register)
    }

    /// Loads a YAML or JSON file and builds a stylesheet from it.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Load`] if the file cannot be read or parsed and
    /// [`SourceError::Register`] if the registrar fails.
    pub fn create_from_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<StyleSheet<R>, SourceError<R::Error>> {
        let description = StyleDescription::from_file(path)?;
        self.create(description).map_err(SourceError::Register)
    }

    pub fn registrar(&self) -> &Arc<R> {
        &self.registrar
    }

    /// Returns the forwarded export named `name`.
    pub fn export(&self, name: &str) -> Option<&Export<R::Error>> {
        self.exports.get(name)
    }

    /// Returns a forwarded constant.
    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.exports.get(name).and_then(Export::as_constant)
    }

    /// Invokes a forwarded operation.
    ///
    /// Returns `None` if no operation is exported under `name`. The
    /// operation's own result, error included, is returned as-is.
    pub fn call(&self, name: &str, args: &[Value]) -> Option<Result<Value, R::Error>> {
        match self.exports.get(name)? {
            Export::Operation(op) => Some(op(args)),
            Export::Constant(_) => None,
        }
    }

    /// Names of every forwarded export, sorted.
    pub fn exported_names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.exports.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<R: StyleRegistrar + Default> Default for StyleSheets<R> {
    fn default() -> Self {
        Self::new(R::default())
    }
}

impl<R: StyleRegistrar> Clone for StyleSheets<R> {
    fn clone(&self) -> Self {
        Self {
            registrar: Arc::clone(&self.registrar),
            exports: self.exports.clone(),
        }
    }
}

impl<R: StyleRegistrar> std::fmt::Debug for StyleSheets<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleSheets")
            .field("exports", &self.exported_names())
            .finish_non_exhaustive()
    }
}
