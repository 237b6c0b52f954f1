//! Style descriptions: the raw input to a stylesheet.
//!
//! A [`StyleDescription`] is a mapping from names to values. Top-level keys
//! starting with [`VARIABLE_PREFIX`] declare variables; every other top-level
//! key names a style group whose value is usually a nested mapping of style
//! properties.
//!
//! # YAML Schema
//!
//! ```yaml
//! # Variables
//! $primary: "#ff6b35"
//! $spacing: 8
//!
//! # Style groups
//! container:
//!   padding: $spacing
//!   backgroundColor: $primary
//!   border:
//!     color: $primary
//!     width: 1
//! ```
//!
//! Descriptions can also be built in code from a [`serde_json::Value`] or loaded
//! from files with one of [`STYLESHEET_EXTENSIONS`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LoadError;

/// Prefix marking a top-level key as a variable declaration.
pub const VARIABLE_PREFIX: char = '$';

/// Recognized stylesheet file extensions.
///
/// `.yaml` and `.yml` are parsed as YAML, `.json` as JSON.
pub const STYLESHEET_EXTENSIONS: &[&str] = &[".yaml", ".yml", ".json"];

/// Returns true if `name` declares (or references) a variable.
///
/// ```rust
/// use extensible_stylesheet::is_variable_name;
///
/// assert!(is_variable_name("$color"));
/// assert!(!is_variable_name("container"));
/// ```
pub fn is_variable_name(name: &str) -> bool {
    name.starts_with(VARIABLE_PREFIX)
}

/// A plain mapping of style groups and variables, prior to registration.
///
/// # Example
///
/// ```rust
/// use extensible_stylesheet::StyleDescription;
/// use serde_json::json;
///
/// let description = StyleDescription::try_from(json!({
///     "$color": "#ff0000",
///     "title": { "color": "$color", "fontSize": 18 }
/// })).unwrap();
///
/// assert_eq!(description.len(), 2);
/// assert!(description.get("title").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleDescription {
    entries: Map<String, Value>,
}

impl StyleDescription {
    /// Creates an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the previous value under that key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Adds an entry, returning the description for chaining.
    ///
    /// ```rust
    /// use extensible_stylesheet::StyleDescription;
    /// use serde_json::json;
    ///
    /// let description = StyleDescription::new()
    ///     .with("$accent", "cyan")
    ///     .with("header", json!({ "color": "$accent" }));
    /// assert_eq!(description.len(), 2);
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.entries.iter()
    }

    pub fn keys(&self) -> serde_json::map::Keys<'_> {
        self.entries.keys()
    }

    /// Borrows the underlying mapping.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Parses a description from YAML content.
    ///
    /// An empty document yields an empty description.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for invalid YAML and
    /// [`LoadError::NotAMapping`] when the top level is not a mapping.
    ///
    /// ```rust
    /// use extensible_stylesheet::StyleDescription;
    ///
    /// let description = StyleDescription::from_yaml(r##"
    /// $muted: "#888888"
    /// caption:
    ///   color: $muted
    /// "##).unwrap();
    /// assert_eq!(description.get("$muted").unwrap(), "#888888");
    /// assert!(description.contains_key("$muted"));
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, LoadError> {
        Self::parse_yaml(yaml, None)
    }

    /// Parses a description from JSON content.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for invalid JSON and
    /// [`LoadError::NotAMapping`] when the top level is not an object.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Self::parse_json(json, None)
    }

    /// Loads a description from a YAML or JSON file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedExtension`] for unknown extensions,
    /// [`LoadError::Io`] if the file cannot be read, and parse errors as for
    /// [`from_yaml`](Self::from_yaml) and [`from_json`](Self::from_json).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let format = SourceFormat::from_path(path).ok_or_else(|| {
            LoadError::UnsupportedExtension {
                path: path.to_path_buf(),
            }
        })?;

        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), ?format, "loading style description");
        match format {
            SourceFormat::Yaml => Self::parse_yaml(&content, Some(path)),
            SourceFormat::Json => Self::parse_json(&content, Some(path)),
        }
    }

    fn parse_yaml(content: &str, path: Option<&Path>) -> Result<Self, LoadError> {
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_yaml::from_str(content).map_err(|e| LoadError::Parse {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })?;
        Self::from_document(value, path)
    }

    fn parse_json(content: &str, path: Option<&Path>) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(content).map_err(|e| LoadError::Parse {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })?;
        Self::from_document(value, path)
    }

    fn from_document(value: Value, path: Option<&Path>) -> Result<Self, LoadError> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            // `~` or `null` as the whole document.
            Value::Null => Ok(Self::new()),
            other => Err(LoadError::NotAMapping {
                path: path.map(PathBuf::from),
                found: kind_of(&other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let ext = STYLESHEET_EXTENSIONS
            .iter()
            .find(|ext| file_name.ends_with(*ext))?;
        match *ext {
            ".json" => Some(SourceFormat::Json),
            _ => Some(SourceFormat::Yaml),
        }
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

impl From<Map<String, Value>> for StyleDescription {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl From<StyleDescription> for Value {
    fn from(description: StyleDescription) -> Self {
        Value::Object(description.entries)
    }
}

impl TryFrom<Value> for StyleDescription {
    type Error = LoadError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_document(value, None)
    }
}

impl FromIterator<(String, Value)> for StyleDescription {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for StyleDescription {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a StyleDescription {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
