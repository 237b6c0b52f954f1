//! # Extensible Stylesheet - Variables and Extension for Style Registries
//!
//! `extensible-stylesheet` layers two features over any style registry:
//!
//! - **Variables**: top-level `$name` entries whose values are substituted
//!   wherever a style property's value is exactly `"$name"`
//! - **Extension**: deriving a new stylesheet by deep-merging overrides over an
//!   existing one
//!
//! The registry itself is pluggable through the [`StyleRegistrar`] trait. The
//! crate never inspects the handles a registrar produces.
//!
//! ## Core Concepts
//!
//! - [`StyleDescription`]: The raw input, variables included
//! - [`VariableTable`]: Variables split off a description
//! - [`StyleSheet`]: A built, immutable stylesheet
//! - [`StyleRegistrar`]: Turns substituted style groups into handles
//! - [`StyleSheets`]: Entry point bound to one registrar, forwarding its exports
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use extensible_stylesheet::{PlainRegistrar, StyleDescription, StyleSheet};
//! use serde_json::json;
//!
//! let base = StyleSheet::create(
//!     Arc::new(PlainRegistrar),
//!     StyleDescription::try_from(json!({
//!         "$color": "#ff0000",
//!         "container": { "fontSize": 12, "color": "$color" }
//!     })).unwrap(),
//! ).unwrap();
//!
//! let extended = base.extend(StyleDescription::try_from(json!({
//!     "$color2": "#00ff00",
//!     "container": { "fontWeight": "bold" },
//!     "centered": { "justifyContent": "center" }
//! })).unwrap()).unwrap();
//!
//! let last = extended.extend(StyleDescription::try_from(json!({
//!     "$color": "#00ffff",
//!     "container": { "fontSize": 24 }
//! })).unwrap()).unwrap();
//!
//! assert_eq!(last.variable("$color"), Some(&json!("#00ffff")));
//! assert_eq!(last.variable("$color2"), Some(&json!("#00ff00")));
//! assert_eq!(
//!     last.style("container"),
//!     Some(&json!({ "fontSize": 24, "fontWeight": "bold", "color": "#00ffff" }))
//! );
//! assert_eq!(last.style("centered"), Some(&json!({ "justifyContent": "center" })));
//! ```
//!
//! ## YAML Stylesheets
//!
//! ```rust
//! use extensible_stylesheet::{PlainRegistrar, StyleSheets};
//! use serde_json::json;
//!
//! let sheets = StyleSheets::new(PlainRegistrar);
//! let sheet = sheets.create_from_yaml(r#"
//! $accent: cyan
//! header:
//!   color: $accent
//!   bold: true
//! "#).unwrap();
//!
//! assert_eq!(sheet.style("header"), Some(&json!({ "color": "cyan", "bold": true })));
//! ```
//!
//! ## Errors
//!
//! Building and extending only fail when the registrar fails, and its error is
//! returned unchanged. Unresolved variable references are not errors: the
//! literal string is passed to the registrar as-is.

mod description;
mod error;
mod merge;
mod namespace;
mod registrar;
mod sheet;
mod variables;

pub use description::{is_variable_name, StyleDescription, STYLESHEET_EXTENSIONS, VARIABLE_PREFIX};
pub use error::{LoadError, SourceError};
pub use merge::{deep_merge, merge_value};
pub use namespace::{StyleSheets, RESERVED_NAMES};
pub use registrar::{
    Export, ExportedFn, IdRegistrar, PlainRegistrar, RegisteredStyles, RegistrarError, StyleId,
    StyleRegistrar, WorkingStyleTree, HAIRLINE_WIDTH,
};
pub use sheet::{Entry, StyleSheet};
pub use variables::VariableTable;
