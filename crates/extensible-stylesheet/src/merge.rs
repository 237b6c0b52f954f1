//! Deep merge of style descriptions.
//!
//! Extension layers a new description over an existing one:
//!
//! - Keys present on only one side are kept.
//! - When both sides hold a mapping, the mappings merge recursively.
//! - Otherwise the overriding value replaces the base value. Arrays are
//!   replaced wholesale, never merged element by element.

use serde_json::{Map, Value};

use crate::description::StyleDescription;

/// Merges `overrides` over `base`, returning a new description.
///
/// Neither input is modified.
///
/// # Example
///
/// ```rust
/// use extensible_stylesheet::{deep_merge, StyleDescription};
/// use serde_json::json;
///
/// let base = StyleDescription::try_from(json!({
///     "$color": "#ff0000",
///     "merged": { "fontSize": 14 }
/// })).unwrap();
/// let overrides = StyleDescription::try_from(json!({
///     "merged": { "fontWeight": "bold" }
/// })).unwrap();
///
/// let merged = deep_merge(&base, &overrides);
/// assert_eq!(
///     serde_json::Value::from(merged),
///     json!({
///         "$color": "#ff0000",
///         "merged": { "fontSize": 14, "fontWeight": "bold" }
///     })
/// );
/// ```
pub fn deep_merge(base: &StyleDescription, overrides: &StyleDescription) -> StyleDescription {
    let mut merged = base.as_map().clone();
    merge_object(&mut merged, overrides.as_map().clone());
    StyleDescription::from(merged)
}

/// Overlays `layer` onto `target` in place.
///
/// A mapping merged into a non-mapping target replaces it with an empty
/// mapping first. Every other layer value replaces the target.
///
/// ```rust
/// use extensible_stylesheet::merge_value;
/// use serde_json::json;
///
/// let mut button = json!({
///     "padding": 8,
///     "colors": { "fg": "$text", "bg": "$surface" },
///     "transform": [{ "scale": 1 }]
/// });
/// merge_value(&mut button, json!({ "colors": { "bg": "$accent" }, "opacity": 0.9 }));
/// assert_eq!(button["colors"], json!({ "fg": "$text", "bg": "$accent" }));
/// assert_eq!(button["opacity"], json!(0.9));
///
/// // Arrays are leaves: the override replaces the whole list.
/// merge_value(&mut button, json!({ "transform": [{ "rotate": "45deg" }] }));
/// assert_eq!(button["transform"], json!([{ "rotate": "45deg" }]));
/// ```
pub fn merge_value(target: &mut Value, layer: Value) {
    match layer {
        Value::Object(map) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(existing) = target {
                merge_object(existing, map);
            }
        }
        other => *target = other,
    }
}

fn merge_object(target: &mut Map<String, Value>, layer: Map<String, Value>) {
    for (key, value) in layer {
        match target.get_mut(&key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                merge_value(existing, value);
            }
            _ => {
                target.insert(key, value);
            }
        }
    }
}
