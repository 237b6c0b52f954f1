//! Construction and extension behaviour seen through the public API.

use std::sync::{Arc, Mutex};

use extensible_stylesheet::{
    PlainRegistrar, RegisteredStyles, StyleDescription, StyleRegistrar, StyleSheet,
    WorkingStyleTree,
};
use serde_json::{json, Value};

// ============================================================================
// Test helpers
// ============================================================================

/// Registrar that records every tree it is asked to register.
#[derive(Default)]
struct RecordingRegistrar {
    seen: Mutex<Vec<WorkingStyleTree>>,
}

impl RecordingRegistrar {
    fn last(&self) -> WorkingStyleTree {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl StyleRegistrar for RecordingRegistrar {
    type Handle = Value;
    type Error = std::convert::Infallible;

    fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<Value>, Self::Error> {
        self.seen.lock().unwrap().push(tree.clone());
        PlainRegistrar.register(tree)
    }
}

/// Registrar that maps every group to a fixed handle, ignoring its content.
struct FixedRegistrar(Value);

impl StyleRegistrar for FixedRegistrar {
    type Handle = Value;
    type Error = std::convert::Infallible;

    fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<Value>, Self::Error> {
        Ok(tree.keys().map(|k| (k.clone(), self.0.clone())).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RegistrarFailure(&'static str);

struct FailingRegistrar;

impl StyleRegistrar for FailingRegistrar {
    type Handle = ();
    type Error = RegistrarFailure;

    fn register(&self, _tree: &WorkingStyleTree) -> Result<RegisteredStyles<()>, Self::Error> {
        Err(RegistrarFailure("registry unavailable"))
    }
}

/// Registrar that refuses any tree containing a `broken` group.
struct PickyRegistrar;

impl StyleRegistrar for PickyRegistrar {
    type Handle = ();
    type Error = RegistrarFailure;

    fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<()>, Self::Error> {
        if tree.contains_key("broken") {
            return Err(RegistrarFailure("broken group"));
        }
        Ok(tree.keys().map(|k| (k.clone(), ())).collect())
    }
}

fn description(value: Value) -> StyleDescription {
    StyleDescription::try_from(value).unwrap()
}

fn create(value: Value) -> StyleSheet<PlainRegistrar> {
    StyleSheet::create(Arc::new(PlainRegistrar), description(value)).unwrap()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn create_without_options_is_empty() {
    let sheet = StyleSheet::create(Arc::new(PlainRegistrar), StyleDescription::default()).unwrap();
    assert!(sheet.is_empty());
}

#[test]
fn variables_are_accessible_by_prefixed_name() {
    let sheet = create(json!({ "$textColor": "#FF0000" }));
    assert_eq!(sheet.variable("$textColor"), Some(&json!("#FF0000")));
    assert_eq!(
        sheet.get("$textColor").and_then(|e| e.as_variable()),
        Some(&json!("#FF0000"))
    );
}

#[test]
fn style_groups_expose_registrar_handles() {
    let handle = json!({ "prop": "unique value" });
    let sheet = StyleSheet::create(
        Arc::new(FixedRegistrar(handle.clone())),
        description(json!({ "container": { "prop": 1 } })),
    )
    .unwrap();

    assert_eq!(sheet.style("container"), Some(&handle));
}

#[test]
fn variable_names_are_replaced_before_registration() {
    let registrar = Arc::new(RecordingRegistrar::default());
    StyleSheet::create(
        Arc::clone(&registrar),
        description(json!({
            "$color": "#ff0000",
            "$fontSize": 14,
            "container": {
                "backgroundColor": "$color",
                "fontSize": "$fontSize"
            }
        })),
    )
    .unwrap();

    let tree = registrar.last();
    assert_eq!(tree["container"]["backgroundColor"], json!("#ff0000"));
    assert_eq!(tree["container"]["fontSize"], json!(14));
}

#[test]
fn variables_never_reach_the_registrar() {
    let registrar = Arc::new(RecordingRegistrar::default());
    StyleSheet::create(
        Arc::clone(&registrar),
        description(json!({ "$a": 1, "$b": { "nested": true }, "group": {} })),
    )
    .unwrap();

    let tree = registrar.last();
    assert_eq!(tree.len(), 1);
    assert!(tree.keys().all(|k| !k.starts_with('$')));
}

#[test]
fn unresolved_variable_names_pass_through() {
    let registrar = Arc::new(RecordingRegistrar::default());
    StyleSheet::create(
        Arc::clone(&registrar),
        description(json!({ "container": { "backgroundColor": "$color" } })),
    )
    .unwrap();

    assert_eq!(
        registrar.last()["container"]["backgroundColor"],
        json!("$color")
    );
}

#[test]
fn registrar_errors_propagate_unchanged() {
    let err = StyleSheet::create(
        Arc::new(FailingRegistrar),
        description(json!({ "container": {} })),
    )
    .unwrap_err();
    assert_eq!(err, RegistrarFailure("registry unavailable"));
}

// ============================================================================
// Extension
// ============================================================================

#[test]
fn extend_returns_new_sheet_with_same_content() {
    let src = create(json!({ "$c": "#0f0", "box": { "color": "$c" } }));
    let extended = src.extend_empty().unwrap();

    assert!(!std::ptr::eq(&src, &extended));
    assert_eq!(extended.variables(), src.variables());
    assert_eq!(extended.styles(), src.styles());
}

#[test]
fn extend_inherits_variables() {
    let src = create(json!({ "$color": "#00FF00" }));
    let extended = src.extend_empty().unwrap();
    assert_eq!(extended.variable("$color"), Some(&json!("#00FF00")));
}

#[test]
fn extend_adds_new_variables() {
    let src = create(json!({ "$baseColor": "#0F0F0F" }));
    let extended = src.extend(description(json!({ "$color": "#0000FF" }))).unwrap();

    assert_eq!(extended.variable("$color"), Some(&json!("#0000FF")));
    assert_eq!(extended.variable("$baseColor"), Some(&json!("#0F0F0F")));
    assert!(src.variable("$color").is_none());
}

#[test]
fn extend_overrides_variables() {
    let src = create(json!({ "$color": "#0FABC1" }));
    let extended = src.extend(description(json!({ "$color": "#000000" }))).unwrap();

    assert_eq!(extended.variable("$color"), Some(&json!("#000000")));
    assert_eq!(src.variable("$color"), Some(&json!("#0FABC1")));
}

#[test]
fn extend_merges_nested_groups() {
    let src = create(json!({ "merged": { "fontSize": 14 } }));
    let extended = src
        .extend(description(json!({ "merged": { "fontWeight": "bold" } })))
        .unwrap();

    assert_eq!(
        extended.style("merged"),
        Some(&json!({ "fontSize": 14, "fontWeight": "bold" }))
    );
}

#[test]
fn extend_overrides_overlapping_properties() {
    let src = create(json!({ "container": { "fontSize": 32 } }));
    let extended = src
        .extend(description(json!({ "container": { "fontSize": 22 } })))
        .unwrap();

    assert_eq!(extended.style("container"), Some(&json!({ "fontSize": 22 })));
    assert_eq!(src.style("container"), Some(&json!({ "fontSize": 32 })));
}

#[test]
fn chained_extension_accumulates() {
    let base = create(json!({
        "$color": "#ff0000",
        "container": { "fontSize": 12 }
    }));
    let second = base
        .extend(description(json!({
            "$color2": "#00ff00",
            "container": { "fontWeight": "bold" },
            "centered": { "justifyContent": "center" }
        })))
        .unwrap();
    let third = second
        .extend(description(json!({
            "$color": "#00ffff",
            "$color3": "#ffffff",
            "container": { "fontSize": 24 }
        })))
        .unwrap();

    assert_eq!(third.variable("$color"), Some(&json!("#00ffff")));
    assert_eq!(third.variable("$color2"), Some(&json!("#00ff00")));
    assert_eq!(third.variable("$color3"), Some(&json!("#ffffff")));
    assert_eq!(
        third.style("container"),
        Some(&json!({ "fontSize": 24, "fontWeight": "bold" }))
    );
    assert_eq!(
        third.style("centered"),
        Some(&json!({ "justifyContent": "center" }))
    );

    // Ancestors are unchanged.
    assert_eq!(base.variable("$color"), Some(&json!("#ff0000")));
    assert!(base.style("centered").is_none());
    assert_eq!(
        second.style("container"),
        Some(&json!({ "fontSize": 12, "fontWeight": "bold" }))
    );
}

#[test]
fn extension_keeps_parent_raw_description() {
    let src = create(json!({ "$c": 1, "g": { "p": "$c" } }));
    let before = src.raw_description().clone();

    let _ = src.extend(description(json!({ "$c": 2, "g": { "q": 3 } }))).unwrap();

    assert_eq!(src.raw_description(), &before);
}

#[test]
fn extension_uses_the_parent_registrar() {
    let registrar = Arc::new(RecordingRegistrar::default());
    let src = StyleSheet::create(
        Arc::clone(&registrar),
        description(json!({ "$c": "red", "a": { "color": "$c" } })),
    )
    .unwrap();
    src.extend(description(json!({ "$c": "blue" }))).unwrap();

    assert_eq!(registrar.seen.lock().unwrap().len(), 2);
    assert_eq!(registrar.last()["a"]["color"], json!("blue"));
}

#[test]
fn extension_propagates_registrar_errors() {
    let src = StyleSheet::create(
        Arc::new(PickyRegistrar),
        description(json!({ "fine": {} })),
    )
    .unwrap();

    let err = src
        .extend(description(json!({ "broken": {} })))
        .unwrap_err();
    assert_eq!(err, RegistrarFailure("broken group"));
}

#[test]
fn sheets_can_be_built_across_threads() {
    let base = Arc::new(create(json!({ "$c": 0, "g": { "v": "$c" } })));

    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let base = Arc::clone(&base);
            std::thread::spawn(move || {
                base.extend(description(json!({ "$c": i })))
                    .unwrap()
                    .style("g")
                    .cloned()
            })
        })
        .collect();

    let mut values: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap()["v"].as_i64().unwrap())
        .collect();
    values.sort_unstable();
    assert_eq!(values, vec![1, 2, 3, 4]);
    assert_eq!(base.style("g"), Some(&json!({ "v": 0 })));
}
