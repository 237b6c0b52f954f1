//! The style registrar seam.
//!
//! A [`StyleRegistrar`] turns a plain [`WorkingStyleTree`] into renderable
//! handles. What a handle is belongs to the registrar: a host UI framework
//! might return numeric ids, a renderer might return compiled style objects.
//! Stylesheets only rely on the handles coming back keyed by group name.
//!
//! Two registrars ship with the crate:
//!
//! - [`PlainRegistrar`]: the handle is the substituted group value itself
//! - [`IdRegistrar`]: stores each group and hands out a [`StyleId`]

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};
use thiserror::Error;

/// A style description with variables removed and references substituted.
pub type WorkingStyleTree = Map<String, Value>;

/// Registered handles keyed by style-group name.
pub type RegisteredStyles<H> = HashMap<String, H>;

/// Operation forwarded through [`StyleSheets`](crate::StyleSheets).
pub type ExportedFn<E> = Arc<dyn Fn(&[Value]) -> Result<Value, E> + Send + Sync>;

/// Converts working style trees into registered style handles.
///
/// # Example
///
/// ```rust
/// use extensible_stylesheet::{RegisteredStyles, StyleRegistrar, WorkingStyleTree};
///
/// /// Registers every group under its name's length.
/// struct LengthRegistrar;
///
/// impl StyleRegistrar for LengthRegistrar {
///     type Handle = usize;
///     type Error = std::convert::Infallible;
///
///     fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<usize>, Self::Error> {
///         Ok(tree.keys().map(|name| (name.clone(), name.len())).collect())
///     }
/// }
/// ```
pub trait StyleRegistrar {
    /// Opaque per-group handle.
    type Handle;
    /// Error raised by [`register`](StyleRegistrar::register). Stylesheets
    /// return it to the caller unchanged.
    type Error;

    /// Registers every group of `tree`, returning one handle per group name.
    fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<Self::Handle>, Self::Error>;

    /// Extra constants and operations this registrar offers.
    ///
    /// [`StyleSheets`](crate::StyleSheets) copies these into its forwarding
    /// table when it is created.
    fn exports(&self) -> Vec<(String, Export<Self::Error>)> {
        Vec::new()
    }
}

/// A named value or operation a registrar exposes beyond `register`.
pub enum Export<E> {
    /// A fixed value, such as a hairline width.
    Constant(Value),
    /// A callable taking positional JSON arguments.
    Operation(ExportedFn<E>),
}

impl<E> Export<E> {
    /// Wraps a closure as an exported operation.
    pub fn operation<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, E> + Send + Sync + 'static,
    {
        Export::Operation(Arc::new(f))
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match self {
            Export::Constant(value) => Some(value),
            Export::Operation(_) => None,
        }
    }
}

impl<E> Clone for Export<E> {
    fn clone(&self) -> Self {
        match self {
            Export::Constant(value) => Export::Constant(value.clone()),
            Export::Operation(f) => Export::Operation(Arc::clone(f)),
        }
    }
}

impl<E> fmt::Debug for Export<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Export::Operation(_) => f.write_str("Operation(..)"),
        }
    }
}

/// Registrar whose handles are the substituted group values.
///
/// Useful when styles are consumed as data, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRegistrar;

impl StyleRegistrar for PlainRegistrar {
    type Handle = Value;
    type Error = std::convert::Infallible;

    fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<Value>, Self::Error> {
        Ok(tree
            .iter()
            .map(|(name, group)| (name.clone(), group.clone()))
            .collect())
    }
}

/// Identifier of a style group stored in an [`IdRegistrar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(u32);

impl StyleId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised by [`IdRegistrar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrarError {
    /// A group value was not a mapping of style properties.
    #[error("style group '{name}' must be a mapping, found {found}")]
    InvalidGroup { name: String, found: &'static str },

    /// An id passed to `flatten` was never issued.
    #[error("unknown style id {0}")]
    UnknownId(u32),

    /// An exported operation received arguments it cannot use.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Every id has been issued.
    #[error("style id space exhausted")]
    Exhausted,

    /// The store lock was poisoned by a panicking thread.
    #[error("style store lock poisoned")]
    Poisoned,
}

/// Width of the thinnest line a display can draw, exported as `hairlineWidth`.
pub const HAIRLINE_WIDTH: f64 = 1.0;

#[derive(Debug)]
struct IdStore {
    groups: Vec<Value>,
    max_ids: u32,
}

impl Default for IdStore {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            max_ids: u32::MAX,
        }
    }
}

/// Registrar that stores each group and returns a numeric [`StyleId`].
///
/// Ids start at 1 and increase with every registered group, across all
/// stylesheets built with the same registrar. Stored groups can be read back
/// with [`resolve`](IdRegistrar::resolve) or combined with
/// [`flatten`](IdRegistrar::flatten).
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use extensible_stylesheet::{IdRegistrar, StyleDescription, StyleSheet};
/// use serde_json::json;
///
/// let registrar = Arc::new(IdRegistrar::new());
/// let sheet = StyleSheet::create(
///     Arc::clone(&registrar),
///     StyleDescription::try_from(json!({
///         "$gap": 4,
///         "row": { "margin": "$gap" }
///     })).unwrap(),
/// ).unwrap();
///
/// let id = *sheet.style("row").unwrap();
/// assert_eq!(registrar.resolve(id).unwrap(), Some(json!({ "margin": 4 })));
/// ```
#[derive(Debug, Default)]
pub struct IdRegistrar {
    store: Arc<Mutex<IdStore>>,
}

impl IdRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registrar that issues at most `max_ids` ids.
    ///
    /// A registration that would go past the limit fails with
    /// [`RegistrarError::Exhausted`] and stores none of its groups.
    pub fn with_max_ids(max_ids: u32) -> Self {
        Self {
            store: Arc::new(Mutex::new(IdStore {
                groups: Vec::new(),
                max_ids,
            })),
        }
    }

    /// Returns the stored value for `id`, or `None` if it was never issued.
    pub fn resolve(&self, id: StyleId) -> Result<Option<Value>, RegistrarError> {
        let store = lock(&self.store)?;
        Ok(index_of(id).and_then(|i| store.groups.get(i)).cloned())
    }

    /// Combines several groups into one mapping.
    ///
    /// Properties of later ids override those of earlier ids. The merge is
    /// shallow: a nested property is replaced, not merged.
    pub fn flatten(&self, ids: &[StyleId]) -> Result<Value, RegistrarError> {
        flatten_in(&self.store, ids)
    }

    /// Number of groups registered so far.
    pub fn len(&self) -> Result<usize, RegistrarError> {
        Ok(lock(&self.store)?.groups.len())
    }

    pub fn is_empty(&self) -> Result<bool, RegistrarError> {
        Ok(self.len()? == 0)
    }
}

impl StyleRegistrar for IdRegistrar {
    type Handle = StyleId;
    type Error = RegistrarError;

    fn register(&self, tree: &WorkingStyleTree) -> Result<RegisteredStyles<StyleId>, RegistrarError> {
        if let Some((name, group)) = tree.iter().find(|(_, group)| !group.is_object()) {
            return Err(RegistrarError::InvalidGroup {
                name: name.clone(),
                found: crate::description::kind_of(group),
            });
        }

        let mut store = lock(&self.store)?;
        let issued = u32::try_from(store.groups.len()).map_err(|_| RegistrarError::Exhausted)?;
        let requested = u32::try_from(tree.len()).map_err(|_| RegistrarError::Exhausted)?;
        if issued
            .checked_add(requested)
            .is_none_or(|last| last > store.max_ids)
        {
            return Err(RegistrarError::Exhausted);
        }

        let mut handles = RegisteredStyles::with_capacity(tree.len());
        let mut id = issued;
        for (name, group) in tree {
            id += 1;
            store.groups.push(group.clone());
            handles.insert(name.clone(), StyleId(id));
        }
        tracing::debug!(groups = handles.len(), total = store.groups.len(), "registered style groups");
        Ok(handles)
    }

    fn exports(&self) -> Vec<(String, Export<RegistrarError>)> {
        let store = Arc::clone(&self.store);
        let mut absolute_fill = Map::new();
        absolute_fill.insert("position".into(), "absolute".into());
        for edge in ["left", "right", "top", "bottom"] {
            absolute_fill.insert(edge.into(), Value::from(0_u64));
        }

        vec![
            ("hairlineWidth".into(), Export::Constant(HAIRLINE_WIDTH.into())),
            ("absoluteFill".into(), Export::Constant(Value::Object(absolute_fill))),
            (
                "flatten".into(),
                Export::operation(move |args: &[Value]| {
                    let ids = args
                        .iter()
                        .map(style_id_from_value)
                        .collect::<Result<Vec<_>, _>>()?;
                    flatten_in(&store, &ids)
                }),
            ),
        ]
    }
}

fn lock(store: &Mutex<IdStore>) -> Result<MutexGuard<'_, IdStore>, RegistrarError> {
    store.lock().map_err(|_| RegistrarError::Poisoned)
}

fn index_of(id: StyleId) -> Option<usize> {
    usize::try_from(id.0).ok()?.checked_sub(1)
}

fn flatten_in(store: &Mutex<IdStore>, ids: &[StyleId]) -> Result<Value, RegistrarError> {
    let store = lock(store)?;
    let mut flat = Map::new();
    for &id in ids {
        let group = index_of(id)
            .and_then(|i| store.groups.get(i))
            .ok_or(RegistrarError::UnknownId(id.0))?;
        if let Value::Object(properties) = group {
            for (key, value) in properties {
                flat.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(Value::Object(flat))
}

fn style_id_from_value(value: &Value) -> Result<StyleId, RegistrarError> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .map(StyleId)
        .ok_or_else(|| RegistrarError::InvalidArgument(format!("expected a style id, got {}", value)))
}
