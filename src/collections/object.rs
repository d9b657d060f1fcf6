// ============================================================================
// spark-mvvm - ReactiveObject
// A string-keyed object whose every property is a reactive cell
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::value::Value;
use crate::error::{BindError, Result};
use crate::reactivity::dep::Dep;
use crate::reactivity::equality::strict_equals;
use crate::reactivity::tracking::track_read;

// =============================================================================
// PROPERTY
// =============================================================================

/// One reactive slot: the current value and the registry of watchers that
/// read it.
struct Property {
    value: RefCell<Value>,
    dep: Dep,
}

impl Property {
    fn new(value: Value) -> Self {
        Self {
            value: RefCell::new(value),
            dep: Dep::new(),
        }
    }
}

// =============================================================================
// REACTIVE OBJECT
// =============================================================================

/// A reactive object with per-property granularity.
///
/// - `get(key)` registers the active watcher with that key only.
/// - `set(key, value)` notifies that key's watchers, and only when the new
///   value is strictly different from the stored one.
///
/// Cloning yields another handle to the same object.
///
/// # Example
///
/// ```
/// use spark_mvvm::ReactiveObject;
/// use serde_json::json;
///
/// let user = ReactiveObject::from_json(json!({ "name": "x" })).unwrap();
/// assert_eq!(user.get("name").unwrap().to_string(), "x");
///
/// assert!(user.set("name", "y").unwrap());  // changed
/// assert!(!user.set("name", "y").unwrap()); // same value, suppressed
/// ```
#[derive(Clone, Default)]
pub struct ReactiveObject {
    inner: Rc<RefCell<IndexMap<String, Rc<Property>>>>,
}

impl ReactiveObject {
    /// Create a new empty reactive object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reactive object with room for `capacity` properties.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(IndexMap::with_capacity(capacity))),
        }
    }

    /// Build a reactive object from plain JSON.
    ///
    /// Fails with `InvalidData` unless `value` is a JSON object.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(crate::reactivity::observer::observe_object(map)),
            other => Err(BindError::InvalidData {
                found: json_type_name(&other),
            }),
        }
    }

    /// Look up a property handle, releasing the map borrow before returning.
    fn property(&self, key: &str) -> Option<Rc<Property>> {
        self.inner.borrow().get(key).cloned()
    }

    /// Install a fresh reactive property under `key`.
    pub(crate) fn define(&self, key: String, value: Value) {
        self.inner
            .borrow_mut()
            .insert(key, Rc::new(Property::new(value)));
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Read a property, registering the active watcher with it.
    ///
    /// Returns `None` if the key does not exist.
    pub fn get(&self, key: &str) -> Option<Value> {
        let property = self.property(key)?;
        track_read(&property.dep);
        let value = property.value.borrow().clone();
        Some(value)
    }

    /// Read a property without registering anything.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.property(key)
            .map(|property| property.value.borrow().clone())
    }

    /// Returns true if the object has a property named `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.borrow().contains_key(key)
    }

    /// Property names in definition order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of watchers registered with `key` (0 for a missing key).
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.property(key)
            .map(|property| property.dep.len())
            .unwrap_or(0)
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    /// Write a property.
    ///
    /// If the new value is strictly equal to the stored one this is a no-op
    /// and returns `Ok(false)`. Otherwise the value is stored and every
    /// watcher of the property is updated before this returns `Ok(true)`.
    /// The first watcher error aborts the notification and is returned;
    /// the value stays written.
    ///
    /// Plain JSON passed here is made reactive on the way in, so a freshly
    /// attached nested object is observable immediately. A missing key is
    /// defined as a new reactive property with no subscribers.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();

        let Some(property) = self.property(key) else {
            trace!(key, "defining property on write");
            self.define(key.to_string(), value);
            return Ok(true);
        };

        {
            let mut current = property.value.borrow_mut();
            if strict_equals(&current, &value) {
                trace!(key, "write suppressed, value unchanged");
                return Ok(false);
            }
            *current = value;
        }

        trace!(key, subscribers = property.dep.len(), "property changed");
        property.dep.notify_all()?;
        Ok(true)
    }

    // =========================================================================
    // IDENTITY / SNAPSHOT
    // =========================================================================

    /// True if both handles point to the same object.
    pub fn ptr_eq(&self, other: &ReactiveObject) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Untracked deep snapshot as plain JSON.
    ///
    /// Does not guard against cycles built by hand through `set`.
    pub fn to_json(&self) -> serde_json::Value {
        let entries: Vec<(String, Rc<Property>)> = self
            .inner
            .borrow()
            .iter()
            .map(|(k, p)| (k.clone(), p.clone()))
            .collect();

        let map = entries
            .into_iter()
            .map(|(k, p)| {
                let value = p.value.borrow().to_json();
                (k, value)
            })
            .collect();
        serde_json::Value::Object(map)
    }
}

impl fmt::Debug for ReactiveObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveObject")
            .field("keys", &self.keys())
            .finish()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// =============================================================================
// TESTS
// =============================================================================
