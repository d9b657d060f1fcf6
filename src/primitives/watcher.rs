// ============================================================================
// spark-mvvm - Watcher Primitive
// One binding's dependency on one data path
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::collections::ReactiveObject;
use crate::core::types::{AnyWatcher, WatchCallback};
use crate::core::value::Value;
use crate::error::Result;
use crate::reactivity::equality::strict_not_equal;
use crate::reactivity::path::Path;
use crate::reactivity::tracking::tracked;

// =============================================================================
// WATCHER
// =============================================================================

/// Watches one path of a data object and calls back when its value changes.
///
/// Construction resolves the path once inside a tracking scope, which is
/// what registers the watcher with every property along the path. Later
/// writes to any of those properties call [`AnyWatcher::update`], which
/// re-resolves the path and invokes the callback only when the result is
/// strictly different from the cached value.
///
/// Registries only hold weak handles, so a watcher stays subscribed for as
/// long as someone keeps the returned `Rc` alive.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use spark_mvvm::{ReactiveObject, Watcher};
///
/// let data = ReactiveObject::from_json(serde_json::json!({ "a": 1 })).unwrap();
/// let calls = Rc::new(Cell::new(0));
///
/// let counter = calls.clone();
/// let _w = Watcher::new(&data, "a", move |_| {
///     counter.set(counter.get() + 1);
///     Ok(())
/// })
/// .unwrap();
///
/// data.set("a", 2).unwrap();
/// data.set("a", 2).unwrap(); // unchanged, no callback
/// assert_eq!(calls.get(), 1);
/// ```
pub struct Watcher {
    /// Handle to ourselves, registered with the properties we read
    this: Weak<Watcher>,

    /// Root object the path is resolved against
    data: ReactiveObject,

    path: Path,

    /// Last observed value
    value: RefCell<Value>,

    callback: WatchCallback,
}

impl Watcher {
    /// Create a watcher and perform its initial, tracked evaluation.
    ///
    /// The callback is not invoked for the initial value.
    pub fn new(
        data: &ReactiveObject,
        expression: &str,
        callback: impl Fn(&Value) -> Result<()> + 'static,
    ) -> Result<Rc<Self>> {
        let path = Path::parse(expression)?;
        let watcher = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            data: data.clone(),
            path,
            value: RefCell::new(Value::Null),
            callback: Box::new(callback),
        });

        let initial = watcher.get()?;
        trace!(path = %watcher.path, value = %initial, "watcher created");
        *watcher.value.borrow_mut() = initial;
        Ok(watcher)
    }

    /// Resolve the path with this watcher as the active one.
    fn get(&self) -> Result<Value> {
        let this: Weak<dyn AnyWatcher> = self.this.clone();
        tracked(this, || self.path.resolve(&self.data))
    }

    /// The cached value from the last evaluation.
    pub fn value(&self) -> Value {
        self.value.borrow().clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The data object this watcher resolves against.
    pub fn data(&self) -> &ReactiveObject {
        &self.data
    }
}

impl AnyWatcher for Watcher {
    /// Re-resolve and fire the callback if the value changed.
    ///
    /// Resolution runs tracked again, so an object replaced somewhere along
    /// the path picks this watcher up as well.
    fn update(&self) -> Result<()> {
        let new_value = self.get()?;

        let changed = strict_not_equal(&self.value.borrow(), &new_value);
        if !changed {
            return Ok(());
        }

        trace!(path = %self.path, value = %new_value, "watcher fired");
        *self.value.borrow_mut() = new_value.clone();
        (self.callback)(&new_value)
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("path", &self.path)
            .field("value", &*self.value.borrow())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
