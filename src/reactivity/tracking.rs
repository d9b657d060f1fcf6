// ============================================================================
// spark-mvvm - Dependency Tracking
// Correlating property reads with the watcher that caused them
// ============================================================================

use std::rc::Weak;

use crate::core::context::{with_context, TrackingScope};
use crate::core::types::AnyWatcher;
use crate::reactivity::dep::Dep;

// =============================================================================
// TRACK READ - Register dependency when reading a property
// =============================================================================

/// Track a read of a property, registering the active watcher (if any)
/// into the property's registry.
///
/// Called by `ReactiveObject::get()` before handing out the value.
pub fn track_read(dep: &Dep) {
    let active = with_context(|ctx| {
        if ctx.is_untracking() {
            None
        } else {
            ctx.get_active_watcher()
        }
    });

    // Context borrow is released before touching the registry
    if let Some(watcher) = active {
        dep.register(watcher);
    }
}

// =============================================================================
// TRACKED / UNTRACK
// =============================================================================

/// Run `f` with `watcher` as the active watcher.
///
/// Every tracked read performed by `f` registers `watcher`. The previous
/// active watcher is restored afterward, whether `f` returns or panics.
pub fn tracked<T>(watcher: Weak<dyn AnyWatcher>, f: impl FnOnce() -> T) -> T {
    let _scope = TrackingScope::enter(watcher);
    f()
}

/// Run `f` without registering any dependency.
///
/// # Example
///
/// ```
/// use spark_mvvm::{untrack, ReactiveObject};
///
/// let obj = ReactiveObject::from_json(serde_json::json!({ "a": 1 })).unwrap();
/// let a = untrack(|| obj.get("a"));
/// assert_eq!(a.unwrap().to_string(), "1");
/// ```
pub fn untrack<T>(f: impl FnOnce() -> T) -> T {
    let prev = with_context(|ctx| ctx.set_untracking(true));

    // Use a guard pattern to ensure we restore even on panic
    struct UntrackGuard {
        prev: bool,
    }

    impl Drop for UntrackGuard {
        fn drop(&mut self) {
            with_context(|ctx| ctx.set_untracking(self.prev));
        }
    }

    let _guard = UntrackGuard { prev };
    f()
}

// =============================================================================
// TESTS
// =============================================================================
