// ============================================================================
// spark-mvvm - Type Definitions
// Type-erased subscriber interface for the dependency graph
// ============================================================================

use std::rc::{Rc, Weak};

use crate::core::value::Value;
use crate::error::Result;

// =============================================================================
// TYPE-ERASED SUBSCRIBER
// =============================================================================
//
// A Dep only needs to tell its subscribers "something you read changed".
// It never needs to know what the subscriber does with that, so the registry
// stores Weak<dyn AnyWatcher> and the concrete Watcher keeps its path, cache
// and callback to itself.
// =============================================================================

/// Type-erased subscriber interface for dependency registries.
///
/// Implemented by `Watcher`. Anything that wants to be re-run when a
/// property it read is written implements this.
pub trait AnyWatcher {
    /// Re-evaluate after a dependency changed.
    ///
    /// Implementations decide on their own whether the change is visible
    /// (e.g. the watcher compares against its cached value).
    fn update(&self) -> Result<()>;
}

/// Callback invoked by a watcher with its freshly resolved value.
pub type WatchCallback = Box<dyn Fn(&Value) -> Result<()>>;

/// Compare two subscriber handles by identity.
pub fn same_watcher(a: &Weak<dyn AnyWatcher>, b: &Weak<dyn AnyWatcher>) -> bool {
    // Compare data pointers only; vtable pointers of the same type may differ
    // between codegen units.
    std::ptr::addr_eq(a.as_ptr(), b.as_ptr())
}

/// Downgrade a concrete subscriber into the handle stored by registries.
pub fn downgrade_watcher<W: AnyWatcher + 'static>(watcher: &Rc<W>) -> Weak<dyn AnyWatcher> {
    let weak: Weak<W> = Rc::downgrade(watcher);
    weak
}
