// ============================================================================
// spark-mvvm - Reactive Context
// Thread-local state for tracking which watcher is currently evaluating
// ============================================================================

use std::cell::{Cell, RefCell};
use std::rc::Weak;

use super::types::AnyWatcher;

// =============================================================================
// REACTIVE CONTEXT
// =============================================================================

/// Thread-local reactive context.
///
/// Holds the "active watcher" slot that correlates a property read with the
/// watcher whose evaluation caused it. The slot is only ever entered through
/// [`TrackingScope`], which restores the previous occupant when it ends, so
/// the slot is a stack rather than a single global that must be cleared by
/// hand.
pub struct ReactiveContext {
    /// Watcher currently resolving its path
    pub active_watcher: RefCell<Option<Weak<dyn AnyWatcher>>>,

    /// Whether we're currently untracking (reading without creating dependencies)
    pub untracking: Cell<bool>,
}

impl ReactiveContext {
    /// Create a new reactive context with default values
    pub fn new() -> Self {
        Self {
            active_watcher: RefCell::new(None),
            untracking: Cell::new(false),
        }
    }

    /// Set the active watcher, returning the previous one
    pub fn set_active_watcher(
        &self,
        watcher: Option<Weak<dyn AnyWatcher>>,
    ) -> Option<Weak<dyn AnyWatcher>> {
        self.active_watcher.replace(watcher)
    }

    /// Get the active watcher
    pub fn get_active_watcher(&self) -> Option<Weak<dyn AnyWatcher>> {
        self.active_watcher.borrow().clone()
    }

    /// Check if there's an active watcher
    pub fn has_active_watcher(&self) -> bool {
        self.active_watcher.borrow().is_some()
    }

    /// Set untracking mode, returning previous value
    pub fn set_untracking(&self, value: bool) -> bool {
        self.untracking.replace(value)
    }

    /// Check if currently untracking
    pub fn is_untracking(&self) -> bool {
        self.untracking.get()
    }
}

impl Default for ReactiveContext {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// THREAD-LOCAL ACCESS
// =============================================================================

thread_local! {
    /// The thread-local reactive context
    static CONTEXT: ReactiveContext = ReactiveContext::new();
}

/// Access the thread-local reactive context.
///
/// # Example
///
/// ```ignore
/// with_context(|ctx| {
///     assert!(!ctx.has_active_watcher());
/// });
/// ```
pub fn with_context<R>(f: impl FnOnce(&ReactiveContext) -> R) -> R {
    CONTEXT.with(f)
}

// =============================================================================
// TRACKING SCOPE
// =============================================================================

/// Guard that makes a watcher the active one until dropped.
///
/// Dropping the guard puts back whatever was active before, which also
/// happens while unwinding, so the slot is never left pointing at a watcher
/// whose evaluation failed.
pub struct TrackingScope {
    previous: Option<Option<Weak<dyn AnyWatcher>>>,
    was_untracking: bool,
}

impl TrackingScope {
    /// Enter a scope in which reads register `watcher`.
    pub fn enter(watcher: Weak<dyn AnyWatcher>) -> Self {
        let (previous, was_untracking) = with_context(|ctx| {
            (
                ctx.set_active_watcher(Some(watcher)),
                ctx.set_untracking(false),
            )
        });
        Self {
            previous: Some(previous),
            was_untracking,
        }
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            with_context(|ctx| {
                ctx.set_active_watcher(previous);
                ctx.set_untracking(self.was_untracking);
            });
        }
    }
}

// =============================================================================
// CONVENIENCE FUNCTIONS
// =============================================================================

/// Check if currently tracking dependencies (a watcher is active, not untracking)
pub fn is_tracking() -> bool {
    with_context(|ctx| ctx.has_active_watcher() && !ctx.is_untracking())
}

/// Check if currently untracking
pub fn is_untracking() -> bool {
    with_context(|ctx| ctx.is_untracking())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::downgrade_watcher;
    use crate::error::Result;
    use std::rc::Rc;

    struct Noop;

    impl AnyWatcher for Noop {
        fn update(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn context_creation() {
        with_context(|ctx| {
            assert!(!ctx.has_active_watcher());
            assert!(!ctx.is_untracking());
        });
    }

    #[test]
    fn scope_sets_and_restores() {
        let w = Rc::new(Noop);
        {
            let _scope = TrackingScope::enter(downgrade_watcher(&w));
            assert!(is_tracking());
        }
        assert!(!is_tracking());
    }

    #[test]
    fn nested_scopes_restore_outer_watcher() {
        let outer = Rc::new(Noop);
        let inner = Rc::new(Noop);
        let outer_weak = downgrade_watcher(&outer);

        let _outer_scope = TrackingScope::enter(outer_weak.clone());
        {
            let _inner_scope = TrackingScope::enter(downgrade_watcher(&inner));
            let active = with_context(|ctx| ctx.get_active_watcher()).unwrap();
            assert!(!crate::core::types::same_watcher(&active, &outer_weak));
        }
        let active = with_context(|ctx| ctx.get_active_watcher()).unwrap();
        assert!(crate::core::types::same_watcher(&active, &outer_weak));
    }

    #[test]
    fn scope_is_cleared_on_panic() {
        let result = std::panic::catch_unwind(|| {
            let w = Rc::new(Noop);
            let _scope = TrackingScope::enter(downgrade_watcher(&w));
            panic!("evaluation blew up");
        });
        assert!(result.is_err());
        assert!(!is_tracking());
    }

    #[test]
    fn untracking_flag() {
        with_context(|ctx| {
            assert!(!ctx.is_untracking());

            let prev = ctx.set_untracking(true);
            assert!(!prev);
            assert!(ctx.is_untracking());

            let prev = ctx.set_untracking(false);
            assert!(prev);
            assert!(!ctx.is_untracking());
        });
        assert!(!is_untracking());
    }
}
