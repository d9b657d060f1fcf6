// ============================================================================
// spark-mvvm - Dependency Registry
// The per-property subscriber list
// ============================================================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::core::types::{same_watcher, AnyWatcher};
use crate::error::Result;

// =============================================================================
// DEP
// =============================================================================

/// Subscribers of one reactive property.
///
/// Holds weak handles in registration order. There is no way to remove a
/// subscriber: the list only grows for the life of the property, except
/// that handles to dropped watchers are pruned before each notification.
#[derive(Default)]
pub struct Dep {
    subscribers: RefCell<Vec<Weak<dyn AnyWatcher>>>,
}

impl Dep {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscriber.
    ///
    /// A watcher that is already registered is not added again; watchers
    /// re-resolve their path on every update, so without this the list
    /// would grow by one entry per write.
    pub fn register(&self, watcher: Weak<dyn AnyWatcher>) {
        let mut subscribers = self.subscribers.borrow_mut();
        if subscribers.iter().any(|w| same_watcher(w, &watcher)) {
            return;
        }
        subscribers.push(watcher);
        trace!(subscribers = subscribers.len(), "registered watcher");
    }

    /// Number of registered subscribers (including not-yet-pruned dead ones).
    pub fn len(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// True if nothing ever subscribed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-run every subscriber, in registration order, synchronously.
    ///
    /// The subscriber list is copied out before the first update runs, so
    /// an update that reads this property (and registers again) cannot
    /// conflict with the iteration. The first failing update stops the
    /// walk and its error is returned.
    pub fn notify_all(&self) -> Result<()> {
        // BORROW SAFETY: collect first, then release the borrow before
        // calling out into watcher code.
        let subscribers: Vec<Rc<dyn AnyWatcher>> = {
            let mut list = self.subscribers.borrow_mut();
            list.retain(|w| w.strong_count() > 0);
            list.iter().filter_map(Weak::upgrade).collect()
        };

        trace!(subscribers = subscribers.len(), "notifying");

        for watcher in subscribers {
            watcher.update()?;
        }
        Ok(())
    }
}

impl fmt::Debug for Dep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dep")
            .field("subscribers", &self.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::downgrade_watcher;
    use crate::error::BindError;
    use std::cell::Cell;

    struct Recorder {
        id: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl AnyWatcher for Recorder {
        fn update(&self) -> Result<()> {
            self.log.borrow_mut().push(self.id);
            Ok(())
        }
    }

    struct Failing(Cell<usize>);

    impl AnyWatcher for Failing {
        fn update(&self) -> Result<()> {
            self.0.set(self.0.get() + 1);
            Err(BindError::InvalidPath { path: String::new() })
        }
    }

    #[test]
    fn notifies_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dep::new();
        let watchers: Vec<_> = (0..3)
            .map(|id| Rc::new(Recorder { id, log: log.clone() }))
            .collect();

        for w in watchers.iter().rev() {
            dep.register(downgrade_watcher(w));
        }
        dep.notify_all().unwrap();

        assert_eq!(*log.borrow(), vec![2, 1, 0]);
    }

    #[test]
    fn register_is_idempotent_per_watcher() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dep::new();
        let w = Rc::new(Recorder { id: 7, log: log.clone() });

        dep.register(downgrade_watcher(&w));
        dep.register(downgrade_watcher(&w));
        assert_eq!(dep.len(), 1);

        dep.notify_all().unwrap();
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn dropped_watchers_are_pruned() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dep::new();
        let kept = Rc::new(Recorder { id: 1, log: log.clone() });
        {
            let gone = Rc::new(Recorder { id: 2, log: log.clone() });
            dep.register(downgrade_watcher(&gone));
        }
        dep.register(downgrade_watcher(&kept));
        assert_eq!(dep.len(), 2);

        dep.notify_all().unwrap();
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(dep.len(), 1);
    }

    #[test]
    fn first_error_stops_notification() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let dep = Dep::new();
        let failing = Rc::new(Failing(Cell::new(0)));
        let after = Rc::new(Recorder { id: 1, log: log.clone() });

        dep.register(downgrade_watcher(&failing));
        dep.register(downgrade_watcher(&after));

        assert!(dep.notify_all().is_err());
        assert_eq!(failing.0.get(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn empty_dep_notifies_nothing() {
        let dep = Dep::new();
        assert!(dep.is_empty());
        dep.notify_all().unwrap();
    }
}
