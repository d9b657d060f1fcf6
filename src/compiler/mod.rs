// ============================================================================
// spark-mvvm - Template Compiler Module
// Walks a node tree and wires its bindings to watchers
// ============================================================================

pub mod compile;
pub mod directives;
pub mod interpolation;
pub mod updates;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::collections::ReactiveObject;
use crate::core::value::Value;
use crate::error::Result;
use crate::primitives::watcher::Watcher;

pub use compile::{Compiler, Fragment, DIRECTIVE_PREFIX};
pub use directives::{Directive, DirectiveRegistry, ModelDirective, TextDirective};

// =============================================================================
// BINDING SCOPE
// =============================================================================

/// What directives bind against: the data object, plus ownership of every
/// watcher created for it.
///
/// Registries only hold weak handles, so the scope is what keeps bindings
/// alive; dropping it silently disconnects them.
#[derive(Debug)]
pub struct BindingScope {
    data: ReactiveObject,
    watchers: RefCell<Vec<Rc<Watcher>>>,
}

impl BindingScope {
    pub fn new(data: ReactiveObject) -> Self {
        Self {
            data,
            watchers: RefCell::new(Vec::new()),
        }
    }

    pub fn data(&self) -> &ReactiveObject {
        &self.data
    }

    /// Create a watcher on `expression` and keep it alive for the life of
    /// the scope.
    pub fn watch(
        &self,
        expression: &str,
        callback: impl Fn(&Value) -> Result<()> + 'static,
    ) -> Result<Rc<Watcher>> {
        let watcher = Watcher::new(&self.data, expression, callback)?;
        debug!(path = %watcher.path(), "binding watcher");
        self.watchers.borrow_mut().push(watcher.clone());
        Ok(watcher)
    }

    /// Number of watchers owned by this scope.
    pub fn watcher_count(&self) -> usize {
        self.watchers.borrow().len()
    }
}
