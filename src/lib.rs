// ============================================================================
// spark-mvvm - A Minimal Reactive Data-Binding Engine for Rust
// ============================================================================
//
// Plain data goes in, reactive objects come out; a template compiled against
// them keeps every `v-model` and `{{ interpolation }}` in sync with writes.
// Everything is synchronous: a write has updated every dependent node by the
// time it returns.
// ============================================================================

pub mod collections;
pub mod compiler;
pub mod core;
pub mod dom;
pub mod error;
pub mod mvvm;
pub mod primitives;
pub mod reactivity;

// Re-export core items at crate root for ergonomic access
pub use crate::core::context::{is_tracking, is_untracking, with_context, ReactiveContext};
pub use crate::core::types::{AnyWatcher, WatchCallback};
pub use crate::core::value::Value;
pub use error::{BindError, Result};

// Reactive data and watchers
pub use collections::ReactiveObject;
pub use primitives::watcher::Watcher;
pub use reactivity::dep::Dep;
pub use reactivity::equality::{strict_equals, strict_not_equal};
pub use reactivity::observer::observe;
pub use reactivity::path::{get_val, set_val, Path};
pub use reactivity::tracking::{track_read, tracked, untrack};

// Templates
pub use compiler::{
    BindingScope, Compiler, Directive, DirectiveRegistry, Fragment, ModelDirective, TextDirective,
};
pub use dom::{DomNode, MemNode, NodeKind};

// Façade
pub use mvvm::{ElementRef, MountConfig, Mvvm, Options};

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn equal_write_invokes_no_callback() {
        let data = ReactiveObject::from_json(json!({ "a": 1 })).unwrap();
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let _w = Watcher::new(&data, "a", move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })
        .unwrap();

        assert!(!data.set("a", 1).unwrap());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn tracking_slot_cleared_after_evaluation() {
        let data = ReactiveObject::from_json(json!({ "a": 1 })).unwrap();

        let _ok = Watcher::new(&data, "a", |_| Ok(())).unwrap();
        assert!(!is_tracking());

        assert!(Watcher::new(&data, "a.b.c", |_| Ok(())).is_err());
        assert!(!is_tracking());
    }

    #[test]
    fn facade_end_to_end() {
        let label = MemNode::text("{{ user.name }} ({{ age }})");
        let input = MemNode::element("input").with_attr("v-model", "user.name");
        let app = MemNode::element("div")
            .with_attr("id", "app")
            .with_children([label.clone(), input.clone()]);
        let doc = MemNode::element("body").with_child(app);

        let vm = Mvvm::new(Options::new(
            ElementRef::query(&doc, "#app"),
            json!({ "user": { "name": "x" }, "age": 30 }),
        ))
        .unwrap();

        assert_eq!(label.text_content(), "x (30)");
        assert_eq!(input.value(), "x");

        input.dispatch_input("y").unwrap();
        assert_eq!(label.text_content(), "y (30)");

        vm.set("age", 31).unwrap();
        assert_eq!(label.text_content(), "y (31)");
    }
}
