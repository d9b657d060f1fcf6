// ============================================================================
// spark-mvvm - Directives
// Handlers that turn one binding into watchers and node updates
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::collections::ReactiveObject;
use crate::compiler::updates::{update_model, update_text};
use crate::compiler::{interpolation, BindingScope};
use crate::dom::DomNode;
use crate::error::Result;
use crate::reactivity::path::{get_val, Path};
use crate::reactivity::tracking::untrack;

// =============================================================================
// DIRECTIVE TRAIT
// =============================================================================

/// A binding handler.
///
/// `bind` is called once per occurrence found by the compiler, with the
/// node carrying it, the scope to create watchers in, and the bound
/// expression (the attribute value, or the whole text for interpolation).
///
/// # Example
///
/// ```
/// use spark_mvvm::compiler::{BindingScope, Directive};
/// use spark_mvvm::dom::DomNode;
/// use spark_mvvm::Result;
///
/// /// `v-show`: hide the element when the bound value is falsy.
/// struct Show;
///
/// impl<N: DomNode> Directive<N> for Show {
///     fn bind(&self, node: &N, scope: &BindingScope, expression: &str) -> Result<()> {
///         let target = node.clone();
///         scope.watch(expression, move |v| {
///             target.set_value(if v.as_bool() == Some(true) { "shown" } else { "hidden" });
///             Ok(())
///         })?;
///         Ok(())
///     }
/// }
/// ```
pub trait Directive<N: DomNode> {
    fn bind(&self, node: &N, scope: &BindingScope, expression: &str) -> Result<()>;
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Directive handlers keyed by name (`model` for `v-model`).
pub struct DirectiveRegistry<N: DomNode> {
    handlers: HashMap<String, Rc<dyn Directive<N>>>,
}

impl<N: DomNode> DirectiveRegistry<N> {
    /// A registry with no handlers.
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry with the built-in attribute directives (`model`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("model", ModelDirective);
        registry
    }

    /// Register `handler` under `name`, returning the handler it replaces.
    pub fn register(
        &mut self,
        name: &str,
        handler: impl Directive<N> + 'static,
    ) -> Option<Rc<dyn Directive<N>>> {
        self.handlers.insert(name.to_string(), Rc::new(handler))
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn Directive<N>>> {
        self.handlers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<N: DomNode> Default for DirectiveRegistry<N> {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl<N: DomNode> fmt::Debug for DirectiveRegistry<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("names", &self.names())
            .finish()
    }
}

// =============================================================================
// v-model
// =============================================================================

/// Two-way value binding.
///
/// Data → node through a watcher; node → data through an input listener
/// that writes the typed text back at the same path.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDirective;

impl<N: DomNode> Directive<N> for ModelDirective {
    fn bind(&self, node: &N, scope: &BindingScope, expression: &str) -> Result<()> {
        let path = Path::parse(expression)?;
        let value = untrack(|| path.resolve(scope.data()))?;

        let target = node.clone();
        scope.watch(expression, move |new_value| {
            update_model(&target, new_value);
            Ok(())
        })?;

        let data = scope.data().clone();
        node.add_input_listener(Rc::new(move |input: &str| {
            path.assign(&data, input)?;
            Ok(())
        }));

        update_model(node, &value);
        Ok(())
    }
}

// =============================================================================
// {{ text }}
// =============================================================================

/// Text interpolation.
///
/// One watcher per `{{expr}}` occurrence. Whichever fires, the whole
/// original template is rendered again from the current data, so every
/// occurrence in the node stays consistent.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDirective;

impl<N: DomNode> Directive<N> for TextDirective {
    fn bind(&self, node: &N, scope: &BindingScope, expression: &str) -> Result<()> {
        let template: Rc<str> = Rc::from(expression);
        let initial = render_text(scope.data(), &template)?;

        for occurrence in interpolation::expressions(expression) {
            let target = node.clone();
            let data = scope.data().clone();
            let template = template.clone();
            scope.watch(occurrence, move |_| {
                let text = render_text(&data, &template)?;
                update_text(&target, &text);
                Ok(())
            })?;
        }

        update_text(node, &initial);
        Ok(())
    }
}

/// Substitute the current value of every occurrence into `template`.
fn render_text(data: &ReactiveObject, template: &str) -> Result<String> {
    untrack(|| {
        interpolation::render(template, |expr| {
            get_val(data, expr).map(|value| value.to_string())
        })
    })
}

// =============================================================================
// TESTS
// =============================================================================
