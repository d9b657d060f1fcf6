// ============================================================================
// spark-mvvm - View Model
// The façade tying data, proxy surface and compiled template together
// ============================================================================

use std::fmt;
use std::rc::Rc;

use serde::Deserialize;
use tracing::debug;

use crate::collections::ReactiveObject;
use crate::compiler::{BindingScope, Compiler};
use crate::core::value::Value;
use crate::dom::DomNode;
use crate::error::{BindError, Result};
use crate::primitives::watcher::Watcher;
use crate::reactivity::path::{get_val, set_val};

// =============================================================================
// OPTIONS
// =============================================================================

/// The root a view model compiles against.
#[derive(Clone)]
pub enum ElementRef<N: DomNode> {
    /// A node, used as is.
    Node(N),
    /// The first element of `document` matching `selector`.
    Selector { document: N, selector: String },
}

impl<N: DomNode> ElementRef<N> {
    /// Shorthand for [`ElementRef::Selector`].
    pub fn query(document: &N, selector: &str) -> Self {
        ElementRef::Selector {
            document: document.clone(),
            selector: selector.to_string(),
        }
    }

    /// Resolve to a node, `None` if a selector matches nothing.
    pub fn resolve(&self) -> Option<N> {
        match self {
            ElementRef::Node(node) => Some(node.clone()),
            ElementRef::Selector { document, selector } => document.query_selector(selector),
        }
    }
}

/// View model construction options.
pub struct Options<N: DomNode> {
    pub el: ElementRef<N>,
    /// Plain data; must be a JSON object.
    pub data: serde_json::Value,
}

impl<N: DomNode> Options<N> {
    pub fn new(el: ElementRef<N>, data: serde_json::Value) -> Self {
        Self { el, data }
    }

    /// Options from a parsed mount configuration, resolving `el` as a
    /// selector inside `document`.
    pub fn from_config(document: &N, config: MountConfig) -> Self {
        Self {
            el: ElementRef::query(document, &config.el),
            data: config.data,
        }
    }
}

/// Serializable mount description.
///
/// ```
/// use spark_mvvm::MountConfig;
///
/// let config = MountConfig::from_json(r##"{ "el": "#app", "data": { "a": 1 } }"##).unwrap();
/// assert_eq!(config.el, "#app");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MountConfig {
    /// Selector of the root element
    pub el: String,

    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl MountConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// MVVM
// =============================================================================

/// A mounted view model.
///
/// Construction makes `data` reactive, mirrors its top-level keys as the
/// [`get`](Mvvm::get)/[`set`](Mvvm::set) surface, and compiles the root so
/// that its bindings follow the data from then on. The view model owns
/// every binding; dropping it disconnects them.
///
/// # Example
///
/// ```
/// use spark_mvvm::dom::{DomNode, MemNode};
/// use spark_mvvm::{ElementRef, Mvvm, Options};
/// use serde_json::json;
///
/// let text = MemNode::text("Hello {{ name }}");
/// let app = MemNode::element("div").with_child(text.clone());
///
/// let vm = Mvvm::new(Options::new(ElementRef::Node(app), json!({ "name": "x" }))).unwrap();
/// assert_eq!(text.text_content(), "Hello x");
///
/// vm.set("name", "y").unwrap();
/// assert_eq!(text.text_content(), "Hello y");
/// ```
pub struct Mvvm<N: DomNode> {
    el: Option<N>,
    data: ReactiveObject,
    scope: Rc<BindingScope>,
    /// Top-level keys mirrored by get/set
    proxied: Vec<String>,
}

impl<N: DomNode> Mvvm<N> {
    /// Mount with the built-in directives.
    pub fn new(options: Options<N>) -> Result<Self> {
        Self::with_compiler(options, &Compiler::new())
    }

    /// Mount with a custom compiler (e.g. one carrying extra directives).
    ///
    /// If `el` resolves to nothing the view model is inert: nothing is
    /// proxied and nothing is compiled.
    pub fn with_compiler(options: Options<N>, compiler: &Compiler<N>) -> Result<Self> {
        let data = ReactiveObject::from_json(options.data)?;
        let scope = Rc::new(BindingScope::new(data.clone()));

        let Some(el) = options.el.resolve() else {
            debug!("root element not found, skipping mount");
            return Ok(Self {
                el: None,
                data,
                scope,
                proxied: Vec::new(),
            });
        };

        let proxied = data.keys();
        debug!(keys = ?proxied, "mounting view model");

        compiler.compile(&el, &scope)?;
        debug!(watchers = scope.watcher_count(), "mounted");

        Ok(Self {
            el: Some(el),
            data,
            scope,
            proxied,
        })
    }

    /// The resolved root, `None` if nothing was mounted.
    pub fn el(&self) -> Option<&N> {
        self.el.as_ref()
    }

    /// The underlying reactive data.
    pub fn data(&self) -> &ReactiveObject {
        &self.data
    }

    pub fn is_mounted(&self) -> bool {
        self.el.is_some()
    }

    fn check_proxied(&self, key: &str) -> Result<()> {
        if self.proxied.iter().any(|k| k == key) {
            Ok(())
        } else {
            Err(BindError::UnknownProperty {
                key: key.to_string(),
            })
        }
    }

    /// Read a top-level property (tracked, like any data read).
    pub fn get(&self, key: &str) -> Result<Value> {
        self.check_proxied(key)?;
        self.data
            .get(key)
            .ok_or_else(|| BindError::UnknownProperty {
                key: key.to_string(),
            })
    }

    /// Write a top-level property; returns whether the value changed.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        self.check_proxied(key)?;
        self.data.set(key, value)
    }

    /// Read a nested property by dot path.
    pub fn get_path(&self, expression: &str) -> Result<Value> {
        get_val(&self.data, expression)
    }

    /// Write a nested property by dot path.
    pub fn set_path(&self, expression: &str, value: impl Into<Value>) -> Result<bool> {
        set_val(&self.data, expression, value)
    }

    /// Watch a path the same way a binding does; the watcher lives as long
    /// as the view model.
    pub fn watch(
        &self,
        expression: &str,
        callback: impl Fn(&Value) -> Result<()> + 'static,
    ) -> Result<Rc<Watcher>> {
        self.scope.watch(expression, callback)
    }

    /// Number of live bindings (directives plus programmatic watchers).
    pub fn watcher_count(&self) -> usize {
        self.scope.watcher_count()
    }
}

impl<N: DomNode + fmt::Debug> fmt::Debug for Mvvm<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mvvm")
            .field("el", &self.el)
            .field("data", &self.data)
            .field("watchers", &self.scope.watcher_count())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
