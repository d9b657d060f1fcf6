// ============================================================================
// spark-mvvm - Compile
// Fragment extraction and the directive-dispatching tree walk
// ============================================================================

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::compiler::directives::{Directive, DirectiveRegistry, TextDirective};
use crate::compiler::interpolation::has_interpolation;
use crate::compiler::BindingScope;
use crate::dom::DomNode;
use crate::error::{BindError, Result};

/// Attribute prefix marking a directive (`v-model`).
pub const DIRECTIVE_PREFIX: &str = "v-";

/// Directive type of an attribute name: the token after the prefix, up to
/// the next `-` or `:`.
///
/// ```
/// use spark_mvvm::compiler::compile::directive_name;
///
/// assert_eq!(directive_name("v-model"), Some("model"));
/// assert_eq!(directive_name("v-on:input"), Some("on"));
/// assert_eq!(directive_name("class"), None);
/// ```
pub fn directive_name(attribute: &str) -> Option<&str> {
    let rest = attribute.strip_prefix(DIRECTIVE_PREFIX)?;
    let name = rest.split(['-', ':']).next().unwrap_or(rest);
    (!name.is_empty()).then_some(name)
}

// =============================================================================
// FRAGMENT
// =============================================================================

/// Children detached from a root while they are being compiled.
pub struct Fragment<N: DomNode> {
    nodes: Vec<N>,
}

impl<N: DomNode> Fragment<N> {
    /// Move every child of `root` into a new fragment.
    pub fn extract(root: &N) -> Self {
        Self {
            nodes: root.take_children(),
        }
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Hand the nodes back to `root`, in order.
    pub fn reattach(self, root: &N) {
        for node in self.nodes {
            root.append_child(node);
        }
    }
}

// =============================================================================
// COMPILER
// =============================================================================

/// Finds bindings in a node tree and hands them to directive handlers.
///
/// Attribute directives are looked up by name in the registry; text
/// interpolation always goes to the text handler.
pub struct Compiler<N: DomNode> {
    directives: DirectiveRegistry<N>,
    text: Rc<dyn Directive<N>>,
}

impl<N: DomNode> Compiler<N> {
    /// A compiler with the built-in directives.
    pub fn new() -> Self {
        Self::with_registry(DirectiveRegistry::with_builtins())
    }

    pub fn with_registry(directives: DirectiveRegistry<N>) -> Self {
        Self {
            directives,
            text: Rc::new(TextDirective),
        }
    }

    /// Builder: add an attribute directive.
    pub fn with_directive(mut self, name: &str, handler: impl Directive<N> + 'static) -> Self {
        self.directives.register(name, handler);
        self
    }

    pub fn directives(&self) -> &DirectiveRegistry<N> {
        &self.directives
    }

    pub fn directives_mut(&mut self) -> &mut DirectiveRegistry<N> {
        &mut self.directives
    }

    /// Compile everything under `root` against `scope`.
    ///
    /// The children are detached into a fragment for the walk and put back
    /// afterward, also when a binding fails; the failure is then returned.
    pub fn compile(&self, root: &N, scope: &BindingScope) -> Result<()> {
        let fragment = Fragment::extract(root);
        debug!(nodes = fragment.len(), "compiling fragment");

        let result = self.compile_nodes(fragment.nodes(), scope);
        fragment.reattach(root);
        result
    }

    fn compile_nodes(&self, nodes: &[N], scope: &BindingScope) -> Result<()> {
        for node in nodes {
            if node.is_element() {
                self.compile_element(node, scope)?;
                self.compile_nodes(&node.child_nodes(), scope)?;
            } else {
                self.compile_text(node, scope)?;
            }
        }
        Ok(())
    }

    fn compile_element(&self, node: &N, scope: &BindingScope) -> Result<()> {
        for attribute in node.attributes() {
            let Some(name) = directive_name(&attribute.name) else {
                continue;
            };
            let handler = self
                .directives
                .get(name)
                .ok_or_else(|| BindError::UnknownDirective {
                    name: name.to_string(),
                })?;

            debug!(directive = name, expression = %attribute.value, "binding directive");
            handler.bind(node, scope, &attribute.value)?;
        }
        Ok(())
    }

    fn compile_text(&self, node: &N, scope: &BindingScope) -> Result<()> {
        let text = node.text_content();
        if has_interpolation(&text) {
            debug!(template = %text, "binding interpolation");
            self.text.bind(node, scope, &text)?;
        }
        Ok(())
    }
}

impl<N: DomNode> Default for Compiler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: DomNode> fmt::Debug for Compiler<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compiler")
            .field("directives", &self.directives)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
