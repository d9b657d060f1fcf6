// ============================================================================
// spark-mvvm - Render Target
// The node capabilities the compiler and directives rely on
// ============================================================================
//
// The compiler never talks to a concrete tree. Anything that can list its
// attributes and children, hand its children over, take text and value
// writes, and report input events can be bound. MemNode is the in-memory
// implementation used by tests and benches.
// ============================================================================

mod mem;

use std::rc::Rc;

pub use mem::MemNode;

use crate::error::Result;

/// What kind of node the compiler is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// A name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Listener invoked with the node's new value when the user edits it.
pub type InputListener = Rc<dyn Fn(&str) -> Result<()>>;

/// Capability interface of a bindable node.
///
/// Handles are cheap clones referring to the same underlying node.
pub trait DomNode: Clone + 'static {
    fn kind(&self) -> NodeKind;

    /// Tag name for elements, `None` for text nodes.
    fn tag_name(&self) -> Option<String>;

    /// Attributes in document order (empty for text nodes).
    fn attributes(&self) -> Vec<Attribute>;

    /// Current child nodes, in order.
    fn child_nodes(&self) -> Vec<Self>;

    /// Detach and return all children.
    fn take_children(&self) -> Vec<Self>;

    fn append_child(&self, child: Self);

    fn text_content(&self) -> String;

    fn set_text_content(&self, text: &str);

    /// Set the editable value (form controls).
    fn set_value(&self, value: &str);

    /// Subscribe to user edits of the node's value.
    fn add_input_listener(&self, listener: InputListener);

    fn is_element(&self) -> bool {
        self.kind() == NodeKind::Element
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes()
            .into_iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value)
    }

    /// Find the first descendant element matching `selector`, depth-first.
    ///
    /// `#id` matches on the `id` attribute; anything else is compared with
    /// the tag name.
    fn query_selector(&self, selector: &str) -> Option<Self> {
        for child in self.child_nodes() {
            if child.is_element() && matches_selector(&child, selector) {
                return Some(child);
            }
            if let Some(found) = child.query_selector(selector) {
                return Some(found);
            }
        }
        None
    }
}

fn matches_selector<N: DomNode>(node: &N, selector: &str) -> bool {
    match selector.strip_prefix('#') {
        Some(id) => node.attribute("id").as_deref() == Some(id),
        None => node
            .tag_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(selector)),
    }
}
