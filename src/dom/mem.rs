// ============================================================================
// spark-mvvm - In-Memory Nodes
// A minimal element/text tree implementing DomNode
// ============================================================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::{Attribute, DomNode, InputListener, NodeKind};
use crate::error::Result;

struct MemNodeInner {
    kind: NodeKind,
    tag: Option<String>,
    attributes: RefCell<Vec<Attribute>>,
    children: RefCell<Vec<MemNode>>,
    text: RefCell<String>,
    value: RefCell<String>,
    listeners: RefCell<Vec<InputListener>>,
    text_writes: Cell<usize>,
    value_writes: Cell<usize>,
}

impl MemNodeInner {
    fn new(kind: NodeKind, tag: Option<String>, text: String) -> Self {
        Self {
            kind,
            tag,
            attributes: RefCell::new(Vec::new()),
            children: RefCell::new(Vec::new()),
            text: RefCell::new(text),
            value: RefCell::new(String::new()),
            listeners: RefCell::new(Vec::new()),
            text_writes: Cell::new(0),
            value_writes: Cell::new(0),
        }
    }
}

/// An in-memory node.
///
/// Built with a small builder API and able to simulate user input, which
/// makes it the render target of choice for tests.
///
/// # Example
///
/// ```
/// use spark_mvvm::dom::{DomNode, MemNode};
///
/// let root = MemNode::element("div")
///     .with_attr("id", "app")
///     .with_child(MemNode::text("Hello {{ name }}"));
///
/// let doc = MemNode::element("body").with_child(root.clone());
/// assert!(doc.query_selector("#app").unwrap().ptr_eq(&root));
/// ```
#[derive(Clone)]
pub struct MemNode {
    inner: Rc<MemNodeInner>,
}

impl MemNode {
    /// Create an element node.
    pub fn element(tag: &str) -> Self {
        Self {
            inner: Rc::new(MemNodeInner::new(
                NodeKind::Element,
                Some(tag.to_string()),
                String::new(),
            )),
        }
    }

    /// Create a text node.
    pub fn text(content: &str) -> Self {
        Self {
            inner: Rc::new(MemNodeInner::new(NodeKind::Text, None, content.to_string())),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder: append a child.
    pub fn with_child(self, child: MemNode) -> Self {
        self.append_child(child);
        self
    }

    /// Builder: append several children.
    pub fn with_children(self, children: impl IntoIterator<Item = MemNode>) -> Self {
        for child in children {
            self.append_child(child);
        }
        self
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        let mut attributes = self.inner.attributes.borrow_mut();
        match attributes.iter_mut().find(|attr| attr.name == name) {
            Some(attr) => attr.value = value.to_string(),
            None => attributes.push(Attribute::new(name, value)),
        }
    }

    /// The current editable value.
    pub fn value(&self) -> String {
        self.inner.value.borrow().clone()
    }

    /// Simulate the user typing `value`: store it, then run every input
    /// listener in subscription order.
    pub fn dispatch_input(&self, value: &str) -> Result<()> {
        *self.inner.value.borrow_mut() = value.to_string();

        // Listeners may write data that updates this very node
        let listeners: Vec<InputListener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(value)?;
        }
        Ok(())
    }

    /// How many times text content was written.
    pub fn text_writes(&self) -> usize {
        self.inner.text_writes.get()
    }

    /// How many times the value was written programmatically.
    pub fn value_writes(&self) -> usize {
        self.inner.value_writes.get()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// True if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &MemNode) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl DomNode for MemNode {
    fn kind(&self) -> NodeKind {
        self.inner.kind
    }

    fn tag_name(&self) -> Option<String> {
        self.inner.tag.clone()
    }

    fn attributes(&self) -> Vec<Attribute> {
        self.inner.attributes.borrow().clone()
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.inner.children.borrow().clone()
    }

    fn take_children(&self) -> Vec<Self> {
        self.inner.children.take()
    }

    fn append_child(&self, child: Self) {
        self.inner.children.borrow_mut().push(child);
    }

    /// Text nodes return their text; elements the concatenation of their
    /// descendants' text.
    fn text_content(&self) -> String {
        match self.inner.kind {
            NodeKind::Text => self.inner.text.borrow().clone(),
            NodeKind::Element => self
                .child_nodes()
                .iter()
                .map(DomNode::text_content)
                .collect(),
        }
    }

    fn set_text_content(&self, text: &str) {
        self.inner.text_writes.set(self.inner.text_writes.get() + 1);
        match self.inner.kind {
            NodeKind::Text => *self.inner.text.borrow_mut() = text.to_string(),
            NodeKind::Element => {
                *self.inner.children.borrow_mut() = vec![MemNode::text(text)];
            }
        }
    }

    fn set_value(&self, value: &str) {
        self.inner.value_writes.set(self.inner.value_writes.get() + 1);
        *self.inner.value.borrow_mut() = value.to_string();
    }

    fn add_input_listener(&self, listener: InputListener) {
        self.inner.listeners.borrow_mut().push(listener);
    }
}

impl fmt::Debug for MemNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.kind {
            NodeKind::Text => f.debug_tuple("Text").field(&*self.inner.text.borrow()).finish(),
            NodeKind::Element => f
                .debug_struct("Element")
                .field("tag", &self.inner.tag)
                .field("attributes", &*self.inner.attributes.borrow())
                .field("children", &*self.inner.children.borrow())
                .finish(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn builder_and_traversal() {
        let input = MemNode::element("input").with_attr("v-model", "a");
        let root = MemNode::element("div")
            .with_attr("id", "app")
            .with_children([MemNode::text("x"), input.clone()]);

        assert!(root.is_element());
        assert_eq!(root.tag_name().as_deref(), Some("div"));
        assert_eq!(root.attribute("id").as_deref(), Some("app"));
        assert_eq!(root.child_nodes().len(), 2);
        assert!(root.child_nodes()[1].ptr_eq(&input));
        assert_eq!(input.attribute("v-model").as_deref(), Some("a"));
    }

    #[test]
    fn set_attribute_replaces_existing() {
        let node = MemNode::element("p").with_attr("class", "a");
        node.set_attribute("class", "b");
        assert_eq!(node.attributes(), vec![Attribute::new("class", "b")]);
    }

    #[test]
    fn take_children_detaches() {
        let root = MemNode::element("div").with_child(MemNode::text("a"));
        let taken = root.take_children();
        assert_eq!(taken.len(), 1);
        assert!(root.child_nodes().is_empty());

        for child in taken {
            root.append_child(child);
        }
        assert_eq!(root.text_content(), "a");
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let root = MemNode::element("div").with_children([
            MemNode::text("a"),
            MemNode::element("span").with_child(MemNode::text("b")),
            MemNode::text("c"),
        ]);
        assert_eq!(root.text_content(), "abc");
    }

    #[test]
    fn write_counters() {
        let text = MemNode::text("a");
        text.set_text_content("b");
        text.set_text_content("c");
        assert_eq!(text.text_writes(), 2);
        assert_eq!(text.text_content(), "c");

        let input = MemNode::element("input");
        input.set_value("v");
        assert_eq!(input.value_writes(), 1);
        assert_eq!(input.value(), "v");
    }

    #[test]
    fn dispatch_input_runs_listeners() {
        let input = MemNode::element("input");
        let seen = Rc::new(RefCell::new(String::new()));
        let sink = seen.clone();
        input.add_input_listener(Rc::new(move |v| {
            *sink.borrow_mut() = v.to_string();
            Ok(())
        }));

        input.dispatch_input("typed").unwrap();
        assert_eq!(input.value(), "typed");
        assert_eq!(*seen.borrow(), "typed");
        // user input is not a programmatic write
        assert_eq!(input.value_writes(), 0);
        assert_eq!(input.listener_count(), 1);
    }

    #[test]
    fn query_selector_by_id_and_tag() {
        let target = MemNode::element("section").with_attr("id", "app");
        let doc = MemNode::element("body").with_child(
            MemNode::element("main").with_children([MemNode::text("t"), target.clone()]),
        );

        assert!(doc.query_selector("#app").unwrap().ptr_eq(&target));
        assert!(doc.query_selector("SECTION").unwrap().ptr_eq(&target));
        assert!(doc.query_selector("#missing").is_none());
        assert!(doc.query_selector("body").is_none());
    }

    #[test]
    fn listener_may_touch_node() {
        let input = MemNode::element("input");
        let calls = Rc::new(Cell::new(0));
        let node = input.clone();
        let counter = calls.clone();
        input.add_input_listener(Rc::new(move |v| {
            counter.set(counter.get() + 1);
            node.set_value(&v.to_uppercase());
            Ok(())
        }));

        input.dispatch_input("abc").unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(input.value(), "ABC");
    }
}
