// ============================================================================
// spark-mvvm - Node Updates
// The writes directives perform on their nodes
// ============================================================================

use crate::core::value::Value;
use crate::dom::DomNode;

/// Replace a node's text.
pub fn update_text<N: DomNode>(node: &N, text: &str) {
    node.set_text_content(text);
}

/// Push a value into a form control. `null` and `undefined` clear it.
pub fn update_model<N: DomNode>(node: &N, value: &Value) {
    match value {
        Value::Null | Value::Undefined => node.set_value(""),
        other => node.set_value(&other.to_string()),
    }
}
