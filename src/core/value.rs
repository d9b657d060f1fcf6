// ============================================================================
// spark-mvvm - Dynamic Values
// The value type stored in reactive properties
// ============================================================================

use std::fmt;
use std::rc::Rc;

use crate::collections::ReactiveObject;

// =============================================================================
// VALUE
// =============================================================================

/// A value held by a reactive property.
///
/// Cloning is cheap: strings are copied, but arrays and objects are shared
/// handles, so a clone of an `Object` is the *same* object (writes through
/// either handle notify the same subscribers).
///
/// # Example
///
/// ```
/// use spark_mvvm::Value;
///
/// let v = Value::from(serde_json::json!({ "user": { "name": "x" } }));
/// let user = v.as_object().unwrap().peek("user").unwrap();
/// assert_eq!(user.as_object().unwrap().peek("name").unwrap().to_string(), "x");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    /// The result of reading a key that does not exist.
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    /// Opaque array. Elements are plain data and are never observed.
    Array(Rc<Vec<serde_json::Value>>),
    /// Nested reactive object.
    Object(ReactiveObject),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn as_object(&self) -> Option<&ReactiveObject> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Snapshot as plain JSON without registering any dependency.
    ///
    /// Non-finite numbers and `Undefined` become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null | Value::Undefined => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => serde_json::Value::Array(items.as_ref().clone()),
            Value::Object(obj) => obj.to_json(),
        }
    }
}

// =============================================================================
// EQUALITY
// =============================================================================

/// Strict equality: primitives by value, arrays and objects by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::reactivity::equality::strict_equals(self, other)
    }
}

// =============================================================================
// RENDERING
// =============================================================================

/// Text form used when a value is rendered into a node.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        // -0 renders as 0
        "0".to_string()
    } else {
        n.to_string()
    }
}

fn format_plain(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => join_items(items),
        serde_json::Value::Object(_) => "[object Object]".to_string(),
    }
}

fn join_items(items: &[serde_json::Value]) -> String {
    items.iter().map(format_plain).collect::<Vec<_>>().join(",")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => f.write_str(&join_items(items)),
            Value::Object(_) => f.write_str("[object Object]"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Undefined => f.write_str("Undefined"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Object(obj) => f.debug_tuple("Object").field(obj).finish(),
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

impl From<serde_json::Value> for Value {
    /// Plain data enters the reactive world here: objects are intercepted
    /// recursively (see [`observe`](crate::reactivity::observer::observe)).
    fn from(value: serde_json::Value) -> Self {
        crate::reactivity::observer::observe(value)
    }
}

impl From<ReactiveObject> for Value {
    fn from(obj: ReactiveObject) -> Self {
        Value::Object(obj)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(n as f64)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_like_text_content() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(f64::NAN).to_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_string(), "-Infinity");
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }

    #[test]
    fn arrays_render_joined() {
        let v = Value::from(json!([1, "a", null, [2, 3], {"k": 1}]));
        assert_eq!(v.to_string(), "1,a,,2,3,[object Object]");
    }

    #[test]
    fn objects_render_opaquely() {
        let v = Value::from(json!({"a": 1}));
        assert_eq!(v.to_string(), "[object Object]");
        assert_eq!(v.type_name(), "object");
    }

    #[test]
    fn json_snapshot_round_trips_shape() {
        let input = json!({"a": 1.0, "b": {"c": "x"}, "d": [1, 2], "e": null});
        let v = Value::from(input.clone());
        assert_eq!(v.to_json(), input);
    }

    #[test]
    fn option_conversion() {
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(Some("x")).as_str(), Some("x"));
    }
}
