// ============================================================================
// spark-mvvm - Observer
// Turning plain data into reactive objects
// ============================================================================
//
// Every object in the input becomes a ReactiveObject whose properties are
// reactive cells (value + Dep). Nested objects are converted recursively.
// Scalars are the base case; arrays are kept as opaque leaves and their
// contents are never observed.
// ============================================================================

use std::rc::Rc;

use tracing::trace;

use crate::collections::ReactiveObject;
use crate::core::value::Value;

/// Recursively convert plain JSON into a reactive value.
///
/// # Example
///
/// ```
/// use spark_mvvm::reactivity::observer::observe;
///
/// let v = observe(serde_json::json!({ "a": { "b": 1 } }));
/// let a = v.as_object().unwrap().peek("a").unwrap();
/// assert!(a.as_object().is_some());
/// ```
pub fn observe(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(Rc::new(items)),
        serde_json::Value::Object(map) => Value::Object(observe_object(map)),
    }
}

/// Convert a JSON map into a reactive object, one reactive property per key,
/// in the map's order.
pub fn observe_object(map: serde_json::Map<String, serde_json::Value>) -> ReactiveObject {
    let obj = ReactiveObject::with_capacity(map.len());
    for (key, value) in map {
        trace!(key = %key, "intercepting property");
        obj.define(key, observe(value));
    }
    obj
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_are_base_case() {
        assert!(observe(json!(null)).is_null());
        assert_eq!(observe(json!(true)).as_bool(), Some(true));
        assert_eq!(observe(json!(3)).as_f64(), Some(3.0));
        assert_eq!(observe(json!("s")).as_str(), Some("s"));
    }

    #[test]
    fn nested_objects_become_reactive() {
        let v = observe(json!({ "user": { "address": { "city": "Oslo" } } }));
        let root = v.as_object().unwrap();
        let user = root.peek("user").unwrap();
        let address = user.as_object().unwrap().peek("address").unwrap();
        assert!(address.as_object().unwrap().contains_key("city"));
    }

    #[test]
    fn arrays_stay_opaque() {
        let v = observe(json!({ "items": [{ "a": 1 }] }));
        let items = v.as_object().unwrap().peek("items").unwrap();
        match items {
            Value::Array(items) => assert_eq!(items[0], json!({ "a": 1 })),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn key_order_is_preserved() {
        let v = observe(json!({ "z": 1, "a": 2, "m": 3 }));
        let keys = v.as_object().unwrap().keys();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
