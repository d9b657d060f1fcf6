// ============================================================================
// spark-mvvm - Equality Functions
// Strict equality used for change suppression
// ============================================================================

use crate::core::value::Value;

// =============================================================================
// STRICT EQUALITY (Default)
// =============================================================================

/// Strict equality between two values.
///
/// - Primitives compare by value. Numbers follow IEEE 754, so `NaN` is never
///   equal to itself and `0.0` equals `-0.0`.
/// - Arrays and objects compare by identity: two objects with the same
///   contents are still different values.
///
/// # Example
/// ```
/// use spark_mvvm::reactivity::equality::strict_equals;
/// use spark_mvvm::Value;
///
/// assert!(strict_equals(&Value::from(2), &Value::from(2.0)));
/// assert!(!strict_equals(&Value::from("2"), &Value::from(2)));
/// assert!(!strict_equals(&Value::from(f64::NAN), &Value::from(f64::NAN)));
/// ```
pub fn strict_equals(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Undefined, Value::Undefined) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => std::rc::Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
        _ => false,
    }
}

/// Strict inequality, the test a write must pass to notify subscribers.
pub fn strict_not_equal(a: &Value, b: &Value) -> bool {
    !strict_equals(a, b)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::ReactiveObject;
    use serde_json::json;

    #[test]
    fn primitives_compare_by_value() {
        assert!(strict_equals(&Value::from(1), &Value::from(1)));
        assert!(strict_equals(&Value::from("a"), &Value::from("a")));
        assert!(strict_equals(&Value::from(true), &Value::from(true)));
        assert!(strict_equals(&Value::Null, &Value::Null));

        assert!(strict_not_equal(&Value::from(1), &Value::from(2)));
        assert!(strict_not_equal(&Value::from("1"), &Value::from(1)));
        assert!(strict_not_equal(&Value::Null, &Value::from(false)));
        assert!(strict_equals(&Value::Undefined, &Value::Undefined));
        assert!(strict_not_equal(&Value::Undefined, &Value::Null));
    }

    #[test]
    fn nan_and_signed_zero() {
        assert!(strict_not_equal(&Value::from(f64::NAN), &Value::from(f64::NAN)));
        assert!(strict_equals(&Value::from(0.0), &Value::from(-0.0)));
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = ReactiveObject::new();
        let b = ReactiveObject::new();

        assert!(strict_equals(&Value::from(a.clone()), &Value::from(a.clone())));
        assert!(strict_not_equal(&Value::from(a), &Value::from(b)));
    }

    #[test]
    fn arrays_compare_by_identity() {
        let a = Value::from(json!([1, 2]));
        let b = Value::from(json!([1, 2]));

        assert!(strict_equals(&a, &a.clone()));
        assert!(strict_not_equal(&a, &b));
    }
}
