// ============================================================================
// spark-mvvm - Binding Paths
// Dot-separated property paths and the left folds that read/write them
// ============================================================================

use std::fmt;

use crate::collections::ReactiveObject;
use crate::core::value::Value;
use crate::error::{BindError, Result};

// =============================================================================
// PATH
// =============================================================================

/// A parsed binding expression such as `user.name`.
///
/// Surrounding whitespace is ignored, both around the whole expression and
/// around each segment, so `{{ user . name }}` binds the same path as
/// `{{user.name}}`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse a dot-separated expression.
    ///
    /// Fails with `InvalidPath` if any segment is empty.
    pub fn parse(expression: &str) -> Result<Self> {
        let segments: Vec<String> = expression
            .trim()
            .split('.')
            .map(|s| s.trim().to_string())
            .collect();

        if segments.iter().any(String::is_empty) {
            return Err(BindError::InvalidPath {
                path: expression.to_string(),
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final key of the path.
    pub fn last(&self) -> &str {
        // parse() guarantees at least one segment
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    fn resolution_error(&self, segment: &str) -> BindError {
        BindError::PathResolution {
            path: self.to_string(),
            segment: segment.to_string(),
        }
    }

    /// Resolve the path against `root` with a left fold of tracked reads.
    ///
    /// Every property read along the way registers the active watcher, if
    /// there is one. Every segment but the last must name an object; a
    /// missing final key reads as [`Value::Undefined`].
    pub fn resolve(&self, root: &ReactiveObject) -> Result<Value> {
        let parent = self.resolve_parent(root)?;
        Ok(parent.get(self.last()).unwrap_or(Value::Undefined))
    }

    /// Resolve the object that owns the final key.
    fn resolve_parent(&self, root: &ReactiveObject) -> Result<ReactiveObject> {
        let mut acc = root.clone();
        let parents = &self.segments[..self.segments.len() - 1];
        for segment in parents {
            let next = acc
                .get(segment)
                .ok_or_else(|| self.resolution_error(segment))?;
            acc = match next {
                Value::Object(obj) => obj,
                _ => return Err(self.resolution_error(segment)),
            };
        }
        Ok(acc)
    }

    /// Write `value` at the path: fold to the parent object, then set the
    /// final key on it.
    ///
    /// Returns whether the write changed the stored value.
    pub fn assign(&self, root: &ReactiveObject, value: impl Into<Value>) -> Result<bool> {
        let parent = self.resolve_parent(root)?;
        parent.set(self.last(), value)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({self})")
    }
}

// =============================================================================
// EXPRESSION SHORTHANDS
// =============================================================================

/// Read the value at `expression` (tracked).
pub fn get_val(root: &ReactiveObject, expression: &str) -> Result<Value> {
    Path::parse(expression)?.resolve(root)
}

/// Write the value at `expression`.
pub fn set_val(root: &ReactiveObject, expression: &str, value: impl Into<Value>) -> Result<bool> {
    Path::parse(expression)?.assign(root, value)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> ReactiveObject {
        ReactiveObject::from_json(json!({
            "a": 1,
            "user": { "name": "x", "address": { "city": "Oslo" } },
            "tags": ["t"]
        }))
        .unwrap()
    }

    #[test]
    fn parse_trims_whitespace() {
        let p = Path::parse("  user . name ").unwrap();
        assert_eq!(p.segments(), ["user", "name"]);
        assert_eq!(p.to_string(), "user.name");
        assert_eq!(p.last(), "name");
    }

    #[test]
    fn parse_rejects_empty_segments() {
        for bad in ["", "  ", "a..b", ".a", "a."] {
            assert!(
                matches!(Path::parse(bad), Err(BindError::InvalidPath { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn resolve_nested() {
        let root = data();
        assert_eq!(get_val(&root, "a").unwrap().to_string(), "1");
        assert_eq!(get_val(&root, "user.name").unwrap().to_string(), "x");
        assert_eq!(
            get_val(&root, "user.address.city").unwrap().to_string(),
            "Oslo"
        );
    }

    #[test]
    fn missing_final_key_is_undefined() {
        let root = data();
        assert!(get_val(&root, "later").unwrap().is_undefined());
        assert!(get_val(&root, "user.age").unwrap().is_undefined());
        assert_eq!(get_val(&root, "user.age").unwrap().to_string(), "undefined");
    }

    #[test]
    fn missing_intermediate_key_fails() {
        let root = data();
        let err = get_val(&root, "user.contact.email").unwrap_err();
        match err {
            BindError::PathResolution { path, segment } => {
                assert_eq!(path, "user.contact.email");
                assert_eq!(segment, "contact");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_final_key_still_tracks_parents() {
        use crate::core::types::{downgrade_watcher, AnyWatcher};
        use crate::reactivity::tracking::tracked;
        use std::rc::Rc;

        struct Noop;
        impl AnyWatcher for Noop {
            fn update(&self) -> Result<()> {
                Ok(())
            }
        }

        let root = data();
        let w = Rc::new(Noop);
        let value = tracked(downgrade_watcher(&w), || get_val(&root, "user.age")).unwrap();

        assert!(value.is_undefined());
        assert_eq!(root.subscriber_count("user"), 1);
    }

    #[test]
    fn resolve_through_primitive_fails() {
        let root = data();
        assert!(matches!(
            get_val(&root, "a.b"),
            Err(BindError::PathResolution { .. })
        ));
        // arrays are opaque
        assert!(matches!(
            get_val(&root, "tags.0"),
            Err(BindError::PathResolution { .. })
        ));
    }

    #[test]
    fn assign_writes_final_key_of_parent() {
        let root = data();
        assert!(set_val(&root, "user.address.city", "Bergen").unwrap());
        assert_eq!(
            get_val(&root, "user.address.city").unwrap().to_string(),
            "Bergen"
        );

        // same value again: unchanged
        assert!(!set_val(&root, "user.address.city", "Bergen").unwrap());
    }

    #[test]
    fn assign_through_missing_parent_fails() {
        let root = data();
        assert!(set_val(&root, "nope.name", "y").is_err());
    }

    #[test]
    fn assign_defines_missing_final_key() {
        let root = data();
        assert!(set_val(&root, "user.nick", "n").unwrap());
        assert_eq!(get_val(&root, "user.nick").unwrap().as_str(), Some("n"));
    }
}
