//! Conditional population of JSON objects.
//!
//! Derived widget configuration must never carry a key whose source field is absent, `null` or
//! of the wrong shape, since a present-but-empty key overrides the widget's own default.

use serde_json::{Map, Value};

/// A check on the shape of a JSON value.
pub type ShapePredicate = fn(&Value) -> bool;

/// Accepts JSON objects only. Arrays and primitives are rejected.
pub fn is_object(value: &Value) -> bool {
    value.is_object()
}

pub fn is_string(value: &Value) -> bool {
    value.is_string()
}

/// Accepts any non-null value.
pub fn is_present(value: &Value) -> bool {
    !value.is_null()
}

pub trait MapExt {
    /// Inserts `value` under `key` iff it is present, non-null and satisfies `predicate`.
    /// Returns whether the key was inserted.
    fn insert_if(&mut self, key: &str, value: Option<Value>, predicate: ShapePredicate) -> bool;

    /// Like [`MapExt::insert_if`] with [`is_present`], for values that are already typed.
    fn insert_some<T>(&mut self, key: &str, value: Option<T>) -> bool
    where
        T: Into<Value>,
    {
        self.insert_if(key, value.map(Into::into), is_present)
    }
}

impl MapExt for Map<String, Value> {
    fn insert_if(&mut self, key: &str, value: Option<Value>, predicate: ShapePredicate) -> bool {
        match value {
            Some(value) if !value.is_null() && predicate(&value) => {
                self.insert(key.to_owned(), value);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn test_insert_if_skips_null() {
        let mut map = Map::new();
        assert!(!map.insert_if("rules", Some(Value::Null), is_present));
        assert!(!map.insert_if("rules", None, is_object));
        assert!(map.get("rules").is_none());
    }

    #[test]
    fn test_insert_if_object_rejects_arrays_and_primitives() {
        let mut map = Map::new();
        assert!(!map.insert_if("rules", Some(json!([1, 2])), is_object));
        assert!(!map.insert_if("rules", Some(json!("rule")), is_object));
        assert!(!map.insert_if("rules", Some(json!(3)), is_object));
        assert!(map.is_empty());

        assert!(map.insert_if("rules", Some(json!({".Tab": {"color": "red"}})), is_object));
        assert_eq!(map.get("rules").unwrap()[".Tab"]["color"], "red");
    }

    #[test]
    fn test_insert_if_string() {
        let mut map = Map::new();
        assert!(!map.insert_if("labels", Some(json!(true)), is_string));
        assert!(map.insert_if("labels", Some(json!("floating")), is_string));
        assert_eq!(map.get("labels"), Some(&json!("floating")));
    }

    #[test]
    fn test_insert_some_for_typed_values() {
        let mut map = Map::new();
        assert!(!map.insert_some::<bool>("hideCardNicknameField", None));
        assert!(map.insert_some("showCardFormByDefault", Some(false)));
        assert_eq!(map.get("showCardFormByDefault"), Some(&json!(false)));
        assert!(!map.contains_key("hideCardNicknameField"));
    }
}
