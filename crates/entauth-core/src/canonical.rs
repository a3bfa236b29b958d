//! # Canonical Serialization
//!
//! [`CanonicalBytes`] is the only construction path for JSON that is later
//! base64-encoded, hashed, or MAC'd. Object keys are sorted lexicographically
//! at every depth and the output uses compact separators, so the bytes depend
//! only on the logical content of the value.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Compact, key-sorted JSON bytes.
///
/// The inner `Vec<u8>` is private. Downstream code cannot construct
/// `CanonicalBytes` except through [`CanonicalBytes::new()`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Serialize any value into canonical JSON bytes.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        let sorted = sort_keys(value);
        Ok(Self(serde_json::to_vec(&sorted)?))
    }

    /// Access the canonical bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// View the bytes as UTF-8 text. Always succeeds: `serde_json` only emits UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Rebuild every object with its entries inserted in sorted key order.
///
/// Sorting explicitly keeps the output stable even if some dependency in the
/// build graph enables `serde_json/preserve_order`.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = serde_json::Map::new();
            for (k, v) in entries {
                sorted.insert(k, sort_keys(v));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn keys_are_sorted_and_compact() {
        let cb = CanonicalBytes::new(&json!({"usrName": "b", "accountNo": "a", "keyName": "c"}))
            .unwrap();
        assert_eq!(cb.as_str(), r#"{"accountNo":"a","keyName":"c","usrName":"b"}"#);
    }

    #[test]
    fn nested_objects_are_sorted() {
        let cb = CanonicalBytes::new(&json!({"z": {"b": 1, "a": [{"y": 1, "x": 2}]}})).unwrap();
        assert_eq!(cb.as_str(), r#"{"z":{"a":[{"x":2,"y":1}],"b":1}}"#);
    }

    #[test]
    fn hashmap_iteration_order_does_not_leak() {
        let mut a = HashMap::new();
        let mut b = HashMap::new();
        for i in 0..32 {
            a.insert(format!("k{i}"), i);
        }
        for i in (0..32).rev() {
            b.insert(format!("k{i}"), i);
        }
        assert_eq!(CanonicalBytes::new(&a).unwrap(), CanonicalBytes::new(&b).unwrap());
    }

    #[test]
    fn empty_object() {
        assert_eq!(CanonicalBytes::new(&json!({})).unwrap().as_bytes(), b"{}");
    }

    #[test]
    fn non_ascii_strings_are_preserved_as_utf8() {
        let cb = CanonicalBytes::new(&json!({"keyName": "某某科技有限公司"})).unwrap();
        assert_eq!(cb.as_str(), r#"{"keyName":"某某科技有限公司"}"#);
    }

    proptest! {
        #[test]
        fn insertion_order_never_changes_bytes(
            entries in prop::collection::btree_map("[a-zA-Z]{1,12}", any::<String>(), 0..16)
        ) {
            let forward: serde_json::Map<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect();
            let reverse: serde_json::Map<String, Value> = entries
                .iter()
                .rev()
                .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
                .collect();
            let a = CanonicalBytes::new(&forward).unwrap();
            let b = CanonicalBytes::new(&reverse).unwrap();
            prop_assert_eq!(a.as_bytes(), b.as_bytes());
        }

        #[test]
        fn output_is_compact_json_of_same_value(
            entries in prop::collection::btree_map("[a-z]{1,8}", any::<i64>(), 0..16)
        ) {
            let cb = CanonicalBytes::new(&entries).unwrap();
            let parsed: Value = serde_json::from_slice(cb.as_bytes()).unwrap();
            prop_assert_eq!(parsed, serde_json::to_value(&entries).unwrap());
            prop_assert!(!cb.as_str().contains(' '));
        }
    }
}
