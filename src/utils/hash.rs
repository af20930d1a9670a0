//! Content hashing utilities.

use serde_json::Value;
use std::hash::{Hash, Hasher};
use xxhash_rust::xxh3::xxh3_64;

/// Compute a content hash for arbitrary bytes
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Feed a JSON value into `state` so that values equal under
/// `serde_json::Value`'s `PartialEq` hash identically.
///
/// Object keys are visited in sorted order regardless of the map's
/// iteration order.
pub fn hash_json_value<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_json_value(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                key.hash(state);
                if let Some(v) = map.get(key) {
                    hash_json_value(v, state);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    fn digest(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        hash_json_value(value, &mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_content_hash() {
        let data = b"hello world";
        let hash = content_hash(data);
        assert_ne!(hash, 0);
        assert_eq!(hash, content_hash(data));
        assert_ne!(hash, content_hash(b"hello world!"));
    }

    #[test]
    fn test_json_hash_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"owner":"root","mode":"0644"}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"mode":"0644","owner":"root"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(digest(&a), digest(&b));
    }

    #[test]
    fn test_json_hash_distinguishes_shapes() {
        assert_ne!(digest(&json!(null)), digest(&json!(false)));
        assert_ne!(digest(&json!(["a"])), digest(&json!("a")));
        assert_ne!(digest(&json!({"a": 1})), digest(&json!({"a": "1"})));
    }
}
