//! Deterministic encoding of structured values into fixture bytes.
//!
//! A value is first lowered to a [`serde_json::Value`] tree. Every object in
//! that tree is then sorted by key, so the output depends neither on the
//! iteration order of hash maps in the value nor on whether serde_json keeps
//! insertion order. The tree is written as pretty JSON with a trailing
//! newline, which keeps structured fixtures reviewable in a diff.
//!
//! Encoding fails closed: NaN and infinite floats, map keys that are not
//! strings or numbers, and any `Serialize` implementation that returns an
//! error produce an error instead of bytes.

mod finite;

use serde::Serialize;

/// Encodes `value` into canonical fixture bytes.
///
/// # Errors
///
/// Returns the serializer error if `value` cannot be represented.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    finite::check(value)?;
    let mut tree = serde_json::to_value(value)?;
    tree.sort_all_objects();
    let mut bytes = serde_json::to_vec_pretty(&tree)?;
    bytes.push(b'\n');
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::ser::{Error as _, Serializer};
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Node {
        kind: &'static str,
        children: Vec<Node>,
    }

    // ===========================================
    // Cycle 1: Output Shape
    // ===========================================

    #[test]
    fn encodes_struct_as_pretty_json_with_newline() {
        let node = Node {
            kind: "leaf",
            children: vec![],
        };
        let bytes = encode(&node).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\n  \"children\": [],\n  \"kind\": \"leaf\"\n}\n"
        );
    }

    #[test]
    fn encodes_unsized_values() {
        assert_eq!(encode("text").unwrap(), b"\"text\"\n".to_vec());
        assert_eq!(encode(&[1u8, 2][..]).unwrap(), b"[\n  1,\n  2\n]\n".to_vec());
    }

    // ===========================================
    // Cycle 2: Determinism
    // ===========================================

    #[test]
    fn hash_map_encodes_like_sorted_map() {
        let keys = ["delta", "alpha", "charlie", "bravo", "echo", "foxtrot"];
        let hashed: HashMap<_, _> = keys.iter().map(|k| (*k, k.len())).collect();
        let sorted: BTreeMap<_, _> = keys.iter().map(|k| (*k, k.len())).collect();

        assert_eq!(encode(&hashed).unwrap(), encode(&sorted).unwrap());
    }

    #[test]
    fn equal_values_encode_identically() {
        let first = encode(&vec![Some(1.5), None]).unwrap();
        let second = encode(&vec![Some(1.5), None]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn objects_are_sorted_regardless_of_insertion_order() {
        let mut object = serde_json::Map::new();
        object.insert("zulu".to_string(), serde_json::json!(1));
        object.insert("alpha".to_string(), serde_json::json!({"y": 2, "b": 3}));
        let value = serde_json::Value::Object(object);

        assert_eq!(
            String::from_utf8(encode(&value).unwrap()).unwrap(),
            "{\n  \"alpha\": {\n    \"b\": 3,\n    \"y\": 2\n  },\n  \"zulu\": 1\n}\n"
        );
    }

    #[test]
    fn large_hash_maps_encode_identically() {
        let first: HashMap<String, usize> = (0..32).map(|i| (format!("key{i}"), i)).collect();
        let second: HashMap<String, usize> = (0..32).rev().map(|i| (format!("key{i}"), i)).collect();

        assert_eq!(encode(&first).unwrap(), encode(&second).unwrap());
    }

    // ===========================================
    // Cycle 3: Failures
    // ===========================================

    #[test]
    fn non_finite_floats_fail() {
        assert!(encode(&f64::NAN).is_err());
        assert!(encode(&vec![f64::INFINITY]).is_err());
        assert!(encode(&Some(f32::NEG_INFINITY)).is_err());
    }

    #[test]
    fn non_string_map_keys_fail() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "value");
        assert!(encode(&map).is_err());
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("handles cannot be encoded"))
        }
    }

    #[test]
    fn failing_serialize_impl_fails() {
        let error = encode(&Unencodable).unwrap_err();
        assert!(error.to_string().contains("handles cannot be encoded"));
    }
}
