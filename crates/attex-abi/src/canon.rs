use serde_json::Value as JsonValue;

/// Serialize a JSON document to its canonical form: object keys in
/// lexicographic (byte) order at every level, array order preserved,
/// numbers as serde_json renders them, minimal string escaping, no
/// whitespace. Two semantically equal documents serialize identically, so
/// this is safe to hash.
pub fn canonical_json(value: &JsonValue) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsonValue::Number(n) => out.push_str(&n.to_string()),
        JsonValue::String(s) => {
            // serde_json escapes exactly the minimal JSON set
            out.push_str(&serde_json::to_string(s).expect("string serialization is infallible"));
        }
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        JsonValue::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(
                    &serde_json::to_string(key).expect("string serialization is infallible"),
                );
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_sort_recursively_and_arrays_keep_order() {
        let doc = json!({
            "outputs": [{"type": "uint256", "name": "amount"}],
            "extract": {"b": "$.b", "a": "$.a"}
        });
        assert_eq!(
            canonical_json(&doc),
            r#"{"extract":{"a":"$.a","b":"$.b"},"outputs":[{"name":"amount","type":"uint256"}]}"#
        );
    }

    #[test]
    fn key_order_in_the_source_does_not_matter() {
        let a: serde_json::Value =
            serde_json::from_str(r#"{"x": 1, "y": {"b": 2, "a": 3}}"#).unwrap();
        let b: serde_json::Value =
            serde_json::from_str(r#"{"y": {"a": 3, "b": 2}, "x": 1}"#).unwrap();
        assert_eq!(canonical_json(&a), canonical_json(&b));
    }

    #[test]
    fn strings_keep_minimal_escaping() {
        let doc = json!({"p": "a\"b\\c\nd"});
        assert_eq!(canonical_json(&doc), r#"{"p":"a\"b\\c\nd"}"#);
    }

    #[test]
    fn no_whitespace_is_emitted() {
        let doc = json!({"a": [1, 2], "b": null, "c": true});
        assert_eq!(canonical_json(&doc), r#"{"a":[1,2],"b":null,"c":true}"#);
    }

    #[test]
    fn serialization_is_stable_across_runs() {
        let doc = json!({"extract": {"amount": "$.x"}, "outputs": []});
        assert_eq!(canonical_json(&doc), canonical_json(&doc.clone()));
    }
}
