//! attex-core::value
//!
//! The runtime value model that flows through transform pipelines. A small
//! closed sum instead of `serde_json::Value`: byte strings get their own
//! variant (hash ops produce and consume them), and numeric coercion rules
//! are explicit pattern matches instead of scattered casts.

use serde_json::Value as JsonValue;

/// A value extracted from a claim or produced by a transform op.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<Value>),
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Convert a JSON subtree into a runtime value. Integers that fit i64
    /// stay exact; everything else becomes a float.
    pub fn from_json(v: &JsonValue) -> Self {
        match v {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            JsonValue::String(s) => Value::Str(s.clone()),
            JsonValue::Array(items) => Value::Seq(items.iter().map(Value::from_json).collect()),
            JsonValue::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render back to JSON. Bytes become a 0x-hex string (JSON has no byte
    /// type); non-finite floats become null.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(b) => JsonValue::Bool(*b),
            Value::Int(i) => JsonValue::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Value::Str(s) => JsonValue::String(s.clone()),
            Value::Bytes(b) => JsonValue::String(format!("0x{}", hex::encode(b))),
            Value::Seq(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// The universal string form used by string ops, hashing, templates,
    /// and output assembly:
    /// null → empty; booleans → `true`/`false`; numbers → decimal with no
    /// trailing fraction on integral floats; strings unchanged; bytes →
    /// 0x-hex; sequences and maps → compact JSON.
    pub fn safe_to_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Bytes(b) => format!("0x{}", hex::encode(b)),
            Value::Seq(_) | Value::Map(_) => {
                serde_json::to_string(&self.to_json()).unwrap_or_else(|_| "[object]".into())
            }
        }
    }

    /// Numeric coercion for `math` and the ordered comparators. Only
    /// numbers and numeric strings coerce; everything else is unparseable.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    t.parse::<f64>().ok().filter(|f| f.is_finite())
                }
            }
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Strict equality: same tag and same scalar. Int and Float compare
    /// numerically (JSON has a single number type); composites are never
    /// strictly equal.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn safe_to_string_scalars() {
        assert_eq!(Value::Null.safe_to_string(), "");
        assert_eq!(Value::Bool(true).safe_to_string(), "true");
        assert_eq!(Value::Int(-42).safe_to_string(), "-42");
        assert_eq!(Value::Float(100.0).safe_to_string(), "100");
        assert_eq!(Value::Float(10.5).safe_to_string(), "10.5");
        assert_eq!(Value::Str("x".into()).safe_to_string(), "x");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).safe_to_string(), "0xdead");
    }

    #[test]
    fn safe_to_string_composites_are_compact_json() {
        let v = Value::from_json(&json!({"b": 1, "a": [true, null]}));
        // serde_json orders object keys, so the rendering is stable
        assert_eq!(v.safe_to_string(), r#"{"a":[true,null],"b":1}"#);
    }

    #[test]
    fn number_coercion() {
        assert_eq!(Value::Str("1.00".into()).as_number(), Some(1.0));
        assert_eq!(Value::Str(" 250 ".into()).as_number(), Some(250.0));
        assert_eq!(Value::Str("".into()).as_number(), None);
        assert_eq!(Value::Str("12 monkeys".into()).as_number(), None);
        assert_eq!(Value::Bool(true).as_number(), None);
        assert_eq!(Value::Null.as_number(), None);
    }

    #[test]
    fn strict_equality() {
        assert!(Value::Int(1).strict_eq(&Value::Float(1.0)));
        assert!(!Value::Int(1).strict_eq(&Value::Str("1".into())));
        assert!(!Value::Null.strict_eq(&Value::Str("".into())));
        assert!(Value::Str("JPY".into()).strict_eq(&Value::Str("JPY".into())));
        // composites never compare strictly equal
        assert!(!Value::Seq(vec![]).strict_eq(&Value::Seq(vec![])));
    }

    #[test]
    fn json_round_trip_preserves_integers() {
        let v = Value::from_json(&json!(9_007_199_254_740_991i64));
        assert_eq!(v, Value::Int(9_007_199_254_740_991));
        assert_eq!(v.to_json(), json!(9_007_199_254_740_991i64));
    }
}
