use attex_core::error::AttexError;
use attex_core::value::Value;
use serde_json::Value as JsonValue;

/// `concat`: join the string forms of a sequence (normally the tuple built
/// from a rule's `inputs` list).
pub fn concat(value: &Value) -> Result<Value, AttexError> {
    match value {
        Value::Seq(items) => Ok(Value::Str(
            items.iter().map(Value::safe_to_string).collect(),
        )),
        other => Err(AttexError::op(
            "concat",
            format!("requires a sequence, got '{}'", other.safe_to_string()),
        )),
    }
}

/// `template`: substitute every literal `${value}` in the pattern with the
/// string form of the subject. No other placeholder is recognised.
pub fn template(value: &Value, pattern: &str) -> Value {
    Value::Str(pattern.replace("${value}", &value.safe_to_string()))
}

/// `constant`: ignore the subject entirely. JSON null renders as the empty
/// string, everything else as its SafeToString form.
pub fn constant(raw: &JsonValue) -> Value {
    Value::Str(Value::from_json(raw).safe_to_string())
}
