use attex_core::condition::Condition;
use attex_core::error::AttexError;
use attex_core::value::Value;
use serde_json::Value as JsonValue;

use crate::condition::evaluate;

/// `assertEquals`: pass the value through unchanged when it strictly equals
/// the expectation, otherwise fail with the configured message.
pub fn assert_equals(
    value: Value,
    expected: &JsonValue,
    message: Option<&str>,
) -> Result<Value, AttexError> {
    let expected = Value::from_json(expected);
    if value.strict_eq(&expected) {
        Ok(value)
    } else {
        let message = message.map(str::to_string).unwrap_or_else(|| {
            format!(
                "expected '{}', got '{}'",
                expected.safe_to_string(),
                value.safe_to_string()
            )
        });
        Err(AttexError::op("assertEquals", message))
    }
}

/// `assertOneOf`: strict membership in the allowed list.
pub fn assert_one_of(
    value: Value,
    allowed: &[JsonValue],
    message: Option<&str>,
) -> Result<Value, AttexError> {
    let hit = allowed
        .iter()
        .any(|candidate| value.strict_eq(&Value::from_json(candidate)));
    if hit {
        Ok(value)
    } else {
        let message = message.map(str::to_string).unwrap_or_else(|| {
            format!(
                "'{}' is not one of the allowed values",
                value.safe_to_string()
            )
        });
        Err(AttexError::op("assertOneOf", message))
    }
}

/// `validate`: run the condition evaluator over the value; false (or an
/// evaluator error) fails the pipeline.
pub fn validate(
    value: Value,
    condition: &Condition,
    message: Option<&str>,
) -> Result<Value, AttexError> {
    let ok = evaluate(&value, condition).map_err(|m| AttexError::op("validate", m))?;
    if ok {
        Ok(value)
    } else {
        let message = message.map(str::to_string).unwrap_or_else(|| {
            format!("'{}' failed validation", value.safe_to_string())
        });
        Err(AttexError::op("validate", message))
    }
}
