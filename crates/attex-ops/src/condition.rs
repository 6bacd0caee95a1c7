use attex_core::condition::Condition;
use attex_core::value::Value;
use regex::Regex;
use serde_json::Value as JsonValue;

/// Evaluate a condition against a subject value. The first key set (in
/// declaration order) decides the node; an empty node is false. The only
/// error case is an invalid `matches` regex; callers wrap the message with
/// their own op name.
pub fn evaluate(subject: &Value, cond: &Condition) -> Result<bool, String> {
    if let Some(expected) = &cond.eq {
        return Ok(subject.strict_eq(&Value::from_json(expected)));
    }
    if let Some(expected) = &cond.ne {
        return Ok(!subject.strict_eq(&Value::from_json(expected)));
    }
    if let Some(bound) = &cond.gt {
        return Ok(ordered(subject, bound, |a, b| a > b));
    }
    if let Some(bound) = &cond.lt {
        return Ok(ordered(subject, bound, |a, b| a < b));
    }
    if let Some(bound) = &cond.gte {
        return Ok(ordered(subject, bound, |a, b| a >= b));
    }
    if let Some(bound) = &cond.lte {
        return Ok(ordered(subject, bound, |a, b| a <= b));
    }
    if let Some(needle) = &cond.contains {
        return Ok(subject.safe_to_string().contains(needle.as_str()));
    }
    if let Some(prefix) = &cond.starts_with {
        return Ok(subject.safe_to_string().starts_with(prefix.as_str()));
    }
    if let Some(suffix) = &cond.ends_with {
        return Ok(subject.safe_to_string().ends_with(suffix.as_str()));
    }
    if let Some(pattern) = &cond.matches {
        let re =
            Regex::new(pattern).map_err(|e| format!("invalid regex '{pattern}': {e}"))?;
        return Ok(re.is_match(&subject.safe_to_string()));
    }
    if let Some(children) = &cond.and {
        for child in children {
            if !evaluate(subject, child)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }
    if let Some(children) = &cond.or {
        for child in children {
            if evaluate(subject, child)? {
                return Ok(true);
            }
        }
        return Ok(false);
    }
    if let Some(inner) = &cond.not {
        return Ok(!evaluate(subject, inner)?);
    }
    Ok(false)
}

/// Numeric-coercing comparison: both sides must coerce to numbers,
/// otherwise the comparison is false.
fn ordered(subject: &Value, bound: &JsonValue, cmp: fn(f64, f64) -> bool) -> bool {
    match (subject.as_number(), Value::from_json(bound).as_number()) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(subject: Value, cond: JsonValue) -> bool {
        evaluate(&subject, &serde_json::from_value(cond).unwrap()).unwrap()
    }

    #[test]
    fn equality_is_strict() {
        assert!(eval(Value::Str("JPY".into()), json!({"eq": "JPY"})));
        assert!(!eval(Value::Str("1".into()), json!({"eq": 1})));
        assert!(eval(Value::Int(1), json!({"eq": 1.0})));
        assert!(eval(Value::Str("1".into()), json!({"ne": 1})));
    }

    #[test]
    fn ordered_comparators_coerce_numerically() {
        assert!(eval(Value::Str("250".into()), json!({"gt": 100})));
        assert!(eval(Value::Str("99.5".into()), json!({"lt": "100"})));
        assert!(eval(Value::Int(100), json!({"gte": 100})));
        assert!(eval(Value::Int(100), json!({"lte": 100})));
        // unparseable subject is simply false
        assert!(!eval(Value::Str("lots".into()), json!({"gt": 0})));
        assert!(!eval(Value::Null, json!({"lte": 0})));
    }

    #[test]
    fn string_matchers() {
        assert!(eval(Value::Str("0xabc".into()), json!({"startsWith": "0x"})));
        assert!(eval(Value::Str("file.csv".into()), json!({"endsWith": ".csv"})));
        assert!(eval(Value::Str("approved".into()), json!({"contains": "rove"})));
        assert!(eval(
            Value::Str("2025-03-06".into()),
            json!({"matches": r"^\d{4}-\d{2}-\d{2}$"})
        ));
    }

    #[test]
    fn invalid_regex_is_an_error_not_false() {
        let cond: Condition = serde_json::from_value(json!({"matches": "["})).unwrap();
        assert!(evaluate(&Value::Str("x".into()), &cond).is_err());
    }

    #[test]
    fn combinators() {
        let subject = Value::Str("JPY".into());
        assert!(eval(
            subject.clone(),
            json!({"or": [{"eq": "JPY"}, {"eq": "KRW"}]})
        ));
        assert!(!eval(
            subject.clone(),
            json!({"and": [{"eq": "JPY"}, {"eq": "KRW"}]})
        ));
        assert!(eval(subject, json!({"not": {"eq": "USD"}})));
    }

    #[test]
    fn empty_condition_is_false() {
        assert!(!eval(Value::Str("anything".into()), json!({})));
    }
}
