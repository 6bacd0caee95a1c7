use attex_core::constants::MAX_SAFE_INTEGER;
use attex_core::error::AttexError;
use attex_core::value::Value;

/// Apply a `math` expression of the form `<op> <number>` to a numeric
/// subject. Division by zero, non-finite results, and results beyond
/// 2^53 − 1 in magnitude all fail.
pub fn apply(value: &Value, expression: &str) -> Result<Value, AttexError> {
    let (op, operand) = parse_expression(expression).map_err(|m| AttexError::op("math", m))?;
    let subject = value.as_number().ok_or_else(|| {
        AttexError::op(
            "math",
            format!("value '{}' is not numeric", value.safe_to_string()),
        )
    })?;

    let result = match op {
        '+' => subject + operand,
        '-' => subject - operand,
        '*' => subject * operand,
        '/' => {
            if operand == 0.0 {
                return Err(AttexError::op("math", "division by zero"));
            }
            subject / operand
        }
        _ => unreachable!("parse_expression only yields + - * /"),
    };

    if !result.is_finite() || result.abs() > MAX_SAFE_INTEGER {
        return Err(AttexError::op(
            "math",
            format!("result {result} is outside the safe integer range"),
        ));
    }
    Ok(Value::Str(format_decimal(result)))
}

/// Parse `<op> <number>`; shared with the static validator so malformed
/// expressions are rejected before execution.
pub fn parse_expression(expression: &str) -> Result<(char, f64), String> {
    let mut parts = expression.split_whitespace();
    let op = parts
        .next()
        .ok_or_else(|| "expression must be '<op> <number>'".to_string())?;
    let number = parts
        .next()
        .ok_or_else(|| format!("expression '{expression}' is missing an operand"))?;
    if parts.next().is_some() {
        return Err(format!("expression '{expression}' has trailing tokens"));
    }

    let op = match op {
        "+" => '+',
        "-" => '-',
        "*" => '*',
        "/" => '/',
        other => return Err(format!("unsupported operator '{other}'")),
    };
    let operand = number
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("'{number}' is not a decimal literal"))?;
    Ok((op, operand))
}

/// Decimal rendering with no unnecessary trailing zeros: integral results
/// print as integers, fractional ones use the shortest round-tripping form.
fn format_decimal(v: f64) -> String {
    if v == v.trunc() {
        format!("{}", v as i64)
    } else {
        v.to_string()
    }
}
