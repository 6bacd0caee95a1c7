//! attex-ops::registry
//!
//! Dispatch for the closed operator catalogue. Every operator is a pure
//! function of `(value, params, scope)`; the scope is only read by the
//! contextual `conditionalOn` op.

use attex_core::error::AttexError;
use attex_core::processor::Op;
use attex_core::scope::Scope;
use attex_core::value::Value;

use crate::{assertions, combine, condition, math, string, time};

/// What applying one op produced: either the next pipeline value, or (for
/// `conditionalOn`) the untouched value plus a branch of ops the executor
/// splices in at the current position.
#[derive(Debug)]
pub enum OpOutcome {
    Value(Value),
    Splice { value: Value, ops: Vec<Op> },
}

/// Apply a single op to the current pipeline value.
pub fn apply(op: &Op, value: Value, scope: &Scope) -> Result<OpOutcome, AttexError> {
    let out = match op {
        Op::ToLowerCase => string::to_lower_case(&value),
        Op::ToUpperCase => string::to_upper_case(&value),
        Op::Trim => string::trim(&value),
        Op::Substring { start, end } => string::substring(&value, *start, *end),
        Op::Replace {
            pattern,
            replacement,
            global,
        } => string::replace(&value, pattern, replacement, *global)?,

        Op::Math { expression } => math::apply(&value, expression)?,

        Op::Keccak256 => Value::Str(attex_crypto::keccak256_hex(&digest_input(&value))),
        Op::Sha256 => Value::Str(attex_crypto::sha256_hex(&digest_input(&value))),

        Op::ParseTimestamp { format } => time::parse_timestamp(&value, format.as_deref())?,

        Op::AssertEquals { expected, message } => {
            assertions::assert_equals(value, expected, message.as_deref())?
        }
        Op::AssertOneOf { values, message } => {
            assertions::assert_one_of(value, values, message.as_deref())?
        }
        Op::Validate { condition, message } => {
            assertions::validate(value, condition, message.as_deref())?
        }

        Op::Concat => combine::concat(&value)?,
        Op::Template { pattern } => combine::template(&value, pattern),
        Op::Constant { value: raw } => combine::constant(raw),

        Op::ConditionalOn {
            check_field,
            condition,
            then_ops,
            else_ops,
        } => return conditional_on(value, check_field, condition, then_ops, else_ops, scope),
    };
    Ok(OpOutcome::Value(out))
}

/// Hash ops consume raw bytes when the value already is a byte string,
/// otherwise the UTF-8 of its string form.
fn digest_input(value: &Value) -> Vec<u8> {
    match value {
        Value::Bytes(b) => b.clone(),
        other => other.safe_to_string().into_bytes(),
    }
}

/// `conditionalOn`: pick a branch by evaluating the condition against a
/// named scope variable. The chosen branch may not itself branch again
/// (max depth 1, also enforced statically by the validator).
fn conditional_on(
    value: Value,
    check_field: &str,
    condition: &attex_core::condition::Condition,
    then_ops: &[Op],
    else_ops: &[Op],
    scope: &Scope,
) -> Result<OpOutcome, AttexError> {
    let subject = scope.lookup(check_field).ok_or_else(|| {
        AttexError::op(
            "conditionalOn",
            format!("unknown context field '{check_field}'"),
        )
    })?;
    let take_then =
        condition::evaluate(subject, condition).map_err(|m| AttexError::op("conditionalOn", m))?;
    let branch = if take_then { then_ops } else { else_ops };

    if branch
        .iter()
        .any(|op| matches!(op, Op::ConditionalOn { .. }))
    {
        return Err(AttexError::op(
            "conditionalOn",
            "nested conditionalOn is not allowed",
        ));
    }
    Ok(OpOutcome::Splice {
        value,
        ops: branch.to_vec(),
    })
}
