//! attex-validate
//!
//! Static checks on a processor document, run before any execution. The
//! goal is that a processor which passes here can only fail at runtime on
//! input-value shape, resource bounds, or deliberate assertion ops, never
//! on unresolved names or malformed parameters.
//!
//! Checks (in order):
//! 1. `extract` defines at least one variable
//! 2. Every variable name is an identifier
//! 3. Transform rules set `input` xor `inputs` (or start with `constant`)
//! 4. Every referenced variable is in scope at its point of use
//!    (declaration order is authoritative)
//! 5. Op parameters are well-formed (patterns, math expressions, branches)
//! 6. `outputs` entries resolve, carry recognised EVM types, and are unique
//!
//! Unknown operator names and missing mandatory parameters are caught
//! earlier, at deserialization; `parse_and_validate` folds both failure
//! modes into `AttexError::ProcessorInvalid`.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use attex_core::constants::MAX_OUTPUT_VALUES;
use attex_core::error::{AttexError, ValidationIssue};
use attex_core::processor::{Op, Processor, TransformRule};

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex is valid"));

/// The outcome of static validation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// Deserialize a raw document and validate it, folding schema errors and
/// report findings into a single `ProcessorInvalid`.
pub fn parse_and_validate(doc: &JsonValue) -> Result<Processor, AttexError> {
    let processor: Processor =
        serde_json::from_value(doc.clone()).map_err(|e| AttexError::invalid("$", e.to_string()))?;
    let report = validate_processor(&processor);
    if !report.valid {
        return Err(AttexError::ProcessorInvalid(report.errors));
    }
    Ok(processor)
}

/// Validate an already-typed processor.
pub fn validate_processor(processor: &Processor) -> ValidationReport {
    let mut errors = Vec::new();

    // ── Extracts ─────────────────────────────────────────────────────────────
    if processor.extract.is_empty() {
        push(&mut errors, "extract", "must define at least one variable");
    }
    for (name, path) in &processor.extract {
        if !IDENT_RE.is_match(name) {
            push(
                &mut errors,
                format!("extract.{name}"),
                "variable name is not a valid identifier",
            );
        }
        if path.trim().is_empty() {
            push(
                &mut errors,
                format!("extract.{name}"),
                "JSONPath must be non-empty",
            );
        }
    }

    // ── Transforms (declaration order builds the scope) ──────────────────────
    let mut scope: HashSet<&str> = processor.extract.keys().map(String::as_str).collect();
    for (name, rule) in &processor.transform {
        let path = format!("transform.{name}");
        if !IDENT_RE.is_match(name) {
            push(&mut errors, path.as_str(), "variable name is not a valid identifier");
        }
        validate_rule(&path, rule, &scope, &mut errors);
        scope.insert(name.as_str());
    }

    // ── Outputs ──────────────────────────────────────────────────────────────
    if processor.outputs.is_empty() {
        push(&mut errors, "outputs", "must contain at least one entry");
    }
    if processor.outputs.len() > MAX_OUTPUT_VALUES {
        push(
            &mut errors,
            "outputs",
            format!(
                "{} entries exceed the limit of {MAX_OUTPUT_VALUES}",
                processor.outputs.len()
            ),
        );
    }
    let mut seen: HashSet<&str> = HashSet::new();
    for (i, spec) in processor.outputs.iter().enumerate() {
        let path = format!("outputs[{i}]");
        if !seen.insert(spec.name.as_str()) {
            push(
                &mut errors,
                path.as_str(),
                format!("duplicate output name '{}'", spec.name),
            );
        }
        if !scope.contains(spec.name.as_str()) {
            push(
                &mut errors,
                path.as_str(),
                format!("'{}' does not resolve to any variable", spec.name),
            );
        }
        if !attex_abi::recognised_type(&spec.type_tag) {
            push(
                &mut errors,
                path.as_str(),
                format!("unrecognised EVM type '{}'", spec.type_tag),
            );
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

fn validate_rule(
    path: &str,
    rule: &TransformRule,
    scope: &HashSet<&str>,
    errors: &mut Vec<ValidationIssue>,
) {
    match (&rule.input, &rule.inputs) {
        (Some(_), Some(_)) => push(errors, path, "cannot set both 'input' and 'inputs'"),
        (Some(input), None) => {
            if !scope.contains(input.as_str()) {
                push(
                    errors,
                    path,
                    format!("reads undefined variable '{input}'"),
                );
            }
        }
        (None, Some(inputs)) => {
            if inputs.is_empty() {
                push(errors, path, "'inputs' must be non-empty");
            }
            for input in inputs {
                if !scope.contains(input.as_str()) {
                    push(
                        errors,
                        path,
                        format!("reads undefined variable '{input}'"),
                    );
                }
            }
        }
        (None, None) => {
            if !matches!(rule.ops.first(), Some(Op::Constant { .. })) {
                push(
                    errors,
                    path,
                    "a rule without 'input' or 'inputs' must start with a constant op",
                );
            }
        }
    }

    if rule.ops.is_empty() {
        push(errors, path, "'ops' must be non-empty");
    }
    for (i, op) in rule.ops.iter().enumerate() {
        validate_op(&format!("{path}.ops[{i}]"), op, scope, errors, true);
    }
}

fn validate_op(
    path: &str,
    op: &Op,
    scope: &HashSet<&str>,
    errors: &mut Vec<ValidationIssue>,
    branch_allowed: bool,
) {
    match op {
        Op::Replace { pattern, .. } => {
            if pattern.is_empty() {
                push(errors, path, "'pattern' must be non-empty");
            }
        }
        Op::Math { expression } => match attex_ops::math::parse_expression(expression) {
            Err(message) => push(errors, path, message),
            Ok(('/', divisor)) if divisor == 0.0 => {
                push(errors, path, "division by zero")
            }
            Ok(_) => {}
        },
        Op::AssertOneOf { values, .. } => {
            if values.is_empty() {
                push(errors, path, "'values' must be non-empty");
            }
        }
        Op::ConditionalOn {
            check_field,
            then_ops,
            else_ops,
            ..
        } => {
            if !branch_allowed {
                push(errors, path, "nested conditionalOn is not allowed");
            }
            if !scope.contains(check_field.as_str()) {
                push(
                    errors,
                    path,
                    format!("checkField '{check_field}' does not resolve to any variable"),
                );
            }
            for (i, sub) in then_ops.iter().enumerate() {
                validate_op(&format!("{path}.then[{i}]"), sub, scope, errors, false);
            }
            for (i, sub) in else_ops.iter().enumerate() {
                validate_op(&format!("{path}.else[{i}]"), sub, scope, errors, false);
            }
        }
        _ => {}
    }
}

fn push(errors: &mut Vec<ValidationIssue>, path: impl Into<String>, message: impl Into<String>) {
    errors.push(ValidationIssue {
        path: path.into(),
        message: message.into(),
    });
}
