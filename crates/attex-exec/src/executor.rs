//! attex-exec::executor
//!
//! Runs a validated processor against one claim: JSONPath extraction,
//! dependency-ordered transform evaluation, output assembly. Each run owns
//! its scope and deadline; nothing is shared between runs and every failure
//! aborts the whole execution; there is no skip-on-error mode.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

use attex_core::constants::{
    MAX_EXECUTION_TIME_MS, MAX_JSONPATH_RESULTS, MAX_OUTPUT_VALUES, MAX_STRING_BYTES,
};
use attex_core::error::AttexError;
use attex_core::processor::{Op, Processor, TransformRule};
use attex_core::scope::Scope;
use attex_core::types::ProviderClaimData;
use attex_core::value::Value;
use attex_ops::{apply, OpOutcome};

use crate::claim::claim_root;

// ── Deadline ─────────────────────────────────────────────────────────────────

/// Wall-clock budget threaded through one execution. Checked between
/// extract entries, between transform rules, and at every op boundary.
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn start(limit_ms: u64) -> Self {
        Self {
            start: Instant::now(),
            limit: Duration::from_millis(limit_ms),
        }
    }

    pub fn check(&self) -> Result<(), AttexError> {
        if self.start.elapsed() > self.limit {
            Err(AttexError::Timeout {
                limit_ms: self.limit.as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

// ── Execution ────────────────────────────────────────────────────────────────

/// Execute a processor against a claim, producing the output string vector.
pub fn execute(
    processor: &Processor,
    claim: &ProviderClaimData,
) -> Result<Vec<String>, AttexError> {
    let deadline = Deadline::start(MAX_EXECUTION_TIME_MS);
    let root = claim_root(claim);
    let mut scope = Scope::new();

    // ── Extract phase ────────────────────────────────────────────────────────
    for (name, path) in &processor.extract {
        deadline.check()?;
        let hits = jsonpath_lib::select(&root, path).map_err(|_| AttexError::ExtractMissing {
            name: name.clone(),
            path: path.clone(),
        })?;
        if hits.len() > MAX_JSONPATH_RESULTS {
            return Err(AttexError::ExtractOverflow {
                name: name.clone(),
                count: hits.len(),
                limit: MAX_JSONPATH_RESULTS,
            });
        }
        // single-value semantics: the first match wins
        let first = hits.first().ok_or_else(|| AttexError::ExtractMissing {
            name: name.clone(),
            path: path.clone(),
        })?;
        let value = Value::from_json(first);
        enforce_string_budget(&value)?;
        scope.insert_extracted(name.clone(), value);
    }
    debug!(extracted = processor.extract.len(), "extract phase complete");

    // ── Transform phase (declaration order) ──────────────────────────────────
    for (name, rule) in &processor.transform {
        deadline.check()?;
        let value = run_rule(name, rule, &scope, &deadline)?;
        scope.insert_transformed(name.clone(), value);
    }

    // ── Output phase ─────────────────────────────────────────────────────────
    if processor.outputs.len() > MAX_OUTPUT_VALUES {
        return Err(AttexError::TooManyOutputs {
            count: processor.outputs.len(),
            limit: MAX_OUTPUT_VALUES,
        });
    }
    let mut values = Vec::with_capacity(processor.outputs.len());
    for spec in &processor.outputs {
        let value = scope
            .lookup(&spec.name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| AttexError::OutputUndefined {
                name: spec.name.clone(),
            })?;
        values.push(value.safe_to_string());
    }
    debug!(values = values.len(), "claim executed");
    Ok(values)
}

/// Run one transform pipeline. The op list is an explicit queue so a
/// `conditionalOn` splice can push its chosen branch onto the front: the
/// branch runs, in order, before the remaining ops of the enclosing list.
fn run_rule(
    name: &str,
    rule: &TransformRule,
    scope: &Scope,
    deadline: &Deadline,
) -> Result<Value, AttexError> {
    let initial = match (&rule.input, &rule.inputs) {
        (Some(input), _) => resolve(scope, name, input)?,
        (None, Some(inputs)) => Value::Seq(
            inputs
                .iter()
                .map(|input| resolve(scope, name, input))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        // validated: the first op is `constant`, which ignores the subject
        (None, None) => Value::Null,
    };

    let mut queue: VecDeque<Op> = rule.ops.iter().cloned().collect();
    let mut current = initial;
    while let Some(op) = queue.pop_front() {
        deadline.check()?;
        match apply(&op, current, scope)? {
            OpOutcome::Value(value) => {
                enforce_string_budget(&value)?;
                current = value;
            }
            OpOutcome::Splice { value, ops } => {
                current = value;
                for op in ops.into_iter().rev() {
                    queue.push_front(op);
                }
            }
        }
    }
    Ok(current)
}

fn resolve(scope: &Scope, rule_name: &str, input: &str) -> Result<Value, AttexError> {
    scope
        .lookup(input)
        .cloned()
        .ok_or_else(|| AttexError::TransformInputUndefined {
            name: rule_name.to_string(),
            input: input.to_string(),
        })
}

fn enforce_string_budget(value: &Value) -> Result<(), AttexError> {
    if let Value::Str(s) = value {
        if s.len() > MAX_STRING_BYTES {
            return Err(AttexError::StringTooLong {
                len: s.len(),
                limit: MAX_STRING_BYTES,
            });
        }
    }
    Ok(())
}
