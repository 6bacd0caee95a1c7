use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One static-validation finding: where in the processor document, and what.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path into the document, e.g. `transform.total.ops[2]`.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

#[derive(Debug, Error)]
pub enum AttexError {
    // ── Processor validation ─────────────────────────────────────────────────
    #[error("processor validation failed with {} issue(s)", .0.len())]
    ProcessorInvalid(Vec<ValidationIssue>),

    // ── Extraction ───────────────────────────────────────────────────────────
    #[error("Value extraction failed for '{name}' using JSONPath '{path}'")]
    ExtractMissing { name: String, path: String },

    #[error("JSONPath for '{name}' matched {count} nodes (limit {limit})")]
    ExtractOverflow {
        name: String,
        count: usize,
        limit: usize,
    },

    // ── Transforms ───────────────────────────────────────────────────────────
    #[error("transform '{name}' reads undefined variable '{input}'")]
    TransformInputUndefined { name: String, input: String },

    #[error("op '{op}' failed: {message}")]
    Op { op: &'static str, message: String },

    // ── Resource guards ──────────────────────────────────────────────────────
    #[error("execution exceeded the {limit_ms} ms deadline")]
    Timeout { limit_ms: u64 },

    #[error("intermediate string of {len} bytes exceeds the {limit}-byte limit")]
    StringTooLong { len: usize, limit: usize },

    #[error("{count} outputs exceed the limit of {limit}")]
    TooManyOutputs { count: usize, limit: usize },

    // ── Output assembly ──────────────────────────────────────────────────────
    #[error("output '{name}' did not resolve to a defined value")]
    OutputUndefined { name: String },

    // ── Claim shape ──────────────────────────────────────────────────────────
    #[error("claim context is not a JSON object")]
    ContextNotJson,

    #[error("claim context is missing 'providerHash'")]
    ProviderHashMissing,

    #[error("claim context 'providerHash' is not a 0x-prefixed 32-byte hex string: {0}")]
    ProviderHashMalformed(String),

    // ── ABI encoding ─────────────────────────────────────────────────────────
    #[error("cannot encode '{value}' as {ty}: {message}")]
    Encoding {
        ty: String,
        value: String,
        message: String,
    },

    // ── Signing ──────────────────────────────────────────────────────────────
    #[error("signer failure: {0}")]
    Signer(String),
}

impl AttexError {
    /// Wrap an op-level failure. `op` is the operator's document name
    /// (`"math"`, `"assertEquals"`, …).
    pub fn op(op: &'static str, message: impl Into<String>) -> Self {
        AttexError::Op {
            op,
            message: message.into(),
        }
    }

    /// A single-issue `ProcessorInvalid`.
    pub fn invalid(path: impl Into<String>, message: impl Into<String>) -> Self {
        AttexError::ProcessorInvalid(vec![ValidationIssue {
            path: path.into(),
            message: message.into(),
        }])
    }
}
