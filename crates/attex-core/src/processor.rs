//! attex-core::processor
//!
//! The typed model of a processor document. Parsing is schema-driven: an op
//! is either a bare operator name or a `{type, …params}` object, and every
//! variant carries exactly its typed parameters. Unknown operator names,
//! missing mandatory parameters, and the legacy `output: [name…]` document
//! shape are all deserialization errors (surfaced as `ProcessorInvalid` by
//! the validator entry point). Extra parameter keys on a recognised op are
//! tolerated; identity hashing works on the raw document, so nothing is
//! silently dropped from the hash.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::condition::Condition;
use crate::types::OutputSpec;

// ── Processor ────────────────────────────────────────────────────────────────

/// A declarative claim processor: extract variables with JSONPath, refine
/// them through transform pipelines, emit a typed output vector.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Processor {
    /// Carried into the identity hash when present. A deployment may impose
    /// a server-side version before hashing (see the signing envelope).
    #[serde(default)]
    pub version: Option<String>,

    /// Variable name → JSONPath over the claim root.
    pub extract: IndexMap<String, String>,

    /// Declaration order is authoritative: a rule may read any variable
    /// produced by an earlier rule or by any extract.
    #[serde(default)]
    pub transform: IndexMap<String, TransformRule>,

    /// Ordered output vector; each name must resolve to a variable.
    pub outputs: Vec<OutputSpec>,
}

// ── TransformRule ────────────────────────────────────────────────────────────

/// One transform pipeline. `input` and `inputs` are mutually exclusive;
/// with neither, the first op must be `constant`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformRule {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub inputs: Option<Vec<String>>,
    pub ops: Vec<Op>,
}

// ── Op ───────────────────────────────────────────────────────────────────────

/// A single transform step. The registry in `attex-ops` gives each variant
/// its runtime semantics.
#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    // ── String ───────────────────────────────────────────────────────────────
    ToLowerCase,
    ToUpperCase,
    Trim,
    Substring {
        start: usize,
        end: Option<usize>,
    },
    Replace {
        pattern: String,
        replacement: String,
        global: bool,
    },

    // ── Math ─────────────────────────────────────────────────────────────────
    Math {
        expression: String,
    },

    // ── Crypto ───────────────────────────────────────────────────────────────
    Keccak256,
    Sha256,

    // ── Date ─────────────────────────────────────────────────────────────────
    ParseTimestamp {
        format: Option<String>,
    },

    // ── Validation ───────────────────────────────────────────────────────────
    AssertEquals {
        expected: JsonValue,
        message: Option<String>,
    },
    AssertOneOf {
        values: Vec<JsonValue>,
        message: Option<String>,
    },
    Validate {
        condition: Condition,
        message: Option<String>,
    },

    // ── Combination ──────────────────────────────────────────────────────────
    Concat,
    Template {
        pattern: String,
    },

    // ── Constant ─────────────────────────────────────────────────────────────
    Constant {
        value: JsonValue,
    },

    // ── Branch ───────────────────────────────────────────────────────────────
    ConditionalOn {
        check_field: String,
        condition: Condition,
        then_ops: Vec<Op>,
        else_ops: Vec<Op>,
    },
}

impl Op {
    /// The operator's document name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Op::ToLowerCase => "toLowerCase",
            Op::ToUpperCase => "toUpperCase",
            Op::Trim => "trim",
            Op::Substring { .. } => "substring",
            Op::Replace { .. } => "replace",
            Op::Math { .. } => "math",
            Op::Keccak256 => "keccak256",
            Op::Sha256 => "sha256",
            Op::ParseTimestamp { .. } => "parseTimestamp",
            Op::AssertEquals { .. } => "assertEquals",
            Op::AssertOneOf { .. } => "assertOneOf",
            Op::Validate { .. } => "validate",
            Op::Concat => "concat",
            Op::Template { .. } => "template",
            Op::Constant { .. } => "constant",
            Op::ConditionalOn { .. } => "conditionalOn",
        }
    }

    fn from_document_value(raw: &JsonValue) -> Result<Op, String> {
        match raw {
            JsonValue::String(name) => Op::bare(name),
            JsonValue::Object(map) => {
                let ty = map
                    .get("type")
                    .and_then(JsonValue::as_str)
                    .ok_or_else(|| "op object is missing a string 'type' field".to_string())?;
                Op::tagged(ty, map)
            }
            _ => Err("op must be a string or an object with a 'type' field".to_string()),
        }
    }

    /// Bare-string form: only parameterless operators qualify.
    fn bare(name: &str) -> Result<Op, String> {
        Ok(match name {
            "toLowerCase" => Op::ToLowerCase,
            "toUpperCase" => Op::ToUpperCase,
            "trim" => Op::Trim,
            "keccak256" => Op::Keccak256,
            "sha256" => Op::Sha256,
            "concat" => Op::Concat,
            "parseTimestamp" => Op::ParseTimestamp { format: None },
            other => return Err(format!("unknown transform op '{other}'")),
        })
    }

    fn tagged(ty: &str, map: &JsonMap<String, JsonValue>) -> Result<Op, String> {
        Ok(match ty {
            "toLowerCase" => Op::ToLowerCase,
            "toUpperCase" => Op::ToUpperCase,
            "trim" => Op::Trim,
            "keccak256" => Op::Keccak256,
            "sha256" => Op::Sha256,
            "concat" => Op::Concat,
            "substring" => Op::Substring {
                start: req_index(map, "substring", "start")?,
                end: opt_index(map, "substring", "end")?,
            },
            "replace" => Op::Replace {
                pattern: req_str(map, "replace", "pattern")?,
                replacement: opt_str(map, "replace", "replacement")?.unwrap_or_default(),
                global: opt_bool(map, "replace", "global")?.unwrap_or(false),
            },
            "math" => Op::Math {
                expression: req_str(map, "math", "expression")?,
            },
            "parseTimestamp" => Op::ParseTimestamp {
                format: opt_str(map, "parseTimestamp", "format")?,
            },
            "assertEquals" => Op::AssertEquals {
                expected: map
                    .get("expected")
                    .cloned()
                    .ok_or("assertEquals op requires an 'expected' parameter")?,
                message: opt_str(map, "assertEquals", "message")?,
            },
            "assertOneOf" => Op::AssertOneOf {
                values: match map.get("values") {
                    Some(JsonValue::Array(items)) => items.clone(),
                    Some(_) => return Err("assertOneOf 'values' must be an array".into()),
                    None => return Err("assertOneOf op requires a 'values' list".into()),
                },
                message: opt_str(map, "assertOneOf", "message")?,
            },
            "validate" => Op::Validate {
                condition: req_condition(map, "validate", "condition")?,
                message: opt_str(map, "validate", "message")?,
            },
            "template" => Op::Template {
                pattern: req_str(map, "template", "pattern")?,
            },
            "constant" => Op::Constant {
                value: map
                    .get("value")
                    .cloned()
                    .ok_or("constant op requires a 'value' parameter")?,
            },
            "conditionalOn" => Op::ConditionalOn {
                check_field: req_str(map, "conditionalOn", "checkField")?,
                condition: req_condition(map, "conditionalOn", "if")?,
                then_ops: req_ops(map, "conditionalOn", "then")?,
                else_ops: match map.get("else") {
                    Some(_) => req_ops(map, "conditionalOn", "else")?,
                    None => Vec::new(),
                },
            },
            other => return Err(format!("unknown transform op '{other}'")),
        })
    }
}

impl<'de> Deserialize<'de> for Op {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = JsonValue::deserialize(deserializer)?;
        Op::from_document_value(&raw).map_err(serde::de::Error::custom)
    }
}

// ── Parameter extraction helpers ─────────────────────────────────────────────

fn req_str(map: &JsonMap<String, JsonValue>, op: &str, key: &str) -> Result<String, String> {
    match map.get(key) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("{op} '{key}' must be a string")),
        None => Err(format!("{op} op requires a '{key}' parameter")),
    }
}

fn opt_str(
    map: &JsonMap<String, JsonValue>,
    op: &str,
    key: &str,
) -> Result<Option<String>, String> {
    match map.get(key) {
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(JsonValue::Null) | None => Ok(None),
        Some(_) => Err(format!("{op} '{key}' must be a string")),
    }
}

fn opt_bool(
    map: &JsonMap<String, JsonValue>,
    op: &str,
    key: &str,
) -> Result<Option<bool>, String> {
    match map.get(key) {
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(JsonValue::Null) | None => Ok(None),
        Some(_) => Err(format!("{op} '{key}' must be a boolean")),
    }
}

fn req_index(map: &JsonMap<String, JsonValue>, op: &str, key: &str) -> Result<usize, String> {
    match map.get(key) {
        Some(JsonValue::Number(n)) => n
            .as_u64()
            .map(|v| v as usize)
            .ok_or_else(|| format!("{op} '{key}' must be a non-negative integer")),
        Some(_) => Err(format!("{op} '{key}' must be a non-negative integer")),
        None => Err(format!("{op} op requires a '{key}' parameter")),
    }
}

fn opt_index(
    map: &JsonMap<String, JsonValue>,
    op: &str,
    key: &str,
) -> Result<Option<usize>, String> {
    match map.get(key) {
        Some(JsonValue::Null) | None => Ok(None),
        Some(_) => req_index(map, op, key).map(Some),
    }
}

fn req_condition(
    map: &JsonMap<String, JsonValue>,
    op: &str,
    key: &str,
) -> Result<Condition, String> {
    let raw = map
        .get(key)
        .ok_or_else(|| format!("{op} op requires a '{key}' condition"))?;
    serde_json::from_value(raw.clone()).map_err(|e| format!("{op} '{key}' is not a valid condition: {e}"))
}

fn req_ops(map: &JsonMap<String, JsonValue>, op: &str, key: &str) -> Result<Vec<Op>, String> {
    match map.get(key) {
        Some(JsonValue::Array(items)) => items.iter().map(Op::from_document_value).collect(),
        Some(_) => Err(format!("{op} '{key}' must be a list of ops")),
        None => Err(format!("{op} op requires a '{key}' list")),
    }
}
