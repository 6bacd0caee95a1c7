use serde::Deserialize;
use serde_json::Value as JsonValue;

/// A Boolean expression over a single subject value, used by the `validate`
/// and `conditionalOn` ops.
///
/// Exactly one key is meaningful per node; evaluation picks the first key
/// set in declaration order, and an empty node is false. Unknown keys are
/// rejected at deserialization.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Condition {
    // ── Equality ─────────────────────────────────────────────────────────────
    pub eq: Option<JsonValue>,
    pub ne: Option<JsonValue>,

    // ── Ordered (numeric-coercing) ───────────────────────────────────────────
    pub gt: Option<JsonValue>,
    pub lt: Option<JsonValue>,
    pub gte: Option<JsonValue>,
    pub lte: Option<JsonValue>,

    // ── String match ─────────────────────────────────────────────────────────
    pub contains: Option<String>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    /// Regex; an invalid pattern is an evaluation error, not `false`.
    pub matches: Option<String>,

    // ── Combinators ──────────────────────────────────────────────────────────
    pub and: Option<Vec<Condition>>,
    pub or: Option<Vec<Condition>>,
    pub not: Option<Box<Condition>>,
}
