//! ─── Attex Resource Limits ──────────────────────────────────────────────────
//!
//! Hard bounds on a single claim-processing run. A processor document is
//! untrusted input; these limits keep execution bounded regardless of what
//! the document asks for.

// ── Execution ────────────────────────────────────────────────────────────────

/// Wall-clock ceiling for one `process` call (extraction + transforms +
/// output assembly). Checked between extract entries, between transform
/// rules, and at every op boundary.
pub const MAX_EXECUTION_TIME_MS: u64 = 5_000;

/// Maximum nodes a single JSONPath query may return.
pub const MAX_JSONPATH_RESULTS: usize = 1_000;

/// Maximum entries in a processor's `outputs` list.
pub const MAX_OUTPUT_VALUES: usize = 100;

/// Byte ceiling for any intermediate string value.
pub const MAX_STRING_BYTES: usize = 100_000;

// ── Numeric bounds ───────────────────────────────────────────────────────────

/// Largest integer exactly representable in an IEEE-754 double (2^53 − 1).
/// `math` results beyond this magnitude are rejected.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Timestamps above this are taken to already be in milliseconds;
/// at or below, they are seconds and get scaled by 1000.
pub const TIMESTAMP_MS_CUTOFF: f64 = 10_000_000_000.0;

// ── Signing ──────────────────────────────────────────────────────────────────

/// Prefix applied to a 32-byte message hash in `EthPersonalMessage` mode,
/// per the eth_sign / personal_sign convention.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";
