use serde_json::{json, Value as JsonValue};

use attex_core::error::AttexError;
use attex_core::types::{Hash32, ProviderClaimData};

/// Build the JSONPath-queryable root for a claim. `context` and
/// `parameters` become parsed subtrees; when their text is not valid JSON
/// the raw string is kept, so `$.context` still resolves to something.
pub fn claim_root(claim: &ProviderClaimData) -> JsonValue {
    json!({
        "provider": claim.provider,
        "parameters": parse_or_raw(&claim.parameters),
        "owner": claim.owner,
        "timestampS": claim.timestamp_s,
        "context": parse_or_raw(&claim.context),
        "identifier": claim.identifier,
        "epoch": claim.epoch,
    })
}

fn parse_or_raw(text: &str) -> JsonValue {
    serde_json::from_str(text).unwrap_or_else(|_| JsonValue::String(text.to_string()))
}

/// Pull the provider template hash out of the claim context. The context
/// must be a JSON object carrying `providerHash` as 0x-prefixed 32-byte hex.
pub fn provider_hash(claim: &ProviderClaimData) -> Result<Hash32, AttexError> {
    let context: JsonValue =
        serde_json::from_str(&claim.context).map_err(|_| AttexError::ContextNotJson)?;
    let raw = context
        .get("providerHash")
        .and_then(JsonValue::as_str)
        .ok_or(AttexError::ProviderHashMissing)?;
    if !raw.starts_with("0x") {
        return Err(AttexError::ProviderHashMalformed(raw.to_string()));
    }
    Hash32::from_hex(raw).map_err(|_| AttexError::ProviderHashMalformed(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(context: &str, parameters: &str) -> ProviderClaimData {
        ProviderClaimData {
            provider: "http".into(),
            parameters: parameters.into(),
            owner: "0x0000000000000000000000000000000000000001".into(),
            timestamp_s: 1_741_286_205,
            context: context.into(),
            identifier: "0xid".into(),
            epoch: 1,
        }
    }

    #[test]
    fn parsed_context_is_queryable() {
        let root = claim_root(&claim(r#"{"extractedParameters":{"amount":"1.00"}}"#, "{}"));
        let hits =
            jsonpath_lib::select(&root, "$.context.extractedParameters.amount").unwrap();
        assert_eq!(hits, vec![&serde_json::json!("1.00")]);
    }

    #[test]
    fn unparseable_context_stays_a_raw_string() {
        let root = claim_root(&claim("not json", "also not json"));
        let hits = jsonpath_lib::select(&root, "$.context").unwrap();
        assert_eq!(hits, vec![&serde_json::json!("not json")]);
    }

    #[test]
    fn provider_hash_extraction() {
        let hash_hex = format!("0x{}", "ab".repeat(32));
        let c = claim(&format!(r#"{{"providerHash":"{hash_hex}"}}"#), "{}");
        assert_eq!(provider_hash(&c).unwrap().to_hex(), hash_hex);
    }

    #[test]
    fn missing_provider_hash_fails() {
        let c = claim(r#"{"other":"field"}"#, "{}");
        assert!(matches!(
            provider_hash(&c),
            Err(AttexError::ProviderHashMissing)
        ));
    }

    #[test]
    fn malformed_provider_hash_fails() {
        for bad in ["0x1234", "abab", "0xzz"] {
            let c = claim(&format!(r#"{{"providerHash":"{bad}"}}"#), "{}");
            assert!(provider_hash(&c).is_err(), "{bad} should be rejected");
        }
    }
}
