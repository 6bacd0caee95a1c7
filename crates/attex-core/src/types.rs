use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ── Hash32 ───────────────────────────────────────────────────────────────────

/// 32-byte keccak256 digest. Rendered as 0x-prefixed lowercase hex on the
/// wire; this is the form used for provider hashes, processor hashes, the
/// processor-provider identity hash, and message hashes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    pub fn from_bytes(b: [u8; 32]) -> Self {
        Self(b)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 0x-prefixed lowercase hex (66 chars).
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without the 0x prefix. Exactly 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({}…)", &self.to_hex()[..18])
    }
}

impl Serialize for Hash32 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash32 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash32::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ── EcdsaSignature ───────────────────────────────────────────────────────────

/// 65-byte recoverable secp256k1 signature in `r ‖ s ‖ v` form with
/// `v ∈ {27, 28}` (legacy EVM recovery byte).
#[derive(Clone, PartialEq, Eq)]
pub struct EcdsaSignature(pub Vec<u8>);

impl EcdsaSignature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        Ok(Self(hex::decode(s)?))
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaSignature({}b)", self.0.len())
    }
}

impl Serialize for EcdsaSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for EcdsaSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        EcdsaSignature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ── ProviderClaimData ────────────────────────────────────────────────────────

/// An attested claim as produced by the upstream attestation pipeline.
///
/// `parameters` and `context` carry JSON text; the executor parses them for
/// JSONPath querying but every other field is opaque here. The context JSON
/// must embed `providerHash` (0x-prefixed 32-byte hex), which binds the claim
/// to the provider template it was attested against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderClaimData {
    pub provider: String,
    pub parameters: String,
    pub owner: String,
    pub timestamp_s: u64,
    pub context: String,
    pub identifier: String,
    pub epoch: u64,
}

// ── OutputSpec ───────────────────────────────────────────────────────────────

/// One entry of a processor's `outputs` list: which variable to emit and
/// which EVM ABI type the verifying contract reinterprets it under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
}

// ── ProcessedClaimData ───────────────────────────────────────────────────────

/// The signed artifact handed to the on-chain verifier.
///
/// `values[i]` is the string form of the variable named by
/// `outputs[i].name`; the contract reinterprets it under `outputs[i].type`.
/// The signature covers `keccak256(abi.encode(processorProviderHash,
/// …values))`, so any byte of any value is tamper-evident.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedClaimData {
    pub processor_provider_hash: Hash32,
    pub signature: EcdsaSignature,
    pub outputs: Vec<OutputSpec>,
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash32_hex_round_trip() {
        let h = Hash32::from_bytes([0xab; 32]);
        let hex = h.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
        assert_eq!(Hash32::from_hex(&hex).unwrap(), h);
        // prefix is optional on input
        assert_eq!(Hash32::from_hex(&hex[2..]).unwrap(), h);
    }

    #[test]
    fn hash32_rejects_wrong_length() {
        assert!(Hash32::from_hex("0xdead").is_err());
        assert!(Hash32::from_hex("not hex at all").is_err());
    }

    #[test]
    fn claim_round_trips_with_camel_case_keys() {
        let claim = ProviderClaimData {
            provider: "http".into(),
            parameters: "{}".into(),
            owner: "0x0000000000000000000000000000000000000001".into(),
            timestamp_s: 1_741_286_205,
            context: r#"{"providerHash":"0x11"}"#.into(),
            identifier: "0xabcd".into(),
            epoch: 1,
        };
        let json = serde_json::to_value(&claim).unwrap();
        assert!(json.get("timestampS").is_some());
        let back: ProviderClaimData = serde_json::from_value(json).unwrap();
        assert_eq!(back, claim);
    }

    #[test]
    fn output_spec_uses_type_key() {
        let spec: OutputSpec =
            serde_json::from_str(r#"{"name":"amount","type":"uint256"}"#).unwrap();
        assert_eq!(spec.type_tag, "uint256");
    }
}
