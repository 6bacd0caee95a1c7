use serde_json::Value as JsonValue;

use attex_core::types::Hash32;
use attex_crypto::keccak256;

use crate::canon::canonical_json;

/// `keccak256(canonical_json(document))`. Hashing works on the raw document
/// (post any server-side version injection), so key order never affects
/// identity but every piece of content does.
pub fn processor_hash(doc: &JsonValue) -> Hash32 {
    Hash32::from_bytes(keccak256(canonical_json(doc).as_bytes()))
}

/// The on-chain whitelist key binding a processor to a provider template:
/// `keccak256(UTF8(hex(providerHash) + "\n" + hex(processorHash)))` with
/// both hashes in their 0x-prefixed lowercase hex form.
pub fn processor_provider_hash(provider_hash: &Hash32, doc: &JsonValue) -> Hash32 {
    let joined = format!("{}\n{}", provider_hash.to_hex(), processor_hash(doc).to_hex());
    Hash32::from_bytes(keccak256(joined.as_bytes()))
}
