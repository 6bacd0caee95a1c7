use sha3::{Digest, Keccak256};

/// Compute Keccak-256 of arbitrary bytes → 32-byte array.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 of arbitrary bytes → 32-byte array.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = sha2::Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Keccak-256 rendered as a 0x-prefixed lowercase hex string (66 chars).
pub fn keccak256_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(keccak256(data)))
}

/// SHA-256 rendered as a 0x-prefixed lowercase hex string (66 chars).
pub fn sha256_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(sha256(data)))
}
