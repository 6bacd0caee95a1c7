//! attex-crypto::ecdsa
//!
//! The attestor's secp256k1 key and the 65-byte recoverable signatures it
//! produces. Signing is RFC6979 deterministic with low-S normalization, so a
//! fixed `(key, digest)` pair always yields the same bytes, and
//! `ecrecover(digest, v, r, s)` on EVM returns the attestor address.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use thiserror::Error;
use zeroize::Zeroizing;

use attex_core::constants::PERSONAL_MESSAGE_PREFIX;
use attex_core::types::EcdsaSignature;

use crate::hash::keccak256;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid secret key")]
    InvalidSecretKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("signature must be 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    #[error("invalid recovery byte {0}; expected 27 or 28")]
    InvalidRecoveryByte(u8),
}

// ── SignatureMode ────────────────────────────────────────────────────────────

/// Which digest the attestor actually signs. Both modes are supported; the
/// deployment pins one, and the verifying contract must apply (or not
/// apply) the same prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureMode {
    /// Sign the message hash directly.
    Raw,
    /// Apply the `"\x19Ethereum Signed Message:\n32"` prefix to the message
    /// hash, keccak again, and sign that (eth_sign / personal_sign).
    EthPersonalMessage,
}

impl SignatureMode {
    /// The 32-byte digest actually handed to ECDSA for a given message hash.
    pub fn digest(&self, message_hash: &[u8; 32]) -> [u8; 32] {
        match self {
            SignatureMode::Raw => *message_hash,
            SignatureMode::EthPersonalMessage => eth_personal_hash(message_hash),
        }
    }
}

/// `keccak256("\x19Ethereum Signed Message:\n32" ‖ hash)`.
pub fn eth_personal_hash(message_hash: &[u8; 32]) -> [u8; 32] {
    let mut data = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 32);
    data.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    data.extend_from_slice(message_hash);
    keccak256(&data)
}

// ── AttestorSigner ───────────────────────────────────────────────────────────

/// The process-wide attestor key. Read-only after construction; each
/// signing call borrows it without mutation. The underlying `SigningKey`
/// zeroizes its scalar on drop.
pub struct AttestorSigner {
    signing_key: SigningKey,
}

impl AttestorSigner {
    /// Import a 32-byte secret scalar. The input copy is wiped after use.
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let guarded = Zeroizing::new(bytes.to_vec());
        let signing_key =
            SigningKey::from_slice(&guarded).map_err(|_| SignatureError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Generate a fresh random key (tests and local tooling).
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    /// The attestor's Ethereum address: `keccak256(pubkey)[12..]`,
    /// 0x-prefixed lowercase hex.
    pub fn address(&self) -> String {
        address_from_verifying_key(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest, returning `r ‖ s ‖ v` with `v ∈ {27, 28}`.
    pub fn sign_hash(&self, digest: &[u8; 32]) -> Result<EcdsaSignature, SignatureError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|_| SignatureError::InvalidSignature)?;
        let mut out = Vec::with_capacity(65);
        out.extend_from_slice(sig.to_bytes().as_slice());
        out.push(27 + recid.to_byte());
        Ok(EcdsaSignature(out))
    }
}

impl std::fmt::Debug for AttestorSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AttestorSigner {{ address: {} }}", self.address())
    }
}

/// Recover the signer address from a digest and a 65-byte signature.
pub fn recover_address(
    digest: &[u8; 32],
    signature: &EcdsaSignature,
) -> Result<String, SignatureError> {
    let bytes = signature.as_bytes();
    if bytes.len() != 65 {
        return Err(SignatureError::InvalidSignatureLength(bytes.len()));
    }
    let v = bytes[64];
    if v != 27 && v != 28 {
        return Err(SignatureError::InvalidRecoveryByte(v));
    }
    let recid = RecoveryId::try_from(v - 27).map_err(|_| SignatureError::InvalidSignature)?;
    let sig =
        Signature::from_slice(&bytes[..64]).map_err(|_| SignatureError::InvalidSignature)?;
    let vk = VerifyingKey::recover_from_prehash(digest, &sig, recid)
        .map_err(|_| SignatureError::InvalidSignature)?;
    Ok(address_from_verifying_key(&vk))
}

fn address_from_verifying_key(vk: &VerifyingKey) -> String {
    let point = vk.to_encoded_point(false);
    // skip the 0x04 uncompressed-point marker
    let digest = keccak256(&point.as_bytes()[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_key_derives_known_address() {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let signer = AttestorSigner::from_secret_bytes(&secret).unwrap();
        assert_eq!(
            signer.address(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn sign_recover_round_trip() {
        let signer = AttestorSigner::generate();
        let digest = keccak256(b"claim output vector");
        let sig = signer.sign_hash(&digest).unwrap();
        assert_eq!(sig.as_bytes().len(), 65);
        assert!(matches!(sig.as_bytes()[64], 27 | 28));
        assert_eq!(recover_address(&digest, &sig).unwrap(), signer.address());
    }

    #[test]
    fn signing_is_deterministic() {
        let signer = AttestorSigner::from_secret_bytes(&[7u8; 32]).unwrap();
        let digest = keccak256(b"same input");
        assert_eq!(
            signer.sign_hash(&digest).unwrap(),
            signer.sign_hash(&digest).unwrap()
        );
    }

    #[test]
    fn tampered_digest_recovers_a_different_address() {
        let signer = AttestorSigner::generate();
        let digest = keccak256(b"original");
        let sig = signer.sign_hash(&digest).unwrap();
        let tampered = keccak256(b"tampered");
        let recovered = recover_address(&tampered, &sig);
        match recovered {
            Ok(addr) => assert_ne!(addr, signer.address()),
            Err(_) => {} // an unrecoverable point is also a rejection
        }
    }

    #[test]
    fn personal_message_mode_signs_a_different_digest() {
        let hash = keccak256(b"message");
        assert_ne!(
            SignatureMode::Raw.digest(&hash),
            SignatureMode::EthPersonalMessage.digest(&hash)
        );
    }

    #[test]
    fn rejects_malformed_signatures() {
        let digest = [0u8; 32];
        let short = EcdsaSignature(vec![0u8; 64]);
        assert!(matches!(
            recover_address(&digest, &short),
            Err(SignatureError::InvalidSignatureLength(64))
        ));
        let mut bytes = vec![1u8; 65];
        bytes[64] = 3; // not a legacy recovery byte
        assert!(matches!(
            recover_address(&digest, &EcdsaSignature(bytes)),
            Err(SignatureError::InvalidRecoveryByte(3))
        ));
    }
}
