pub mod ecdsa;
pub mod hash;

pub use ecdsa::{recover_address, AttestorSigner, SignatureError, SignatureMode};
pub use hash::{keccak256, keccak256_hex, sha256, sha256_hex};
