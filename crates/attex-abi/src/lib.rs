//! attex-abi
//!
//! Everything that has to be byte-exact with the verifying contract: the
//! canonical JSON form behind processor identity, the recognised EVM type
//! set, string→ABI coercion, tuple encoding, and the identity and message
//! hashes.

pub mod canon;
pub mod encode;
pub mod identity;

pub use canon::canonical_json;
pub use encode::{encode_outputs, message_hash, recognised_type};
pub use identity::{processor_hash, processor_provider_hash};
