pub mod claim;
pub mod executor;

pub use claim::{claim_root, provider_hash};
pub use executor::{execute, Deadline};
