pub mod condition;
pub mod constants;
pub mod error;
pub mod processor;
pub mod scope;
pub mod types;
pub mod value;

pub use condition::Condition;
pub use constants::*;
pub use error::{AttexError, ValidationIssue};
pub use processor::{Op, Processor, TransformRule};
pub use scope::Scope;
pub use types::{
    EcdsaSignature, Hash32, OutputSpec, ProcessedClaimData, ProviderClaimData,
};
pub use value::Value;
