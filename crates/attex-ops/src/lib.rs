//! attex-ops
//!
//! The transform registry: a closed catalogue of pure operators, plus the
//! condition evaluator used by `validate` and `conditionalOn`. Operators
//! never perform I/O and never touch state outside the value and scope they
//! are handed; the registry itself is a match over the op variants.

pub mod assertions;
pub mod combine;
pub mod condition;
pub mod math;
pub mod registry;
pub mod string;
pub mod time;

pub use condition::evaluate as evaluate_condition;
pub use registry::{apply, OpOutcome};
