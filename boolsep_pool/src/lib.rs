//! Constraint pool and subset selector (spec.md §4.F, §4.G): collects
//! learned lower-frontier witnesses into finalized constraints indexed by
//! the EXCLUDE points they refute, then picks a small covering subset.

mod error;
mod pool;
mod selector;

pub use error::PoolError;
pub use pool::{ConstraintPool, FinalizedConstraint, PrecisionKind};
pub use selector::SubsetSelector;
