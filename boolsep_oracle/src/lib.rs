//! Oracles (spec.md §4.C): given a candidate EXCLUDE-subset, decide
//! feasibility and, if feasible, produce a separating constraint.

mod lp;
mod qmc;
mod subspace;

pub use lp::LpOracle;
pub use qmc::quine_mccluskey_maximal_cubes;
pub use subspace::SubspaceOracle;

use boolsep_collections::SparseIndexSet;
use boolsep_constraints::Constraint;

/// `query(S) -> (feasible, witness)`. If `S` is empty the answer is always
/// `(true, trivial)`. A feasible witness satisfies every INCLUDE point and
/// refutes every EXCLUDE point indexed by `S`; each implementation asserts
/// this before returning (a violation is a solver bug, not a recoverable
/// error, hence a panic rather than a `Result`).
pub trait Oracle {
    fn query(&mut self, bads: &SparseIndexSet) -> (bool, Option<Constraint>);
}
