//! Extra-precision maps: pluggable `reduce`/`expand` closure operators on
//! sparse index sets (spec.md §4.B).

mod identity;
mod lower_set;
mod subspace;

pub use identity::Identity;
pub use lower_set::LowerSetPrecision;
pub use subspace::SubspacePrecision;

use boolsep_collections::SparseIndexSet;

/// A closure operator over sparse index sets that canonicalizes
/// provably-equivalent members of the monotone family being learned.
///
/// `reduce` must be idempotent once composed with `expand` (`reduce∘expand =
/// reduce`), and conversely for `expand∘reduce = expand`; both return the
/// skipped count described in spec.md §4.B.
pub trait ExtraPrecision: Send + Sync {
    /// Canonical (smallest) representative of `s`'s equivalence class.
    /// A positive skipped count is informational only.
    fn reduce(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize);

    /// Full closure of `s`. A positive skipped count means the closure
    /// leaves the universe, i.e. the query is infeasible.
    fn expand(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize);

    fn reduce_set(&self, s: &SparseIndexSet) -> SparseIndexSet {
        self.reduce(s).0
    }

    fn expand_set(&self, s: &SparseIndexSet) -> SparseIndexSet {
        self.expand(s).0
    }
}
