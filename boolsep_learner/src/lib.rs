//! Lower-set learner (spec.md §4.D): maintains the frontier of
//! maximal-feasible (`lower`) and minimal-infeasible (`upper`) sparse index
//! sets, driven by an oracle, with pluggable extra-precision canonicalization
//! and single-file persistence.

mod persist;
mod qmc_seed;
pub mod strategies;

pub use persist::LearnerError;
pub use qmc_seed::{seed_from_quine_mccluskey, seed_from_quine_mccluskey_dnf};

use boolsep_collections::SparseIndexSet;
use boolsep_constraints::Constraint;
use boolsep_precision::ExtraPrecision;
use hashbrown::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Cached verdict for a candidate subset: feasible (covered by some lower
/// element) or infeasible (dominated by some upper element).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Feasible,
    Infeasible,
}

pub struct LowerSetLearner {
    n: usize,
    extra_prec: Arc<dyn ExtraPrecision>,
    lower: Vec<SparseIndexSet>,
    upper: Vec<SparseIndexSet>,
    meta: HashMap<SparseIndexSet, Constraint>,
    is_complete_lower: bool,
    is_complete_upper: bool,
}

impl LowerSetLearner {
    pub fn new(n: usize, extra_prec: Arc<dyn ExtraPrecision>) -> Self {
        LowerSetLearner {
            n,
            extra_prec,
            lower: Vec::new(),
            upper: Vec::new(),
            meta: HashMap::new(),
            is_complete_lower: false,
            is_complete_upper: false,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn is_complete_lower(&self) -> bool {
        self.is_complete_lower
    }

    pub fn is_complete_upper(&self) -> bool {
        self.is_complete_upper
    }

    pub fn mark_complete_lower(&mut self) {
        self.is_complete_lower = true;
    }

    pub fn mark_complete_upper(&mut self) {
        self.is_complete_upper = true;
    }

    pub fn n_lower(&self) -> usize {
        self.lower.len()
    }

    pub fn n_upper(&self) -> usize {
        self.upper.len()
    }

    /// Insert `s` into `lower`, removing any existing subset, after reducing
    /// it through the extra-precision map. If `is_prime` is not asserted by
    /// the caller, the insertion is rejected (debug-only check) when an
    /// existing lower element already dominates it, i.e. `s` was not
    /// actually maximal.
    pub fn add_lower(&mut self, s: &SparseIndexSet, witness: Constraint, is_prime: bool) {
        let reduced = self.extra_prec.reduce_set(s);

        if !is_prime {
            debug_assert!(
                !self.lower.iter().any(|e| reduced.is_subset_of(e) && *e != reduced),
                "add_lower: S is not maximal (dominated by an existing lower element)"
            );
        }

        self.lower.retain(|e| !e.is_subset_of(&reduced));
        self.lower.push(reduced.clone());
        self.meta.insert(reduced, witness);
        tracing::debug!(n_lower = self.lower.len(), "inserted lower element");
    }

    pub fn add_upper(&mut self, s: &SparseIndexSet) {
        let reduced = self.extra_prec.reduce_set(s);
        self.upper.retain(|e| !reduced.is_subset_of(e));
        self.upper.push(reduced);
        tracing::debug!(n_upper = self.upper.len(), "inserted upper element");
    }

    /// The lower frontier, in ascending sparse-set order.
    pub fn iter_lower(&self) -> impl Iterator<Item = &SparseIndexSet> {
        let mut sorted: Vec<&SparseIndexSet> = self.lower.iter().collect();
        sorted.sort();
        sorted.into_iter()
    }

    pub fn iter_upper(&self) -> impl Iterator<Item = &SparseIndexSet> {
        let mut sorted: Vec<&SparseIndexSet> = self.upper.iter().collect();
        sorted.sort();
        sorted.into_iter()
    }

    pub fn meta(&self, s: &SparseIndexSet) -> Option<&Constraint> {
        self.meta.get(s)
    }

    /// Cached verdict for `s`, or `None` if neither frontier decides it yet.
    pub fn classify(&self, s: &SparseIndexSet) -> Option<Verdict> {
        if self.lower.iter().any(|l| s.is_subset_of(l)) {
            return Some(Verdict::Feasible);
        }
        if self.upper.iter().any(|u| u.is_subset_of(s)) {
            return Some(Verdict::Infeasible);
        }
        None
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LearnerError> {
        persist::save(self, path.as_ref())
    }

    pub fn load(path: impl AsRef<Path>, extra_prec: Arc<dyn ExtraPrecision>) -> Result<Self, LearnerError> {
        persist::load(path.as_ref(), extra_prec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolsep_constraints::Inequality;
    use boolsep_precision::Identity;

    #[test]
    fn add_lower_removes_dominated_subsets() {
        let mut learner = LowerSetLearner::new(4, Arc::new(Identity));
        let small = SparseIndexSet::from_iter([0, 1]);
        let big = SparseIndexSet::from_iter([0, 1, 2]);

        learner.add_lower(&small, Constraint::from(Inequality::trivial(4)), true);
        assert_eq!(learner.n_lower(), 1);

        learner.add_lower(&big, Constraint::from(Inequality::trivial(4)), true);
        assert_eq!(learner.n_lower(), 1);
        assert!(learner.iter_lower().next().unwrap() == &big);
    }

    #[test]
    fn classify_uses_both_frontiers() {
        let mut learner = LowerSetLearner::new(4, Arc::new(Identity));
        learner.add_lower(&SparseIndexSet::from_iter([0, 1]), Constraint::from(Inequality::trivial(4)), true);
        learner.add_upper(&SparseIndexSet::from_iter([2, 3]));

        assert_eq!(learner.classify(&SparseIndexSet::from_iter([0])), Some(Verdict::Feasible));
        assert_eq!(learner.classify(&SparseIndexSet::from_iter([2, 3, 0])), Some(Verdict::Infeasible));
        assert_eq!(learner.classify(&SparseIndexSet::from_iter([0, 2])), None);
    }

    #[test]
    fn iter_lower_and_upper_are_sorted() {
        let mut learner = LowerSetLearner::new(4, Arc::new(Identity));
        learner.add_lower(&SparseIndexSet::from_iter([2]), Constraint::from(Inequality::trivial(4)), true);
        learner.add_lower(&SparseIndexSet::from_iter([0]), Constraint::from(Inequality::trivial(4)), true);
        let lower: Vec<_> = learner.iter_lower().collect();
        assert!(lower[0] < lower[1]);
    }
}
