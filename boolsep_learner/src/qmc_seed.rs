//! Bridges the oracle crate's offline Quine-McCluskey bulk step into the
//! learner: each maximal cube becomes a known-maximal lower element, and the
//! lower frontier is then marked complete (spec.md §4.C).

use crate::LowerSetLearner;
use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::Constraint;
use boolsep_oracle::quine_mccluskey_maximal_cubes;

/// Seed `learner` (over EXCLUDE indexed by `i2exc`) from the prime implicants
/// of `i2exc` itself: each cube is converted to an `AndClause` ("subset of
/// EXCLUDE"); its complement, an `OrClause`, is the witness installed for the
/// lower element naming the EXCLUDE indices the cube covers. This is the CNF
/// direction; see [`seed_from_quine_mccluskey_dnf`] for the DNF direction.
pub fn seed_from_quine_mccluskey(learner: &mut LowerSetLearner, i2exc: &[Point]) -> usize {
    let n = learner.n();
    let cubes = quine_mccluskey_maximal_cubes(n, i2exc);
    let mut installed = 0;

    for rem_clause in cubes {
        let keep_clause = rem_clause.complement();
        let covered: Vec<u32> = i2exc
            .iter()
            .enumerate()
            .filter(|(_, p)| rem_clause.satisfy(p))
            .map(|(i, _)| i as u32)
            .collect();
        let fset = SparseIndexSet::from_iter(covered);
        learner.add_lower(&fset, Constraint::from(keep_clause), true);
        installed += 1;
    }

    learner.mark_complete_lower();
    installed
}

/// The DNF direction: swap INCLUDE/EXCLUDE before the Quine-McCluskey pass
/// (the learner is expected to be indexed over `include`, typically a
/// swapped-role `ConstraintPool` whose EXCLUDE is the original INCLUDE), and
/// install each prime implicant directly as an `AndClause` witness rather
/// than complementing it to an `OrClause` — the net effect of complementing
/// the CNF witness back once the roles are swapped back. Mirrors
/// [`seed_from_quine_mccluskey`] step for step, aside from that one skipped
/// complement.
pub fn seed_from_quine_mccluskey_dnf(learner: &mut LowerSetLearner, include: &[Point]) -> usize {
    let n = learner.n();
    let cubes = quine_mccluskey_maximal_cubes(n, include);
    let mut installed = 0;

    for cube in cubes {
        let covered: Vec<u32> = include
            .iter()
            .enumerate()
            .filter(|(_, p)| cube.satisfy(p))
            .map(|(i, _)| i as u32)
            .collect();
        let fset = SparseIndexSet::from_iter(covered);
        learner.add_lower(&fset, Constraint::from(cube), true);
        installed += 1;
    }

    learner.mark_complete_lower();
    installed
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolsep_precision::Identity;
    use std::sync::Arc;

    #[test]
    fn seeds_xor_exclude_as_two_maximal_cnf_witnesses() {
        let exclude = vec![Point::new(vec![0, 0]), Point::new(vec![1, 1])];
        let mut learner = LowerSetLearner::new(2, Arc::new(Identity));
        let installed = seed_from_quine_mccluskey(&mut learner, &exclude);

        assert_eq!(installed, 2);
        assert!(learner.is_complete_lower());
        for s in learner.iter_lower() {
            assert_eq!(s.len(), 1);
        }
    }

    #[test]
    fn seeds_xor_include_as_two_maximal_dnf_witnesses() {
        let include = vec![Point::new(vec![0, 1]), Point::new(vec![1, 0])];
        let mut learner = LowerSetLearner::new(2, Arc::new(Identity));
        let installed = seed_from_quine_mccluskey_dnf(&mut learner, &include);

        assert_eq!(installed, 2);
        assert!(learner.is_complete_lower());
        for fset in learner.iter_lower() {
            let witness = learner.meta(fset).unwrap();
            assert!(matches!(witness, Constraint::AndClause(_)));
            assert!(!witness.satisfy(&Point::new(vec![0, 0])));
            assert!(!witness.satisfy(&Point::new(vec![1, 1])));
        }
    }
}
