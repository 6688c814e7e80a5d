use crate::strategies::Strategy;
use crate::LowerSetLearner;
use boolsep_collections::SparseIndexSet;
use boolsep_oracle::Oracle;

/// Enumerate all sparse index sets of cardinality `<= levels_lower` and
/// classify each via the oracle. Runs first to cheaply seed the frontier
/// with small-cardinality knowledge before a descent-based strategy takes
/// over.
pub struct LevelLearn {
    pub levels_lower: usize,
}

impl LevelLearn {
    pub fn new(levels_lower: usize) -> Self {
        LevelLearn { levels_lower }
    }
}

impl Strategy for LevelLearn {
    #[tracing::instrument(skip_all, fields(levels_lower = self.levels_lower))]
    fn run(&mut self, learner: &mut LowerSetLearner, oracle: &mut dyn Oracle) {
        let n = learner.n() as u32;
        for k in 0..=self.levels_lower {
            for combo in combinations(n, k) {
                let s = SparseIndexSet::from_iter(combo);
                if learner.classify(&s).is_some() {
                    continue;
                }
                let (feasible, witness) = oracle.query(&s);
                if feasible {
                    learner.add_lower(&s, witness.expect("feasible query must carry a witness"), false);
                } else {
                    learner.add_upper(&s);
                }
            }
        }
        tracing::debug!(n_lower = learner.n_lower(), n_upper = learner.n_upper(), "level learning done");
    }
}

/// All `k`-element subsets of `0..n`, in ascending lexicographic order.
fn combinations(n: u32, k: usize) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    let mut current = Vec::with_capacity(k);
    combinations_rec(0, n, k, &mut current, &mut out);
    out
}

fn combinations_rec(start: u32, n: u32, k: usize, current: &mut Vec<u32>, out: &mut Vec<Vec<u32>>) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    for i in start..n {
        current.push(i);
        combinations_rec(i + 1, n, k, current, out);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combinations_counts_match_binomial() {
        assert_eq!(combinations(5, 0).len(), 1);
        assert_eq!(combinations(5, 1).len(), 5);
        assert_eq!(combinations(5, 2).len(), 10);
    }
}
