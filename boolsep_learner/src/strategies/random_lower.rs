use crate::strategies::Strategy;
use crate::LowerSetLearner;
use boolsep_collections::SparseIndexSet;
use boolsep_oracle::Oracle;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

const WINDOW: usize = 64;

/// Random-probing strategy used for seeding (spec.md §4.E): sample a random
/// subset, classify it, and walk to a maximal/minimal witness on a fresh
/// verdict. Stops once the recent fraction of already-known (redundant)
/// probes exceeds `max_repeat_rate`.
pub struct RandomLower {
    pub max_repeat_rate: f64,
    seed: u64,
}

impl RandomLower {
    pub fn new(max_repeat_rate: f64, seed: u64) -> Self {
        RandomLower { max_repeat_rate, seed }
    }
}

impl Strategy for RandomLower {
    #[tracing::instrument(skip_all, fields(max_repeat_rate = self.max_repeat_rate))]
    fn run(&mut self, learner: &mut LowerSetLearner, oracle: &mut dyn Oracle) {
        let n = learner.n() as u32;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut recent: VecDeque<bool> = VecDeque::with_capacity(WINDOW);

        loop {
            let candidate = SparseIndexSet::from_iter((0..n).filter(|_| rng.random_bool(0.5)));

            let was_redundant = learner.classify(&candidate).is_some();
            push_window(&mut recent, was_redundant);

            if !was_redundant {
                let (feasible, witness) = oracle.query(&candidate);
                if feasible {
                    let s = walk_up_greedy(learner, oracle, candidate);
                    let (_, w) = oracle.query(&s);
                    learner.add_lower(&s, w.or(witness).expect("feasible"), false);
                } else {
                    let s = walk_down_greedy(oracle, candidate);
                    learner.add_upper(&s);
                }
            }

            if recent.len() == WINDOW {
                let redundant_rate = recent.iter().filter(|&&b| b).count() as f64 / WINDOW as f64;
                if redundant_rate > self.max_repeat_rate {
                    tracing::debug!(redundant_rate, "random lower: repeat rate exceeded, stopping");
                    break;
                }
            }
        }
    }
}

fn push_window(window: &mut VecDeque<bool>, value: bool) {
    if window.len() == WINDOW {
        window.pop_front();
    }
    window.push_back(value);
}

fn walk_up_greedy(learner: &LowerSetLearner, oracle: &mut dyn Oracle, start: SparseIndexSet) -> SparseIndexSet {
    let mut s = start;
    for i in 0..learner.n() as u32 {
        if s.contains(i) {
            continue;
        }
        let candidate = SparseIndexSet::from_iter(s.iter().chain(std::iter::once(i)));
        let (feasible, _) = oracle.query(&candidate);
        if feasible {
            s = candidate;
        }
    }
    s
}

fn walk_down_greedy(oracle: &mut dyn Oracle, start: SparseIndexSet) -> SparseIndexSet {
    let mut s = start.clone();
    for i in start.iter() {
        if !s.contains(i) {
            continue;
        }
        let candidate = s.difference(&SparseIndexSet::singleton(i));
        let (feasible, _) = oracle.query(&candidate);
        if !feasible {
            s = candidate;
        }
    }
    s
}
