use crate::strategies::Strategy;
use crate::LowerSetLearner;
use boolsep_collections::SparseIndexSet;
use boolsep_oracle::Oracle;
use splr::{Certificate, Config, Solver};
use std::path::PathBuf;

/// Tie-breaking bias applied to a freshly solved SAT model before it is
/// handed to the oracle: `Max` greedily flips more variables true (biasing
/// toward discovering lower-set maxima with fewer subsequent queries),
/// `Min` greedily flips more variables false (biasing toward upper-set
/// minima), `None` leaves the solver's own model untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Min,
    Max,
    None,
}

/// SAT-guided descent (spec.md §4.E): repeatedly asks a SAT solver for a
/// model of the accumulated blocking clauses, probes it against the oracle,
/// and walks to a maximal/minimal witness before blocking it and looping.
/// splr exposes a one-shot solve, not an incremental add-clause API, so each
/// iteration rebuilds the solver over the accumulated clause set.
pub struct GainanovSat {
    pub sense: Sense,
    pub save_rate: usize,
    pub save_path: Option<PathBuf>,
}

impl GainanovSat {
    pub fn new(sense: Sense, save_rate: usize, save_path: Option<PathBuf>) -> Self {
        GainanovSat { sense, save_rate, save_path }
    }
}

impl Strategy for GainanovSat {
    #[tracing::instrument(skip_all, fields(sense = ?self.sense))]
    fn run(&mut self, learner: &mut LowerSetLearner, oracle: &mut dyn Oracle) {
        let n = learner.n();
        let mut clauses: Vec<Vec<i32>> = Vec::new();
        let mut since_save = 0usize;

        loop {
            let mut model = match solve(n, &clauses) {
                Some(m) => m,
                None => {
                    learner.mark_complete_lower();
                    tracing::debug!("gainanov sat exhausted: no more models");
                    break;
                }
            };
            bias_model(&mut model, &clauses, self.sense);

            let candidate = model_to_set(&model);
            let (feasible, witness) = oracle.query(&candidate);

            if feasible {
                let (s, cons) = walk_up(learner, oracle, candidate, witness.expect("feasible"));
                let clause: Vec<i32> = s.iter().map(|i| -((i + 1) as i32)).collect();
                learner.add_lower(&s, cons, true);
                clauses.push(clause);
            } else {
                let s = walk_down(oracle, candidate);
                let clause: Vec<i32> = (0..n as u32).filter(|i| !s.contains(*i)).map(|i| (i + 1) as i32).collect();
                learner.add_upper(&s);
                clauses.push(clause);
            }

            since_save += 1;
            if let Some(path) = &self.save_path {
                if self.save_rate > 0 && since_save % self.save_rate == 0 {
                    if let Err(err) = learner.save(path) {
                        tracing::warn!(%err, "gainanov sat: failed to persist learner state");
                    }
                }
            }
        }
    }
}

fn solve(n: usize, clauses: &[Vec<i32>]) -> Option<Vec<bool>> {
    if clauses.is_empty() {
        return Some(vec![false; n]);
    }
    let mut solver = Solver::try_from((Config::default(), clauses.to_vec())).ok()?;
    match solver.solve() {
        Ok(Certificate::SAT(lits)) => {
            let mut model = vec![false; n];
            for lit in lits {
                if lit > 0 {
                    model[(lit - 1) as usize] = true;
                }
            }
            Some(model)
        }
        Ok(Certificate::UNSAT) | Err(_) => None,
    }
}

fn clause_holds(clause: &[i32], model: &[bool]) -> bool {
    clause.iter().any(|&l| {
        let idx = (l.unsigned_abs() - 1) as usize;
        if l > 0 {
            model[idx]
        } else {
            !model[idx]
        }
    })
}

fn bias_model(model: &mut [bool], clauses: &[Vec<i32>], sense: Sense) {
    match sense {
        Sense::None => {}
        Sense::Max => {
            for i in 0..model.len() {
                if !model[i] {
                    model[i] = true;
                    if !clauses.iter().all(|c| clause_holds(c, model)) {
                        model[i] = false;
                    }
                }
            }
        }
        Sense::Min => {
            for i in 0..model.len() {
                if model[i] {
                    model[i] = false;
                    if !clauses.iter().all(|c| clause_holds(c, model)) {
                        model[i] = true;
                    }
                }
            }
        }
    }
}

fn model_to_set(model: &[bool]) -> SparseIndexSet {
    SparseIndexSet::from_iter(model.iter().enumerate().filter(|(_, &b)| b).map(|(i, _)| i as u32))
}

fn walk_up(
    learner: &LowerSetLearner,
    oracle: &mut dyn Oracle,
    start: SparseIndexSet,
    start_witness: boolsep_constraints::Constraint,
) -> (SparseIndexSet, boolsep_constraints::Constraint) {
    let mut s = start;
    let mut cons = start_witness;
    for i in 0..learner.n() as u32 {
        if s.contains(i) {
            continue;
        }
        let candidate = SparseIndexSet::from_iter(s.iter().chain(std::iter::once(i)));
        let (feasible, witness) = oracle.query(&candidate);
        if feasible {
            s = candidate;
            cons = witness.expect("feasible");
        }
    }
    (s, cons)
}

fn walk_down(oracle: &mut dyn Oracle, start: SparseIndexSet) -> SparseIndexSet {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clause_holds_matches_literal_semantics() {
        let model = vec![true, false];
        assert!(clause_holds(&[1, -2], &model));
        assert!(clause_holds(&[-1, 2], &model) == false);
    }

    #[test]
    fn model_to_set_picks_true_positions() {
        let set = model_to_set(&[true, false, true]);
        assert_eq!(set, SparseIndexSet::from_iter([0, 2]));
    }
}
