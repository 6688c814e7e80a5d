//! Shift-learn (spec.md §4.H, §9 "shift-learn commutativity"): reduces a
//! non-monotone separation problem to one monotone subproblem per EXCLUDE
//! origin, run independently (optionally across a worker pool grounded on
//! the teacher's `parallel_solver.rs` channel-based pattern), and composed
//! back into the main pool once every origin that could have corroborated a
//! candidate has done so.

mod error;
mod origin;

pub use error::ShiftError;

use boolsep_collections::SparseIndexSet;
use boolsep_constraints::Constraint;
use boolsep_learner::strategies::Strategy;
use boolsep_pool::ConstraintPool;
use hashbrown::HashMap;
use origin::{process_origin, OriginResult};
use std::sync::Arc;
use std::thread;

/// Builds a fresh strategy chain for one origin's subpool. Must be
/// `Send + Sync` since worker threads each call it independently; it is
/// never itself shared across threads, only invoked to produce thread-local
/// `Strategy` instances.
pub type ChainFactory = dyn Fn() -> Vec<Box<dyn Strategy>> + Send + Sync;

/// Drives shift-learning over a generic (non-monotone, non-reoriented)
/// `ConstraintPool`.
pub struct ShiftLearnDriver<'a> {
    pool: &'a mut ConstraintPool,
}

impl<'a> ShiftLearnDriver<'a> {
    pub fn new(pool: &'a mut ConstraintPool) -> Result<Self, ShiftError> {
        if pool.is_upper() || pool.direction().is_some() {
            return Err(ShiftError::NotGenericPool);
        }
        Ok(ShiftLearnDriver { pool })
    }

    /// Processes every EXCLUDE point as a reorientation origin, across
    /// `threads` worker threads (1 runs sequentially, inline), then installs
    /// every composed-complete candidate into the pool's learner.
    pub fn process_all_shifts(&mut self, make_chain: Arc<ChainFactory>, threads: usize) {
        let n = self.pool.n();
        let include = self.pool.include().to_vec();
        let i2exc = self.pool.i2exc().to_vec();
        let n_origins = i2exc.len();

        let results: Vec<OriginResult> = if threads <= 1 {
            (0..n_origins)
                .map(|idx| process_origin(idx, n, &i2exc[idx], &include, &i2exc, make_chain.as_ref()))
                .collect()
        } else {
            run_pool(threads, n, include, i2exc, make_chain)
        };

        let mut counts: HashMap<SparseIndexSet, u32> = HashMap::new();
        let mut core: HashMap<SparseIndexSet, boolsep_collections::Point> = HashMap::new();
        let mut solutions: HashMap<SparseIndexSet, Constraint> = HashMap::new();

        for r in results {
            for (vec, c) in r.core {
                if let Some(existing) = core.get(&vec) {
                    assert_eq!(existing, &c, "shift-learn: inconsistent core for the same candidate across origins");
                } else {
                    core.insert(vec.clone(), c);
                }
                *counts.entry(vec).or_insert(0) += 1;
            }
            solutions.extend(r.solutions);
        }

        self.compose(counts, core, solutions);
    }

    fn compose(
        &mut self,
        counts: HashMap<SparseIndexSet, u32>,
        core: HashMap<SparseIndexSet, boolsep_collections::Point>,
        solutions: HashMap<SparseIndexSet, Constraint>,
    ) {
        let mut installed = 0;
        for (vec, count) in counts {
            let weight = core[&vec].iter().filter(|&b| b == 1).count() as u32;
            if count == 1u32 << weight {
                let witness = solutions[&vec].clone();
                self.pool.learner_mut().add_lower(&vec, witness, true);
                installed += 1;
            }
        }
        tracing::info!(installed, "shift-learn composition complete");
    }
}

fn run_pool(
    threads: usize,
    n: usize,
    include: Vec<boolsep_collections::Point>,
    i2exc: Vec<boolsep_collections::Point>,
    make_chain: Arc<ChainFactory>,
) -> Vec<OriginResult> {
    let include = Arc::new(include);
    let i2exc = Arc::new(i2exc);
    let n_origins = i2exc.len();

    let (work_tx, work_rx) = crossbeam_channel::unbounded::<usize>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<OriginResult>();
    for idx in 0..n_origins {
        work_tx.send(idx).expect("channel alive");
    }
    drop(work_tx);

    let mut handles = Vec::with_capacity(threads);
    for _ in 0..threads {
        let work_rx = work_rx.clone();
        let result_tx = result_tx.clone();
        let include = Arc::clone(&include);
        let i2exc = Arc::clone(&i2exc);
        let make_chain = Arc::clone(&make_chain);
        handles.push(thread::spawn(move || {
            for idx in work_rx.iter() {
                let origin = i2exc[idx].clone();
                let r = process_origin(idx, n, &origin, include.as_slice(), i2exc.as_slice(), make_chain.as_ref());
                result_tx.send(r).expect("result channel alive");
            }
        }));
    }
    drop(result_tx);

    let results = result_rx.iter().collect();
    for h in handles {
        h.join().expect("shift-learn worker panicked");
    }
    results
}
