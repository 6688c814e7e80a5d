use boolsep_collections::{Point, SparseIndexSet};
use boolsep_learner::strategies::{LevelLearn, Strategy};
use boolsep_pool::{ConstraintPool, PrecisionKind};
use boolsep_shift::ShiftLearnDriver;
use std::sync::Arc;

fn p(values: &[u8]) -> Point {
    Point::new(values.to_vec())
}

fn run_with_threads(threads: usize) -> Vec<SparseIndexSet> {
    let include = vec![p(&[0, 0, 0])];
    let exclude = vec![p(&[1, 0, 0]), p(&[0, 1, 1])];

    let mut pool = ConstraintPool::new(exclude, Some(include), None, false, PrecisionKind::Identity).unwrap();
    let make_chain: Arc<boolsep_shift::ChainFactory> =
        Arc::new(|| -> Vec<Box<dyn Strategy>> { vec![Box::new(LevelLearn::new(1))] });

    let mut driver = ShiftLearnDriver::new(&mut pool).unwrap();
    driver.process_all_shifts(make_chain, threads);

    let mut installed: Vec<SparseIndexSet> = pool.learner().iter_lower().cloned().collect();
    installed.sort();
    installed
}

/// Scenario 6: a non-monotone 3-bit problem with two EXCLUDE points. The set
/// of installed lower-frontier candidates must not depend on how many
/// worker threads processed the per-origin subpools.
#[test]
fn shift_learn_composition_is_thread_order_invariant() {
    let baseline = run_with_threads(1);
    assert_eq!(baseline, vec![SparseIndexSet::from_iter([0]), SparseIndexSet::from_iter([1])]);

    for threads in [2, 4, 8] {
        assert_eq!(run_with_threads(threads), baseline, "mismatch at threads={threads}");
    }
}
