use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::Constraint;
use boolsep_learner::strategies::{LevelLearn, Strategy};
use boolsep_learner::{seed_from_quine_mccluskey, seed_from_quine_mccluskey_dnf, LowerSetLearner};
use boolsep_oracle::{Oracle, SubspaceOracle};
use boolsep_pool::{ConstraintPool, PrecisionKind};
use boolsep_precision::Identity;
use std::sync::Arc;

fn p(values: &[u8]) -> Point {
    Point::new(values.to_vec())
}

/// Scenario 1: monotone upper, n=2. INCLUDE = {01,10,11}, EXCLUDE = {00}.
/// One inequality should be enough to separate them.
#[test]
fn monotone_upper_two_vars_needs_one_inequality() {
    let include = vec![p(&[0, 1]), p(&[1, 0]), p(&[1, 1])];
    let exclude = vec![p(&[0, 0])];

    let mut pool = ConstraintPool::new(exclude.clone(), Some(include.clone()), None, true, PrecisionKind::Identity).unwrap();

    let mut oracle = pool.make_lp_oracle();
    LevelLearn::new(1).run(pool.learner_mut(), &mut oracle);
    pool.learner_mut().mark_complete_lower();

    pool.finalize().unwrap();
    let constraints = pool.constraints().unwrap();
    assert_eq!(constraints.len(), 1, "a single halfspace must separate this instance");

    for q in &include {
        assert!(constraints[0].final_.satisfy(q));
    }
    for q in &exclude {
        assert!(!constraints[0].final_.satisfy(q));
    }
}

/// Scenario 2: monotone lower, n=3. INCLUDE is the downward closure of
/// {110,101,011}; its complement (the single point 111) is EXCLUDE. The
/// finalized pool must satisfy the universal include/exclude invariants
/// regardless of how many halfspaces the selector settles on.
#[test]
fn monotone_lower_three_vars_self_check_holds() {
    let all_points: Vec<Point> = (0u8..8).map(|m| p(&[(m >> 2) & 1, (m >> 1) & 1, m & 1])).collect();
    let generators = [p(&[1, 1, 0]), p(&[1, 0, 1]), p(&[0, 1, 1])];
    let is_below_some_generator = |q: &Point| generators.iter().any(|g| q.leq(g));

    let include: Vec<Point> = all_points.iter().filter(|q| is_below_some_generator(q)).cloned().collect();
    let exclude: Vec<Point> = all_points.iter().filter(|q| !is_below_some_generator(q)).cloned().collect();
    assert_eq!(exclude.len(), 1);

    let mut pool = ConstraintPool::new(exclude, Some(include), None, false, PrecisionKind::Identity).unwrap();

    let mut oracle = pool.make_lp_oracle();
    LevelLearn::new(pool.i2exc().len()).run(pool.learner_mut(), &mut oracle);
    pool.learner_mut().mark_complete_lower();

    pool.finalize().unwrap();
    assert!(!pool.constraints().unwrap().is_empty());
    let indices: Vec<usize> = (0..pool.constraints().unwrap().len()).collect();
    pool.check_subset(&indices).unwrap();
}

/// Scenario 3: CNF of XOR, n=2. EXCLUDE = {00,11}; the two EXCLUDE points are
/// not adjacent, so Quine-McCluskey yields them as two unmerged primes, and
/// their complements are exactly the clauses `(x0 v x1)` and `(!x0 v !x1)`.
#[test]
fn cnf_of_xor_gives_two_clauses() {
    let include = vec![p(&[0, 1]), p(&[1, 0])];
    let exclude = vec![p(&[0, 0]), p(&[1, 1])];

    let mut pool = ConstraintPool::new(exclude.clone(), Some(include), None, false, PrecisionKind::Identity).unwrap();
    let installed = seed_from_quine_mccluskey(pool.learner_mut(), pool.i2exc());
    assert_eq!(installed, 2);

    pool.finalize().unwrap();
    let constraints = pool.constraints().unwrap();
    assert_eq!(constraints.len(), 2);

    for q in &exclude {
        assert!(constraints.iter().any(|c| !c.final_.satisfy(q)));
    }
}

/// Scenario 4: DNF of XOR, n=2. Role-swap INCLUDE/EXCLUDE before running
/// Quine-McCluskey, installing the resulting cubes directly as `AndClause`
/// witnesses into a learner indexed over the (swapped) INCLUDE points, the
/// same way scenario 3 installs CNF witnesses into a learner indexed over
/// EXCLUDE.
#[test]
fn dnf_of_xor_gives_two_cubes() {
    let include = vec![p(&[0, 1]), p(&[1, 0])];

    let mut learner = LowerSetLearner::new(include.len(), Arc::new(Identity));
    let installed = seed_from_quine_mccluskey_dnf(&mut learner, &include);
    assert_eq!(installed, 2);
    assert!(learner.is_complete_lower());

    let dnf_terms: Vec<Constraint> = learner.iter_lower().map(|fset| learner.meta(fset).unwrap().clone()).collect();
    assert_eq!(dnf_terms.len(), 2);

    assert!(dnf_terms.iter().any(|c| c.satisfy(&p(&[0, 1])) && !c.satisfy(&p(&[1, 0]))));
    assert!(dnf_terms.iter().any(|c| c.satisfy(&p(&[1, 0])) && !c.satisfy(&p(&[0, 1]))));
    for term in &dnf_terms {
        assert!(matches!(term, Constraint::AndClause(_)));
        assert!(!term.satisfy(&p(&[0, 0])));
        assert!(!term.satisfy(&p(&[1, 1])));
    }
}

/// Scenario 5: subspace mode, n=3. A single 2-flat (the even-weight points)
/// separates {000,110,101,011} from the four odd-weight points; the oracle
/// must recover exactly that flat and its `satisfy` must match the
/// defining linear equation x0 xor x1 xor x2 = 0.
#[test]
fn subspace_mode_recovers_the_separating_flat() {
    let flat_points = vec![p(&[0, 0, 0]), p(&[1, 1, 0]), p(&[1, 0, 1]), p(&[0, 1, 1])];
    let outside = [p(&[1, 0, 0]), p(&[0, 1, 0]), p(&[0, 0, 1]), p(&[1, 1, 1])];

    let mut oracle = SubspaceOracle::new(3, flat_points.clone());
    let (feasible, witness) = oracle.query(&SparseIndexSet::from_iter(0..flat_points.len() as u32));
    assert!(feasible);
    let Constraint::Subspace(sub) = witness.unwrap() else { panic!("expected a subspace witness") };

    for q in &flat_points {
        assert!(sub.satisfy(q), "flat must contain every even-weight point");
    }
    for q in &outside {
        assert!(!sub.satisfy(q), "flat must exclude every odd-weight point");
    }

    let mut learner = LowerSetLearner::new(flat_points.len(), Arc::new(Identity));
    let full = SparseIndexSet::from_iter(0..flat_points.len() as u32);
    learner.add_lower(&full, Constraint::from(sub), true);
    learner.mark_complete_lower();
    assert_eq!(learner.n_lower(), 1);
}
