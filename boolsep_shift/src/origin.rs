use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::Constraint;
use boolsep_learner::strategies::Strategy;
use boolsep_oracle::Oracle;
use boolsep_pool::{ConstraintPool, PrecisionKind};
use hashbrown::HashMap;

/// Per-origin result: for every newly discovered main-pool EXCLUDE subset,
/// the coordinate-wise AND of its maximal covered points (the "core", used
/// to bound how many origins must corroborate it) and the witness
/// constraint reoriented back to the main pool's coordinates.
pub struct OriginResult {
    pub core: HashMap<SparseIndexSet, Point>,
    pub solutions: HashMap<SparseIndexSet, Constraint>,
}

/// Minimal elements of `points` under coordinate-wise `<=` (an antichain).
fn minimal_points(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::new();
    for p in points {
        if out.iter().any(|q: &Point| q.leq(p) && q != p) {
            continue;
        }
        out.retain(|q| !(p.leq(q) && p != q));
        if !out.contains(p) {
            out.push(p.clone());
        }
    }
    out
}

fn dominates_some(q: &Point, minima: &[Point]) -> bool {
    minima.iter().any(|m| m.leq(q))
}

fn point_and(points: &[&Point], n: usize) -> Point {
    let mut bits = vec![1u8; n];
    for p in points {
        for i in 0..n {
            bits[i] &= p.get(i);
        }
    }
    Point::new(bits)
}

fn direction_for_origin(origin: &Point) -> Vec<i8> {
    origin.iter().map(|v| if v == 1 { -1 } else { 1 }).collect()
}

/// Reorient `include`/`exclude` around `origin` (the algebraic mask for
/// reorienting around a point equals the point itself), form the
/// upper-set subproblem anchored at the shifted origin, learn it with
/// `make_chain`'s strategies over an LP oracle, and map the results back to
/// the main pool's EXCLUDE indices.
pub fn process_origin(
    origin_idx: usize,
    n: usize,
    origin: &Point,
    main_include: &[Point],
    main_i2exc: &[Point],
    make_chain: &(dyn Fn() -> Vec<Box<dyn Strategy>> + Send + Sync),
) -> OriginResult {
    tracing::info!(origin_idx, "processing reorientation");

    let shifted_include: Vec<Point> = main_include.iter().map(|p| p.xor(origin)).collect();
    let good = minimal_points(&shifted_include);

    let mut bad_indices: Vec<usize> = Vec::new();
    let mut bad_points: Vec<Point> = Vec::new();
    for (k, p) in main_i2exc.iter().enumerate() {
        let shifted = p.xor(origin);
        if !dominates_some(&shifted, &good) {
            bad_indices.push(k);
            bad_points.push(shifted);
        }
    }

    let mut result = OriginResult { core: HashMap::new(), solutions: HashMap::new() };
    if bad_points.is_empty() {
        return result;
    }

    let mut subpool = ConstraintPool::new(bad_points.clone(), Some(good), None, true, PrecisionKind::LowerSet)
        .expect("subpool construction cannot fail: bad_points is non-empty and pool is monotone");

    for strategy in make_chain() {
        let mut strategy = strategy;
        let mut oracle = subpool.make_lp_oracle();
        strategy.run(subpool.learner_mut(), &mut oracle);
    }
    subpool.finalize().expect("subpool finalized exactly once");

    let direction: Vec<i8> = direction_for_origin(origin);

    for c in subpool.constraints().expect("just finalized") {
        let covered: Vec<&Point> = c.fset.iter().map(|i| &bad_points[i as usize]).collect();
        let core = point_and(&covered, n);

        let mainvec = SparseIndexSet::from_iter(c.fset.iter().map(|i| bad_indices[i as usize] as u32));
        let witness = c.final_.reorient(&direction);

        result.core.insert(mainvec.clone(), core);
        result.solutions.insert(mainvec, witness);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_points_keeps_only_the_antichain() {
        let pts = vec![Point::new(vec![1, 0, 0]), Point::new(vec![1, 1, 0]), Point::new(vec![0, 0, 1])];
        let min = minimal_points(&pts);
        assert_eq!(min.len(), 2);
        assert!(min.contains(&Point::new(vec![1, 0, 0])));
        assert!(min.contains(&Point::new(vec![0, 0, 1])));
    }

    #[test]
    fn point_and_is_coordinatewise() {
        let a = Point::new(vec![1, 1, 0]);
        let b = Point::new(vec![1, 0, 0]);
        let and = point_and(&[&a, &b], 3);
        assert_eq!(and, Point::new(vec![1, 0, 0]));
    }
}
