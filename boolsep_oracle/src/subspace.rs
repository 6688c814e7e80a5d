use crate::Oracle;
use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::{Constraint, Subspace};
use boolsep_precision::{ExtraPrecision, SubspacePrecision};

/// Oracle for affine-subspace constraints. Feasibility is decided entirely by
/// the subspace extra-precision map's `expand`/`reduce`: a positive skipped
/// count from `expand` means the span leaves the EXCLUDE universe, i.e. the
/// subset is infeasible; otherwise the witness is the basis `reduce` reports.
pub struct SubspaceOracle {
    n: usize,
    points: Vec<Point>,
    precision: SubspacePrecision,
}

impl SubspaceOracle {
    pub fn new(n: usize, points: Vec<Point>) -> Self {
        let precision = SubspacePrecision::new(points.clone());
        SubspaceOracle { n, points, precision }
    }
}

impl Oracle for SubspaceOracle {
    fn query(&mut self, bads: &SparseIndexSet) -> (bool, Option<Constraint>) {
        if bads.is_empty() {
            let basis: Vec<Point> = (0..self.n)
                .map(|i| {
                    let mut v = vec![0u8; self.n];
                    v[i] = 1;
                    Point::new(v)
                })
                .collect();
            return (true, Some(Constraint::from(Subspace::new(Point::zeros(self.n), basis))));
        }

        tracing::debug!(n_bads = bads.len(), "subspace oracle query");

        let (_, skipped) = self.precision.expand(bads);
        if skipped > 0 {
            return (false, None);
        }

        let (reduced, _) = self.precision.reduce(bads);
        let idxs: Vec<u32> = reduced.iter().collect();
        let offset = self.points[idxs[0] as usize].clone();
        let basis: Vec<Point> = idxs[1..].iter().map(|&i| self.points[i as usize].xor(&offset)).collect();
        let subspace = Subspace::new(offset, basis);

        assert!(bads.iter().all(|i| subspace.satisfy(&self.points[i as usize])));

        (true, Some(Constraint::from(subspace)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_plane_spanning_whole_universe() {
        let points = vec![
            Point::new(vec![0, 0, 0]),
            Point::new(vec![1, 0, 0]),
            Point::new(vec![0, 1, 0]),
            Point::new(vec![1, 1, 0]),
        ];
        let mut oracle = SubspaceOracle::new(3, points.clone());
        let (feasible, witness) = oracle.query(&SparseIndexSet::from_iter([0, 1, 2, 3]));
        assert!(feasible);
        let Constraint::Subspace(sub) = witness.unwrap() else { panic!("expected subspace") };
        for p in &points {
            assert!(sub.satisfy(p));
        }
        assert!(!sub.satisfy(&Point::new(vec![0, 0, 1])));
    }

    #[test]
    fn infeasible_when_span_leaves_universe() {
        let points = vec![Point::new(vec![0, 0, 0]), Point::new(vec![1, 0, 0]), Point::new(vec![0, 1, 0])];
        let mut oracle = SubspaceOracle::new(3, points);
        let (feasible, witness) = oracle.query(&SparseIndexSet::from_iter([1, 2]));
        assert!(!feasible);
        assert!(witness.is_none());
    }
}
