use crate::ExtraPrecision;
use boolsep_collections::{Point, SparseIndexSet};

/// Lower-set closure for monotone problems: `expand(S)` is the downward
/// closure under coordinate-wise `<=` of the points indexed by `S`,
/// intersected with the EXCLUDE universe. `reduce(S)` keeps only the
/// maximal points of `S`.
pub struct LowerSetPrecision {
    /// EXCLUDE points indexed by their stable index (i.e. `i2exc`).
    points: Vec<Point>,
}

impl LowerSetPrecision {
    pub fn new(points: Vec<Point>) -> Self {
        LowerSetPrecision { points }
    }
}

impl ExtraPrecision for LowerSetPrecision {
    fn reduce(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize) {
        let idxs: Vec<u32> = s.iter().collect();
        let maximal = idxs.iter().copied().filter(|&i| {
            let p = &self.points[i as usize];
            !idxs.iter().any(|&j| {
                j != i && p.leq(&self.points[j as usize]) && p != &self.points[j as usize]
            })
        });
        (SparseIndexSet::from_iter(maximal), 0)
    }

    fn expand(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize) {
        if s.is_empty() {
            return (s.clone(), 0);
        }
        let qs: Vec<&Point> = s.iter().map(|i| &self.points[i as usize]).collect();
        let result = (0..self.points.len() as u32)
            .filter(|&i| qs.iter().any(|q| self.points[i as usize].leq(q)))
            .collect::<SparseIndexSet>();
        (result, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(bits: &[u8]) -> Point {
        Point::new(bits.to_vec())
    }

    #[test]
    fn reduce_keeps_only_maximal_points() {
        // index 0: (1,0,0) index 1: (1,1,0) index 2: (0,0,1)
        let prec = LowerSetPrecision::new(vec![pt(&[1, 0, 0]), pt(&[1, 1, 0]), pt(&[0, 0, 1])]);
        let s = SparseIndexSet::from_iter([0, 1, 2]);
        let (reduced, skipped) = prec.reduce(&s);
        assert_eq!(skipped, 0);
        // 0 is dominated by 1; 1 and 2 are incomparable maxima
        assert_eq!(reduced, SparseIndexSet::from_iter([1, 2]));
    }

    #[test]
    fn expand_is_downward_closure_within_universe() {
        let prec = LowerSetPrecision::new(vec![pt(&[1, 1]), pt(&[1, 0]), pt(&[0, 1]), pt(&[0, 0])]);
        let s = SparseIndexSet::singleton(0); // (1,1)
        let (expanded, _) = prec.expand(&s);
        // everything is <= (1,1)
        assert_eq!(expanded, SparseIndexSet::from_iter([0, 1, 2, 3]));
    }
}
