use crate::ExtraPrecision;
use boolsep_collections::{Point, SparseIndexSet};
use hashbrown::HashMap;

/// Affine-span closure: canonicalizes a sparse index set to a basis (plus
/// offset) of the GF(2) affine subspace spanned by the points it indexes.
pub struct SubspacePrecision {
    /// EXCLUDE points indexed by their stable index (`i2exc`).
    points: Vec<Point>,
    index_of: HashMap<Point, u32>,
}

impl SubspacePrecision {
    pub fn new(points: Vec<Point>) -> Self {
        let index_of = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i as u32))
            .collect();
        SubspacePrecision { points, index_of }
    }

    fn n(&self) -> usize {
        self.points.first().map(|p| p.n()).unwrap_or(0)
    }
}

impl ExtraPrecision for SubspacePrecision {
    /// Gaussian elimination over GF(2) on the translated vectors `q ^ v0`
    /// for `q` in `S`, where `v0` is the first point of `S`. The basis is
    /// reported as the original (untranslated-back) points chosen as
    /// pivots, together with `v0` itself.
    fn reduce(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize) {
        if s.is_empty() {
            return (s.clone(), 0);
        }
        let idxs: Vec<u32> = s.iter().collect();
        let offset_index = idxs[0];
        let offset = self.points[offset_index as usize].clone();

        // rows: (original universe index, translated bit-vector), skipping
        // the zero row (which is just the offset itself).
        let mut rows: Vec<(u32, Vec<u8>)> = idxs
            .iter()
            .filter_map(|&i| {
                let translated = self.points[i as usize].xor(&offset);
                if translated.is_zero() {
                    None
                } else {
                    Some((i, translated.as_slice().to_vec()))
                }
            })
            .collect();

        let mut basis_indices = vec![offset_index];
        let n = self.n();
        let mut top = 0usize;
        for col in 0..n {
            if let Some(pivot) = (top..rows.len()).find(|&j| rows[j].1[col] == 1) {
                basis_indices.push(rows[pivot].0);
                rows.swap(top, pivot);
                let pivot_row = rows[top].1.clone();
                for row in rows.iter_mut().skip(top + 1) {
                    if row.1[col] == 1 {
                        for b in 0..n {
                            row.1[b] ^= pivot_row[b];
                        }
                    }
                }
                top += 1;
            }
            rows.retain(|(_, bits)| bits.iter().any(|&b| b == 1));
        }

        (SparseIndexSet::from_iter(basis_indices), 0)
    }

    /// Span of the translated vectors, shifted back by the offset and
    /// restricted to indices present in the EXCLUDE universe. A positive
    /// skipped count means some spanned point falls outside the universe,
    /// i.e. the query is infeasible.
    fn expand(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize) {
        if s.is_empty() {
            return (s.clone(), 0);
        }
        let idxs: Vec<u32> = s.iter().collect();
        let offset = self.points[idxs[0] as usize].clone();
        let n = self.n();

        let translated: Vec<Point> = idxs
            .iter()
            .map(|&i| self.points[i as usize].xor(&offset))
            .filter(|p| !p.is_zero())
            .collect();

        let mut span: Vec<Point> = vec![Point::zeros(n)];
        for q in &translated {
            if !span.contains(q) {
                let mut extra = Vec::with_capacity(span.len());
                for p in &span {
                    extra.push(p.xor(q));
                }
                span.extend(extra);
            }
        }

        let mut result_indices = Vec::with_capacity(span.len());
        let mut skipped = 0usize;
        for v in &span {
            let t = v.xor(&offset);
            match self.index_of.get(&t) {
                Some(&i) => result_indices.push(i),
                None => skipped += 1,
            }
        }
        (SparseIndexSet::from_iter(result_indices), skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(bits: &[u8]) -> Point {
        Point::new(bits.to_vec())
    }

    #[test]
    fn reduce_returns_basis_plus_offset() {
        // a 2-dimensional affine subspace of {0,1}^3 through (0,0,0):
        // {(0,0,0), (1,0,0), (0,1,0), (1,1,0)}
        let points = vec![pt(&[0, 0, 0]), pt(&[1, 0, 0]), pt(&[0, 1, 0]), pt(&[1, 1, 0])];
        let prec = SubspacePrecision::new(points);
        let s = SparseIndexSet::from_iter([0, 1, 2, 3]);
        let (reduced, skipped) = prec.reduce(&s);
        assert_eq!(skipped, 0);
        assert!(reduced.len() <= 3);
        assert!(reduced.contains(0));
    }

    #[test]
    fn expand_recovers_full_span_with_no_skip() {
        let points = vec![pt(&[0, 0, 0]), pt(&[1, 0, 0]), pt(&[0, 1, 0]), pt(&[1, 1, 0])];
        let prec = SubspacePrecision::new(points);
        let s = SparseIndexSet::from_iter([1, 2]); // basis for the whole plane, plus v0 at 0
        let (expanded, skipped) = prec.expand(&s);
        assert_eq!(skipped, 0);
        assert_eq!(expanded, SparseIndexSet::from_iter([0, 1, 2, 3]));
    }

    #[test]
    fn expand_reports_skip_when_span_leaves_universe() {
        // universe only contains 3 of the 4 points of the plane
        let points = vec![pt(&[0, 0, 0]), pt(&[1, 0, 0]), pt(&[0, 1, 0])];
        let prec = SubspacePrecision::new(points);
        let s = SparseIndexSet::from_iter([1, 2]);
        let (_, skipped) = prec.expand(&s);
        assert_eq!(skipped, 1); // (1,1,0) is missing
    }
}
