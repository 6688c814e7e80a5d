use crate::{mask_from_direction, Direction};
use boolsep_collections::Point;

/// An affine GF(2) flat `{offset + sum(lambda_i * basis_i) : lambda in {0,1}^k}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subspace {
    offset: Point,
    basis: Vec<Point>,
}

impl Subspace {
    pub fn new(offset: Point, basis: Vec<Point>) -> Self {
        Subspace { offset, basis }
    }

    pub fn offset(&self) -> &Point {
        &self.offset
    }

    pub fn basis(&self) -> &[Point] {
        &self.basis
    }

    /// `p` satisfies the flat iff `p XOR offset` lies in the linear span of `basis`.
    pub fn satisfy(&self, p: &Point) -> bool {
        in_span(&self.basis, &p.xor(&self.offset))
    }

    /// Only the offset moves under reorientation: every basis vector is a
    /// *difference* of two points on the flat, and XOR-shifting both ends of
    /// a difference by the same mask cancels out.
    pub fn reorient(&self, direction: &Direction) -> Subspace {
        let mask = mask_from_direction(direction);
        Subspace::new(self.offset.xor(&mask), self.basis.clone())
    }
}

/// Whether `target` lies in the GF(2) span of `basis`, by reducing it against
/// an echelon form built on the fly.
fn in_span(basis: &[Point], target: &Point) -> bool {
    let n = target.n();
    let mut echelon: Vec<Point> = Vec::new();
    let mut pivots: Vec<usize> = Vec::new();

    for v in basis {
        let mut cur = v.clone();
        for (row, &piv) in echelon.iter().zip(pivots.iter()) {
            if cur.get(piv) == 1 {
                cur = cur.xor(row);
            }
        }
        if let Some(piv) = (0..n).find(|&i| cur.get(i) == 1) {
            echelon.push(cur);
            pivots.push(piv);
        }
    }

    let mut cur = target.clone();
    for (row, &piv) in echelon.iter().zip(pivots.iter()) {
        if cur.get(piv) == 1 {
            cur = cur.xor(row);
        }
    }
    cur.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfy_holds_on_offset_and_every_basis_translate() {
        let offset = Point::new(vec![0, 1, 0]);
        let basis = vec![Point::new(vec![1, 0, 0]), Point::new(vec![0, 0, 1])];
        let sub = Subspace::new(offset.clone(), basis.clone());

        assert!(sub.satisfy(&offset));
        assert!(sub.satisfy(&offset.xor(&basis[0])));
        assert!(sub.satisfy(&offset.xor(&basis[1])));
        assert!(sub.satisfy(&offset.xor(&basis[0]).xor(&basis[1])));

        // Not in the flat: flips a coordinate outside the span's support.
        assert!(!sub.satisfy(&Point::new(vec![0, 0, 0])));
    }

    #[test]
    fn reorient_is_an_involution_and_shifts_only_the_offset() {
        let offset = Point::new(vec![1, 0, 1]);
        let basis = vec![Point::new(vec![1, 1, 0])];
        let sub = Subspace::new(offset, basis.clone());
        let direction = [1, -1, -1];

        let reoriented = sub.reorient(&direction);
        assert_eq!(reoriented.basis(), basis.as_slice());
        assert_eq!(reoriented.reorient(&direction), sub);
    }
}
