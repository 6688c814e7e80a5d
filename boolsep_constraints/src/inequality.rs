use crate::{mask_from_direction, Direction};
use boolsep_collections::Point;

const EPS: f64 = 1e-9;

/// `sum(a_i * x_i) + c >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Inequality {
    coeffs: Vec<f64>,
    c: f64,
}

impl Inequality {
    pub fn new(coeffs: Vec<f64>, c: f64) -> Self {
        Inequality { coeffs, c }
    }

    /// The trivial inequality `0 >= 0`, the witness for an empty EXCLUDE-subset query.
    pub fn trivial(n: usize) -> Self {
        Inequality::new(vec![0.0; n], 0.0)
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn constant(&self) -> f64 {
        self.c
    }

    pub fn satisfy(&self, p: &Point) -> bool {
        let sum: f64 = self
            .coeffs
            .iter()
            .zip(p.iter())
            .map(|(a, x)| a * x as f64)
            .sum();
        sum + self.c >= -EPS
    }

    pub fn reorient(&self, direction: &Direction) -> Inequality {
        self.shift(&mask_from_direction(direction))
    }

    /// Substitute `xi -> 1 - xi` for every `i` with `bi == 1`.
    pub fn shift(&self, b: &Point) -> Inequality {
        debug_assert_eq!(self.coeffs.len(), b.n());
        let mut c = self.c;
        let coeffs = self
            .coeffs
            .iter()
            .zip(b.iter())
            .map(|(&a, bit)| {
                if bit == 1 {
                    c += a;
                    -a
                } else {
                    a
                }
            })
            .collect();
        Inequality::new(coeffs, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfy_matches_linear_form() {
        // x0 + x1 - 1 >= 0  <=>  x0 + x1 >= 1
        let ineq = Inequality::new(vec![1.0, 1.0], -1.0);
        assert!(!ineq.satisfy(&Point::new(vec![0, 0])));
        assert!(ineq.satisfy(&Point::new(vec![1, 0])));
        assert!(ineq.satisfy(&Point::new(vec![1, 1])));
    }

    #[test]
    fn shift_is_involution_and_preserves_satisfy_under_reflection() {
        let ineq = Inequality::new(vec![1.0, -2.0, 3.0], -1.0);
        let b = Point::new(vec![1, 0, 1]);
        assert_eq!(ineq.shift(&b).shift(&b), ineq);

        let p = Point::new(vec![0, 1, 1]);
        let reflected = p.xor(&b);
        assert_eq!(ineq.satisfy(&p), ineq.shift(&b).satisfy(&reflected));
    }
}
