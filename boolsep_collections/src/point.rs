use std::fmt;

/// An element of `{0,1}^n`, stored bit-exactly as one byte per coordinate.
///
/// `n` is implicit in `values.len()`; a pool fixes `n` once and every `Point`
/// it touches must share it.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    values: Vec<u8>,
}

impl Point {
    pub fn new(values: impl Into<Vec<u8>>) -> Self {
        let values = values.into();
        debug_assert!(values.iter().all(|&v| v <= 1), "point coordinates must be 0/1");
        Point { values }
    }

    pub fn zeros(n: usize) -> Self {
        Point { values: vec![0; n] }
    }

    pub fn n(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, i: usize) -> u8 {
        self.values[i]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }

    /// Coordinate-wise `<=` (the order used by the lower-set extra-precision map).
    pub fn leq(&self, other: &Point) -> bool {
        debug_assert_eq!(self.n(), other.n());
        self.values.iter().zip(&other.values).all(|(a, b)| a <= b)
    }

    /// `x XOR mask`, i.e. flip coordinates where `mask` is 1. Used both as the
    /// GF(2) point operation for subspaces and as the geometric half of a
    /// reorientation/shift.
    pub fn xor(&self, mask: &Point) -> Point {
        debug_assert_eq!(self.n(), mask.n());
        Point::new(
            self.values
                .iter()
                .zip(&mask.values)
                .map(|(a, b)| a ^ b)
                .collect::<Vec<u8>>(),
        )
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leq_is_coordinatewise() {
        let a = Point::new(vec![0, 1, 0]);
        let b = Point::new(vec![1, 1, 0]);
        assert!(a.leq(&b));
        assert!(!b.leq(&a));
    }

    #[test]
    fn xor_is_involution() {
        let p = Point::new(vec![1, 0, 1]);
        let mask = Point::new(vec![1, 1, 0]);
        assert_eq!(p.xor(&mask).xor(&mask), p);
    }
}
