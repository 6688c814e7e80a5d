use smallvec::SmallVec;
use std::fmt;

/// An ordered, duplicate-free set of small non-negative integers.
///
/// Canonicalized to strictly ascending order on construction, which gives us
/// equality/hash by content for free and a cheap lexicographic total order
/// (used to make learner output deterministic).
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct SparseIndexSet {
    indices: SmallVec<[u32; 8]>,
}

impl SparseIndexSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(i: u32) -> Self {
        SparseIndexSet {
            indices: SmallVec::from_slice(&[i]),
        }
    }

    pub fn from_iter(iter: impl IntoIterator<Item = u32>) -> Self {
        let mut indices: SmallVec<[u32; 8]> = iter.into_iter().collect();
        indices.sort_unstable();
        indices.dedup();
        SparseIndexSet { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, i: u32) -> bool {
        self.indices.binary_search(&i).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    pub fn insert(&mut self, i: u32) {
        if let Err(pos) = self.indices.binary_search(&i) {
            self.indices.insert(pos, i);
        }
    }

    /// `self` is a subset of `other`: every element of `self` occurs in `other`.
    pub fn is_subset_of(&self, other: &SparseIndexSet) -> bool {
        let mut it = other.indices.iter().peekable();
        for &x in &self.indices {
            loop {
                match it.peek() {
                    None => return false,
                    Some(&&y) if y == x => {
                        it.next();
                        break;
                    }
                    Some(&&y) if y < x => {
                        it.next();
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    pub fn is_superset_of(&self, other: &SparseIndexSet) -> bool {
        other.is_subset_of(self)
    }

    pub fn union(&self, other: &SparseIndexSet) -> SparseIndexSet {
        let mut out = SmallVec::with_capacity(self.indices.len() + other.indices.len());
        let (mut a, mut b) = (self.indices.iter().peekable(), other.indices.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (None, None) => break,
                (Some(&&x), None) => {
                    out.push(x);
                    a.next();
                }
                (None, Some(&&y)) => {
                    out.push(y);
                    b.next();
                }
                (Some(&&x), Some(&&y)) => {
                    if x < y {
                        out.push(x);
                        a.next();
                    } else if y < x {
                        out.push(y);
                        b.next();
                    } else {
                        out.push(x);
                        a.next();
                        b.next();
                    }
                }
            }
        }
        SparseIndexSet { indices: out }
    }

    pub fn intersection(&self, other: &SparseIndexSet) -> SparseIndexSet {
        let mut out = SmallVec::new();
        let (mut a, mut b) = (self.indices.iter().peekable(), other.indices.iter().peekable());
        while let (Some(&&x), Some(&&y)) = (a.peek(), b.peek()) {
            if x < y {
                a.next();
            } else if y < x {
                b.next();
            } else {
                out.push(x);
                a.next();
                b.next();
            }
        }
        SparseIndexSet { indices: out }
    }

    pub fn difference(&self, other: &SparseIndexSet) -> SparseIndexSet {
        SparseIndexSet::from_iter(self.indices.iter().copied().filter(|x| !other.contains(*x)))
    }
}

impl PartialOrd for SparseIndexSet {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SparseIndexSet {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.indices.cmp(&other.indices)
    }
}

impl fmt::Debug for SparseIndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.indices.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<u32> for SparseIndexSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        SparseIndexSet::from_iter(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_to_ascending_order() {
        let s = SparseIndexSet::from_iter([3, 1, 2, 1]);
        assert_eq!(s.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn subset_and_superset() {
        let a = SparseIndexSet::from_iter([1, 3]);
        let b = SparseIndexSet::from_iter([1, 2, 3, 4]);
        assert!(a.is_subset_of(&b));
        assert!(b.is_superset_of(&a));
        assert!(!b.is_subset_of(&a));
    }

    #[test]
    fn union_intersection_difference() {
        let a = SparseIndexSet::from_iter([1, 2, 3]);
        let b = SparseIndexSet::from_iter([2, 3, 4]);
        assert_eq!(a.union(&b), SparseIndexSet::from_iter([1, 2, 3, 4]));
        assert_eq!(a.intersection(&b), SparseIndexSet::from_iter([2, 3]));
        assert_eq!(a.difference(&b), SparseIndexSet::from_iter([1]));
    }

    #[test]
    fn lexicographic_order_is_total() {
        let a = SparseIndexSet::from_iter([1, 2]);
        let b = SparseIndexSet::from_iter([1, 3]);
        assert!(a < b);
    }
}
