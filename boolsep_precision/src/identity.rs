use crate::ExtraPrecision;
use boolsep_collections::SparseIndexSet;

/// No extra precision: `reduce = expand = id`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl ExtraPrecision for Identity {
    fn reduce(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize) {
        (s.clone(), 0)
    }

    fn expand(&self, s: &SparseIndexSet) -> (SparseIndexSet, usize) {
        (s.clone(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_roundtrips() {
        let s = SparseIndexSet::from_iter([1, 4, 7]);
        assert_eq!(Identity.reduce_set(&s), s);
        assert_eq!(Identity.expand_set(&s), s);
    }
}
