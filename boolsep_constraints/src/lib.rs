//! Constraint kinds (spec.md §3, §4.I): typed constraint values supporting
//! `satisfy`, `reorient`, and kind-specific extras (`solutions`, `shift`).
//!
//! Kinds form a small closed set, so they are represented as a tagged sum
//! (`Constraint`) dispatched by match at insert/finalize boundaries, per the
//! design notes on duck-typed constraint interfaces.

mod clause;
mod inequality;
mod subspace;

pub use clause::{AndClause, OrClause};
pub use inequality::Inequality;
pub use subspace::Subspace;

use boolsep_collections::Point;

/// A coordinate-flip transform: `direction[i] == -1` means `xi` is replaced
/// by `1 - xi`; `+1` leaves `xi` untouched.
pub type Direction = [i8];

pub fn mask_from_direction(direction: &Direction) -> Point {
    Point::new(direction.iter().map(|&d| if d == -1 { 1 } else { 0 }).collect::<Vec<u8>>())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Inequality(Inequality),
    OrClause(OrClause),
    AndClause(AndClause),
    Subspace(Subspace),
}

impl Constraint {
    pub fn satisfy(&self, p: &Point) -> bool {
        match self {
            Constraint::Inequality(c) => c.satisfy(p),
            Constraint::OrClause(c) => c.satisfy(p),
            Constraint::AndClause(c) => c.satisfy(p),
            Constraint::Subspace(c) => c.satisfy(p),
        }
    }

    /// Apply the involution `xi -> 1 - xi` for every `i` with `direction[i]
    /// == -1`. Reorientation commutes with `satisfy` under the matching
    /// point reflection and is its own inverse.
    pub fn reorient(&self, direction: &Direction) -> Constraint {
        match self {
            Constraint::Inequality(c) => Constraint::Inequality(c.reorient(direction)),
            Constraint::OrClause(c) => Constraint::OrClause(c.reorient(direction)),
            Constraint::AndClause(c) => Constraint::AndClause(c.reorient(direction)),
            Constraint::Subspace(c) => Constraint::Subspace(c.reorient(direction)),
        }
    }
}

impl From<Inequality> for Constraint {
    fn from(c: Inequality) -> Self {
        Constraint::Inequality(c)
    }
}
impl From<OrClause> for Constraint {
    fn from(c: OrClause) -> Self {
        Constraint::OrClause(c)
    }
}
impl From<AndClause> for Constraint {
    fn from(c: AndClause) -> Self {
        Constraint::AndClause(c)
    }
}
impl From<Subspace> for Constraint {
    fn from(c: Subspace) -> Self {
        Constraint::Subspace(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reorientation_is_an_involution_across_kinds() {
        let direction = [1, -1, -1];
        let p = Point::new(vec![0, 1, 1]);

        let ineq = Constraint::Inequality(Inequality::new(vec![1.0, 1.0, 1.0], -1.0));
        assert_eq!(ineq.reorient(&direction).reorient(&direction), ineq);

        let or_clause = Constraint::OrClause(OrClause::new(vec![1, -2, 3]));
        assert_eq!(or_clause.reorient(&direction).reorient(&direction), or_clause);

        let sub = Constraint::Subspace(Subspace::new(p.clone(), vec![Point::new(vec![1, 0, 0])]));
        assert_eq!(sub.reorient(&direction).reorient(&direction), sub);
    }
}
