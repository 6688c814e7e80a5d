use crate::Oracle;
use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::{Constraint, Inequality};
use good_lp::{default_solver, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel};

const INTEGRALITY_EPS: f64 = 1e-6;

/// LP-feasibility oracle for inequality constraints (spec.md §4.C). Variables
/// are `(a_0, ..., a_{n-1}, c)` with `sum(a_i * x_i) + c >= 0`; permanent
/// constraints pin every INCLUDE point, and a query temporarily adds one
/// strict-refutation row per EXCLUDE point in the candidate subset.
///
/// Each query rebuilds the LP from scratch via `good_lp`'s builder API, which
/// has no row-add/row-remove primitive on a solved model; this trades the
/// source's single reused LP instance for a simpler, still-correct
/// from-scratch solve per query.
pub struct LpOracle {
    n: usize,
    is_upper: bool,
    include: Vec<Point>,
    i2exc: Vec<Point>,
}

impl LpOracle {
    pub fn new(n: usize, is_upper: bool, include: Vec<Point>, i2exc: Vec<Point>) -> Self {
        LpOracle { n, is_upper, include, i2exc }
    }

    fn dot_minus_c(&self, xs: &[good_lp::Variable], c: good_lp::Variable, p: &Point) -> Expression {
        let mut expr = Expression::with_capacity(self.n + 1);
        for (i, &x) in xs.iter().enumerate() {
            expr.add_mul(p.get(i) as f64, x);
        }
        expr.add_mul(-1.0, c);
        expr
    }
}

impl Oracle for LpOracle {
    fn query(&mut self, bads: &SparseIndexSet) -> (bool, Option<Constraint>) {
        if bads.is_empty() {
            return (true, Some(Constraint::from(Inequality::trivial(self.n))));
        }

        tracing::debug!(n_bads = bads.len(), "lp oracle query");

        let mut vars = ProblemVariables::new();
        let xs: Vec<_> = (0..self.n)
            .map(|_| vars.add(if self.is_upper { variable().min(0.0) } else { variable() }))
            .collect();
        let c = vars.add(if self.is_upper { variable().min(0.0) } else { variable() });

        let mut problem = vars.minimise(0).using(default_solver);

        for p in &self.include {
            problem.add_constraint(self.dot_minus_c(&xs, c, p).geq(0));
        }
        for i in bads.iter() {
            let q = &self.i2exc[i as usize];
            problem.add_constraint(self.dot_minus_c(&xs, c, q).leq(-1.0));
        }

        let solution = match problem.solve() {
            Ok(sol) => sol,
            Err(ResolutionError::Infeasible) => return (false, None),
            Err(err) => panic!("lp oracle: unexpected solver error: {err:?}"),
        };

        let mut val_xs: Vec<f64> = xs.iter().map(|&x| solution.value(x)).collect();
        let mut val_c = solution.value(c);

        let is_integral = val_xs
            .iter()
            .chain(std::iter::once(&val_c))
            .all(|v| (v - v.round()).abs() < INTEGRALITY_EPS);
        if !is_integral {
            val_c -= 0.5;
        } else {
            for v in val_xs.iter_mut() {
                *v = v.round();
            }
            val_c = val_c.round();
        }

        let ineq = Inequality::new(val_xs, -val_c);

        assert!(
            self.include.iter().all(|p| ineq.satisfy(p)),
            "lp oracle post-condition violated: an INCLUDE point is refuted"
        );
        assert!(
            bads.iter().all(|i| !ineq.satisfy(&self.i2exc[i as usize])),
            "lp oracle post-condition violated: a queried EXCLUDE point is satisfied"
        );

        (true, Some(Constraint::from(ineq)))
    }
}
