use crate::error::PoolError;
use boolsep_collections::{Point, SparseIndexSet};
use boolsep_constraints::{mask_from_direction, Constraint};
use boolsep_learner::LowerSetLearner;
use boolsep_oracle::{LpOracle, SubspaceOracle};
use boolsep_precision::{ExtraPrecision, Identity, LowerSetPrecision, SubspacePrecision};
use hashbrown::HashMap;
use std::sync::Arc;

/// Which extra-precision closure canonicalizes sparse index sets for this
/// pool's learner (spec.md §4.B); chosen by the caller to match the
/// constraint kind being learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionKind {
    Identity,
    LowerSet,
    Subspace,
}

/// A learned lower element once the pool is finalized: the EXCLUDE indices
/// it covers, the witness as the oracle produced it, and the same witness
/// reoriented back to the caller's original coordinate system.
#[derive(Debug, Clone)]
pub struct FinalizedConstraint {
    pub fset: SparseIndexSet,
    pub raw: Constraint,
    pub final_: Constraint,
}

/// Indexes EXCLUDE points, owns the learner while learning is in progress,
/// and finalizes candidates for the subset selector (spec.md §4.F).
pub struct ConstraintPool {
    n: usize,
    direction: Option<Vec<i8>>,
    is_upper: bool,
    include: Vec<Point>,
    i2exc: Vec<Point>,
    exc2i: HashMap<Point, u32>,
    extra_prec: Arc<dyn ExtraPrecision>,
    learner: Option<LowerSetLearner>,
    finalized: Option<Vec<FinalizedConstraint>>,
    pub(crate) best_subset_size_ub: usize,
    pub(crate) best_subset: Option<Vec<usize>>,
    pub(crate) best_subset_is_optimal: bool,
    pub(crate) output_prefix: Option<std::path::PathBuf>,
}

impl ConstraintPool {
    pub fn new(
        exclude: Vec<Point>,
        include: Option<Vec<Point>>,
        direction: Option<Vec<i8>>,
        is_upper: bool,
        precision: PrecisionKind,
    ) -> Result<Self, PoolError> {
        if exclude.is_empty() {
            return Err(PoolError::EmptyExclude);
        }
        if direction.is_some() && !is_upper {
            return Err(PoolError::DirectionRequiresMonotone);
        }

        let n = exclude[0].n();
        let mask = direction.as_deref().map(mask_from_direction);
        let reorient = |p: &Point| match &mask {
            Some(m) => p.xor(m),
            None => p.clone(),
        };

        let mut i2exc: Vec<Point> = exclude.iter().map(reorient).collect();
        i2exc.sort();
        i2exc.dedup();
        let exc2i: HashMap<Point, u32> = i2exc.iter().enumerate().map(|(i, p)| (p.clone(), i as u32)).collect();

        let mut include_r: Vec<Point> = include.unwrap_or_default().iter().map(reorient).collect();
        include_r.sort();
        include_r.dedup();

        tracing::info!(n, exclude = i2exc.len(), include = include_r.len(), reoriented = direction.is_some(), "constraint pool constructed");

        let extra_prec: Arc<dyn ExtraPrecision> = match precision {
            PrecisionKind::Identity => Arc::new(Identity),
            PrecisionKind::LowerSet => Arc::new(LowerSetPrecision::new(i2exc.clone())),
            PrecisionKind::Subspace => Arc::new(SubspacePrecision::new(i2exc.clone())),
        };

        let learner = LowerSetLearner::new(i2exc.len(), Arc::clone(&extra_prec));

        Ok(ConstraintPool {
            n,
            direction,
            is_upper,
            include: include_r,
            i2exc,
            exc2i,
            extra_prec,
            learner: Some(learner),
            finalized: None,
            best_subset_size_ub: usize::MAX,
            best_subset: None,
            best_subset_is_optimal: false,
            output_prefix: None,
        })
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<std::path::PathBuf>) -> Self {
        self.output_prefix = Some(prefix.into());
        self
    }

    pub fn best_subset(&self) -> Option<&[usize]> {
        self.best_subset.as_deref()
    }

    pub fn best_subset_size_ub(&self) -> usize {
        self.best_subset_size_ub
    }

    pub fn best_subset_is_optimal(&self) -> bool {
        self.best_subset_is_optimal
    }

    pub fn output_prefix(&self) -> Option<&std::path::Path> {
        self.output_prefix.as_deref()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn is_upper(&self) -> bool {
        self.is_upper
    }

    pub fn direction(&self) -> Option<&[i8]> {
        self.direction.as_deref()
    }

    pub fn include(&self) -> &[Point] {
        &self.include
    }

    pub fn i2exc(&self) -> &[Point] {
        &self.i2exc
    }

    pub fn exc2i(&self) -> &HashMap<Point, u32> {
        &self.exc2i
    }

    pub fn extra_prec(&self) -> &Arc<dyn ExtraPrecision> {
        &self.extra_prec
    }

    /// Mutable access to the in-progress learner; panics if the pool was
    /// already finalized (mirrors `self.system` being deleted in the
    /// source after finalization).
    pub fn learner_mut(&mut self) -> &mut LowerSetLearner {
        self.learner.as_mut().expect("ConstraintPool: learner already released by finalize()")
    }

    pub fn learner(&self) -> &LowerSetLearner {
        self.learner.as_ref().expect("ConstraintPool: learner already released by finalize()")
    }

    pub fn make_lp_oracle(&self) -> LpOracle {
        LpOracle::new(self.n, self.is_upper, self.include.clone(), self.i2exc.clone())
    }

    pub fn make_subspace_oracle(&self) -> SubspaceOracle {
        SubspaceOracle::new(self.n, self.i2exc.clone())
    }

    /// Builds `constraints`, reorienting each raw witness with `direction`
    /// if one was supplied, then runs the self-check and releases the
    /// learner. Once-only.
    pub fn finalize(&mut self) -> Result<(), PoolError> {
        if self.finalized.is_some() {
            return Err(PoolError::DoubleFinalization);
        }
        let learner = self.learner.take().expect("finalize called twice without learner");

        let mut constraints: Vec<FinalizedConstraint> = learner
            .iter_lower()
            .map(|fset| {
                let raw = learner.meta(fset).expect("every lower element has a witness").clone();
                let final_ = match &self.direction {
                    Some(d) => raw.reorient(d),
                    None => raw.clone(),
                };
                FinalizedConstraint { fset: fset.clone(), raw, final_ }
            })
            .collect();
        constraints.sort_by(|a, b| a.fset.cmp(&b.fset));

        self.self_check(&constraints);
        self.finalized = Some(constraints);
        tracing::info!(n_constraints = self.finalized.as_ref().unwrap().len(), "pool finalized");
        Ok(())
    }

    fn self_check(&self, constraints: &[FinalizedConstraint]) {
        for p in &self.include {
            assert!(
                constraints.iter().all(|c| c.final_.satisfy(p)),
                "self-check failed: an INCLUDE point is refuted by a finalized constraint"
            );
        }
        for q in &self.i2exc {
            assert!(
                constraints.iter().any(|c| !c.final_.satisfy(q)),
                "self-check failed: an EXCLUDE point is satisfied by every finalized constraint"
            );
        }
    }

    pub fn constraints(&self) -> Result<&[FinalizedConstraint], PoolError> {
        self.finalized.as_deref().ok_or(PoolError::NotFinalized)
    }

    /// Assert that the named finalized constraints jointly satisfy INCLUDE
    /// and jointly refute EXCLUDE (spec.md §4.F's `check_subset`).
    pub fn check_subset(&self, indices: &[usize]) -> Result<(), PoolError> {
        let constraints = self.constraints()?;
        let chosen: Vec<&Constraint> = indices.iter().map(|&i| &constraints[i].final_).collect();
        for p in &self.include {
            assert!(chosen.iter().all(|c| c.satisfy(p)));
        }
        for q in &self.i2exc {
            assert!(chosen.iter().any(|c| !c.satisfy(q)));
        }
        Ok(())
    }
}
