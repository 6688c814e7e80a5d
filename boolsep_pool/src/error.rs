#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("EXCLUDE is empty, nothing to do")]
    EmptyExclude,
    #[error("a direction was supplied but the input is not monotone (is_upper=false)")]
    DirectionRequiresMonotone,
    #[error("finalizing a ConstraintPool twice")]
    DoubleFinalization,
    #[error("pool is not finalized yet")]
    NotFinalized,
    #[error("insufficient inequalities pool? (set-cover instance reports infeasible)")]
    InsufficientPool,
    #[error("i/o error writing selector artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupted solver output: {0}")]
    CorruptedSolverOutput(String),
    #[error("refusing to overwrite existing file: {0}")]
    OverwriteAttempt(std::path::PathBuf),
}
