#[derive(Debug, thiserror::Error)]
pub enum ShiftError {
    #[error("shift-learn only applies to a generic, non-monotone, non-reoriented pool")]
    NotGenericPool,
}
