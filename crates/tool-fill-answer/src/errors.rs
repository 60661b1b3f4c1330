use thiserror::Error;

use quizsolver_core_types::SolveError;

#[derive(Debug, Error)]
pub enum FillError {
    #[error("tool disabled by policy")]
    Disabled,
    #[error("empty answer text")]
    EmptyAnswer,
}

impl From<FillError> for SolveError {
    fn from(err: FillError) -> Self {
        SolveError::Page(err.to_string())
    }
}
