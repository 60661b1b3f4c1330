use thiserror::Error;

use quizsolver_core_types::SolveError;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("tool disabled by policy")]
    Disabled,
}

impl From<SubmitError> for SolveError {
    fn from(err: SubmitError) -> Self {
        SolveError::Page(err.to_string())
    }
}
