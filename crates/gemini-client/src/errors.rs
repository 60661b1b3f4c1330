use thiserror::Error;

use quizsolver_core_types::SolveError;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("API Error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("exhausted {attempts} attempts, last failure: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl ApiError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::Status { status: 429, .. })
    }
}

impl From<ApiError> for SolveError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Exhausted { attempts, last } => SolveError::ApiExhausted { attempts, last },
            other => SolveError::Message(other.to_string()),
        }
    }
}
