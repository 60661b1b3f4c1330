use async_trait::async_trait;

use quizsolver_core_types::SolveError;

use crate::model::{FormHandle, SubmitControl};

/// Capability boundary into the target page for form submission.
#[async_trait]
pub trait SubmitPort: Send + Sync {
    /// Controls matching one selector pattern, in DOM order.
    async fn find_matches(&self, selector: &str) -> Result<Vec<SubmitControl>, SolveError>;
    async fn click(&self, handle: &FormHandle) -> Result<(), SolveError>;
    /// Plain forms on the page, in DOM order.
    async fn find_forms(&self) -> Result<Vec<FormHandle>, SolveError>;
    async fn submit_form(&self, handle: &FormHandle) -> Result<(), SolveError>;
}
