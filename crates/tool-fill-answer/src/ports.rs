use async_trait::async_trait;

use quizsolver_core_types::SolveError;

use crate::model::{Control, ControlHandle, ControlKind, EventKind};

/// Capability boundary into the target page. Implemented per environment
/// (live browser adapter, test fake); the fill strategies stay pure logic
/// over the control list this port reports.
#[async_trait]
pub trait PagePort: Send + Sync {
    /// All controls of `kind`, in DOM order, including hidden ones.
    async fn find_controls(&self, kind: ControlKind) -> Result<Vec<Control>, SolveError>;
    async fn set_checked(&self, handle: &ControlHandle, checked: bool) -> Result<(), SolveError>;
    /// Assign text: value for plain inputs, inner content for rich surfaces.
    async fn set_text(&self, handle: &ControlHandle, text: &str) -> Result<(), SolveError>;
    async fn fire_event(&self, handle: &ControlHandle, event: EventKind) -> Result<(), SolveError>;
}
