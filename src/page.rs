use async_trait::async_trait;

use quizsolver_core_types::SolveError;
use tool_fill_answer::model::{Control, ControlHandle, ControlKind, EventKind};
use tool_fill_answer::ports::PagePort;
use tool_submit_form::model::{FormHandle, SubmitControl};
use tool_submit_form::ports::SubmitPort;

use crate::probe::TextQueryPort;

/// Page backend for runs without an attached browser. Reports no
/// controls, so fill and submit fall through as warnings. A browser
/// adapter replaces this by implementing the same three ports.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedPage;

#[async_trait]
impl PagePort for DetachedPage {
    async fn find_controls(&self, _kind: ControlKind) -> Result<Vec<Control>, SolveError> {
        Ok(Vec::new())
    }

    async fn set_checked(&self, handle: &ControlHandle, _checked: bool) -> Result<(), SolveError> {
        Err(SolveError::Page(format!("no page attached: {}", handle.0)))
    }

    async fn set_text(&self, handle: &ControlHandle, _text: &str) -> Result<(), SolveError> {
        Err(SolveError::Page(format!("no page attached: {}", handle.0)))
    }

    async fn fire_event(&self, handle: &ControlHandle, _event: EventKind) -> Result<(), SolveError> {
        Err(SolveError::Page(format!("no page attached: {}", handle.0)))
    }
}

#[async_trait]
impl SubmitPort for DetachedPage {
    async fn find_matches(&self, _selector: &str) -> Result<Vec<SubmitControl>, SolveError> {
        Ok(Vec::new())
    }

    async fn click(&self, handle: &FormHandle) -> Result<(), SolveError> {
        Err(SolveError::Page(format!("no page attached: {}", handle.0)))
    }

    async fn find_forms(&self) -> Result<Vec<FormHandle>, SolveError> {
        Ok(Vec::new())
    }

    async fn submit_form(&self, handle: &FormHandle) -> Result<(), SolveError> {
        Err(SolveError::Page(format!("no page attached: {}", handle.0)))
    }
}

#[async_trait]
impl TextQueryPort for DetachedPage {
    async fn query_text(&self, _selector: &str) -> Result<Option<String>, SolveError> {
        Ok(None)
    }
}
