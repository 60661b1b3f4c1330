use std::fmt;

use serde::{Deserialize, Serialize};

use quizsolver_core_types::SolveId;

#[derive(Clone, Debug)]
pub struct ExecCtx {
    pub solve_id: SolveId,
}

impl ExecCtx {
    pub fn new(solve_id: SolveId) -> Self {
        Self { solve_id }
    }
}

/// A clickable control matched by one of the submit selector patterns.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitControl {
    pub handle: FormHandle,
    pub visible: bool,
    pub enabled: bool,
}

impl SubmitControl {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: FormHandle(handle.into()),
            visible: true,
            enabled: true,
        }
    }

    pub fn invisible(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FormHandle(pub String);

/// How the submission was performed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitVia {
    /// A submit control matched by this selector pattern was clicked.
    Selector(String),
    /// No control matched; the first plain form was submitted directly.
    Form,
}

impl fmt::Display for SubmitVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitVia::Selector(selector) => write!(f, "selector {selector}"),
            SubmitVia::Form => write!(f, "first form"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SubmitReport {
    pub submitted: bool,
    pub via: Option<SubmitVia>,
}

impl SubmitReport {
    pub fn clicked(selector: &str) -> Self {
        Self {
            submitted: true,
            via: Some(SubmitVia::Selector(selector.to_string())),
        }
    }

    pub fn form_submitted() -> Self {
        Self {
            submitted: true,
            via: Some(SubmitVia::Form),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn via_labels() {
        assert_eq!(
            SubmitVia::Selector("button.submit".into()).to_string(),
            "selector button.submit"
        );
        assert_eq!(SubmitVia::Form.to_string(), "first form");
    }
}
