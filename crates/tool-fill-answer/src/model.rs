use std::fmt;

use serde::{Deserialize, Serialize};

use quizsolver_core_types::SolveId;

/// Execution context delivered by the solve flow when invoking the tool.
#[derive(Clone, Debug)]
pub struct ExecCtx {
    pub solve_id: SolveId,
}

impl ExecCtx {
    pub fn new(solve_id: SolveId) -> Self {
        Self { solve_id }
    }
}

/// Opaque reference to a form control inside the target page.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ControlHandle(pub String);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ControlKind {
    Radio,
    Checkbox,
    TextInput,
    TextArea,
    ContentEditable,
    RichEditor,
}

impl ControlKind {
    /// Kinds whose value is assigned as plain text rather than inner content.
    pub fn is_plain_text(self) -> bool {
        matches!(self, ControlKind::TextInput | ControlKind::TextArea)
    }
}

/// Synthetic DOM event fired after a mutation, for framework compatibility.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    Click,
    Change,
    Input,
}

/// Snapshot of one control as reported by the page port, in DOM order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Control {
    pub handle: ControlHandle,
    pub kind: ControlKind,
    /// Text of the immediate parent label.
    pub label: String,
    /// Text of the surrounding (grandparent) element.
    pub context: String,
    /// Explicitly hidden via inline display:none styling.
    pub hidden: bool,
}

impl Control {
    pub fn new(handle: impl Into<String>, kind: ControlKind) -> Self {
        Self {
            handle: ControlHandle(handle.into()),
            kind,
            label: String::new(),
            context: String::new(),
            hidden: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Parameters for one fill attempt.
#[derive(Clone, Debug)]
pub struct FillParams {
    pub answer_text: String,
}

impl FillParams {
    pub fn new(answer_text: impl Into<String>) -> Self {
        Self {
            answer_text: answer_text.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FillStrategy {
    SingleChoice,
    MultiChoice,
    FreeText,
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FillStrategy::SingleChoice => "single-choice",
            FillStrategy::MultiChoice => "multi-choice",
            FillStrategy::FreeText => "free-text",
        };
        write!(f, "{label}")
    }
}

/// Outcome of a fill attempt. `filled == false` is not an error: the
/// caller downgrades it to a warning and the solve cycle still succeeds.
#[derive(Clone, Debug, Default)]
pub struct FillReport {
    pub filled: bool,
    pub strategy: Option<FillStrategy>,
    pub controls_touched: usize,
}

impl FillReport {
    pub fn success(strategy: FillStrategy, controls_touched: usize) -> Self {
        Self {
            filled: true,
            strategy: Some(strategy),
            controls_touched,
        }
    }

    pub fn unmatched() -> Self {
        Self::default()
    }
}
