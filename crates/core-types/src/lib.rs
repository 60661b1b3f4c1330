use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Shared error type for the solver crates. Tool crates define their own
/// thiserror enums and convert into this at the boundary.
#[derive(Debug, Error, Clone)]
pub enum SolveError {
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("Không thể kết nối tới API: {last} (after {attempts} attempts)")]
    ApiExhausted { attempts: u32, last: String },
    #[error("storage failure: {0}")]
    Storage(String),
    #[error("page automation failed: {0}")]
    Page(String),
    #[error("a solve cycle is already in flight")]
    Busy,
    #[error("{0}")]
    Message(String),
}

impl SolveError {
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SolveId(pub String);

impl SolveId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SolveId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SolveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One parsed model response. Immutable after creation; becomes the
/// single-slot last answer and a history entry.
///
/// Field names keep the original storage schema (camelCase JSON keys).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub answer_part: String,
    pub explanation_part: String,
    pub confidence: u8,
    pub raw_text: String,
    pub timestamp: String,
}

impl Answer {
    /// Short preview for history listings, clipped at a char boundary.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut out: String = self.answer_part.chars().take(max_chars).collect();
        if self.answer_part.chars().count() > max_chars {
            out.push_str("...");
        }
        out
    }
}

pub type HistoryEntry = Answer;

/// Monotonic counters; averages are derived at read time, never stored.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub solved: u64,
    pub total_time: u64,
    pub total_confidence: u64,
}

impl Stats {
    pub fn average_time_secs(&self) -> u64 {
        rounded_div(self.total_time, self.solved)
    }

    pub fn average_confidence(&self) -> u64 {
        rounded_div(self.total_confidence, self.solved)
    }
}

fn rounded_div(total: u64, count: u64) -> u64 {
    if count == 0 {
        0
    } else {
        (total + count / 2) / count
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        };
        write!(f, "{label}")
    }
}

/// User settings record, last-write-wins.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub font_size: FontSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Lifecycle of one interactive session: Idle -> Solving -> Idle/Failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    Idle,
    Solving { id: SolveId },
    Failed { error: String },
}

/// Explicit session state machine replacing an advisory "processing"
/// boolean. Single process only; this is not a cross-process lock.
#[derive(Clone, Debug)]
pub struct SolveSession {
    state: SessionState,
}

impl SolveSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_solving(&self) -> bool {
        matches!(self.state, SessionState::Solving { .. })
    }

    /// Enter Solving. Rejects a second request while one is in flight;
    /// a Failed session may begin again.
    pub fn begin(&mut self) -> Result<SolveId, SolveError> {
        if self.is_solving() {
            return Err(SolveError::Busy);
        }
        let id = SolveId::new();
        self.state = SessionState::Solving { id: id.clone() };
        Ok(id)
    }

    pub fn complete(&mut self) {
        self.state = SessionState::Idle;
    }

    pub fn fail(&mut self, error: &SolveError) {
        self.state = SessionState::Failed {
            error: error.to_string(),
        };
    }

    pub fn last_failure(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { error } => Some(error),
            _ => None,
        }
    }
}

impl Default for SolveSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Display timestamp captured at parse time; audit display only, never
/// parsed back.
pub fn display_timestamp() -> String {
    chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_averages_zero_when_unsolved() {
        let stats = Stats::default();
        assert_eq!(stats.average_time_secs(), 0);
        assert_eq!(stats.average_confidence(), 0);
    }

    #[test]
    fn stats_averages_round() {
        let stats = Stats {
            solved: 3,
            total_time: 15,
            total_confidence: 250,
        };
        assert_eq!(stats.average_time_secs(), 5);
        assert_eq!(stats.average_confidence(), 83);
    }

    #[test]
    fn session_rejects_reentrant_solve() {
        let mut session = SolveSession::new();
        let _id = session.begin().expect("idle session accepts solve");
        assert!(matches!(session.begin(), Err(SolveError::Busy)));
        session.complete();
        assert!(session.begin().is_ok());
    }

    #[test]
    fn failed_session_can_begin_again() {
        let mut session = SolveSession::new();
        session.begin().unwrap();
        session.fail(&SolveError::Capture("no active tab".into()));
        assert_eq!(
            session.last_failure(),
            Some("screen capture failed: no active tab")
        );
        assert!(session.begin().is_ok());
        assert!(session.last_failure().is_none());
    }

    #[test]
    fn answer_preview_clips_at_char_boundary() {
        let answer = Answer {
            answer_part: "đáp án dài".to_string(),
            explanation_part: String::new(),
            confidence: 70,
            raw_text: String::new(),
            timestamp: String::new(),
        };
        assert_eq!(answer.preview(6), "đáp án...");
        assert_eq!(answer.preview(64), "đáp án dài");
    }

    #[test]
    fn settings_round_trip_keeps_schema() {
        let settings = Settings {
            dark_mode: true,
            font_size: FontSize::Large,
            api_key: Some("k".into()),
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["darkMode"], true);
        assert_eq!(json["fontSize"], "large");
        assert_eq!(json["apiKey"], "k");
    }
}
