use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FillPolicyView {
    pub enabled: bool,
    /// Choice letters recognized by the single/multi strategies.
    pub letters: Vec<char>,
    /// Bracket markers stripped from the answer before free-text fill.
    pub strip_markers: Vec<String>,
}

impl Default for FillPolicyView {
    fn default() -> Self {
        Self {
            enabled: true,
            letters: vec!['A', 'B', 'C', 'D'],
            strip_markers: vec!["[ĐÁP ÁN]".to_string(), "[ANSWER]".to_string()],
        }
    }
}
