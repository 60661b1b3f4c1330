use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmitPolicyView {
    pub enabled: bool,
    /// Selector patterns tried in order before the plain-form fallback.
    pub selectors: Vec<String>,
}

impl Default for SubmitPolicyView {
    fn default() -> Self {
        let selectors = [
            "button[type=\"submit\"]",
            "input[type=\"submit\"]",
            "button.submit-btn",
            "button.submit",
            "button[id*=\"submit\"]",
            "button[class*=\"submit\"]",
            "button:contains(\"Gửi\")",
            "button:contains(\"Nộp\")",
            "button:contains(\"Trả lời\")",
            "button:contains(\"Submit\")",
            "button:contains(\"Send\")",
            "button.blue-button",
            ".submit-button",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();
        Self {
            enabled: true,
            selectors,
        }
    }
}
