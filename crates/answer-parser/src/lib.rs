//! Fixed-format parser for model responses.
//!
//! The model is asked to reply with three bracketed Vietnamese sections:
//! `[ĐÁP ÁN]` (answer), `[GIẢI THÍCH]` (explanation) and `[ĐỘ TIN CẬY]`
//! (confidence as `NN%`). Each section is extracted independently; a
//! missing section falls back per field, while a failure of the
//! extraction machinery itself degrades the whole record. The two tiers
//! are user-visible and deliberately kept as separate code paths.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use quizsolver_core_types::{display_timestamp, Answer};

pub const ANSWER_MARKER: &str = "[ĐÁP ÁN]";
pub const EXPLANATION_MARKER: &str = "[GIẢI THÍCH]";
pub const CONFIDENCE_MARKER: &str = "[ĐỘ TIN CẬY]";

const NO_EXPLANATION: &str = "Không có giải thích";
const DEGRADED_EXPLANATION: &str = "Không thể xử lý giải thích.";
const DEFAULT_CONFIDENCE: u8 = 70;
const DEGRADED_CONFIDENCE: u8 = 50;
const DEGRADED_PREFIX_CHARS: usize = 100;

static ANSWER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[ĐÁP ÁN\]\s*(.*?)(?:\n\[GIẢI THÍCH\]|\z)").expect("answer pattern")
});
static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\[GIẢI THÍCH\]\s*(.*?)(?:\n\[ĐỘ TIN CẬY\]|\z)").expect("explanation pattern")
});
static CONFIDENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[ĐỘ TIN CẬY\]\s*(\d+)%").expect("confidence pattern"));

/// Parse raw model text into a structured [`Answer`]. Never fails: missing
/// sections fall back per field, and an unusable confidence capture yields
/// the degraded whole-record form.
pub fn parse(raw_text: &str) -> Answer {
    match extract(raw_text) {
        Ok(answer) => answer,
        Err(err) => {
            warn!(error = %err, "response extraction failed, returning degraded answer");
            degraded(raw_text)
        }
    }
}

fn extract(raw_text: &str) -> Result<Answer, ExtractError> {
    let answer_part = match capture(&ANSWER_RE, raw_text) {
        Some(section) => section.trim().to_string(),
        None => first_line(raw_text),
    };

    let explanation_part = match capture(&EXPLANATION_RE, raw_text) {
        Some(section) => section.trim().to_string(),
        None => NO_EXPLANATION.to_string(),
    };

    let confidence = match capture(&CONFIDENCE_RE, raw_text) {
        Some(digits) => digits
            .parse::<u8>()
            .ok()
            .filter(|value| *value <= 100)
            .ok_or(ExtractError::Confidence)?,
        None => DEFAULT_CONFIDENCE,
    };

    Ok(Answer {
        answer_part,
        explanation_part,
        confidence,
        raw_text: raw_text.to_string(),
        timestamp: display_timestamp(),
    })
}

/// Whole-record degraded form: first 100 chars of the raw text plus an
/// ellipsis, fixed explanation, confidence 50.
fn degraded(raw_text: &str) -> Answer {
    let mut answer_part: String = raw_text.chars().take(DEGRADED_PREFIX_CHARS).collect();
    answer_part.push_str("...");
    Answer {
        answer_part,
        explanation_part: DEGRADED_EXPLANATION.to_string(),
        confidence: DEGRADED_CONFIDENCE,
        raw_text: raw_text.to_string(),
        timestamp: display_timestamp(),
    }
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn first_line(text: &str) -> String {
    text.split('\n').next().unwrap_or_default().to_string()
}

#[derive(Debug)]
enum ExtractError {
    Confidence,
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Confidence => write!(f, "confidence value out of range"),
        }
    }
}
