//! Wire types for the `generateContent` call, shaped after the REST API.

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Structural validation: the first candidate must carry content parts
    /// whose first part holds non-empty text. Anything else is treated as
    /// a failure for retry purposes.
    pub fn first_text(&self) -> Result<&str, ApiError> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| ApiError::InvalidResponse("no candidates".into()))?;
        let content = candidate
            .content
            .as_ref()
            .ok_or_else(|| ApiError::InvalidResponse("candidate without content".into()))?;
        let part = content
            .parts
            .first()
            .ok_or_else(|| ApiError::InvalidResponse("candidate without parts".into()))?;
        match part.text.as_deref() {
            Some(text) if !text.is_empty() => Ok(text),
            _ => Err(ApiError::InvalidResponse("no text in first part".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_to_rest_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "prompt".into(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".into(),
                            data: "AAAA".into(),
                        },
                    },
                ],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(
            value["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
    }

    #[test]
    fn first_text_accepts_valid_body() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[ĐÁP ÁN]\nA"}]}}]
        }))
        .unwrap();
        assert_eq!(response.first_text().unwrap(), "[ĐÁP ÁN]\nA");
    }

    #[test]
    fn first_text_rejects_empty_variants() {
        let cases = [
            json!({}),
            json!({"candidates": []}),
            json!({"candidates": [{}]}),
            json!({"candidates": [{"content": {"parts": []}}]}),
            json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]}),
            json!({"candidates": [{"content": {"parts": [{}]}}]}),
        ];
        for case in cases {
            let response: GenerateContentResponse = serde_json::from_value(case).unwrap();
            assert!(response.first_text().is_err());
        }
    }
}
