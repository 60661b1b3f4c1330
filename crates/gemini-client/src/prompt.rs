//! Fixed solve prompt requesting the three labeled answer sections.

use crate::types::{Content, GenerateContentRequest, InlineData, Part};

pub const SOLVE_PROMPT: &str = "Giải bài tập này và cung cấp câu trả lời theo định dạng sau:\n\n\
[ĐÁP ÁN]\n{đáp án chính xác, bao gồm toàn bộ nội dung}\n\n\
[GIẢI THÍCH]\n{giải thích ngắn gọn}\n\n\
[ĐỘ TIN CẬY]\n{ước tính phần trăm chính xác từ 0-100%}";

/// Build the request for one screenshot, inlined as base64 PNG.
pub fn solve_request(base64_png: &str) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: SOLVE_PROMPT.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: "image/png".to_string(),
                        data: base64_png.to_string(),
                    },
                },
            ],
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_carries_prompt_and_image() {
        let request = solve_request("UEs=");
        assert_eq!(request.contents.len(), 1);
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], Part::Text { text } if text.contains("[ĐỘ TIN CẬY]")));
        assert!(
            matches!(&parts[1], Part::InlineData { inline_data } if inline_data.data == "UEs=")
        );
    }
}
