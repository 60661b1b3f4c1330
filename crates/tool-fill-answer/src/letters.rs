//! Choice-letter extraction from free-form answer text.

/// Phrases that introduce a choice letter, tried in this order at each
/// position (longest variant before its prefix).
const PHRASE_KEYWORDS: &[&str] = &["đáp án", "đáp", "câu trả lời", "chọn"];

/// Letter for the single-choice strategy: a phrase pattern like
/// "đáp án: B" / "chọn C", or the whole answer being exactly one letter.
pub fn single_choice_letter(answer: &str, letters: &[char]) -> Option<char> {
    if let Some(letter) = phrase_letter(answer, letters) {
        return Some(letter);
    }
    let mut chars = answer.chars();
    match (chars.next(), chars.next()) {
        (Some(only), None) => {
            let upper = only.to_ascii_uppercase();
            letters.contains(&upper).then_some(upper)
        }
        _ => None,
    }
}

/// All distinct choice letters occurring anywhere in the answer, in order
/// of first appearance. Uppercase occurrences only.
pub fn multi_choice_letters(answer: &str, letters: &[char]) -> Vec<char> {
    let mut found = Vec::new();
    for ch in answer.chars() {
        if letters.contains(&ch) && !found.contains(&ch) {
            found.push(ch);
        }
    }
    found
}

fn phrase_letter(answer: &str, letters: &[char]) -> Option<char> {
    let lowered = answer.to_lowercase();
    for (pos, _) in lowered.char_indices() {
        let rest = &lowered[pos..];
        for keyword in PHRASE_KEYWORDS {
            if let Some(tail) = rest.strip_prefix(keyword) {
                if let Some(letter) = letter_after_separator(tail, letters) {
                    return Some(letter);
                }
            }
        }
    }
    None
}

/// Expects one or more whitespace/colon chars, then a choice letter.
fn letter_after_separator(tail: &str, letters: &[char]) -> Option<char> {
    let mut chars = tail.chars();
    let mut seen_separator = false;
    for ch in chars.by_ref() {
        if ch.is_whitespace() || ch == ':' {
            seen_separator = true;
            continue;
        }
        if !seen_separator {
            return None;
        }
        let upper = ch.to_ascii_uppercase();
        return letters.contains(&upper).then_some(upper);
    }
    None
}
