use serde::{Deserialize, Serialize};

/// Default preview length, in characters.
pub const PREVIEW_CHARS: usize = 500;

const ELLIPSIS: &str = "...";

/// Article body extracted from a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleContent {
    pub url: String,
    pub text: String,
    /// Name of the extraction strategy that produced `text`.
    pub strategy: String,
}

impl ArticleContent {
    pub fn preview(&self, max_chars: usize) -> String {
        preview(&self.text, max_chars)
    }
}

/// First `max_chars` characters of `text`, with `...` appended when the text
/// was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "a".repeat(600);
        let p = preview(&text, PREVIEW_CHARS);
        assert_eq!(p.len(), 503);
        assert!(p.starts_with(&"a".repeat(500)));
        assert!(p.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_text_whole() {
        let text = "b".repeat(400);
        assert_eq!(preview(&text, PREVIEW_CHARS), text);
    }

    #[test]
    fn test_preview_exact_length_has_no_marker() {
        let text = "c".repeat(500);
        assert_eq!(preview(&text, PREVIEW_CHARS), text);
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "é".repeat(501);
        let p = preview(&text, PREVIEW_CHARS);
        assert_eq!(p.chars().count(), 503);
        assert_eq!(p.chars().filter(|c| *c == 'é').count(), 500);
    }
}
