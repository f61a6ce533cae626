//! Read-time estimation from rendered content.

use html2text::from_read;

/// Assumed reading speed, in words per minute.
const WORDS_PER_MINUTE: usize = 200;

/// Estimate the minutes needed to read an HTML or plain-text string.
///
/// Markup is stripped before counting so tags never inflate the estimate.
/// The result is the word count divided by the reading speed, rounded up;
/// empty input yields 0.
pub fn estimate(content: &str) -> u32 {
    let text = from_read(content.as_bytes(), 80);
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_estimates_zero() {
        assert_eq!(estimate(""), 0);
    }

    #[test]
    fn short_text_rounds_up_to_one_minute() {
        assert_eq!(estimate("<p>just a few words</p>"), 1);
    }

    #[test]
    fn four_hundred_words_estimate_two_minutes() {
        let paragraph = vec!["word"; 400].join(" ");
        assert_eq!(estimate(&paragraph), 2);
    }

    #[test]
    fn estimate_is_deterministic() {
        let content = "<p>The same content always yields the same estimate.</p>";
        assert_eq!(estimate(content), estimate(content));
    }

    #[test]
    fn markup_does_not_count_as_words() {
        let bare = vec!["word"; 250].join(" ");
        let wrapped = format!("<article><h1>heading</h1><p>{bare}</p></article>");
        // 251 words of text regardless of how much markup surrounds them.
        assert_eq!(estimate(&wrapped), 2);
    }
}
