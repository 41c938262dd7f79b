//! Token estimation and file summarization

use serde::Serialize;
use tracing::warn;

/// Characters per estimated token
pub const CHARS_PER_TOKEN: usize = 4;

/// Share of `max_tokens` the selector may fill, in percent
pub const WORKING_BUDGET_PERCENT: usize = 80;

/// Estimated tokens for a piece of text: characters / 4, rounded up
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Estimated tokens for the JSON form of a value
pub fn estimate_json_tokens<T: Serialize + ?Sized>(value: &T) -> usize {
    match serde_json::to_string(value) {
        Ok(json) => estimate_tokens(&json),
        Err(e) => {
            warn!("Failed to serialize value for token estimate: {}", e);
            usize::MAX
        }
    }
}

pub fn working_budget(max_tokens: usize) -> usize {
    max_tokens.saturating_mul(WORKING_BUDGET_PERCENT) / 100
}

/// Keep the head and tail of `text` so it fits in `tokens`.
///
/// Text that already fits is returned unchanged. Otherwise the first and last
/// `tokens * 4 / 2` characters are kept around an omission marker.
pub fn summarize_file(text: &str, tokens: usize) -> String {
    let max_chars = tokens.saturating_mul(CHARS_PER_TOKEN);
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let half = max_chars / 2;
    let omitted = chars.len() - max_chars;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();

    format!("{head}\n\n[... {omitted} characters omitted ...]\n\n{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        // JSON string form adds the quotes
        assert_eq!(estimate_json_tokens("abcdef"), 2);
    }

    #[test]
    fn test_working_budget_floors() {
        assert_eq!(working_budget(1000), 800);
        assert_eq!(working_budget(7), 5);
        assert_eq!(working_budget(0), 0);
    }

    #[test]
    fn test_summarize_identity_when_it_fits() {
        let text = "x".repeat(40);
        assert_eq!(summarize_file(&text, 10), text);
    }

    #[test]
    fn test_summarize_keeps_head_and_tail() {
        let text = format!("{}{}{}", "a".repeat(50), "m".repeat(100), "z".repeat(50));
        let summary = summarize_file(&text, 25);

        // 100 chars allowed, 50 kept on each side
        assert!(summary.starts_with(&"a".repeat(50)));
        assert!(summary.ends_with(&"z".repeat(50)));
        let marker = "\n\n[... 100 characters omitted ...]\n\n";
        assert!(summary.contains(marker));
        assert!(!summary.contains('m'));
        assert!(summary.chars().count() <= 25 * CHARS_PER_TOKEN + marker.len());
    }
}
