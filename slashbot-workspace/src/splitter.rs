//! Platform-aware message splitting: connectors with a hard per-message
//! character cap (Telegram, Discord) need a long agent reply cut into
//! multiple sends. The CLI has no cap and never calls this.
//!
//! Rule: prefer a newline boundary inside the window; else a word
//! boundary; else a hard cut at the window edge. Continuation chunks are
//! left-trimmed so a split that lands right after whitespace doesn't leave
//! a leading blank line/space on the next chunk.

pub const CLI_MAX_CHARS: Option<usize> = None;
pub const TELEGRAM_MAX_CHARS: usize = 4000;
pub const DISCORD_MAX_CHARS: usize = 2000;

/// Splits `text` into chunks of at most `max_chars` chars each (counted as
/// `char`s, not bytes, so multi-byte UTF-8 text never gets cut mid-codepoint).
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let window_end = (start + max_chars).min(chars.len());
        let cut = if window_end == chars.len() {
            window_end
        } else {
            find_boundary(&chars, start, window_end)
        };
        let chunk: String = chars[start..cut].iter().collect();
        chunks.push(chunk);
        start = skip_leading_whitespace(&chars, cut);
    }
    chunks
}

/// Looks backward from `window_end` for a newline, then a space, within
/// `[start, window_end)`; falls back to a hard cut at `window_end`.
fn find_boundary(chars: &[char], start: usize, window_end: usize) -> usize {
    for i in (start..window_end).rev() {
        if chars[i] == '\n' {
            return i + 1;
        }
    }
    for i in (start..window_end).rev() {
        if chars[i] == ' ' {
            return i + 1;
        }
    }
    window_end
}

fn skip_leading_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && (chars[i] == ' ' || chars[i] == '\n') {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_under_the_limit_is_one_chunk() {
        assert_eq!(split_message("hello", 4000), vec!["hello".to_string()]);
    }

    #[test]
    fn splits_on_word_boundary_when_no_newline_present() {
        let text = "a ".repeat(2500); // 5000 chars, no newlines
        let chunks = split_message(&text, 4000);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].chars().count() <= 4000);
        assert!(!chunks[0].ends_with(' '));
    }

    #[test]
    fn five_thousand_chars_no_newlines_splits_four_thousand_then_one_thousand() {
        let text = "x".repeat(5000);
        let chunks = split_message(&text, 4000);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 4000);
        assert_eq!(chunks[1].chars().count(), 1000);
    }

    #[test]
    fn prefers_newline_boundary_over_word_boundary() {
        let mut text = "a".repeat(10);
        text.push('\n');
        text.push_str(&"b".repeat(20));
        let chunks = split_message(&text, 15);
        assert_eq!(chunks[0], "a".repeat(10));
    }

    #[test]
    fn continuation_chunks_are_left_trimmed() {
        let text = format!("{} {}", "a".repeat(10), "b".repeat(10));
        let chunks = split_message(&text, 11);
        assert!(!chunks[1].starts_with(' '));
    }

    #[test]
    fn joined_chunks_reconstruct_the_original_when_boundaries_are_exact() {
        let text = format!("{}\n{}", "a".repeat(10), "b".repeat(10));
        let chunks = split_message(&text, 10);
        assert_eq!(chunks.join("\n"), text);
    }
}
