/// Comparison form of a token: outer punctuation stripped, case folded
///
/// Only used for matching, never for display. Inner punctuation such as the
/// hyphen in "well-known" or the apostrophe in "don't" is kept.
pub fn base_form(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Number of whitespace-separated tokens
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into whitespace-separated tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Preview with an ellipsis when the text was cut
pub fn preview(text: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(text, max_chars);
    if truncated.len() < text.len() {
        format!("{}...", truncated)
    } else {
        truncated.to_string()
    }
}
