//! Utility functions and helpers.

pub mod http;

/// Return at most `max_chars` characters of `text`, never splitting a
/// character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
