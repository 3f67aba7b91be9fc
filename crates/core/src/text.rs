//! Text helpers shared by the extractor, synthesizer and CLI.
//!
//! All limits are counted in characters, never bytes, so clipping cannot split
//! a multi-byte code point.

use regex::Regex;
use std::sync::LazyLock;

/// Regex to collapse any run of whitespace (including newlines) into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Characters that cannot appear in a file name on common platforms.
static FILENAME_UNSAFE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\\\x00-\x1f\x7f]").unwrap());

/// Collapse whitespace runs to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(text, " ")
        .trim()
        .to_string()
}

/// Return at most the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Longest file stem in bytes; leaves room for the extension and a temp suffix
/// under the common 255-byte file name limit.
pub const MAX_STEM_BYTES: usize = 200;

/// Return the longest prefix of `text` that fits in `max_bytes` without splitting a char.
pub fn truncate_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Derive the output file stem for a topic.
///
/// The topic text is kept as typed; only path separators and control
/// characters are replaced, and the result is capped at [`MAX_STEM_BYTES`].
/// Returns `None` when nothing usable remains.
pub fn file_stem_for_topic(topic: &str) -> Option<String> {
    let cleaned = FILENAME_UNSAFE_REGEX.replace_all(topic.trim(), "_");
    let cleaned = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    let cleaned = truncate_bytes(cleaned, MAX_STEM_BYTES)
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace());

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned.to_string())
    }
}
