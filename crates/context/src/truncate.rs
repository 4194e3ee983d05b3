//! Character-bounded truncation.

/// Appended when the raw content exceeds `max_chars`.
pub const CONTENT_MARKER: &str = "\n[Content truncated due to size limitations]";

/// Appended when the summary handed to workers is cut at `summary_chars`.
pub const SUMMARY_MARKER: &str =
    "\n[Summary truncated - full content available for question generation]";

/// Keep at most `max_chars` characters of `text`, appending `marker` if
/// anything was cut. Never splits a UTF-8 sequence.
///
/// Returns the bounded text and whether it was truncated.
pub fn truncate_with_marker(text: &str, max_chars: usize, marker: &str) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text.to_string(), false),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + marker.len());
            out.push_str(&text[..cut]);
            out.push_str(marker);
            (out, true)
        }
    }
}
