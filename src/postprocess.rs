pub const TRUNCATION_MARKER: &str = "\n...[truncated]";

/// Trims surrounding whitespace and caps the result at `max_chars`
/// characters, appending [`TRUNCATION_MARKER`] when anything was cut.
pub fn normalize(text: &str, max_chars: usize) -> String {
    let cleaned = text.trim();
    match cleaned.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &cleaned[..cut], TRUNCATION_MARKER),
        None => cleaned.to_string(),
    }
}
