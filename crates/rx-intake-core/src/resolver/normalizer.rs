//! Symptom/tag normalizer.
//!
//! Handles:
//! - Tag keys (lowercase, trimmed, ASCII letters and digits only)
//! - Splitting the comma-delimited symptom field into entries

/// Reduce a tag or symptom to its lookup key.
///
/// Lowercases, trims, then drops every character that is not an ASCII letter or
/// digit. Spaces, punctuation, apostrophes and non-ASCII symbols all vanish, so
/// "Smoker’s lung" and "smokers-lung" share a key.
pub fn normalize_tag(tag: &str) -> String {
    // Lowercase first: some non-ASCII letters fold to ASCII ("\u{212A}" -> "k")
    tag.to_lowercase()
        .trim()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Split a comma-delimited symptom field into trimmed, non-empty entries.
pub fn split_symptoms(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
