/// Characters never allowed in a download filename.
const INVALID: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Produce a safe base filename from a fund name. Newlines become spaces so
/// words stay separated, the invalid set is removed outright, and the result
/// is trimmed. Idempotent, and never fails for any input; an empty result
/// falls back to "investor-report".
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| match c {
            '\n' | '\r' => Some(' '),
            c if INVALID.contains(&c) => None,
            c => Some(c),
        })
        .collect();

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "investor-report".to_string()
    } else {
        cleaned.to_string()
    }
}
