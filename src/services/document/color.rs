use std::sync::OnceLock;

use regex::Regex;

/// Default accent blue, used whenever no valid brand color is supplied.
pub const DEFAULT_ACCENT: &str = "2563eb";

fn hex_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#?[0-9a-fA-F]{6}$").expect("valid hex pattern"))
}

/// Resolve a caller-supplied hex color to the bare six-digit form used for
/// every accent in the document. Anything that is not a strict six-hex-digit
/// string (with or without a leading `#`) falls back to the default blue.
pub fn resolve_color(input: Option<&str>) -> String {
    match input {
        Some(raw) if hex_pattern().is_match(raw) => {
            raw.trim_start_matches('#').to_lowercase()
        }
        _ => DEFAULT_ACCENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_hex_with_and_without_hash() {
        assert_eq!(resolve_color(Some("#1a2b3c")), "1a2b3c");
        assert_eq!(resolve_color(Some("1a2b3c")), "1a2b3c");
    }

    #[test]
    fn test_uppercase_is_normalized() {
        assert_eq!(resolve_color(Some("#AABBCC")), "aabbcc");
    }

    #[test]
    fn test_invalid_inputs_fall_back_to_default() {
        for input in [
            Some("red"),
            Some("#fff"),
            Some("#12345"),
            Some("#1234567"),
            Some("#12345g"),
            Some(" #1a2b3c"),
            Some(""),
            None,
        ] {
            assert_eq!(resolve_color(input), DEFAULT_ACCENT);
        }
    }

    #[test]
    fn test_output_is_always_six_hex_digits() {
        for input in [Some("#2563EB"), Some("junk"), None] {
            let resolved = resolve_color(input);
            assert_eq!(resolved.len(), 6);
            assert!(resolved.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
