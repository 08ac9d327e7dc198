//! GST number structural validation

use regex::Regex;
use std::sync::LazyLock;

/// 15-character GST registration pattern: state code (2 digits), the
/// embedded PAN (5 letters, 4 digits, 1 letter), entity code
/// (alphanumeric, never '0'), literal 'Z', checksum character.
static GST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]$").expect("valid GST pattern")
});

/// Check a candidate against the GST pattern.
///
/// Callers must uppercase first; no normalization happens here.
pub fn is_valid(candidate: &str) -> bool {
    GST_PATTERN.is_match(candidate)
}

/// Trim and uppercase a raw candidate.
pub fn normalize(candidate: &str) -> String {
    candidate.trim().to_uppercase()
}

/// Derive the embedded PAN: characters 3-12 (1-indexed) of the GST
/// number. Callers must validate the number first.
pub fn derive_pan(gst_number: &str) -> &str {
    &gst_number[2..12]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_number() {
        assert!(is_valid("29ABCDE1234F1Z5"));
        assert!(is_valid("07AAACI1234A2Z9"));
    }

    #[test]
    fn rejects_truncated_number() {
        assert!(!is_valid("29ABCDE1234F1Z"));
    }

    #[test]
    fn rejects_lowercase() {
        assert!(!is_valid("29abcde1234f1z5"));
    }

    #[test]
    fn rejects_zero_entity_code() {
        // 13th character is the entity code and may not be '0'
        assert!(!is_valid("29ABCDE1234F0Z5"));
    }

    #[test]
    fn rejects_missing_z() {
        assert!(!is_valid("29ABCDE1234F1X5"));
    }

    #[test]
    fn rejects_embedded_garbage() {
        assert!(!is_valid(" 29ABCDE1234F1Z5"));
        assert!(!is_valid("29ABCDE1234F1Z5X"));
        assert!(!is_valid(""));
    }

    #[test]
    fn normalize_trims_and_uppercases() {
        assert_eq!(normalize("  29abcde1234f1z5 "), "29ABCDE1234F1Z5");
    }

    #[test]
    fn pan_is_pure_slice() {
        assert_eq!(derive_pan("29ABCDE1234F1Z5"), "ABCDE1234F");
    }
}
