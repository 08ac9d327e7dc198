//! GST number extraction from OCR text

use regex::Regex;
use std::sync::LazyLock;

static GST_SCAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]\b")
        .expect("valid GST scan pattern")
});

/// First word-bounded GST-shaped substring in free-form text,
/// case-sensitive. Multiple candidates are not disambiguated: first
/// match wins. Checksum semantics are not verified here.
pub fn extract(text: &str) -> Option<&str> {
    GST_SCAN.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_embedded_number() {
        let text = "GSTIN: 29ABCDE1234F1Z5\nTrade Name: Acme Traders";
        assert_eq!(extract(text), Some("29ABCDE1234F1Z5"));
    }

    #[test]
    fn returns_none_without_match() {
        assert_eq!(extract("no registration number in this text"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn first_match_wins() {
        let text = "old 29ABCDE1234F1Z5 superseded by 07AAACI1234A2Z9";
        assert_eq!(extract(text), Some("29ABCDE1234F1Z5"));
    }

    #[test]
    fn ignores_lowercase_candidates() {
        assert_eq!(extract("29abcde1234f1z5"), None);
    }

    #[test]
    fn respects_word_boundaries() {
        // Glued onto surrounding alphanumerics, the 15-char window is
        // no longer a standalone token
        assert_eq!(extract("XX29ABCDE1234F1Z5"), None);
    }
}
