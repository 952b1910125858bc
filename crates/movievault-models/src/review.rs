/// Normalize free-text review input.
///
/// Surrounding whitespace is trimmed; a review that trims to nothing is absent,
/// never an empty string.
pub fn normalize_review(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Same rule for optional provenance fields (poster URL, IMDb id).
pub(crate) fn normalize_optional(text: Option<&str>) -> Option<String> {
    text.and_then(normalize_review)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_review_trims() {
        assert_eq!(normalize_review("  great film \n"), Some("great film".to_string()));
    }

    #[test]
    fn test_normalize_review_blank_is_absent() {
        assert_eq!(normalize_review(""), None);
        assert_eq!(normalize_review(" \t\n "), None);
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(normalize_optional(Some("tt0133093")), Some("tt0133093".to_string()));
    }
}
