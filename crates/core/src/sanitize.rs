//! Query normalization.
//!
//! Two distinct forms exist and must not be mixed up:
//!
//! - [`normalize`] produces the upstream query token string (`the+lord+of+the+rings`).
//! - [`cache_title`] produces the search cache key component, a bare lower-case of the raw
//!   query with its whitespace untouched.

/// Lower-case, trim, and collapse every whitespace run into a single `+`.
pub fn normalize(raw: &str) -> String {
    raw.to_lowercase().split_whitespace().collect::<Vec<_>>().join("+")
}

/// Search cache key title for a raw query.
pub fn cache_title(raw: &str) -> String {
    raw.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  The    Lord OF the Rings "), "the+lord+of+the+rings");
        assert_eq!(normalize("the    Lord  of the rings"), "the+lord+of+the+rings");
    }

    #[test]
    fn test_normalize_tabs_and_newlines() {
        assert_eq!(normalize("dune\t\tmessiah\nchildren"), "dune+messiah+children");
    }

    #[test]
    fn test_normalize_single_word() {
        assert_eq!(normalize("HELLO"), "hello");
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("     "), "");
    }

    #[test]
    fn test_cache_title_is_case_insensitive() {
        assert_eq!(cache_title("Gatsby"), cache_title("gatsby"));
    }

    #[test]
    fn test_cache_title_differs_from_upstream_form() {
        let raw = "The Great  Gatsby";
        assert_eq!(cache_title(raw), "the great  gatsby");
        assert_eq!(normalize(raw), "the+great+gatsby");
        assert_ne!(cache_title(raw), normalize(raw));
    }
}
