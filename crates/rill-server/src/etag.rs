//! Cache validator generation for buffered responses.

/// Generate a simple ETag from complete body content.
pub fn generate_etag(content: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Build the `ETag` header pair, quoted per RFC 9110.
pub fn etag_header(content: &str) -> (String, String) {
    ("ETag".to_string(), format!("\"{}\"", generate_etag(content)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_content_same_etag() {
        assert_eq!(generate_etag("<html>a</html>"), generate_etag("<html>a</html>"));
    }

    #[test]
    fn test_different_content_different_etag() {
        assert_ne!(generate_etag("a"), generate_etag("b"));
    }

    #[test]
    fn test_header_is_quoted() {
        let (name, value) = etag_header("body");
        assert_eq!(name, "ETag");
        assert!(value.starts_with('"') && value.ends_with('"'));
    }
}
