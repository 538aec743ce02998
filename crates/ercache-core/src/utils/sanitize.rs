/// Make a region name safe to use inside a file name: path separators become
/// `_` and surrounding whitespace is dropped.
pub fn sanitize_name(name: &str) -> String {
    name.replace(['/', '\\'], "_").trim().to_string()
}

/// Label for a precinct-document cache entry: `{sanitized name}_{code}`.
pub fn cache_label(name: &str, code: &str) -> String {
    format!("{}_{}", sanitize_name(name), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Bagong Ilog"), "Bagong Ilog");
        assert_eq!(sanitize_name("  San Jose / Malinao "), "San Jose _ Malinao");
        assert_eq!(sanitize_name("A\\B"), "A_B");
        assert_eq!(sanitize_name(""), "");
    }

    #[test]
    fn test_cache_label() {
        assert_eq!(cache_label(" Bagong Ilog ", "740300100"), "Bagong Ilog_740300100");
    }
}
