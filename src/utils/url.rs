//! URL helpers for building search-service endpoints.
//!
//! Base URLs come from user configuration and may or may not carry a
//! trailing slash; endpoint paths may or may not carry a leading one.

/// Normalize a base URL by removing trailing slashes
///
/// # Examples
///
/// ```
/// use outfitmatch::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:8000"), "http://localhost:8000");
/// assert_eq!(normalize_base_url("http://localhost:8000/"), "http://localhost:8000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint path with exactly one slash between them.
///
/// # Examples
///
/// ```
/// use outfitmatch::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("http://localhost:8000/", "/api/search"),
///     "http://localhost:8000/api/search"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim().trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

/// Whether the base URL uses a scheme reqwest can talk to.
pub fn is_http_url(base_url: &str) -> bool {
    let trimmed = base_url.trim();
    ["http://", "https://"].iter().any(|scheme| {
        trimmed.len() > scheme.len()
            && trimmed
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_all_trailing_slashes() {
        assert_eq!(
            normalize_base_url("http://localhost:8000///"),
            "http://localhost:8000"
        );
        assert_eq!(normalize_base_url(" http://a.test/ "), "http://a.test");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn construct_handles_slash_variants() {
        for (base, endpoint) in [
            ("http://localhost:8000", "api/health"),
            ("http://localhost:8000/", "api/health"),
            ("http://localhost:8000", "/api/health"),
            ("http://localhost:8000//", "///api/health"),
        ] {
            assert_eq!(
                construct_api_url(base, endpoint),
                "http://localhost:8000/api/health"
            );
        }
    }

    #[test]
    fn construct_keeps_base_path_prefix() {
        assert_eq!(
            construct_api_url("https://shop.example.com/outfit/", "/api/search"),
            "https://shop.example.com/outfit/api/search"
        );
    }

    #[test]
    fn http_url_detection() {
        assert!(is_http_url("http://localhost:8000"));
        assert!(is_http_url("HTTPS://example.com"));
        assert!(!is_http_url("localhost:8000"));
        assert!(!is_http_url("http://"));
        assert!(!is_http_url("ftp://example.com"));
    }
}
