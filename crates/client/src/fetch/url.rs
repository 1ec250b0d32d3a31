//! URL resolution against the site origin.

/// Error type for URL resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Canonicalize an absolute URL string for consistent cache keys.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Lowercase the host
/// 3. Remove fragment (#...)
/// 4. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(mut host) = parsed.host_str() {
        let h = host.to_lowercase();
        host = h.as_str();
        parsed
            .set_host(Some(host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Resolve an asset reference to an absolute, canonical URL.
///
/// Site-relative paths (`/styles.css`) are joined onto the origin; anything
/// containing a scheme is treated as absolute and canonicalized as-is.
pub fn resolve_asset(origin: &url::Url, reference: &str) -> Result<url::Url, UrlError> {
    let trimmed = reference.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    if trimmed.contains("://") {
        return canonicalize(trimmed);
    }

    let joined = origin
        .join(trimmed)
        .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    canonicalize(joined.as_str())
}

/// Whether two URLs share an origin (scheme, host, and port).
pub fn same_origin(a: &url::Url, b: &url::Url) -> bool {
    a.scheme() == b.scheme() && a.host_str() == b.host_str() && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> url::Url {
        url::Url::parse("https://torquetrend.com").unwrap()
    }

    #[test]
    fn test_canonicalize_basic() {
        let url = canonicalize("https://torquetrend.com/styles.css").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("torquetrend.com"));
        assert_eq!(url.path(), "/styles.css");
    }

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("https://TORQUETREND.COM/").unwrap();
        assert_eq!(url.host_str(), Some("torquetrend.com"));
    }

    #[test]
    fn test_canonicalize_remove_fragment() {
        let url = canonicalize("https://torquetrend.com/index.html#news").unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/index.html");
    }

    #[test]
    fn test_canonicalize_preserve_query() {
        let url = canonicalize("https://torquetrend.com/?a=1&b=2").unwrap();
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn test_canonicalize_trim_whitespace() {
        let url = canonicalize("  https://torquetrend.com  ").unwrap();
        assert_eq!(url.as_str(), "https://torquetrend.com/");
    }

    #[test]
    fn test_canonicalize_unsupported_scheme() {
        let result = canonicalize("file:///etc/passwd");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_canonicalize_empty() {
        let result = canonicalize("");
        assert!(matches!(result, Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_site_relative() {
        let url = resolve_asset(&origin(), "/styles.css").unwrap();
        assert_eq!(url.as_str(), "https://torquetrend.com/styles.css");
    }

    #[test]
    fn test_resolve_root() {
        let url = resolve_asset(&origin(), "/").unwrap();
        assert_eq!(url.as_str(), "https://torquetrend.com/");
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let url = resolve_asset(&origin(), "https://cdn.example.com/lib.js").unwrap();
        assert_eq!(url.host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn test_resolve_empty() {
        let result = resolve_asset(&origin(), "   ");
        assert!(matches!(result, Err(UrlError::Empty)));
    }

    #[test]
    fn test_same_origin_matches() {
        let a = canonicalize("https://torquetrend.com/styles.css").unwrap();
        assert!(same_origin(&a, &origin()));
    }

    #[test]
    fn test_same_origin_default_port() {
        let a = canonicalize("https://torquetrend.com:443/").unwrap();
        assert!(same_origin(&a, &origin()));
    }

    #[test]
    fn test_same_origin_rejects_other_host() {
        let a = canonicalize("https://cdn.example.com/lib.js").unwrap();
        assert!(!same_origin(&a, &origin()));
    }

    #[test]
    fn test_same_origin_rejects_scheme_downgrade() {
        let a = canonicalize("http://torquetrend.com/").unwrap();
        assert!(!same_origin(&a, &origin()));
    }
}
