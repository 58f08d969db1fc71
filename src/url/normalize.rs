use crate::UrlError;
use url::{Host, Url};

/// Resolves a raw website field into a fetchable absolute URL
///
/// # Resolution Steps
///
/// 1. Reject absent or blank input as [`UrlError::Missing`]
/// 2. Prepend `http://` when the value does not start with `http://` or `https://`
/// 3. Parse; reject if malformed
/// 4. Require a host that is an IP address or a dotted domain name
/// 5. Drop the fragment
///
/// # Examples
///
/// ```
/// use hire_sweep::url::resolve_website;
///
/// let url = resolve_website(Some("example.org/careers")).unwrap();
/// assert_eq!(url.as_str(), "http://example.org/careers");
/// ```
pub fn resolve_website(raw: Option<&str>) -> Result<Url, UrlError> {
    let trimmed = match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(UrlError::Missing),
    };

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Invalid(e.to_string()))?;

    match url.host() {
        Some(Host::Domain(domain)) => validate_domain(domain)?,
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {}
        None => return Err(UrlError::Invalid("missing host".to_string())),
    }

    url.set_fragment(None);

    Ok(url)
}

fn has_http_scheme(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Checks that a host looks like a public domain name (`label.tld`)
fn validate_domain(domain: &str) -> Result<(), UrlError> {
    let labels: Vec<&str> = domain.trim_end_matches('.').split('.').collect();

    if labels.len() < 2 {
        return Err(UrlError::Invalid(format!(
            "host '{}' is not a domain name",
            domain
        )));
    }

    for label in &labels {
        if label.is_empty()
            || label.starts_with('-')
            || label.ends_with('-')
            || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(UrlError::Invalid(format!(
                "host '{}' has an invalid label",
                domain
            )));
        }
    }

    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || tld.chars().all(|c| c.is_ascii_digit()) {
        return Err(UrlError::Invalid(format!(
            "host '{}' has an invalid top-level domain",
            domain
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_website() {
        assert_eq!(resolve_website(None), Err(UrlError::Missing));
        assert_eq!(resolve_website(Some("")), Err(UrlError::Missing));
        assert_eq!(resolve_website(Some("   ")), Err(UrlError::Missing));
    }

    #[test]
    fn test_prepends_http_scheme() {
        let url = resolve_website(Some("example.org/careers")).unwrap();
        assert_eq!(url.as_str(), "http://example.org/careers");
    }

    #[test]
    fn test_keeps_https_scheme() {
        let url = resolve_website(Some("https://example.org/")).unwrap();
        assert_eq!(url.as_str(), "https://example.org/");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let url = resolve_website(Some("HTTPS://Example.org")).unwrap();
        assert_eq!(url.as_str(), "https://example.org/");
    }

    #[test]
    fn test_trims_whitespace() {
        let url = resolve_website(Some("  www.example.com.au  ")).unwrap();
        assert_eq!(url.as_str(), "http://www.example.com.au/");
    }

    #[test]
    fn test_removes_fragment() {
        let url = resolve_website(Some("example.org/page#team")).unwrap();
        assert_eq!(url.as_str(), "http://example.org/page");
    }

    #[test]
    fn test_accepts_ip_host() {
        let url = resolve_website(Some("http://127.0.0.1:8080/")).unwrap();
        assert_eq!(url.host_str(), Some("127.0.0.1"));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        // Prefixed to http://ftp://..., which has no valid host
        assert!(matches!(
            resolve_website(Some("ftp://example.org")),
            Err(UrlError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(
            resolve_website(Some("not a url")),
            Err(UrlError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_host_without_tld() {
        assert!(matches!(
            resolve_website(Some("localhost")),
            Err(UrlError::Invalid(_))
        ));
        assert!(matches!(
            resolve_website(Some("example.c")),
            Err(UrlError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_bad_label() {
        assert!(matches!(
            resolve_website(Some("exa_mple.com")),
            Err(UrlError::Invalid(_))
        ));
    }
}
