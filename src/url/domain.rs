use url::Url;

/// Extracts the domain from a URL
///
/// Returns the lowercase host with any leading `www.` removed, or None if the
/// URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hire_sweep::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| {
        let host = h.to_lowercase();
        match host.strip_prefix("www.") {
            Some(stripped) => stripped.to_string(),
            None => host,
        }
    })
}

/// Returns true if both URLs belong to the same site
///
/// `www.example.com` and `example.com` are the same site; subdomains and
/// different ports are not.
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(da), Some(db)) => da == db && a.port_or_known_default() == b.port_or_known_default(),
        _ => false,
    }
}
