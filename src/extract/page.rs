//! HTML page reader
//!
//! Pulls the three things the pipeline needs out of a fetched document:
//! - The visible text (script and style content excluded)
//! - `mailto:` link targets
//! - Links to other pages, for the detailed tier's single hop

use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose text content is never rendered
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// Absolute URL of the link target
    pub url: Url,

    /// Anchor text, whitespace-collapsed
    pub text: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Visible text of the document, text nodes joined by single spaces
    pub visible_text: String,

    /// Targets of `mailto:` links, without the scheme or query
    pub mailto_targets: Vec<String>,

    /// HTTP(S) links found on the page (absolute URLs)
    pub links: Vec<PageLink>,
}

/// Parses HTML content and extracts visible text, mailto targets and links
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` resolving to an http or https URL
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links
///
/// # Example
///
/// ```
/// use hire_sweep::extract::parse_html;
/// use url::Url;
///
/// let html = r#"<p>Write to <a href="mailto:jobs@example.org">us</a></p>"#;
/// let base = Url::parse("https://example.org/").unwrap();
/// let parsed = parse_html(html, &base);
/// assert_eq!(parsed.mailto_targets, vec!["jobs@example.org".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        visible_text: extract_visible_text(&document),
        mailto_targets: extract_mailto_targets(&document),
        links: extract_links(&document, base_url),
    }
}

/// Collects text nodes that are not inside script-like elements
fn extract_visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let text = match node.value() {
            Node::Text(text) => text,
            _ => continue,
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|element| HIDDEN_ELEMENTS.contains(&element.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

fn extract_mailto_targets(document: &Html) -> Vec<String> {
    let mut targets = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let href = href.trim();
            match href.get(..7) {
                Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => {}
                _ => continue,
            }

            let target = href[7..].split('?').next().unwrap_or("").trim();
            if !target.is_empty() {
                targets.push(target.replace("%40", "@").replace("%2E", "."));
            }
        }
    }

    targets
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<PageLink> {
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(url) = resolve_link(href, base_url) {
                    let text = element
                        .text()
                        .flat_map(str::split_whitespace)
                        .collect::<Vec<_>>()
                        .join(" ");
                    links.push(PageLink { url, text });
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);

    Some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_visible_text_excludes_scripts_and_styles() {
        let html = r#"<html><head><title>Careers</title><style>.job{}</style></head>
            <body><p>Join our team</p><script>var job = "hidden";</script></body></html>"#;
        let parsed = parse_html(html, &base_url());
        assert!(parsed.visible_text.contains("Careers"));
        assert!(parsed.visible_text.contains("Join our team"));
        assert!(!parsed.visible_text.contains("hidden"));
        assert!(!parsed.visible_text.contains(".job"));
    }

    #[test]
    fn test_visible_text_decodes_entities() {
        let html = "<p>jobs&#64;example.com</p>";
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.visible_text, "jobs@example.com");
    }

    #[test]
    fn test_plain_text_body() {
        let parsed = parse_html("We are hiring", &base_url());
        assert_eq!(parsed.visible_text, "We are hiring");
    }

    #[test]
    fn test_mailto_targets() {
        let html = r#"<a href="mailto:HR@Example.com?subject=Hello">Email</a>
            <a href="MAILTO:info%40example.com">Info</a>
            <a href="/contact">Contact</a>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(
            parsed.mailto_targets,
            vec!["HR@Example.com".to_string(), "info@example.com".to_string()]
        );
    }

    #[test]
    fn test_extract_relative_link_with_text() {
        let html = r#"<a href="/contact-us">  Contact
            us </a>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links.len(), 1);
        assert_eq!(parsed.links[0].url.as_str(), "https://example.com/contact-us");
        assert_eq!(parsed.links[0].text, "Contact us");
    }

    #[test]
    fn test_skip_special_links() {
        let html = r##"<html><body>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            <a href="data:text/html,<h1>Test</h1>">Data</a>
            <a href="#section">Jump</a>
            <a href="/file.pdf" download>Download</a>
            <a href="ftp://example.com/file">FTP</a>
            <a href="/valid">Valid</a>
        </body></html>"##;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links.len(), 1);
        assert_eq!(parsed.links[0].url.as_str(), "https://example.com/valid");
    }

    #[test]
    fn test_link_fragment_removed() {
        let html = r#"<a href="/about#team">About</a>"#;
        let parsed = parse_html(html, &base_url());
        assert_eq!(parsed.links[0].url.as_str(), "https://example.com/about");
    }
}
