use crate::url::CrawlTarget;

/// Resolves an extracted link against the crawl root
///
/// Only bare relative links are joined, by plain string concatenation with
/// the root. Links starting with a scheme, `./` or `/` (including `//host`)
/// are returned unchanged; the validator later drops those that are not
/// absolute http(s) URLs.
///
/// `../` segments and duplicate separators are left untouched, so
/// `../page` resolves to `<root>../page`.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::{resolve_link, CrawlTarget};
///
/// let target = CrawlTarget::new("http://example.com/").unwrap();
/// assert_eq!(resolve_link(&target, "about"), "http://example.com/about");
/// assert_eq!(resolve_link(&target, "/blog/"), "/blog/");
/// assert_eq!(resolve_link(&target, "http://other.org/"), "http://other.org/");
/// ```
pub fn resolve_link(target: &CrawlTarget, link: &str) -> String {
    let link = link.trim();

    if link.is_empty() || has_scheme(link) || link.starts_with("./") || link.starts_with('/') {
        return link.to_string();
    }

    format!("{}{}", target.root(), link)
}

/// Returns true if the link starts with an RFC 3986 scheme followed by `:`
pub fn has_scheme(link: &str) -> bool {
    let Some(colon) = link.find(':') else {
        return false;
    };
    let scheme = &link[..colon];

    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'),
        _ => false,
    }
}
