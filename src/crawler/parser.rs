//! HTML link extraction
//!
//! Links are taken from `a`, `frame`, `iframe` and `form` elements. Values are
//! returned as written in the page; resolving them against the root is the
//! caller's job.

use scraper::{Html, Selector};

/// Attributes that may carry a link, in the order they are looked up
const LINK_ATTRIBUTES: [&str; 4] = ["href", "src", "url", "action"];

/// Schemes that never lead to a crawlable page
const EXCLUDED_SCHEMES: [&str; 7] = [
    "mailto:",
    "news:",
    "javascript:",
    "ftp:",
    "telnet:",
    "callto:",
    "ed2k:",
];

/// Extracts raw link values from an HTML document
///
/// # Link Extraction Rules
///
/// - One link per element: the first of `href`, `src`, `url`, `action` present
/// - The value is cut at the first `#`, quote, `>` or whitespace
/// - Empty values and excluded schemes (`mailto:`, `javascript:`, ...) are dropped
/// - Duplicates are kept; every occurrence counts as a link
///
/// # Example
///
/// ```
/// use sitemap_ripple::crawler::extract_links;
///
/// let html = r#"<a href="/about#team">About</a><a href="mailto:me@example.com">Mail</a>"#;
/// assert_eq!(extract_links(html), vec!["/about".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a, frame, iframe, form") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| {
            let element = element.value();
            LINK_ATTRIBUTES
                .iter()
                .find_map(|attribute| element.attr(attribute))
        })
        .filter_map(clean_link)
        .collect()
}

fn clean_link(value: &str) -> Option<String> {
    let value = value.trim_start();
    if is_excluded_scheme(value) {
        return None;
    }

    let end = value
        .find(|c: char| matches!(c, '#' | '"' | '\'' | '>') || c.is_whitespace())
        .unwrap_or(value.len());
    let link = &value[..end];

    if link.is_empty() {
        None
    } else {
        Some(link.to_string())
    }
}

fn is_excluded_scheme(value: &str) -> bool {
    EXCLUDED_SCHEMES.iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
