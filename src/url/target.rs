use crate::{UrlError, UrlResult};
use url::Url;

/// The root address of a crawl
///
/// The root always ends with `/`. Its scope is the root with the scheme and a
/// leading `www.` removed, lowercased (`example.com/` or `example.com/docs/`).
/// Every same-host check compares candidate URLs against this scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    root: String,
    scope: String,
    host_len: usize,
}

impl CrawlTarget {
    /// Creates a target from a root address
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_ripple::url::CrawlTarget;
    ///
    /// let target = CrawlTarget::new("https://www.Example.com").unwrap();
    /// assert_eq!(target.root(), "https://www.Example.com/");
    /// assert_eq!(target.host(), "example.com");
    /// assert!(target.contains("http://blog.example.com/post"));
    /// assert!(!target.contains("http://evil.com/page"));
    /// ```
    pub fn new(root: &str) -> UrlResult<Self> {
        let root = root.trim();
        let parsed = Url::parse(root).map_err(|e| UrlError::Parse(e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
        }
        if parsed.host_str().is_none() {
            return Err(UrlError::MissingHost);
        }

        let mut root = root.to_string();
        if !root.ends_with('/') {
            root.push('/');
        }

        let after_scheme = strip_scheme(&root).ok_or(UrlError::MissingHost)?;
        let scope = strip_www(after_scheme).to_lowercase();
        let host_len = scope.find('/').unwrap_or(scope.len());

        Ok(Self {
            root,
            scope,
            host_len,
        })
    }

    /// The root address, always with a trailing `/`
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Scheme-relative scope of the crawl (`example.com/docs/`)
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Lowercased host without `www.`
    pub fn host(&self) -> &str {
        &self.scope[..self.host_len]
    }

    /// Returns true if the URL's host is the target host or one of its subdomains
    pub fn is_same_host(&self, url: &str) -> bool {
        self.split(url).is_some()
    }

    /// Returns the part of a same-host URL after the host (`/blog/post?x=1`)
    ///
    /// Returns `None` for URLs on other hosts or without an http(s) scheme.
    pub fn path_of<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.split(url).map(|(_, rest)| rest)
    }

    /// Returns true if the URL lies inside the crawl scope
    ///
    /// The host must be the target host or a subdomain of it, the remainder
    /// must start with the root path, and the URL must not carry a fragment.
    pub fn contains(&self, url: &str) -> bool {
        let Some((_, rest)) = self.split(url) else {
            return false;
        };
        if url.contains('#') {
            return false;
        }
        let scope_path = &self.scope[self.host_len..];
        rest.to_lowercase().starts_with(scope_path)
    }

    /// Splits an absolute same-host URL into host and remainder
    fn split<'a>(&self, url: &'a str) -> Option<(&'a str, &'a str)> {
        let after_scheme = strip_www(strip_scheme(url)?);
        let host_end = after_scheme.find('/').unwrap_or(after_scheme.len());
        let (host, rest) = after_scheme.split_at(host_end);

        let host_lower = host.to_lowercase();
        let target = self.host();
        let same_host = host_lower == target
            || (host_lower.len() > target.len()
                && host_lower.ends_with(target)
                && host_lower.as_bytes()[host_lower.len() - target.len() - 1] == b'.');

        if same_host {
            Some((host, rest))
        } else {
            None
        }
    }
}

/// Removes a leading `http://` or `https://`, ignoring case
pub(crate) fn strip_scheme(url: &str) -> Option<&str> {
    ["http://", "https://"].iter().find_map(|scheme| {
        url.get(..scheme.len())
            .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
            .map(|_| &url[scheme.len()..])
    })
}

/// Removes a leading `www.`, ignoring case
fn strip_www(host: &str) -> &str {
    match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    }
}
