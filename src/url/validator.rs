use crate::url::{CrawlTarget, PathCategory, PathRules};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Images, stylesheets and scripts, optionally followed by a query string
static STATIC_ASSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(ico|png|jpg|gif|css|js)(\?.*)?$").expect("static asset pattern is valid")
});

/// Two scheme-prefixed URLs glued together by a broken extraction
static SCHEME_INJECTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://.*https?://").expect("injection pattern is valid"));

/// Why a candidate URL was left out of the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    StaticAsset,
    Disabled,
    Query,
    SchemeInjection,
    OutOfScope,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::Empty => "empty",
            Self::StaticAsset => "static asset",
            Self::Disabled => "disabled path",
            Self::Query => "query string",
            Self::SchemeInjection => "scheme injection",
            Self::OutOfScope => "out of scope",
        };
        f.write_str(reason)
    }
}

/// Decides whether discovered links belong to the crawl
#[derive(Debug, Clone)]
pub struct UrlValidator {
    target: CrawlTarget,
    rules: PathRules,
    allow_query: bool,
}

impl UrlValidator {
    pub fn new(target: CrawlTarget, rules: PathRules, allow_query: bool) -> Self {
        Self {
            target,
            rules,
            allow_query,
        }
    }

    pub fn target(&self) -> &CrawlTarget {
        &self.target
    }

    pub fn rules(&self) -> &PathRules {
        &self.rules
    }

    /// Returns true if the absolute URL should be counted and crawled
    pub fn is_in_scope(&self, url: &str) -> bool {
        self.check(url).is_ok()
    }

    /// Runs every filter in order and reports the first one that fails
    pub fn check(&self, url: &str) -> Result<(), Rejection> {
        if url.is_empty() {
            return Err(Rejection::Empty);
        }

        if STATIC_ASSET.is_match(url) {
            return Err(Rejection::StaticAsset);
        }

        let path = self.target.path_of(url);

        if let Some(path) = path {
            if self.rules.matches(PathCategory::Disabled, path) {
                return Err(Rejection::Disabled);
            }

            if !self.allow_query && path.contains('?') {
                return Err(Rejection::Query);
            }
        }

        if SCHEME_INJECTION.is_match(url) {
            return Err(Rejection::SchemeInjection);
        }

        if !self.target.contains(url) {
            return Err(Rejection::OutOfScope);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;

    fn validator(allow_query: bool) -> UrlValidator {
        let rules = PathRules::compile(&PathsConfig {
            disabled: vec!["/admin".to_string(), "./private".to_string()],
            ..PathsConfig::default()
        });
        UrlValidator::new(
            CrawlTarget::new("http://example.com/").unwrap(),
            rules,
            allow_query,
        )
    }

    #[test]
    fn test_accepts_same_host_page() {
        assert!(validator(false).is_in_scope("http://example.com/about"));
        assert!(validator(false).is_in_scope("http://www.example.com/about"));
        assert!(validator(false).is_in_scope("http://shop.example.com/cart"));
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validator(false).check(""), Err(Rejection::Empty));
    }

    #[test]
    fn test_rejects_static_assets() {
        let v = validator(true);
        for url in [
            "http://example.com/favicon.ico",
            "http://example.com/logo.PNG",
            "http://example.com/photo.jpg?size=2",
            "http://example.com/anim.gif",
            "http://example.com/site.css",
            "http://example.com/app.js?v=3",
        ] {
            assert_eq!(v.check(url), Err(Rejection::StaticAsset), "{}", url);
        }
        assert!(v.is_in_scope("http://example.com/page.json"));
        assert!(v.is_in_scope("http://example.com/report.pdf"));
    }

    #[test]
    fn test_rejects_disabled_paths() {
        let v = validator(false);
        assert_eq!(
            v.check("http://example.com/admin/users"),
            Err(Rejection::Disabled)
        );
        assert_eq!(
            v.check("http://example.com/PRIVATE/notes"),
            Err(Rejection::Disabled)
        );
        assert!(v.is_in_scope("http://example.com/public"));
    }

    #[test]
    fn test_rejects_query_when_disabled() {
        assert_eq!(
            validator(false).check("http://example.com/search?q=1"),
            Err(Rejection::Query)
        );
        assert!(validator(true).is_in_scope("http://example.com/search?q=1"));
    }

    #[test]
    fn test_query_on_other_host_is_out_of_scope() {
        assert_eq!(
            validator(false).check("http://evil.com/search?q=1"),
            Err(Rejection::OutOfScope)
        );
    }

    #[test]
    fn test_rejects_scheme_injection() {
        assert_eq!(
            validator(false).check("http://example.com/http://example.com/page"),
            Err(Rejection::SchemeInjection)
        );
        assert_eq!(
            validator(false).check("http://example.com/https://evil.com/"),
            Err(Rejection::SchemeInjection)
        );
    }

    #[test]
    fn test_rejects_other_host() {
        assert_eq!(
            validator(false).check("http://evil.com/page"),
            Err(Rejection::OutOfScope)
        );
        assert_eq!(
            validator(false).check("mailto:admin@example.com"),
            Err(Rejection::OutOfScope)
        );
    }
}
