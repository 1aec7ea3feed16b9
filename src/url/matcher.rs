use crate::config::PathsConfig;

/// A compiled set of path fragments
///
/// A path matches when any fragment occurs as a substring of it, compared
/// case-insensitively. Fragments are stored lowercased with a leading `./`
/// and then a leading `/` removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatcher {
    fragments: Vec<String>,
}

impl PathMatcher {
    /// Compiles a list of path fragments into a matcher
    ///
    /// Returns `None` when nothing is left after dropping blank fragments,
    /// so an empty category never matches anything.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_ripple::url::PathMatcher;
    ///
    /// let matcher = PathMatcher::compile(["/blog", "./News"]).unwrap();
    /// assert!(matcher.matches("/blog/post1"));
    /// assert!(matcher.matches("/en/news/today"));
    /// assert!(!matcher.matches("/about"));
    ///
    /// assert!(PathMatcher::compile(["", "  "]).is_none());
    /// ```
    pub fn compile<I, S>(fragments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fragments: Vec<String> = fragments
            .into_iter()
            .filter_map(|fragment| normalize_fragment(fragment.as_ref()))
            .collect();

        if fragments.is_empty() {
            None
        } else {
            Some(Self { fragments })
        }
    }

    /// Tests the path portion of a URL (everything after the host)
    pub fn matches(&self, path: &str) -> bool {
        let path = path.to_lowercase();
        self.fragments
            .iter()
            .any(|fragment| path.contains(fragment.as_str()))
    }

    /// Returns the normalized fragments
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }
}

/// Strips `./` then `/` from the front of a fragment; blanks yield `None`
fn normalize_fragment(fragment: &str) -> Option<String> {
    let fragment = fragment.trim();
    let fragment = fragment.strip_prefix("./").unwrap_or(fragment);
    let fragment = fragment.strip_prefix('/').unwrap_or(fragment);

    if fragment.is_empty() {
        None
    } else {
        Some(fragment.to_lowercase())
    }
}

/// Path fragment categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathCategory {
    /// Never crawled
    Disabled,
    /// Always priority 1
    Primary,
    /// At least priority 0.5
    Normal,
    /// Always priority 0
    Secondary,
}

/// The four compiled path categories of a crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathRules {
    pub disabled: Option<PathMatcher>,
    pub primary: Option<PathMatcher>,
    pub normal: Option<PathMatcher>,
    pub secondary: Option<PathMatcher>,
}

impl PathRules {
    /// Compiles every category from the configuration
    pub fn compile(config: &PathsConfig) -> Self {
        Self {
            disabled: PathMatcher::compile(&config.disabled),
            primary: PathMatcher::compile(&config.primary),
            normal: PathMatcher::compile(&config.normal),
            secondary: PathMatcher::compile(&config.secondary),
        }
    }

    /// Returns the matcher of a category, if any fragments were configured
    pub fn get(&self, category: PathCategory) -> Option<&PathMatcher> {
        match category {
            PathCategory::Disabled => self.disabled.as_ref(),
            PathCategory::Primary => self.primary.as_ref(),
            PathCategory::Normal => self.normal.as_ref(),
            PathCategory::Secondary => self.secondary.as_ref(),
        }
    }

    /// Tests a path against one category; empty categories never match
    pub fn matches(&self, category: PathCategory, path: &str) -> bool {
        self.get(category)
            .map(|matcher| matcher.matches(path))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_empty_returns_none() {
        let empty: Vec<String> = vec![];
        assert!(PathMatcher::compile(empty).is_none());
        assert!(PathMatcher::compile(["", " "]).is_none());
    }

    #[test]
    fn test_slash_only_fragment_is_ignored() {
        // "/" would otherwise match every path
        assert!(PathMatcher::compile(["/", "./"]).is_none());
    }

    #[test]
    fn test_leading_prefixes_stripped() {
        let matcher = PathMatcher::compile(["./docs", "/blog", "news"]).unwrap();
        assert_eq!(matcher.fragments(), &["docs", "blog", "news"]);
    }

    #[test]
    fn test_substring_match() {
        let matcher = PathMatcher::compile(["/blog"]).unwrap();
        assert!(matcher.matches("/blog"));
        assert!(matcher.matches("/blog/post1"));
        assert!(matcher.matches("/en/blog/post1"));
        assert!(!matcher.matches("/about"));
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = PathMatcher::compile(["/Archive"]).unwrap();
        assert!(matcher.matches("/ARCHIVE/old"));
        assert!(matcher.matches("/archive/old"));
    }

    #[test]
    fn test_fragment_is_literal() {
        let matcher = PathMatcher::compile(["/a.b(c"]).unwrap();
        assert!(matcher.matches("/a.b(c/page"));
        assert!(!matcher.matches("/axb(c/page"));
    }

    #[test]
    fn test_rules_empty_category_never_matches() {
        let rules = PathRules::compile(&PathsConfig {
            disabled: vec![],
            primary: vec!["/blog".to_string()],
            normal: vec![],
            secondary: vec!["/archive".to_string()],
        });

        assert!(rules.matches(PathCategory::Primary, "/blog/post1"));
        assert!(rules.matches(PathCategory::Secondary, "/archive/old"));
        assert!(!rules.matches(PathCategory::Disabled, "/blog/post1"));
        assert!(!rules.matches(PathCategory::Normal, "/anything"));
    }
}
