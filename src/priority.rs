//! Priority and change frequency classification
//!
//! Runs once over a [`CompletedCrawl`]. A page's priority comes from its link
//! ratio `log10(incoming / outgoing)`, overridden by the primary, normal and
//! secondary path categories. The ratio is not normalized by the number of
//! pages, so a crawl cut short by a visit limit scores pages by whatever links
//! had been counted when it stopped.

use crate::config::AdditionalEntry;
use crate::state::CompletedCrawl;
use crate::url::{PathCategory, UrlValidator};
use std::collections::HashSet;
use std::fmt;

/// A sitemap priority in whole tenths, `0..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u8);

impl Priority {
    pub const ZERO: Priority = Priority(0);
    pub const HALF: Priority = Priority(5);
    pub const ONE: Priority = Priority(10);

    /// Clamps `value` to `[0, 1]` and rounds it half away from zero to one decimal
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        let tenths = (value.clamp(0.0, 1.0) * 10.0).round();
        Self(tenths as u8)
    }

    /// Returns the priority in tenths
    pub fn tenths(&self) -> u8 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0) / 10.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

/// Sitemap `changefreq` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Maps a priority to a change frequency; the first matching threshold wins
    ///
    /// | Priority | Frequency |
    /// |----------|-----------|
    /// | 1.0 | always |
    /// | ≥ 0.8 | hourly |
    /// | ≥ 0.6 | daily |
    /// | ≥ 0.5 | weekly |
    /// | ≥ 0.3 | monthly |
    /// | > 0 | yearly |
    /// | 0 | never |
    pub fn from_priority(priority: Priority) -> Self {
        match priority.tenths() {
            10.. => Self::Always,
            8..=9 => Self::Hourly,
            6..=7 => Self::Daily,
            5 => Self::Weekly,
            3..=4 => Self::Monthly,
            1..=2 => Self::Yearly,
            0 => Self::Never,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }

    /// All values, most frequent first
    pub fn all() -> [ChangeFreq; 7] {
        [
            Self::Always,
            Self::Hourly,
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
            Self::Yearly,
            Self::Never,
        ]
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final score of one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRecord {
    pub change_freq: ChangeFreq,
    pub priority: Priority,
}

impl ResultRecord {
    pub fn new(priority: Priority) -> Self {
        Self {
            change_freq: ChangeFreq::from_priority(priority),
            priority,
        }
    }
}

/// Scores every discovered URL and merges the additional entries
///
/// Additional entries are only added for URLs the crawl did not find; they
/// never override an organic score. The result is sorted by descending
/// priority, keeping discovery order on ties.
pub fn classify(crawl: &CompletedCrawl, additional: &[AdditionalEntry]) -> Vec<(String, ResultRecord)> {
    let validator = crawl.validator();
    let root = validator.target().root();

    let mut results: Vec<(String, ResultRecord)> = crawl
        .nodes()
        .into_iter()
        .map(|(url, node)| {
            let priority = if url == root {
                Priority::ONE
            } else {
                score(validator, &url, node.incoming, node.outgoing)
            };
            (url, ResultRecord::new(priority))
        })
        .collect();

    let mut seen: HashSet<String> = results.iter().map(|(url, _)| url.clone()).collect();
    for (url, record) in additional_records(validator, additional) {
        if seen.insert(url.clone()) {
            results.push((url, record));
        }
    }

    results.sort_by(|(_, a), (_, b)| b.priority.cmp(&a.priority));
    results
}

/// Validates additional entries and turns them into result records
///
/// Entries failing URL validation are dropped with a warning.
pub fn additional_records(
    validator: &UrlValidator,
    additional: &[AdditionalEntry],
) -> Vec<(String, ResultRecord)> {
    additional
        .iter()
        .filter_map(|entry| match validator.check(&entry.url) {
            Ok(()) => Some((
                entry.url.clone(),
                ResultRecord::new(Priority::from_f64(entry.priority)),
            )),
            Err(reason) => {
                tracing::warn!("Ignoring additional URL {} ({})", entry.url, reason);
                None
            }
        })
        .collect()
}

fn score(validator: &UrlValidator, url: &str, incoming: u64, outgoing: u64) -> Priority {
    let path = validator.target().path_of(url).unwrap_or_default();
    let rules = validator.rules();

    if rules.matches(PathCategory::Primary, path) {
        return Priority::ONE;
    }
    if rules.matches(PathCategory::Secondary, path) {
        return Priority::ZERO;
    }

    let raw = (incoming as f64 / outgoing.max(1) as f64).log10();
    if raw < 0.5 && rules.matches(PathCategory::Normal, path) {
        return Priority::HALF;
    }

    Priority::from_f64(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use crate::state::CrawlState;
    use crate::url::{CrawlTarget, PathRules};

    const ROOT: &str = "http://example.com/";

    fn validator() -> UrlValidator {
        let rules = PathRules::compile(&PathsConfig {
            disabled: vec![],
            primary: vec!["/blog".to_string()],
            normal: vec!["/docs".to_string()],
            secondary: vec!["/archive".to_string()],
        });
        UrlValidator::new(CrawlTarget::new(ROOT).unwrap(), rules, false)
    }

    /// Builds a finished crawl from `(source, target)` link pairs
    fn crawl(links: &[(&str, &str)]) -> CompletedCrawl {
        let mut state = CrawlState::new(validator());
        for (source, target) in links {
            state.record(source, target);
        }
        state.finish()
    }

    fn record_of<'a>(results: &'a [(String, ResultRecord)], url: &str) -> &'a ResultRecord {
        &results
            .iter()
            .find(|(u, _)| u == url)
            .unwrap_or_else(|| panic!("{} not classified", url))
            .1
    }

    #[test]
    fn test_priority_rounding() {
        assert_eq!(Priority::from_f64(0.04), Priority(0));
        assert_eq!(Priority::from_f64(0.05), Priority(1));
        assert_eq!(Priority::from_f64(0.449), Priority(4));
        assert_eq!(Priority::from_f64(0.45), Priority(5));
        assert_eq!(Priority::from_f64(-3.0), Priority::ZERO);
        assert_eq!(Priority::from_f64(7.0), Priority::ONE);
        assert_eq!(Priority::from_f64(f64::NEG_INFINITY), Priority::ZERO);
        assert_eq!(Priority::from_f64(f64::NAN), Priority::ZERO);
    }

    #[test]
    fn test_priority_display() {
        assert_eq!(Priority::ONE.to_string(), "1.0");
        assert_eq!(Priority::HALF.to_string(), "0.5");
        assert_eq!(Priority::ZERO.to_string(), "0.0");
        assert_eq!(Priority::from_f64(0.3).as_f64(), 0.3);
    }

    #[test]
    fn test_frequency_table() {
        let expected = [
            (0, "never"),
            (1, "yearly"),
            (2, "yearly"),
            (3, "monthly"),
            (4, "monthly"),
            (5, "weekly"),
            (6, "daily"),
            (7, "daily"),
            (8, "hourly"),
            (9, "hourly"),
            (10, "always"),
        ];
        for (tenths, freq) in expected {
            assert_eq!(ChangeFreq::from_priority(Priority(tenths)).as_str(), freq);
        }
    }

    #[test]
    fn test_priority_is_multiple_of_tenth_in_range() {
        for incoming in 0..40u64 {
            for outgoing in 0..40u64 {
                let p = score(&validator(), "http://example.com/page", incoming, outgoing);
                assert!(p.tenths() <= 10);
                let scaled = p.as_f64() * 10.0;
                assert!((scaled - scaled.round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_root_is_always_top_priority() {
        let results = classify(&crawl(&[]), &[]);
        assert_eq!(results.len(), 1);
        assert_eq!(record_of(&results, ROOT).priority, Priority::ONE);
        assert_eq!(record_of(&results, ROOT).change_freq, ChangeFreq::Always);
    }

    #[test]
    fn test_primary_and_secondary_paths() {
        let results = classify(
            &crawl(&[
                (ROOT, "http://example.com/blog/post1"),
                (ROOT, "http://example.com/archive/old"),
            ]),
            &[],
        );

        let blog = record_of(&results, "http://example.com/blog/post1");
        assert_eq!(blog.priority, Priority::ONE);
        assert_eq!(blog.change_freq, ChangeFreq::Always);

        let archive = record_of(&results, "http://example.com/archive/old");
        assert_eq!(archive.priority, Priority::ZERO);
        assert_eq!(archive.change_freq, ChangeFreq::Never);
    }

    #[test]
    fn test_ratio_of_ten_is_top_priority() {
        let p = score(&validator(), "http://example.com/popular", 10, 1);
        assert_eq!(p, Priority::ONE);
        assert_eq!(ChangeFreq::from_priority(p), ChangeFreq::Always);
    }

    #[test]
    fn test_zero_outgoing_counts_as_one() {
        assert_eq!(
            score(&validator(), "http://example.com/leaf", 3, 0),
            score(&validator(), "http://example.com/leaf", 3, 1)
        );
        // log10(3) = 0.477
        assert_eq!(score(&validator(), "http://example.com/leaf", 3, 0), Priority(5));
    }

    #[test]
    fn test_normal_path_floor() {
        // log10(1) = 0, raised to 0.5 on a normal path
        assert_eq!(score(&validator(), "http://example.com/docs/intro", 1, 1), Priority::HALF);
        assert_eq!(score(&validator(), "http://example.com/other", 1, 1), Priority::ZERO);
        // Above the floor the ratio wins
        assert_eq!(score(&validator(), "http://example.com/docs/hub", 5, 1), Priority(7));
    }

    #[test]
    fn test_additional_entries_never_override() {
        let additional = vec![
            AdditionalEntry {
                url: "http://example.com/archive/old".to_string(),
                priority: 0.9,
            },
            AdditionalEntry {
                url: "http://example.com/hidden".to_string(),
                priority: 0.44,
            },
        ];
        let results = classify(&crawl(&[(ROOT, "http://example.com/archive/old")]), &additional);

        assert_eq!(results.len(), 3);
        assert_eq!(
            record_of(&results, "http://example.com/archive/old").priority,
            Priority::ZERO
        );
        let hidden = record_of(&results, "http://example.com/hidden");
        assert_eq!(hidden.priority, Priority(4));
        assert_eq!(hidden.change_freq, ChangeFreq::Monthly);
    }

    #[test]
    fn test_invalid_additional_entries_are_dropped() {
        let additional = vec![
            AdditionalEntry {
                url: "http://evil.com/page".to_string(),
                priority: 0.7,
            },
            AdditionalEntry {
                url: "http://example.com/search?q=1".to_string(),
                priority: 0.7,
            },
        ];
        assert!(additional_records(&validator(), &additional).is_empty());
    }

    #[test]
    fn test_sorted_descending_stable_on_ties() {
        let results = classify(
            &crawl(&[
                (ROOT, "http://example.com/z"),
                (ROOT, "http://example.com/blog/a"),
                (ROOT, "http://example.com/a"),
            ]),
            &[],
        );

        let urls: Vec<&str> = results.iter().map(|(u, _)| u.as_str()).collect();
        // Root outgoing is 3, so both plain pages score log10(1/1) = 0
        assert_eq!(
            urls,
            vec![
                ROOT,
                "http://example.com/blog/a",
                "http://example.com/z",
                "http://example.com/a"
            ]
        );
        for pair in results.windows(2) {
            assert!(pair[0].1.priority >= pair[1].1.priority);
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let finished = crawl(&[
            (ROOT, "http://example.com/a"),
            ("http://example.com/a", "http://example.com/b"),
            ("http://example.com/b", "http://example.com/a"),
        ]);
        assert_eq!(classify(&finished, &[]), classify(&finished, &[]));
    }

    #[test]
    fn test_ratio_depends_on_counted_links() {
        // The same page scores differently depending on how many of its
        // referrers were visited before the crawl stopped.
        let partial = crawl(&[(ROOT, "http://example.com/hub")]);
        let full = crawl(&[
            (ROOT, "http://example.com/hub"),
            ("http://example.com/a", "http://example.com/hub"),
            ("http://example.com/b", "http://example.com/hub"),
            ("http://example.com/c", "http://example.com/hub"),
        ]);

        let partial = classify(&partial, &[]);
        let full = classify(&full, &[]);
        assert_eq!(record_of(&partial, "http://example.com/hub").priority, Priority::ZERO);
        assert_eq!(record_of(&full, "http://example.com/hub").priority, Priority(6));
    }
}
