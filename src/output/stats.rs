//! Statistics over classified sitemap entries

use crate::priority::{ChangeFreq, ResultRecord};
use std::fmt;

/// Summary of a classified result set
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapStatistics {
    /// Number of URLs in the sitemap
    pub total_urls: usize,

    /// URL count per change frequency, most frequent first; zero counts omitted
    pub by_change_freq: Vec<(ChangeFreq, usize)>,

    /// Mean priority over all URLs (0 when empty)
    pub mean_priority: f64,
}

impl SitemapStatistics {
    pub fn from_records(entries: &[(String, ResultRecord)]) -> Self {
        let by_change_freq = ChangeFreq::all()
            .into_iter()
            .map(|freq| {
                let count = entries
                    .iter()
                    .filter(|(_, record)| record.change_freq == freq)
                    .count();
                (freq, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();

        let mean_priority = if entries.is_empty() {
            0.0
        } else {
            let sum: f64 = entries
                .iter()
                .map(|(_, record)| record.priority.as_f64())
                .sum();
            sum / entries.len() as f64
        };

        Self {
            total_urls: entries.len(),
            by_change_freq,
            mean_priority,
        }
    }

    /// Logs the statistics at info level
    pub fn log(&self) {
        tracing::info!(
            "Sitemap contains {} URLs, mean priority {:.2}",
            self.total_urls,
            self.mean_priority
        );
        for (freq, count) in &self.by_change_freq {
            tracing::info!("  {}: {}", freq, count);
        }
    }
}

impl fmt::Display for SitemapStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Sitemap Statistics ===")?;
        writeln!(f, "  Total URLs: {}", self.total_urls)?;
        writeln!(f, "  Mean priority: {:.2}", self.mean_priority)?;
        for (freq, count) in &self.by_change_freq {
            let percentage = (*count as f64 / self.total_urls as f64) * 100.0;
            writeln!(f, "  {}: {} ({:.1}%)", freq, count, percentage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;

    fn entry(url: &str, priority: f64) -> (String, ResultRecord) {
        (url.to_string(), ResultRecord::new(Priority::from_f64(priority)))
    }

    #[test]
    fn test_counts_and_mean() {
        let stats = SitemapStatistics::from_records(&[
            entry("http://example.com/", 1.0),
            entry("http://example.com/a", 0.5),
            entry("http://example.com/b", 0.5),
            entry("http://example.com/c", 0.0),
        ]);

        assert_eq!(stats.total_urls, 4);
        assert_eq!(
            stats.by_change_freq,
            vec![
                (ChangeFreq::Always, 1),
                (ChangeFreq::Weekly, 2),
                (ChangeFreq::Never, 1)
            ]
        );
        assert!((stats.mean_priority - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty() {
        let stats = SitemapStatistics::from_records(&[]);
        assert_eq!(stats.total_urls, 0);
        assert!(stats.by_change_freq.is_empty());
        assert_eq!(stats.mean_priority, 0.0);
    }

    #[test]
    fn test_display() {
        let stats = SitemapStatistics::from_records(&[entry("http://example.com/", 1.0)]);
        let text = stats.to_string();
        assert!(text.contains("Total URLs: 1"));
        assert!(text.contains("always: 1 (100.0%)"));
    }
}
