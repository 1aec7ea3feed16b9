//! Sitemap XML generation
//!
//! Produces a sitemaps.org 0.9 `urlset` with one `url` element per entry:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <changefreq>always</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use crate::output::{OutputError, OutputResult};
use crate::priority::ResultRecord;
use quick_xml::escape::escape;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Writes classified URLs to a sitemap file
#[derive(Debug, Clone)]
pub struct SitemapWriter {
    path: PathBuf,
}

impl SitemapWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Changes the output path; an empty path keeps the current one
    pub fn with_output(mut self, path: &str) -> Self {
        if !path.is_empty() {
            self.path = PathBuf::from(path);
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renders the sitemap document
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The XML document
    /// * `Err(OutputError::NoData)` - `entries` is empty
    pub fn render(&self, entries: &[(String, ResultRecord)]) -> OutputResult<String> {
        if entries.is_empty() {
            return Err(OutputError::NoData);
        }

        let mut xml = String::with_capacity(128 + entries.len() * 128);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));

        for (url, record) in entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape(url.as_str())));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                record.change_freq
            ));
            xml.push_str(&format!("    <priority>{}</priority>\n", record.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    /// Renders the sitemap and writes it to the output path
    ///
    /// # Arguments
    ///
    /// * `entries` - Classified URLs, in output order
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The sitemap was written to [`SitemapWriter::path`]
    /// * `Err(OutputError)` - Empty input, empty path, or the write failed
    pub fn write(&self, entries: &[(String, ResultRecord)]) -> OutputResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(OutputError::EmptyPath);
        }

        let xml = self.render(entries)?;

        let mut file = File::create(&self.path)?;
        file.write_all(xml.as_bytes())?;

        tracing::info!(
            "Wrote {} URLs to {}",
            entries.len(),
            self.path.display()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;

    fn entries() -> Vec<(String, ResultRecord)> {
        vec![
            (
                "http://example.com/".to_string(),
                ResultRecord::new(Priority::ONE),
            ),
            (
                "http://example.com/search?q=a&page=2".to_string(),
                ResultRecord::new(Priority::HALF),
            ),
        ]
    }

    #[test]
    fn test_render_escapes_loc() {
        let entries = vec![(
            r#"http://example.com/a&b<c>d"e'f"#.to_string(),
            ResultRecord::new(Priority::HALF),
        )];
        let xml = SitemapWriter::new("unused.xml").render(&entries).unwrap();
        assert!(xml.contains("<loc>http://example.com/a&amp;b&lt;c&gt;d&quot;e&apos;f</loc>"));
    }

    #[test]
    fn test_render() {
        let xml = SitemapWriter::new("unused.xml").render(&entries()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains(&format!("<urlset xmlns=\"{}\">", SITEMAP_NAMESPACE)));
        assert!(xml.contains("<loc>http://example.com/</loc>"));
        assert!(xml.contains("<loc>http://example.com/search?q=a&amp;page=2</loc>"));
        assert!(xml.contains("<changefreq>always</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>0.5</priority>"));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_render_keeps_order() {
        let xml = SitemapWriter::new("unused.xml").render(&entries()).unwrap();
        let root = xml.find("<loc>http://example.com/</loc>").unwrap();
        let search = xml.find("search?q=a").unwrap();
        assert!(root < search);
    }

    #[test]
    fn test_empty_input_fails() {
        let result = SitemapWriter::new("unused.xml").render(&[]);
        assert!(matches!(result, Err(OutputError::NoData)));
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");

        let writer = SitemapWriter::new(&path);
        writer.write(&entries()).unwrap();
        assert_eq!(writer.path(), path.as_path());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<loc>http://example.com/</loc>"));
    }

    #[test]
    fn test_write_empty_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sitemap.xml");

        let writer = SitemapWriter::new(&path);
        assert!(matches!(writer.write(&[]), Err(OutputError::NoData)));
        assert!(!path.exists());
    }

    #[test]
    fn test_with_output_ignores_empty() {
        let writer = SitemapWriter::new("a.xml").with_output("");
        assert_eq!(writer.path(), Path::new("a.xml"));
        let writer = writer.with_output("b.xml");
        assert_eq!(writer.path(), Path::new("b.xml"));
    }

    #[test]
    fn test_empty_path_fails() {
        let writer = SitemapWriter::new("");
        assert!(matches!(writer.write(&entries()), Err(OutputError::EmptyPath)));
    }
}
