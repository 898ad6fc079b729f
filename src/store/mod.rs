//! In-memory knowledge base and crawl-run statistics
//!
//! The knowledge base is a nested map from domain to pages to extracted
//! content. The reserved `_metadata` key carries run statistics and is
//! excluded from every domain iteration.

mod dedup;
mod output;

pub use dedup::remove_duplicate_paragraphs;
pub use output::{
    categories_path, generate_categories, save_categories, save_knowledge_base, Categories,
    CategoryEntry,
};

use crate::classify::is_content_type;
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;

/// Extracted structured text for a single page
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContentRecord {
    pub title: String,
    pub meta_description: String,
    /// Heading level ("h1".."h6") to heading texts in document order
    pub headings: BTreeMap<String, Vec<String>>,
    /// Paragraph texts in document order, intra-page duplicates removed
    pub paragraphs: Vec<String>,
    pub lists: Vec<ListRecord>,
    pub url: String,
}

/// An extracted list with its original element type
#[derive(Debug, Clone, Serialize)]
pub struct ListRecord {
    #[serde(rename = "type")]
    pub list_type: String,
    pub items: Vec<String>,
}

/// A stored page: its classification, content, and crawl position
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    #[serde(rename = "type")]
    pub page_type: String,
    pub content: ContentRecord,
    /// Link distance from the seed URL
    pub depth: u32,
    pub crawled_at: String,
}

/// Per-domain crawl statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainStats {
    pub pages_crawled: u32,
    pub by_type: BTreeMap<String, u32>,
}

/// Everything stored for one crawled domain
#[derive(Debug, Clone, Serialize)]
pub struct DomainRecord {
    pub base_url: String,
    pub pages: BTreeMap<String, PageRecord>,
    pub stats: DomainStats,
}

/// Session-level counters, kept distinct from the per-page error log
///
/// Robots denials and quota stops count as skips, never as errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub pages_crawled: u32,
    pub pages_skipped: u32,
    pub errors: u32,
}

/// One entry in the append-only error log
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEntry {
    pub url: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// Aggregate statistics embedded in the `_metadata` key
#[derive(Debug, Clone, Serialize)]
pub struct MetadataStats {
    pub total_domains: usize,
    pub total_pages: usize,
    pub pages_crawled: u32,
    pub pages_skipped: u32,
    pub errors: u32,
}

/// Crawl-run metadata, written once at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlMetadata {
    pub generator: String,
    pub generated_at: String,
    pub statistics: MetadataStats,
    /// First 100 error-log entries; the full log stays in memory only
    pub errors: Vec<ErrorEntry>,
}

/// The knowledge base: domain records plus optional run metadata
#[derive(Debug, Default, Serialize)]
pub struct KnowledgeBase {
    #[serde(flatten)]
    pub domains: BTreeMap<String, DomainRecord>,

    #[serde(rename = "_metadata", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CrawlMetadata>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the record for a domain, creating it if needed
    pub fn ensure_domain(&mut self, domain: &str, base_url: &str) -> &mut DomainRecord {
        self.domains
            .entry(domain.to_string())
            .or_insert_with(|| DomainRecord {
                base_url: base_url.to_string(),
                pages: BTreeMap::new(),
                stats: DomainStats::default(),
            })
    }

    /// Resets per-domain statistics when a seed for that domain starts a
    /// fresh crawl; pages from earlier runs are kept
    pub fn reset_domain_stats(&mut self, domain: &str) {
        if let Some(record) = self.domains.get_mut(domain) {
            record.stats = DomainStats::default();
        }
    }

    /// Stores a page and updates the domain statistics together
    ///
    /// The pages map and `by_type` are only ever touched here, keeping the
    /// type counts consistent with the stored pages.
    pub fn insert_page(&mut self, domain: &str, base_url: &str, url: &str, page: PageRecord) {
        let record = self.ensure_domain(domain, base_url);
        let page_type = page.page_type.clone();
        record.pages.insert(url.to_string(), page);
        record.stats.pages_crawled += 1;
        *record.stats.by_type.entry(page_type).or_insert(0) += 1;
    }

    /// Number of stored pages for a domain whose type is content-rich
    pub fn content_page_count(&self, domain: &str) -> usize {
        self.domains
            .get(domain)
            .map(|record| {
                record
                    .pages
                    .values()
                    .filter(|page| is_content_type(&page.page_type))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Total number of stored pages for a domain
    pub fn total_page_count(&self, domain: &str) -> usize {
        self.domains
            .get(domain)
            .map(|record| record.pages.len())
            .unwrap_or(0)
    }

    /// Domain quota predicate
    ///
    /// False once the domain holds `max_content_pages` content-rich pages,
    /// or three times that many pages in total (the hard ceiling when
    /// content is sparse). True for domains not seen yet.
    pub fn should_continue(&self, domain: &str, max_content_pages: u32) -> bool {
        let Some(record) = self.domains.get(domain) else {
            return true;
        };

        let content_pages = record
            .pages
            .values()
            .filter(|page| is_content_type(&page.page_type))
            .count();
        if content_pages >= max_content_pages as usize {
            return false;
        }

        if record.pages.len() >= max_content_pages as usize * 3 {
            return false;
        }

        true
    }

    /// Builds and attaches the `_metadata` record
    pub fn set_metadata(&mut self, stats: &RunStats, errors: &[ErrorEntry]) {
        let total_pages = self.domains.values().map(|d| d.pages.len()).sum();
        self.metadata = Some(CrawlMetadata {
            generator: "kb-harvest".to_string(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            statistics: MetadataStats {
                total_domains: self.domains.len(),
                total_pages,
                pages_crawled: stats.pages_crawled,
                pages_skipped: stats.pages_skipped,
                errors: stats.errors,
            },
            errors: errors.iter().take(100).cloned().collect(),
        });
    }
}

/// Formats the current time the way page records store it
pub fn timestamp_now() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn page(page_type: &str) -> PageRecord {
        PageRecord {
            page_type: page_type.to_string(),
            content: ContentRecord::default(),
            depth: 0,
            crawled_at: timestamp_now(),
        }
    }

    #[test]
    fn test_unseen_domain_continues() {
        let kb = KnowledgeBase::new();
        assert!(kb.should_continue("example.org", 5));
    }

    #[test]
    fn test_quota_stops_at_content_limit() {
        let mut kb = KnowledgeBase::new();
        for i in 0..2 {
            kb.insert_page(
                "example.org",
                "https://example.org",
                &format!("https://example.org/blog/{}", i),
                page("article"),
            );
        }
        assert!(!kb.should_continue("example.org", 2));
        assert!(kb.should_continue("example.org", 3));
    }

    #[test]
    fn test_hard_ceiling_at_three_times_quota() {
        let mut kb = KnowledgeBase::new();
        // 6 non-content pages against a quota of 2: hard ceiling reached
        for i in 0..6 {
            kb.insert_page(
                "example.org",
                "https://example.org",
                &format!("https://example.org/other/{}", i),
                page("other"),
            );
        }
        assert_eq!(kb.content_page_count("example.org"), 0);
        assert!(!kb.should_continue("example.org", 2));
    }

    #[test]
    fn test_by_type_consistent_with_pages() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/blog/a",
            page("article"),
        );
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/faq",
            page("faq"),
        );
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/blog/b",
            page("article"),
        );

        let record = kb.domains.get("example.org").unwrap();
        assert_eq!(record.stats.pages_crawled, 3);
        assert_eq!(record.stats.by_type.get("article"), Some(&2));
        assert_eq!(record.stats.by_type.get("faq"), Some(&1));
        assert_eq!(record.pages.len(), 3);
    }

    #[test]
    fn test_insert_same_url_does_not_duplicate_key() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/blog/a",
            page("article"),
        );
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/blog/a",
            page("article"),
        );
        assert_eq!(kb.total_page_count("example.org"), 1);
    }

    #[test]
    fn test_reset_domain_stats_keeps_pages() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/blog/a",
            page("article"),
        );
        kb.reset_domain_stats("example.org");

        let record = kb.domains.get("example.org").unwrap();
        assert_eq!(record.stats.pages_crawled, 0);
        assert!(record.stats.by_type.is_empty());
        assert_eq!(record.pages.len(), 1);
    }

    #[test]
    fn test_metadata_counts_and_error_cap() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/blog/a",
            page("article"),
        );

        let stats = RunStats {
            pages_crawled: 1,
            pages_skipped: 5,
            errors: 3,
        };
        let errors: Vec<ErrorEntry> = (0..150)
            .map(|i| ErrorEntry {
                url: format!("https://example.org/{}", i),
                error: "Status code 500".to_string(),
                status_code: Some(500),
            })
            .collect();

        kb.set_metadata(&stats, &errors);
        let metadata = kb.metadata.as_ref().unwrap();
        assert_eq!(metadata.statistics.total_domains, 1);
        assert_eq!(metadata.statistics.total_pages, 1);
        assert_eq!(metadata.statistics.pages_skipped, 5);
        assert_eq!(metadata.statistics.errors, 3);
        assert_eq!(metadata.errors.len(), 100);
    }

    #[test]
    fn test_metadata_not_serialized_until_set() {
        let kb = KnowledgeBase::new();
        let json = serde_json::to_string(&kb).unwrap();
        assert!(!json.contains("_metadata"));
    }
}
