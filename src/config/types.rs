use crate::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use url::Url;

/// Runtime configuration for a crawl session
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Path of the knowledge base JSON output file
    pub output_path: String,

    /// Maximum number of content-rich pages to store per domain
    pub max_content_pages: u32,

    /// Delay between requests in seconds
    pub delay_secs: f64,

    /// Whether to consult robots.txt before fetching
    pub respect_robots: bool,

    /// Whether to store only content-rich pages (plus homepages)
    pub content_only: bool,

    /// Seed URLs, one crawl per seed
    pub seeds: Vec<String>,
}

impl CrawlConfig {
    /// Validates the configuration before a crawl starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_path.is_empty() {
            return Err(ConfigError::Validation(
                "output path cannot be empty".to_string(),
            ));
        }

        if self.max_content_pages < 1 {
            return Err(ConfigError::Validation(format!(
                "max_content_pages must be >= 1, got {}",
                self.max_content_pages
            )));
        }

        if self.delay_secs < 0.0 {
            return Err(ConfigError::Validation(format!(
                "delay must be >= 0 seconds, got {}",
                self.delay_secs
            )));
        }

        if self.seeds.is_empty() {
            return Err(ConfigError::Validation(
                "at least one seed URL is required".to_string(),
            ));
        }

        for seed in &self.seeds {
            let url = Url::parse(seed)
                .map_err(|e| ConfigError::InvalidSeed(format!("'{}': {}", seed, e)))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::InvalidSeed(format!(
                    "'{}': only http and https seeds are supported",
                    seed
                )));
            }
        }

        Ok(())
    }
}

/// Query-parameter policy applied when canonicalizing URLs for a site
///
/// The generic policy drops a fixed deny-list of tracking parameters and
/// keeps everything else. Sites that mint duplicate URLs through their query
/// strings override it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryPolicy {
    /// Drop known tracking parameters, keep the rest
    #[default]
    Generic,
    /// Drop every query parameter unconditionally
    StripAll,
    /// Keep only the named parameters (e.g. pagination), drop the rest
    KeepOnly(Vec<String>),
}

/// Declarative per-site crawl rules
///
/// One entry replaces what would otherwise be domain-specific branching in
/// the canonicalizer, the content extractor, and the link prioritizer.
/// Adding support for a new site is a table edit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SiteRule {
    /// How to treat query parameters for this site
    #[serde(default)]
    pub query_policy: QueryPolicy,

    /// CSS selectors tried in order to locate the main content container
    #[serde(default)]
    pub content_selectors: Vec<String>,

    /// Path substrings that mark an internal link as likely content
    #[serde(default)]
    pub link_priority_patterns: Vec<String>,

    /// Insert matching links at the front of the priority list instead of
    /// appending, giving them strict precedence
    #[serde(default)]
    pub priority_prepend: bool,
}

/// The full site rule table, keyed by host name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteRules {
    #[serde(default)]
    pub sites: BTreeMap<String, SiteRule>,
}

impl SiteRules {
    /// Looks up the rule for a host, if one is defined
    pub fn get(&self, domain: &str) -> Option<&SiteRule> {
        self.sites.get(domain)
    }

    /// Merges another rule table over this one
    ///
    /// Entries in `other` replace entries for the same host.
    pub fn merge(&mut self, other: SiteRules) {
        for (domain, rule) in other.sites {
            self.sites.insert(domain, rule);
        }
    }
}
