//! Crawl session
//!
//! One session owns everything a run needs: the configuration, the site
//! rule table, the HTTP client, the robots gate, the visited set, the
//! knowledge base under construction, and the run counters. Each seed is
//! crawled depth-first off an explicit work stack; per-page faults are
//! logged and never abort the run.

use crate::classify::{classify, is_avoid_type, is_content_rich, is_content_type};
use crate::config::{CrawlConfig, SiteRules};
use crate::crawler::fetcher::{build_client, fetch_page, FetchOutcome};
use crate::crawler::links::collect_links;
use crate::extract::extract;
use crate::robots::RobotsGate;
use crate::store::{
    remove_duplicate_paragraphs, save_categories, save_knowledge_base, timestamp_now, ErrorEntry,
    KnowledgeBase, PageRecord, RunStats,
};
use crate::url::{clean, extract_domain};
use crate::Result;
use reqwest::Client;
use scraper::Html;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// A unit of pending work: a URL and its link distance from the seed
type Task = (String, u32);

pub struct CrawlSession {
    config: CrawlConfig,
    rules: SiteRules,
    client: Client,
    robots: RobotsGate,
    kb: KnowledgeBase,
    visited: HashSet<String>,
    errors: Vec<ErrorEntry>,
    stats: RunStats,
}

impl CrawlSession {
    /// Creates a session, validating the configuration and building the
    /// shared HTTP client
    pub fn new(config: CrawlConfig, rules: SiteRules) -> Result<Self> {
        config.validate()?;
        let client = build_client()?;
        let robots = RobotsGate::new(config.respect_robots);

        Ok(Self {
            config,
            rules,
            client,
            robots,
            kb: KnowledgeBase::new(),
            visited: HashSet::new(),
            errors: Vec::new(),
            stats: RunStats::default(),
        })
    }

    /// Runs the whole pipeline: every seed, the cross-page dedup pass,
    /// metadata, and both output files
    ///
    /// Only output writing can fail the run; everything upstream degrades
    /// to log entries and counters.
    pub async fn run(mut self) -> Result<KnowledgeBase> {
        let seeds = self.config.seeds.clone();
        for seed in &seeds {
            self.crawl_seed(seed).await;
        }

        let removed = remove_duplicate_paragraphs(&mut self.kb);
        info!(removed, "cross-page paragraph dedup complete");

        self.kb.set_metadata(&self.stats, &self.errors);

        save_knowledge_base(&self.kb, &self.config.output_path)?;
        save_categories(&self.kb, &self.config.output_path)?;

        info!(
            pages_crawled = self.stats.pages_crawled,
            pages_skipped = self.stats.pages_skipped,
            errors = self.stats.errors,
            "crawl run finished"
        );

        Ok(self.kb)
    }

    /// Crawls one seed depth-first until its domain quota or link frontier
    /// is exhausted
    async fn crawl_seed(&mut self, seed: &str) {
        let mut seed_url = seed.to_string();
        if !seed_url.ends_with('/') {
            seed_url.push('/');
        }

        let (base_url, base_domain) = match seed_base(&seed_url) {
            Some(parts) => parts,
            None => {
                warn!(seed, "skipping unusable seed URL");
                return;
            }
        };

        info!(seed = %seed_url, domain = %base_domain, "starting crawl");
        self.kb.reset_domain_stats(&base_domain);

        let mut tasks: Vec<Task> = vec![(seed_url, 0)];
        while let Some((url, depth)) = tasks.pop() {
            self.process_task(&url, depth, &base_url, &base_domain, &mut tasks)
                .await;
        }

        let content_pages = self.kb.content_page_count(&base_domain);
        info!(
            domain = %base_domain,
            pages = self.kb.total_page_count(&base_domain),
            content_pages,
            quota = self.config.max_content_pages,
            "seed crawl finished"
        );
    }

    /// Processes a single task through the full per-page pipeline
    async fn process_task(
        &mut self,
        url: &str,
        depth: u32,
        base_url: &str,
        base_domain: &str,
        tasks: &mut Vec<Task>,
    ) {
        let url = match clean(url, &self.rules) {
            Ok(url) => url,
            Err(error) => {
                self.record_error(url, &error.to_string(), None);
                return;
            }
        };

        if self.visited.contains(&url) {
            return;
        }

        if !self.kb.should_continue(base_domain, self.config.max_content_pages) {
            debug!(url, domain = base_domain, "skipping, domain quota reached");
            self.stats.pages_skipped += 1;
            return;
        }

        if !self.robots.is_allowed(&self.client, &url).await {
            info!(url, "skipping, disallowed by robots.txt");
            self.stats.pages_skipped += 1;
            return;
        }

        self.visited.insert(url.clone());

        if self.config.delay_secs > 0.0 {
            tokio::time::sleep(Duration::from_secs_f64(self.config.delay_secs)).await;
        }

        let body = match fetch_page(&self.client, &url, base_url).await {
            FetchOutcome::Html { body } => body,
            FetchOutcome::HttpStatus { status } => {
                self.record_error(&url, &format!("Status code {}", status), Some(status));
                return;
            }
            FetchOutcome::NotHtml { content_type } => {
                debug!(url, content_type, "skipping non-HTML content");
                self.stats.pages_skipped += 1;
                return;
            }
            FetchOutcome::Network { error } => {
                self.record_error(&url, &error, None);
                return;
            }
        };

        let mut document = Html::parse_document(&body);
        let page_type = classify(&url, base_url, Some(&document));

        // Deny types are never stored, whatever the content-only setting
        if is_avoid_type(&page_type) {
            debug!(url, page_type, "skipping deny-listed page type");
            self.stats.pages_skipped += 1;
            return;
        }

        if self.config.content_only && !is_content_rich(&page_type, Some(&document)) {
            debug!(url, page_type, "skipping, not content-rich");
            self.stats.pages_skipped += 1;
            return;
        }

        let rule = self.rules.get(base_domain);
        let content = extract(&mut document, &url, rule);

        // The quota can fill between the task-entry check and here
        if !self.kb.should_continue(base_domain, self.config.max_content_pages) {
            self.stats.pages_skipped += 1;
            return;
        }

        let record = PageRecord {
            page_type: page_type.clone(),
            content,
            depth,
            crawled_at: timestamp_now(),
        };
        self.kb.insert_page(base_domain, base_url, &url, record);
        self.stats.pages_crawled += 1;

        if is_content_type(&page_type) {
            info!(
                url,
                page_type,
                content_pages = self.kb.content_page_count(base_domain),
                quota = self.config.max_content_pages,
                "stored content page"
            );
        } else {
            info!(url, page_type, "stored page");
        }

        if !self.kb.should_continue(base_domain, self.config.max_content_pages) {
            info!(domain = base_domain, "domain quota reached, not expanding links");
            return;
        }

        let buckets = collect_links(&document, &url, base_domain, rule, &self.visited);

        // Stack order: others below, priority on top in reverse, so the
        // first priority link is crawled next and its own links before
        // the second priority link
        let next_depth = depth + 1;
        for link in buckets.other.into_iter().rev() {
            tasks.push((link, next_depth));
        }
        for link in buckets.priority.into_iter().rev() {
            tasks.push((link, next_depth));
        }
    }

    fn record_error(&mut self, url: &str, message: &str, status_code: Option<u16>) {
        warn!(url, error = message, "page failed");
        self.errors.push(ErrorEntry {
            url: url.to_string(),
            error: message.to_string(),
            status_code,
        });
        self.stats.errors += 1;
    }
}

/// Derives the site base URL and the quota domain from a seed URL
///
/// The base URL keeps any explicit port; the quota domain is the bare
/// host, matching what [`extract_domain`] yields for discovered links.
fn seed_base(seed_url: &str) -> Option<(String, String)> {
    let parsed = Url::parse(seed_url).ok()?;
    let domain = extract_domain(seed_url)?;
    let base_url = match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), domain, port),
        None => format!("{}://{}", parsed.scheme(), domain),
    };
    Some((base_url, domain))
}
