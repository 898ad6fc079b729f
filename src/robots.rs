//! robots.txt checking
//!
//! Off by default. When enabled, each domain's robots.txt is fetched once
//! and cached for the rest of the run. An unreachable or unparseable
//! robots.txt allows the crawl, so a misconfigured server never blocks a
//! whole domain.

use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use tracing::{debug, warn};
use url::Url;

/// Per-run robots.txt gate with a per-domain cache
pub struct RobotsGate {
    enabled: bool,
    /// Domain to robots.txt body; `None` records a failed fetch
    cache: HashMap<String, Option<String>>,
}

impl RobotsGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            cache: HashMap::new(),
        }
    }

    /// Whether the `*` agent may fetch `url`
    ///
    /// Always true when the gate is disabled or the URL has no usable host.
    pub async fn is_allowed(&mut self, client: &Client, url: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let Some(domain) = crate::url::extract_domain(url) else {
            return true;
        };

        if !self.cache.contains_key(&domain) {
            let body = fetch_robots(client, url).await;
            self.cache.insert(domain.clone(), body);
        }

        match self.cache.get(&domain).and_then(|body| body.as_ref()) {
            Some(body) => {
                let mut matcher = DefaultMatcher::default();
                let allowed = matcher.one_agent_allowed_by_robots(body, "*", url);
                if !allowed {
                    debug!(url, "disallowed by robots.txt");
                }
                allowed
            }
            None => true,
        }
    }
}

async fn fetch_robots(client: &Client, url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let robots_url = match parsed.port() {
        Some(port) => format!("{}://{}:{}/robots.txt", parsed.scheme(), host, port),
        None => format!("{}://{}/robots.txt", parsed.scheme(), host),
    };

    match client.get(&robots_url).send().await {
        Ok(response) if response.status().is_success() => response.text().await.ok(),
        Ok(response) => {
            debug!(url = robots_url, status = %response.status(), "robots.txt not available");
            None
        }
        Err(error) => {
            warn!(url = robots_url, %error, "failed to fetch robots.txt");
            None
        }
    }
}
