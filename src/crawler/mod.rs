//! Crawl engine
//!
//! Fetching, link prioritization, and the per-seed crawl session.

mod fetcher;
mod links;
mod session;

pub use fetcher::{build_client, fetch_page, FetchOutcome};
pub use links::{collect_links, LinkBuckets};
pub use session::CrawlSession;
