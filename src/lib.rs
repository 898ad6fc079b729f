//! kb-harvest: a knowledge-base generator for content-publishing sites
//!
//! This crate crawls a fixed set of content sites, classifies each page,
//! extracts structured text from content-rich pages, and assembles the
//! results into a JSON knowledge base bounded by per-domain quotas.

pub mod classify;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod robots;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for kb-harvest operations
///
/// Per-page failures during a crawl are not errors at this level: they are
/// appended to the session error log and the crawl continues. Only faults
/// that abort the whole run (configuration, output writing) surface here.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to serialize knowledge base: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: String,
        source: std::io::Error,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read site rules file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for kb-harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlConfig, QueryPolicy, SiteRule, SiteRules};
pub use store::{ContentRecord, DomainRecord, KnowledgeBase, PageRecord};
