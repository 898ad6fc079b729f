//! kb-harvest main entry point
//!
//! Command-line interface for the knowledge base generator.

use clap::Parser;
use kb_harvest::config::{load_rules_with_builtin, CrawlConfig, DEFAULT_SEEDS};
use kb_harvest::crawler::CrawlSession;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// kb-harvest: a knowledge base generator for content sites
///
/// Crawls a set of content-publishing websites, classifies and extracts
/// structured text from content-rich pages, and writes the results as a
/// JSON knowledge base plus a categorical index.
#[derive(Parser, Debug)]
#[command(name = "kb-harvest")]
#[command(version)]
#[command(about = "Build a JSON knowledge base from content websites", long_about = None)]
struct Cli {
    /// Output file for the knowledge base JSON
    #[arg(short, long, value_name = "FILE", default_value = "knowledge_base.json")]
    output: String,

    /// Maximum content-rich pages to store per domain
    #[arg(short, long, value_name = "N", default_value_t = 50)]
    max_pages: u32,

    /// Delay between requests in seconds
    #[arg(short, long, value_name = "SECS", default_value_t = 2.0)]
    delay: f64,

    /// Consult robots.txt before fetching
    #[arg(short, long)]
    respect_robots: bool,

    /// Store every fetched page, not just content-rich ones
    #[arg(short, long)]
    all_pages: bool,

    /// Seed URLs to crawl instead of the built-in site list
    #[arg(short, long, value_name = "URL", num_args = 1..)]
    sites: Vec<String>,

    /// TOML file with site rules overriding the built-in table
    #[arg(long, value_name = "FILE")]
    site_rules: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let seeds = if cli.sites.is_empty() {
        DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect()
    } else {
        cli.sites.clone()
    };

    let config = CrawlConfig {
        output_path: cli.output,
        max_content_pages: cli.max_pages,
        delay_secs: cli.delay,
        respect_robots: cli.respect_robots,
        content_only: !cli.all_pages,
        seeds,
    };

    let rules = load_rules_with_builtin(cli.site_rules.as_deref())?;

    tracing::info!(
        seeds = config.seeds.len(),
        max_content_pages = config.max_content_pages,
        output = %config.output_path,
        "starting kb-harvest"
    );

    let started = Instant::now();
    let session = CrawlSession::new(config, rules)?;
    let kb = session.run().await?;

    let elapsed = started.elapsed();
    if let Some(metadata) = &kb.metadata {
        tracing::info!(
            domains = metadata.statistics.total_domains,
            pages = metadata.statistics.total_pages,
            skipped = metadata.statistics.pages_skipped,
            errors = metadata.statistics.errors,
            elapsed_secs = elapsed.as_secs(),
            "run complete"
        );
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kb_harvest=info,warn"),
            1 => EnvFilter::new("kb_harvest=debug,info"),
            2 => EnvFilter::new("kb_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
