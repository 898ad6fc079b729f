//! Configuration module for kb-harvest
//!
//! Runtime knobs (`CrawlConfig`) come from the command line; the declarative
//! per-site rule table (`SiteRules`) ships with built-in defaults and can be
//! extended from a TOML file.

mod rules;
mod types;

pub use rules::{builtin_rules, load_rules, load_rules_with_builtin};
pub use types::{CrawlConfig, QueryPolicy, SiteRule, SiteRules};

/// The default seed list: the content sites this tool was built for
pub const DEFAULT_SEEDS: &[&str] = &[
    "https://www.caregiveraction.org/toolbox/",
    "https://www.asaging.org/",
    "https://www.webmd.com/",
    "https://www.relias.com/",
    "https://www.aarp.org/caregiving/",
    "https://www.nia.nih.gov/",
    "https://www.alz.org/",
    "https://www.ncoa.org/",
    "https://www.seniorliving.org/",
];
