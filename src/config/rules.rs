//! Built-in site rule table and TOML rule loading
//!
//! The built-in table captures what site analysis found for each supported
//! site: where its main content lives, which internal paths lead to content,
//! and how its query strings behave. A TOML file can extend or override it.

use crate::config::types::{QueryPolicy, SiteRule, SiteRules};
use crate::ConfigError;
use std::path::Path;

fn rule(
    query_policy: QueryPolicy,
    content_selectors: &[&str],
    link_priority_patterns: &[&str],
    priority_prepend: bool,
) -> SiteRule {
    SiteRule {
        query_policy,
        content_selectors: content_selectors.iter().map(|s| s.to_string()).collect(),
        link_priority_patterns: link_priority_patterns
            .iter()
            .map(|s| s.to_string())
            .collect(),
        priority_prepend,
    }
}

/// Returns the built-in rule table for the supported sites
pub fn builtin_rules() -> SiteRules {
    let mut rules = SiteRules::default();

    rules.sites.insert(
        "www.caregiveraction.org".to_string(),
        rule(
            QueryPolicy::Generic,
            &["#main", "#content"],
            &[
                "/toolbox/",
                "/corporate-partners/",
                "/caregiver-story/",
                "/guide/",
                "/blueprint-",
                "/hipaa-",
                "/stroke",
                "/traumatic-brain-injury/",
                "/ptsd/",
                "/lighting-your-way/",
            ],
            true,
        ),
    );

    rules.sites.insert(
        "www.asaging.org".to_string(),
        // Nearly every internal link on this site is content; "/" matches all
        rule(
            QueryPolicy::Generic,
            &[".content .block-content", ".content .content-full"],
            &["/"],
            false,
        ),
    );

    rules.sites.insert(
        "www.webmd.com".to_string(),
        // Pagination lives in the "pg" parameter; everything else duplicates
        rule(
            QueryPolicy::KeepOnly(vec!["pg".to_string()]),
            &["#global-main", ".resp-2-col-rr", ".article.medref"],
            &["/a-to-z-guides/", "/diet/news/", "/guide/"],
            false,
        ),
    );

    rules.sites.insert(
        "www.aarp.org".to_string(),
        rule(
            QueryPolicy::Generic,
            &[".uxdia-o-article-rail", ".container .responsivegrid"],
            &["/caregiving/"],
            false,
        ),
    );

    rules.sites.insert(
        "www.nia.nih.gov".to_string(),
        rule(
            QueryPolicy::Generic,
            &[".main-content .clearfix", "#main-content"],
            &["/research/"],
            false,
        ),
    );

    rules.sites.insert(
        "www.alz.org".to_string(),
        // Query parameters on this site only produce duplicate pages
        rule(
            QueryPolicy::StripAll,
            &[".tab-content", "#content"],
            &["/blog/", "/help-support/"],
            false,
        ),
    );

    rules.sites.insert(
        "www.ncoa.org".to_string(),
        rule(
            QueryPolicy::Generic,
            &["#content", ".styles_container__HFOo5"],
            &["/older-adults/", "/caregivers/"],
            false,
        ),
    );

    rules.sites.insert(
        "www.seniorliving.org".to_string(),
        rule(
            QueryPolicy::Generic,
            &[".main-content"],
            &["/care/", "/health/", "/finance/"],
            false,
        ),
    );

    rules
}

/// Loads a site rule table from a TOML file
pub fn load_rules(path: &Path) -> Result<SiteRules, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let rules: SiteRules = toml::from_str(&content)?;
    Ok(rules)
}

/// Returns the built-in rules merged with an optional override file
pub fn load_rules_with_builtin(path: Option<&Path>) -> Result<SiteRules, ConfigError> {
    let mut rules = builtin_rules();
    if let Some(path) = path {
        rules.merge(load_rules(path)?);
    }
    Ok(rules)
}
