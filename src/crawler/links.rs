//! Link collection and prioritization
//!
//! Splits a page's internal links into a priority list and an others list
//! using only the URL text. The rule table supplies per-site path
//! patterns; domains without a rule fall back to generic content
//! keywords.

use crate::config::SiteRule;
use crate::url::{is_internal_link, normalize};
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Keywords marking likely-content links on domains without a site rule
const GENERIC_CONTENT_KEYWORDS: &[&str] = &["article", "post", "blog", "news", "resource"];

/// Internal links from one page, split by crawl priority
#[derive(Debug, Default)]
pub struct LinkBuckets {
    pub priority: Vec<String>,
    pub other: Vec<String>,
}

/// Collects and partitions the internal links of a page
///
/// Relative links resolve against `page_url`. Empty, `javascript:`,
/// `mailto:`, and `tel:` links are dropped, as are links already visited
/// and links leaving `base_domain`. Duplicate hrefs on the page survive
/// here; the visited set catches them at crawl time.
pub fn collect_links(
    document: &Html,
    page_url: &str,
    base_domain: &str,
    rule: Option<&SiteRule>,
    visited: &HashSet<String>,
) -> LinkBuckets {
    let mut buckets = LinkBuckets::default();

    let Ok(selector) = Selector::parse("a[href]") else {
        return buckets;
    };

    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        if href.is_empty()
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            continue;
        }

        let Ok(next_url) = normalize(href, page_url) else {
            continue;
        };

        if visited.contains(&next_url) {
            continue;
        }

        if !is_internal_link(&next_url, base_domain) {
            continue;
        }

        route_link(&mut buckets, next_url, rule);
    }

    buckets
}

fn route_link(buckets: &mut LinkBuckets, url: String, rule: Option<&SiteRule>) {
    let lower = url.to_lowercase();

    match rule {
        Some(rule) => {
            let matches = rule
                .link_priority_patterns
                .iter()
                .any(|pattern| lower.contains(pattern.as_str()));

            if matches {
                if rule.priority_prepend {
                    buckets.priority.insert(0, url);
                } else {
                    buckets.priority.push(url);
                }
            } else {
                buckets.other.push(url);
            }
        }
        None => {
            if GENERIC_CONTENT_KEYWORDS
                .iter()
                .any(|keyword| lower.contains(keyword))
            {
                buckets.priority.push(url);
            } else {
                buckets.other.push(url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://www.example.org/section/page";

    fn collect(html: &str, rule: Option<&SiteRule>) -> LinkBuckets {
        let document = Html::parse_document(html);
        collect_links(&document, PAGE, "www.example.org", rule, &HashSet::new())
    }

    fn rule(patterns: &[&str], prepend: bool) -> SiteRule {
        SiteRule {
            link_priority_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            priority_prepend: prepend,
            ..SiteRule::default()
        }
    }

    #[test]
    fn test_skips_non_navigable_schemes() {
        let buckets = collect(
            "<html><body>\
             <a href='javascript:void(0)'>x</a>\
             <a href='mailto:a@example.org'>m</a>\
             <a href='tel:+1234567'>t</a>\
             <a href=' '>blank</a>\
             <a href='/page'>ok</a>\
             </body></html>",
            None,
        );
        assert_eq!(buckets.priority.len() + buckets.other.len(), 1);
    }

    #[test]
    fn test_relative_links_resolved_against_page() {
        let buckets = collect("<html><body><a href='sibling'>s</a></body></html>", None);
        assert_eq!(
            buckets.other,
            vec!["https://www.example.org/section/sibling"]
        );
    }

    #[test]
    fn test_external_links_dropped() {
        let buckets = collect(
            "<html><body><a href='https://other.org/article/x'>ext</a></body></html>",
            None,
        );
        assert!(buckets.priority.is_empty());
        assert!(buckets.other.is_empty());
    }

    #[test]
    fn test_www_mismatch_is_internal() {
        let buckets = collect(
            "<html><body><a href='https://example.org/page'>bare</a></body></html>",
            None,
        );
        assert_eq!(buckets.other.len(), 1);
    }

    #[test]
    fn test_visited_links_dropped() {
        let document =
            Html::parse_document("<html><body><a href='/seen'>s</a><a href='/new'>n</a></body></html>");
        let visited: HashSet<String> =
            ["https://www.example.org/seen".to_string()].into_iter().collect();
        let buckets = collect_links(&document, PAGE, "www.example.org", None, &visited);
        assert_eq!(buckets.other, vec!["https://www.example.org/new"]);
    }

    #[test]
    fn test_generic_keywords_prioritized() {
        let buckets = collect(
            "<html><body>\
             <a href='/blog/entry'>b</a>\
             <a href='/pricing'>p</a>\
             <a href='/resources/kit'>r</a>\
             </body></html>",
            None,
        );
        assert_eq!(buckets.priority.len(), 2);
        assert_eq!(buckets.other, vec!["https://www.example.org/pricing"]);
    }

    #[test]
    fn test_rule_patterns_prioritized_in_order() {
        let site_rule = rule(&["/caregiving/"], false);
        let buckets = collect(
            "<html><body>\
             <a href='/caregiving/basics'>a</a>\
             <a href='/travel/deals'>b</a>\
             <a href='/caregiving/advanced'>c</a>\
             </body></html>",
            Some(&site_rule),
        );
        assert_eq!(
            buckets.priority,
            vec![
                "https://www.example.org/caregiving/basics",
                "https://www.example.org/caregiving/advanced"
            ]
        );
        assert_eq!(buckets.other, vec!["https://www.example.org/travel/deals"]);
    }

    #[test]
    fn test_prepend_rule_reverses_match_order() {
        let site_rule = rule(&["/toolbox/"], true);
        let buckets = collect(
            "<html><body>\
             <a href='/toolbox/first'>a</a>\
             <a href='/toolbox/second'>b</a>\
             </body></html>",
            Some(&site_rule),
        );
        assert_eq!(
            buckets.priority,
            vec![
                "https://www.example.org/toolbox/second",
                "https://www.example.org/toolbox/first"
            ]
        );
    }

    #[test]
    fn test_rule_match_is_case_insensitive() {
        let site_rule = rule(&["/guide/"], false);
        let buckets = collect(
            "<html><body><a href='/Guide/Topic'>g</a></body></html>",
            Some(&site_rule),
        );
        assert_eq!(buckets.priority.len(), 1);
    }

    #[test]
    fn test_rule_suppresses_generic_keywords() {
        // A domain with a rule uses only its own patterns
        let site_rule = rule(&["/caregiving/"], false);
        let buckets = collect(
            "<html><body><a href='/blog/entry'>b</a></body></html>",
            Some(&site_rule),
        );
        assert!(buckets.priority.is_empty());
        assert_eq!(buckets.other.len(), 1);
    }
}
