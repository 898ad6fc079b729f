//! Content-richness filtering
//!
//! Decides whether a classified page is worth extracting. Known content
//! types pass immediately, deny types never pass, and everything else is
//! judged by document density when a parsed page is available.

use crate::classify::page_type::{has_dense_text, AVOID_PAGE_TYPES, CONTENT_PAGE_TYPES};
use scraper::{Html, Selector};

/// Returns true when the page type is in the fixed content-type set
pub fn is_content_type(page_type: &str) -> bool {
    let lower = page_type.to_lowercase();
    CONTENT_PAGE_TYPES.contains(&lower.as_str())
}

/// Returns true when the page type is in the deny set
pub fn is_avoid_type(page_type: &str) -> bool {
    let lower = page_type.to_lowercase();
    AVOID_PAGE_TYPES.contains(&lower.as_str())
}

/// Decides whether a page is likely to contain valuable content
///
/// Content types are rich, deny types are not. For anything else the
/// document shape decides: dense paragraph text or more than two lists.
/// Without a document, only the homepage passes.
pub fn is_content_rich(page_type: &str, document: Option<&Html>) -> bool {
    if is_content_type(page_type) {
        return true;
    }

    if is_avoid_type(page_type) {
        return false;
    }

    if let Some(doc) = document {
        if has_dense_text(doc) {
            return true;
        }

        if count_lists(doc) > 2 {
            return true;
        }
    }

    page_type == "homepage"
}

fn count_lists(document: &Html) -> usize {
    Selector::parse("ul, ol")
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}
