//! Main-content container selection and noise removal
//!
//! Extraction quality depends on scoping to the right subtree. Site rules
//! name the container selectors for known domains; everything else falls
//! through a generic chain of common content markers down to `<body>`.

use crate::config::SiteRule;
use ego_tree::NodeId;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Element names removed from the container before extraction
const NOISE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "iframe",
];

const NOISE_CLASS_PATTERN: &str = r"(?i)(nav|menu|sidebar|banner|ad|share|comment|footer|promo)";

const CONTENT_MARKER_PATTERN: &str = r"(?i)(content|main|article|post)";

/// Picks the main-content container for a page
///
/// Site-rule selectors are tried first, in order. The generic fallback
/// chain then runs: `<article>`, an element whose id matches a content
/// marker, one whose class does, `<main>`, `[role=main]`,
/// `[itemprop=articleBody]`, and finally `<body>`.
pub fn select_container(document: &Html, rule: Option<&SiteRule>) -> Option<NodeId> {
    if let Some(rule) = rule {
        for selector_str in &rule.content_selectors {
            if let Some(id) = first_match(document, selector_str) {
                return Some(id);
            }
        }
    }

    if let Some(id) = first_match(document, "article") {
        return Some(id);
    }

    if let Ok(re) = Regex::new(CONTENT_MARKER_PATTERN) {
        if let Some(id) = first_element(document, |el| {
            el.value().id().map_or(false, |id| re.is_match(id))
        }) {
            return Some(id);
        }

        if let Some(id) = first_element(document, |el| {
            el.value().classes().any(|class| re.is_match(class))
        }) {
            return Some(id);
        }
    }

    for selector_str in ["main", "[role='main']", "[itemprop='articleBody']", "body"] {
        if let Some(id) = first_match(document, selector_str) {
            return Some(id);
        }
    }

    None
}

fn first_match(document: &Html, selector_str: &str) -> Option<NodeId> {
    let selector = Selector::parse(selector_str).ok()?;
    document.select(&selector).next().map(|el| el.id())
}

fn first_element(document: &Html, predicate: impl Fn(&ElementRef) -> bool) -> Option<NodeId> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| predicate(el))
        .map(|el| el.id())
}

/// Detaches noise elements inside the container subtree
///
/// Removes navigation chrome, class-marked ad/share/sidebar blocks, and
/// non-content tags. The container element itself is never removed.
pub fn remove_noise(document: &mut Html, container: NodeId) {
    let Ok(class_re) = Regex::new(NOISE_CLASS_PATTERN) else {
        return;
    };

    let noise_ids: Vec<NodeId> = match document.tree.get(container) {
        Some(node) => node
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .filter(|el| {
                NOISE_TAGS.contains(&el.value().name())
                    || el.value().classes().any(|class| class_re.is_match(class))
            })
            .map(|el| el.id())
            .collect(),
        None => return,
    };

    for id in noise_ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
