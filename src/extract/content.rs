//! Structured text extraction
//!
//! Turns a parsed page into a [`ContentRecord`]: title, meta description,
//! headings by level, filtered paragraphs, and non-navigational lists. All
//! structural extraction is scoped to the main-content container.

use crate::config::SiteRule;
use crate::extract::container::{remove_noise, select_container};
use crate::store::{ContentRecord, ListRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Site-name markers truncated from page titles
const TITLE_MARKERS: &[&str] = &[" - AARP", " | WebMD", " | Mayo Clinic", " | NIH", " | CDC"];

const NAV_HEADING_PATTERN: &str = r"^(menu|navigation|search|related|popular|more)$";
const BOILERPLATE_PATTERN: &str = r"(login|sign in|subscribe|newsletter|privacy policy|terms)";
const LEAVING_PATTERN: &str = r"^(you are now leaving|already a member)";
const LIST_BOILERPLATE_PATTERN: &str = r"(login|sign in|subscribe|newsletter)";
const PLACEHOLDER_PATTERN: &str = r"%\{[^}]+\}%";

const NAV_ANCESTOR_TAGS: &[&str] = &["nav", "header", "footer", "aside"];

/// Extracts structured text from a page
///
/// Noise elements are detached from the chosen container before any text
/// is read, so callers that keep using the document afterwards see it
/// without the removed chrome.
pub fn extract(document: &mut Html, url: &str, rule: Option<&SiteRule>) -> ContentRecord {
    let mut content = ContentRecord {
        url: url.to_string(),
        ..ContentRecord::default()
    };

    content.title = extract_title(document);
    content.meta_description = extract_meta_description(document);

    let container_id = select_container(document, rule);
    if let Some(id) = container_id {
        remove_noise(document, id);
    }

    let Some(container) = container_id
        .and_then(|id| document.tree.get(id))
        .and_then(ElementRef::wrap)
    else {
        return content;
    };

    extract_headings(&container, &mut content);
    extract_paragraphs(&container, &mut content);
    extract_lists(&container, &mut content);

    content
}

/// Page title with any known site-name marker and what follows it removed
fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    let Some(title_el) = document.select(&selector).next() else {
        return String::new();
    };

    let mut title = title_el.text().collect::<String>().trim().to_string();
    for marker in TITLE_MARKERS {
        if let Some(index) = title.find(marker) {
            title.truncate(index);
            title = title.trim().to_string();
        }
    }
    title
}

fn extract_meta_description(document: &Html) -> String {
    let Ok(selector) = Selector::parse("meta[name='description']") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

/// Collects h1..h6 texts, dropping short or pure-navigation labels
///
/// A level appears in the map only when at least one heading survives.
fn extract_headings(container: &ElementRef, content: &mut ContentRecord) {
    let Ok(nav_re) = Regex::new(NAV_HEADING_PATTERN) else {
        return;
    };

    for level in 1..=6 {
        let Ok(selector) = Selector::parse(&format!("h{}", level)) else {
            continue;
        };

        let headings: Vec<String> = container
            .select(&selector)
            .map(|h| h.text().collect::<String>().trim().to_string())
            .filter(|text| text.len() > 3 && !nav_re.is_match(&text.to_lowercase()))
            .collect();

        if !headings.is_empty() {
            content.headings.insert(format!("h{}", level), headings);
        }
    }
}

/// Collects paragraph texts in document order
///
/// Short texts, template placeholders, and login/subscription boilerplate
/// are dropped. Duplicates within the page are removed here, keyed on the
/// trimmed lowercased text; duplicates across pages are left for the
/// knowledge-base-wide pass.
fn extract_paragraphs(container: &ElementRef, content: &mut ContentRecord) {
    let Ok(selector) = Selector::parse("p") else {
        return;
    };
    let (Ok(boilerplate_re), Ok(leaving_re), Ok(placeholder_re)) = (
        Regex::new(BOILERPLATE_PATTERN),
        Regex::new(LEAVING_PATTERN),
        Regex::new(PLACEHOLDER_PATTERN),
    ) else {
        return;
    };

    let mut seen: HashSet<String> = HashSet::new();

    for paragraph in container.select(&selector) {
        let text = paragraph.text().collect::<String>().trim().to_string();
        let lower = text.to_lowercase();

        if text.len() <= 20
            || text.contains("%{")
            || boilerplate_re.is_match(&lower)
            || leaving_re.is_match(&lower)
        {
            continue;
        }

        let cleaned = placeholder_re
            .replace_all(&text, "")
            .replace("ARTICLE CONTINUES AFTER ADVERTISEMENT", "")
            .trim()
            .to_string();
        if cleaned.is_empty() {
            continue;
        }

        if seen.insert(cleaned.to_lowercase()) {
            content.paragraphs.push(cleaned);
        }
    }
}

/// Collects ul/ol lists that are not navigation menus
///
/// Lists under a navigational ancestor or carrying a menu/nav class are
/// skipped. A surviving list is kept only when at least one item reaches
/// 20 characters, which filters out link menus the class check missed.
fn extract_lists(container: &ElementRef, content: &mut ContentRecord) {
    let (Ok(item_selector), Ok(boilerplate_re), Ok(placeholder_re)) = (
        Selector::parse("li"),
        Regex::new(LIST_BOILERPLATE_PATTERN),
        Regex::new(PLACEHOLDER_PATTERN),
    ) else {
        return;
    };

    for list_type in ["ul", "ol"] {
        let Ok(selector) = Selector::parse(list_type) else {
            continue;
        };

        for list_el in container.select(&selector) {
            if has_nav_ancestor(&list_el) || is_menu_list(&list_el) {
                continue;
            }

            let items: Vec<String> = list_el
                .select(&item_selector)
                .filter_map(|item| {
                    let text = item.text().collect::<String>().trim().to_string();
                    if text.len() <= 5
                        || text.contains("%{")
                        || boilerplate_re.is_match(&text.to_lowercase())
                    {
                        return None;
                    }

                    let cleaned = placeholder_re.replace_all(&text, "").trim().to_string();
                    (!cleaned.is_empty()).then_some(cleaned)
                })
                .collect();

            if !items.is_empty() && !items.iter().all(|item| item.len() < 20) {
                content.lists.push(ListRecord {
                    list_type: list_type.to_string(),
                    items,
                });
            }
        }
    }
}

fn has_nav_ancestor(element: &ElementRef) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| NAV_ANCESTOR_TAGS.contains(&ancestor.value().name()))
}

fn is_menu_list(element: &ElementRef) -> bool {
    element.value().classes().any(|class| {
        let lower = class.to_lowercase();
        lower.contains("menu") || lower.contains("nav")
    })
}
