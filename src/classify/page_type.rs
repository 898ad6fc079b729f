//! URL- and content-based page type classification
//!
//! A page gets a single string label. The URL shape decides first; document
//! structure is only consulted when a parsed page is in hand.

use regex::Regex;
use scraper::{Html, Selector};

/// Page types considered content-rich
pub const CONTENT_PAGE_TYPES: &[&str] = &[
    "article",
    "blog",
    "news",
    "resource",
    "guide",
    "faq",
    "research",
    "publication",
    "study",
    "report",
];

/// Page types to avoid storing or traversing into
///
/// Order matters: the first matching term becomes the page type.
pub const AVOID_PAGE_TYPES: &[&str] = &[
    "login",
    "register",
    "signup",
    "signin",
    "account",
    "cart",
    "checkout",
    "contact",
    "about",
    "team",
    "privacy",
    "terms",
    "policy",
    "legal",
    "copyright",
    "search",
];

/// Ordered URL-pattern checks for content categories; first match wins
const CONTENT_PATTERNS: &[(&str, &str)] = &[
    (r"(?i)(article|post|blog)s?/", "article"),
    (r"(?i)(news|press|release)s?/", "news"),
    (r"(?i)(resource|guide|handbook|help)s?/", "resource"),
    (r"(?i)(faq|question|answer)s?/?", "faq"),
    (r"(?i)(research|publication|study|report)s?/", "research"),
];

/// Classifies a page from its URL shape and, optionally, its content
///
/// Decision order:
/// 1. Empty path relative to the site base → `"homepage"`
/// 2. Whole-word deny-list term in the path → that term
/// 3. Ordered content-category patterns → the category
/// 4. Document heuristics (dense text, article markers) → `"article"`
/// 5. First path segment, or `"other"`
///
/// Classification is deterministic for a given `(url, base_url, document)`.
pub fn classify(url: &str, base_url: &str, document: Option<&Html>) -> String {
    let path = url
        .strip_prefix(base_url)
        .unwrap_or(url)
        .trim_matches('/')
        .to_string();

    if path.is_empty() {
        return "homepage".to_string();
    }

    let lower_path = path.to_lowercase();
    for term in AVOID_PAGE_TYPES {
        if word_matches(term, &lower_path) {
            return (*term).to_string();
        }
    }

    for (pattern, label) in CONTENT_PATTERNS {
        if regex_matches(pattern, &path) {
            return (*label).to_string();
        }
    }

    if let Some(doc) = document {
        if looks_like_article(doc) {
            return "article".to_string();
        }
    }

    match path.split('/').find(|segment| !segment.is_empty()) {
        Some(segment) => segment.to_string(),
        None => "other".to_string(),
    }
}

/// Whole-word match for a deny-list term, tolerating a plural `s`
fn word_matches(term: &str, path: &str) -> bool {
    regex_matches(&format!(r"\b{}s?\b", term), path)
}

fn regex_matches(pattern: &str, text: &str) -> bool {
    Regex::new(pattern).map_or(false, |re| re.is_match(text))
}

/// Document-shape heuristics that mark a page as an article
fn looks_like_article(document: &Html) -> bool {
    if has_dense_text(document) {
        return true;
    }

    // Article element or schema.org Article marker
    if let Ok(selector) = Selector::parse("article, [itemtype*='Article']") {
        if document.select(&selector).next().is_some() {
            return true;
        }
    }

    // Content-like class name anywhere in the document
    has_content_class(document)
}

/// True when the document has more than 5 paragraphs whose combined text
/// exceeds 1000 characters
pub fn has_dense_text(document: &Html) -> bool {
    let Ok(selector) = Selector::parse("p") else {
        return false;
    };

    let paragraphs: Vec<_> = document.select(&selector).collect();
    if paragraphs.len() <= 5 {
        return false;
    }

    let total: usize = paragraphs
        .iter()
        .map(|p| p.text().collect::<String>().len())
        .sum();
    total > 1000
}

fn has_content_class(document: &Html) -> bool {
    let Ok(re) = Regex::new(r"(?i)(content|article|post|blog|entry|main-content)") else {
        return false;
    };

    document
        .root_element()
        .descendants()
        .filter_map(scraper::ElementRef::wrap)
        .any(|el| el.value().classes().any(|class| re.is_match(class)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.example.org";

    fn classify_url(url: &str) -> String {
        classify(url, BASE, None)
    }

    #[test]
    fn test_homepage() {
        assert_eq!(classify_url("https://www.example.org/"), "homepage");
        assert_eq!(classify_url("https://www.example.org"), "homepage");
    }

    #[test]
    fn test_deny_list_whole_word() {
        assert_eq!(classify_url("https://www.example.org/about"), "about");
        assert_eq!(classify_url("https://www.example.org/user/login"), "login");
    }

    #[test]
    fn test_deny_list_plural() {
        assert_eq!(classify_url("https://www.example.org/terms"), "terms");
    }

    #[test]
    fn test_deny_list_not_substring() {
        // "aboutface" must not match the whole-word "about"
        assert_eq!(classify_url("https://www.example.org/aboutface"), "aboutface");
    }

    #[test]
    fn test_article_patterns() {
        assert_eq!(classify_url("https://www.example.org/blog/title"), "article");
        assert_eq!(
            classify_url("https://www.example.org/articles/2024/x"),
            "article"
        );
        assert_eq!(classify_url("https://www.example.org/post/1"), "article");
    }

    #[test]
    fn test_news_pattern() {
        assert_eq!(
            classify_url("https://www.example.org/press/releases/x"),
            "news"
        );
    }

    #[test]
    fn test_resource_pattern() {
        assert_eq!(
            classify_url("https://www.example.org/toolbox/guide/x"),
            "resource"
        );
        assert_eq!(classify_url("https://www.example.org/help/topic"), "resource");
    }

    #[test]
    fn test_faq_pattern() {
        assert_eq!(classify_url("https://www.example.org/faq"), "faq");
    }

    #[test]
    fn test_research_pattern() {
        assert_eq!(
            classify_url("https://www.example.org/publications/2024"),
            "research"
        );
    }

    #[test]
    fn test_pattern_order_first_wins() {
        // Path matches both article and news patterns; article is checked first
        assert_eq!(
            classify_url("https://www.example.org/blog/news/x"),
            "article"
        );
    }

    #[test]
    fn test_case_insensitive_patterns() {
        assert_eq!(classify_url("https://www.example.org/Blog/Title"), "article");
    }

    #[test]
    fn test_fallback_first_segment() {
        assert_eq!(
            classify_url("https://www.example.org/recipes/soup"),
            "recipes"
        );
        assert_eq!(classify_url("https://www.example.org/pricing"), "pricing");
    }

    #[test]
    fn test_document_dense_text_is_article() {
        let paragraphs = "<p>The quick brown fox jumps over the lazy dog and keeps going for a while to pad out the character count of this paragraph considerably.</p>".repeat(8);
        let html = Html::parse_document(&format!("<html><body>{}</body></html>", paragraphs));
        assert_eq!(
            classify("https://www.example.org/xyz", BASE, Some(&html)),
            "article"
        );
    }

    #[test]
    fn test_document_article_element() {
        let html =
            Html::parse_document("<html><body><article><p>short</p></article></body></html>");
        assert_eq!(
            classify("https://www.example.org/xyz", BASE, Some(&html)),
            "article"
        );
    }

    #[test]
    fn test_document_content_class() {
        let html = Html::parse_document(
            "<html><body><div class='main-content'><p>short</p></div></body></html>",
        );
        assert_eq!(
            classify("https://www.example.org/xyz", BASE, Some(&html)),
            "article"
        );
    }

    #[test]
    fn test_sparse_document_falls_back_to_segment() {
        let html = Html::parse_document("<html><body><p>short</p></body></html>");
        assert_eq!(
            classify("https://www.example.org/xyz/abc", BASE, Some(&html)),
            "xyz"
        );
    }

    #[test]
    fn test_deterministic() {
        let html = Html::parse_document("<html><body><p>text</p></body></html>");
        let first = classify("https://www.example.org/widgets/a", BASE, Some(&html));
        for _ in 0..5 {
            assert_eq!(
                classify("https://www.example.org/widgets/a", BASE, Some(&html)),
                first
            );
        }
    }
}
