//! Cross-knowledge-base paragraph deduplication
//!
//! Runs once after all seeds finish. Paragraphs are keyed by a hash of
//! their normalized text. The first page to use a paragraph owns it; a
//! later occurrence is removed only when it appears again on the owning
//! page. The same paragraph on a different page is kept, since shared
//! boilerplate can still be meaningful in its own page context.

use crate::store::KnowledgeBase;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Removes repeated paragraphs across the whole knowledge base
///
/// Returns the number of paragraphs removed. Iteration order over domains
/// and pages is the map order, so the pass is deterministic.
pub fn remove_duplicate_paragraphs(kb: &mut KnowledgeBase) -> usize {
    let mut owner: HashMap<String, String> = HashMap::new();
    let mut removed = 0;

    for record in kb.domains.values_mut() {
        for (url, page) in record.pages.iter_mut() {
            let mut kept = Vec::with_capacity(page.content.paragraphs.len());
            for paragraph in page.content.paragraphs.drain(..) {
                let key = fingerprint(&paragraph);
                match owner.get(&key) {
                    Some(owning_url) if owning_url == url => {
                        removed += 1;
                    }
                    Some(_) => kept.push(paragraph),
                    None => {
                        owner.insert(key, url.clone());
                        kept.push(paragraph);
                    }
                }
            }
            page.content.paragraphs = kept;
        }
    }

    removed
}

/// Hash of the paragraph text with case and whitespace runs normalized
fn fingerprint(text: &str) -> String {
    let normalized = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ContentRecord, PageRecord};

    fn page_with_paragraphs(paragraphs: &[&str]) -> PageRecord {
        PageRecord {
            page_type: "article".to_string(),
            content: ContentRecord {
                paragraphs: paragraphs.iter().map(|p| p.to_string()).collect(),
                ..ContentRecord::default()
            },
            depth: 0,
            crawled_at: crate::store::timestamp_now(),
        }
    }

    #[test]
    fn test_duplicate_on_same_page_removed() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/a",
            page_with_paragraphs(&["Shared text here.", "Unique text.", "Shared text here."]),
        );

        let removed = remove_duplicate_paragraphs(&mut kb);
        assert_eq!(removed, 1);

        let page = &kb.domains["example.org"].pages["https://example.org/a"];
        assert_eq!(page.content.paragraphs, vec!["Shared text here.", "Unique text."]);
    }

    #[test]
    fn test_duplicate_across_pages_kept() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/a",
            page_with_paragraphs(&["Shared boilerplate paragraph."]),
        );
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/b",
            page_with_paragraphs(&["Shared boilerplate paragraph."]),
        );

        let removed = remove_duplicate_paragraphs(&mut kb);
        assert_eq!(removed, 0);
        assert_eq!(
            kb.domains["example.org"].pages["https://example.org/b"]
                .content
                .paragraphs
                .len(),
            1
        );
    }

    #[test]
    fn test_normalization_ignores_case_and_whitespace() {
        let mut kb = KnowledgeBase::new();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/a",
            page_with_paragraphs(&["Some   Text Here.", "some text here."]),
        );

        let removed = remove_duplicate_paragraphs(&mut kb);
        assert_eq!(removed, 1);
    }

    #[test]
    fn test_other_fields_untouched() {
        let mut kb = KnowledgeBase::new();
        let mut page = page_with_paragraphs(&["One.", "One."]);
        page.content.title = "Title".to_string();
        kb.insert_page(
            "example.org",
            "https://example.org",
            "https://example.org/a",
            page,
        );

        remove_duplicate_paragraphs(&mut kb);
        let stored = &kb.domains["example.org"].pages["https://example.org/a"];
        assert_eq!(stored.content.title, "Title");
    }
}
