//! JSON output writers
//!
//! The knowledge base and its categorical companion view are both written
//! as pretty-printed JSON. Non-ASCII text is written literally rather than
//! escaped.

use crate::store::KnowledgeBase;
use crate::{HarvestError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

/// One page reference in the categorical view
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub url: String,
    pub title: String,
}

/// Domain to page type to page references
pub type Categories = BTreeMap<String, BTreeMap<String, Vec<CategoryEntry>>>;

/// Writes the knowledge base to `path` as pretty-printed JSON
pub fn save_knowledge_base(kb: &KnowledgeBase, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(kb)?;
    fs::write(path, json).map_err(|source| HarvestError::OutputWrite {
        path: path.to_string(),
        source,
    })?;

    info!(path, "knowledge base written");
    Ok(())
}

/// Builds the categorical view: domain to page type to `{url, title}` pairs
///
/// Only stored pages appear; the `_metadata` record is not a domain and
/// never contributes entries.
pub fn generate_categories(kb: &KnowledgeBase) -> Categories {
    let mut categories = Categories::new();

    for (domain, record) in &kb.domains {
        let by_type = categories.entry(domain.clone()).or_default();
        for (url, page) in &record.pages {
            by_type
                .entry(page.page_type.clone())
                .or_default()
                .push(CategoryEntry {
                    url: url.clone(),
                    title: page.content.title.clone(),
                });
        }
    }

    categories
}

/// Writes the categorical view next to the knowledge base file
pub fn save_categories(kb: &KnowledgeBase, output_path: &str) -> Result<()> {
    let categories = generate_categories(kb);
    let path = categories_path(output_path);

    let json = serde_json::to_string_pretty(&categories)?;
    fs::write(&path, json).map_err(|source| HarvestError::OutputWrite {
        path: path.clone(),
        source,
    })?;

    info!(path, "categories written");
    Ok(())
}

/// Derives the categories file path from the knowledge base path
///
/// `knowledge_base.json` becomes `knowledge_base_categories.json`.
pub fn categories_path(output_path: &str) -> String {
    let path = Path::new(output_path);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!(
            "{}_categories.{}",
            path.with_extension("").display(),
            ext
        ),
        None => format!("{}_categories", output_path),
    }
}
