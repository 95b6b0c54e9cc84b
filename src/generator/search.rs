//! `search.json` index for client-side search

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use super::output::write_file;
use crate::content::{ContentItem, ContentSet, ContentType};

#[derive(Debug, Serialize)]
struct SearchEntry<'a> {
    title: &'a str,
    url: &'a str,
    date: Option<String>,
    content_type: ContentType,
    excerpt: &'a str,
    tags: &'a [String],
}

impl<'a> From<&'a ContentItem> for SearchEntry<'a> {
    fn from(item: &'a ContentItem) -> Self {
        Self {
            title: &item.title,
            url: &item.url,
            date: item.date.map(|d| d.format("%Y-%m-%d").to_string()),
            content_type: item.content_type,
            excerpt: &item.excerpt,
            tags: &item.tags,
        }
    }
}

/// Write `{output}/search.json` with one entry per content item
pub fn generate_search_index(output_dir: &Path, content: &ContentSet) -> Result<usize> {
    let entries: Vec<SearchEntry> = content.iter().map(SearchEntry::from).collect();

    let json = serde_json::to_string_pretty(&entries)?;
    write_file(&output_dir.join("search.json"), json)?;
    tracing::info!("Generated search.json ({} entries)", entries.len());

    Ok(entries.len())
}
