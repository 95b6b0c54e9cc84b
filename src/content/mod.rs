//! Content module - handles posts, pages, projects and content processing

mod frontmatter;
mod item;
pub mod loader;
mod markdown;
pub mod url;

use indexmap::IndexMap;

pub use frontmatter::{terms_from_value, FrontMatter};
pub use item::{ContentItem, ContentType, ItemSummary};
pub use loader::ContentLoader;
pub use markdown::{MarkdownRenderer, RenderedMarkdown, TocEntry};
pub use url::generate_url;

/// Discovered content grouped by type, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ContentSet {
    groups: IndexMap<ContentType, Vec<ContentItem>>,
}

impl ContentSet {
    pub fn insert(&mut self, content_type: ContentType, items: Vec<ContentItem>) {
        self.groups.insert(content_type, items);
    }

    /// Items of one type (empty when none were discovered)
    pub fn get(&self, content_type: ContentType) -> &[ContentItem] {
        self.groups
            .get(&content_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All items, posts then pages then projects
    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> {
        ContentType::ALL
            .into_iter()
            .flat_map(move |content_type| self.get(content_type).iter())
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
