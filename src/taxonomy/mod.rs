//! Taxonomy builder - groups content items by tag, category and custom terms

use indexmap::IndexMap;

use crate::config::TaxonomyConfig;
use crate::content::{ContentItem, ContentSet};

/// Items per term, in discovery order
pub type TermMap<'a> = IndexMap<String, Vec<&'a ContentItem>>;

/// taxonomy name -> term -> items.
///
/// Taxonomies follow the configured order, terms follow first appearance and
/// items within a term keep discovery order (posts, pages, projects; each
/// newest first). Nothing is re-sorted here.
#[derive(Debug, Default)]
pub struct TaxonomyIndex<'a> {
    taxonomies: IndexMap<String, TermMap<'a>>,
}

impl<'a> TaxonomyIndex<'a> {
    /// Build the index for every configured taxonomy
    pub fn build(content: &'a ContentSet, definitions: &[TaxonomyConfig]) -> Self {
        let mut taxonomies = IndexMap::new();

        for definition in definitions {
            let mut terms: TermMap<'a> = IndexMap::new();

            for item in content.iter() {
                for term in item.terms(&definition.name) {
                    let items = terms.entry(term).or_default();
                    if !items.iter().any(|existing| std::ptr::eq(*existing, item)) {
                        items.push(item);
                    }
                }
            }

            tracing::debug!("Taxonomy {}: {} terms", definition.name, terms.len());
            taxonomies.insert(definition.name.clone(), terms);
        }

        Self { taxonomies }
    }

    /// Terms of one taxonomy
    pub fn get(&self, taxonomy: &str) -> Option<&TermMap<'a>> {
        self.taxonomies.get(taxonomy)
    }

    /// Items for one term (empty when unknown)
    pub fn items(&self, taxonomy: &str, term: &str) -> &[&'a ContentItem] {
        self.taxonomies
            .get(taxonomy)
            .and_then(|terms| terms.get(term))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TermMap<'a>)> {
        self.taxonomies.iter()
    }

    /// Total number of terms across all taxonomies
    pub fn term_count(&self) -> usize {
        self.taxonomies.values().map(IndexMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentType;
    use std::path::PathBuf;

    fn item(url: &str, content_type: ContentType, tags: &[&str]) -> ContentItem {
        ContentItem {
            source_path: PathBuf::from(format!("content{}.md", url.trim_end_matches('/'))),
            content_type,
            title: url.to_string(),
            url: url.to_string(),
            date: None,
            date_formatted: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            categories: Vec::new(),
            content: String::new(),
            excerpt: String::new(),
            layout: content_type.default_layout().to_string(),
            toc: Vec::new(),
            exclude_from_nav: false,
            extra: IndexMap::new(),
        }
    }

    fn urls(items: &[&ContentItem]) -> Vec<String> {
        items.iter().map(|i| i.url.clone()).collect()
    }

    fn defaults() -> Vec<TaxonomyConfig> {
        crate::config::ContentConfig::default().taxonomies
    }

    #[test]
    fn test_shared_tag_collects_exactly_tagged_items() {
        let mut content = ContentSet::default();
        content.insert(
            ContentType::Post,
            vec![
                item("/posts/a/", ContentType::Post, &["foo"]),
                item("/posts/b/", ContentType::Post, &[]),
                item("/posts/c/", ContentType::Post, &["bar", "foo"]),
            ],
        );

        let index = TaxonomyIndex::build(&content, &defaults());
        assert_eq!(
            urls(index.items("tags", "foo")),
            vec!["/posts/a/", "/posts/c/"]
        );
        assert_eq!(urls(index.items("tags", "bar")), vec!["/posts/c/"]);
        assert!(index.items("tags", "missing").is_empty());
    }

    #[test]
    fn test_order_follows_discovery_across_types() {
        let mut content = ContentSet::default();
        content.insert(
            ContentType::Project,
            vec![item("/projects/p/", ContentType::Project, &["rust"])],
        );
        content.insert(
            ContentType::Post,
            vec![item("/posts/x/", ContentType::Post, &["rust"])],
        );

        let index = TaxonomyIndex::build(&content, &defaults());
        assert_eq!(
            urls(index.items("tags", "rust")),
            vec!["/posts/x/", "/projects/p/"]
        );
    }

    #[test]
    fn test_term_and_taxonomy_order() {
        let mut content = ContentSet::default();
        content.insert(
            ContentType::Post,
            vec![
                item("/posts/a/", ContentType::Post, &["zeta"]),
                item("/posts/b/", ContentType::Post, &["alpha", "zeta"]),
            ],
        );

        let index = TaxonomyIndex::build(&content, &defaults());
        let names: Vec<_> = index.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["categories", "tags"]);

        let terms: Vec<_> = index.get("tags").unwrap().keys().cloned().collect();
        assert_eq!(terms, vec!["zeta", "alpha"]);
        assert!(index.get("categories").unwrap().is_empty());
        assert_eq!(index.term_count(), 2);
    }

    #[test]
    fn test_repeated_term_listed_once() {
        let mut content = ContentSet::default();
        content.insert(
            ContentType::Post,
            vec![item("/posts/a/", ContentType::Post, &["foo", "foo"])],
        );

        let index = TaxonomyIndex::build(&content, &defaults());
        assert_eq!(index.items("tags", "foo").len(), 1);
    }

    #[test]
    fn test_custom_taxonomy_from_front_matter() {
        let mut with_series = item("/posts/a/", ContentType::Post, &[]);
        with_series
            .extra
            .insert("series".to_string(), serde_yaml::Value::from("intro"));
        let mut content = ContentSet::default();
        content.insert(
            ContentType::Post,
            vec![with_series, item("/posts/b/", ContentType::Post, &[])],
        );

        let series = TaxonomyConfig::new("series", "series", "series", "/series/");
        let index = TaxonomyIndex::build(&content, &[series]);
        assert_eq!(urls(index.items("series", "intro")), vec!["/posts/a/"]);
        assert!(index.get("tags").is_none());
    }
}
