//! Content item model

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use super::frontmatter::terms_from_value;
use super::markdown::TocEntry;

/// Kind of content, one per content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Page,
    Project,
}

impl ContentType {
    /// Discovery and rendering order
    pub const ALL: [ContentType; 3] = [ContentType::Post, ContentType::Page, ContentType::Project];

    /// Layout used when front-matter names none
    pub fn default_layout(self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Page => "page",
            ContentType::Project => "project",
        }
    }

    /// Plural section name (`posts`, `pages`, `projects`)
    pub fn section(self) -> &'static str {
        match self {
            ContentType::Post => "posts",
            ContentType::Page => "pages",
            ContentType::Project => "projects",
        }
    }

    /// Parse a singular or plural name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "post" | "posts" => Some(ContentType::Post),
            "page" | "pages" => Some(ContentType::Page),
            "project" | "projects" => Some(ContentType::Project),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_layout())
    }
}

/// Computed fields that custom front-matter keys may not shadow when an item
/// is flattened into a template context
pub const RESERVED_KEYS: &[&str] = &[
    "source_path",
    "content_type",
    "date_formatted",
    "content",
    "toc",
];

/// A discovered post, page or project
#[derive(Debug, Clone, Serialize)]
pub struct ContentItem {
    /// Source file path
    pub source_path: PathBuf,

    pub content_type: ContentType,

    pub title: String,

    /// Site URL, e.g. `/posts/hello/`
    pub url: String,

    /// Publication date, if known
    pub date: Option<NaiveDateTime>,

    /// `date` rendered with the configured display format
    pub date_formatted: Option<String>,

    pub tags: Vec<String>,

    pub categories: Vec<String>,

    /// Rendered HTML body
    pub content: String,

    /// Plain-text summary
    pub excerpt: String,

    /// Template name without extension
    pub layout: String,

    pub toc: Vec<TocEntry>,

    pub exclude_from_nav: bool,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Listing view of an item, without the rendered body
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary<'a> {
    pub title: &'a str,
    pub url: &'a str,
    pub date: Option<NaiveDateTime>,
    pub date_formatted: Option<&'a str>,
    pub excerpt: &'a str,
    pub tags: &'a [String],
    pub categories: &'a [String],
    pub content_type: ContentType,
}

impl ContentItem {
    pub fn summary(&self) -> ItemSummary<'_> {
        ItemSummary {
            title: &self.title,
            url: &self.url,
            date: self.date,
            date_formatted: self.date_formatted.as_deref(),
            excerpt: &self.excerpt,
            tags: &self.tags,
            categories: &self.categories,
            content_type: self.content_type,
        }
    }

    /// Terms this item declares for a taxonomy.
    ///
    /// `tags` and `categories` come from the typed fields, anything else from
    /// the matching front-matter key.
    pub fn terms(&self, taxonomy: &str) -> Vec<String> {
        match taxonomy {
            "tags" => self.tags.clone(),
            "categories" => self.categories.clone(),
            other => self
                .extra
                .get(other)
                .map(terms_from_value)
                .unwrap_or_default(),
        }
    }
}
