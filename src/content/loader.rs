//! Content discovery - loads posts, pages and projects from their directories

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::item::RESERVED_KEYS;
use super::url::generate_url;
use super::{ContentItem, ContentSet, ContentType, FrontMatter, MarkdownRenderer};
use crate::config::SiteConfig;
use crate::helpers::{excerpt, format_date, normalize_url, parse_date_string, split_date_prefix};

/// Loads content items from content directories
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
    renderer: &'a MarkdownRenderer,
    exclude: Vec<glob::Pattern>,
    /// Stand-in date for posts without one, and sort key for undated items
    now: NaiveDateTime,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(config: &'a SiteConfig, renderer: &'a MarkdownRenderer) -> Self {
        Self {
            config,
            renderer,
            exclude: compile_patterns(&config.build.exclude),
            now: Local::now().naive_local(),
        }
    }

    /// Pin the current time (tests)
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Discover every content type from the configured directories
    pub fn discover_all(&self, site_dir: &Path) -> ContentSet {
        let dirs = &self.config.content.directories;
        let mut content = ContentSet::default();

        for content_type in ContentType::ALL {
            let dir = match content_type {
                ContentType::Post => &dirs.posts,
                ContentType::Page => &dirs.pages,
                ContentType::Project => &dirs.projects,
            };
            let items = self.discover(&site_dir.join(dir), content_type);
            tracing::info!("Found {} {}", items.len(), content_type.section());
            content.insert(content_type, items);
        }

        content
    }

    /// Load all items under `dir`, newest first.
    ///
    /// Undated items sort as if dated now, which puts them first. Files that
    /// fail to load are logged and skipped.
    pub fn discover(&self, dir: &Path, content_type: ContentType) -> Vec<ContentItem> {
        if !dir.exists() {
            return Vec::new();
        }

        let mut items = Vec::new();
        let mut seen_urls = HashSet::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) || self.is_excluded(path, dir) {
                continue;
            }

            match self.load_item(path, content_type, dir) {
                Ok(item) => {
                    if !seen_urls.insert(item.url.clone()) {
                        tracing::warn!(
                            "Duplicate URL {} in {} ({:?})",
                            item.url,
                            content_type.section(),
                            path
                        );
                    }
                    items.push(item);
                }
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {:#}", path, e);
                }
            }
        }

        let now = self.now;
        items.sort_by(|a, b| b.date.unwrap_or(now).cmp(&a.date.unwrap_or(now)));
        items
    }

    /// Load a single content file
    pub fn load_item(
        &self,
        path: &Path,
        content_type: ContentType,
        content_root: &Path,
    ) -> Result<ContentItem> {
        let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled");

        let date = self.resolve_date(&fm, stem, content_type, path);
        let settings = &self.config.content.settings;
        let date_formatted = date.map(|d| format_date(&d, &settings.date_format));

        let url = match &fm.url {
            Some(url) => normalize_url(url),
            None => generate_url(path, content_type, content_root),
        };

        let rendered = self.renderer.render(body);
        let excerpt = fm
            .excerpt
            .clone()
            .unwrap_or_else(|| excerpt(&rendered.html, settings.excerpt_length));

        let title = fm.title.clone().unwrap_or_else(|| match content_type {
            ContentType::Post => split_date_prefix(stem)
                .map(|(_, rest)| rest.to_string())
                .unwrap_or_else(|| stem.to_string()),
            _ => stem.to_string(),
        });

        let layout = fm.layout.clone().unwrap_or_else(|| match content_type {
            ContentType::Post => settings.default_layout.clone(),
            _ => content_type.default_layout().to_string(),
        });

        let mut extra = fm.extra;
        extra.retain(|key, _| {
            let reserved = RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                tracing::warn!("Ignoring reserved front-matter key {:?} in {:?}", key, path);
            }
            !reserved
        });

        tracing::debug!("Loaded {} {:?} -> {}", content_type, path, url);

        Ok(ContentItem {
            source_path: path.to_path_buf(),
            content_type,
            title,
            url,
            date,
            date_formatted,
            tags: fm.tags,
            categories: fm.categories,
            content: rendered.html,
            excerpt,
            layout,
            toc: rendered.toc,
            exclude_from_nav: fm.exclude_from_nav,
            extra,
        })
    }

    /// Front-matter date, else (posts only) the filename prefix, else now
    fn resolve_date(
        &self,
        fm: &FrontMatter,
        stem: &str,
        content_type: ContentType,
        path: &Path,
    ) -> Option<NaiveDateTime> {
        if let Some(raw) = &fm.date {
            match parse_date_string(raw) {
                Some(date) => return Some(date),
                None => tracing::warn!("Unrecognized date {:?} in {:?}", raw, path),
            }
        }

        if content_type != ContentType::Post {
            return None;
        }

        let from_name = split_date_prefix(stem)
            .and_then(|(date, _)| date)
            .and_then(|d| d.and_hms_opt(0, 0, 0));
        Some(from_name.unwrap_or(self.now))
    }

    fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        is_excluded(&self.exclude, path, root)
    }
}

/// Compile exclude globs, dropping (and logging) invalid ones
pub fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("Ignoring invalid exclude pattern {:?}: {}", p, e);
                None
            }
        })
        .collect()
}

/// A path is excluded when any pattern matches its path relative to `root`
/// or any single component of it
pub fn is_excluded(patterns: &[glob::Pattern], path: &Path, root: &Path) -> bool {
    if patterns.is_empty() {
        return false;
    }
    let relative = path.strip_prefix(root).unwrap_or(path);
    let relative_str = relative.to_string_lossy().replace('\\', "/");

    patterns.iter().any(|pattern| {
        pattern.matches(&relative_str)
            || relative
                .components()
                .any(|c| pattern.matches(&c.as_os_str().to_string_lossy()))
    })
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_post_defaults_from_filename() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2024-01-01-hello.md", "---\ntags: intro\n---\n# Hi\n\nBody text.\n");

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let items = loader.discover(dir.path(), ContentType::Post);

        assert_eq!(items.len(), 1);
        let post = &items[0];
        assert_eq!(post.url, "/posts/hello/");
        assert_eq!(post.title, "hello");
        assert_eq!(post.layout, "post");
        assert_eq!(post.tags, vec!["intro"]);
        assert_eq!(
            post.date.unwrap().format("%Y-%m-%d").to_string(),
            "2024-01-01"
        );
        assert_eq!(post.date_formatted.as_deref(), Some("January 01, 2024"));
        assert_eq!(post.excerpt, "Hi\nBody text.");
    }

    #[test]
    fn test_configured_default_layout_for_posts() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "posts/2024-01-01-a.md", "Body\n");
        write(dir.path(), "pages/about.md", "Body\n");

        let mut config = SiteConfig::default();
        config.content.settings.default_layout = "article".to_string();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());

        let posts = loader.discover(&dir.path().join("posts"), ContentType::Post);
        assert_eq!(posts[0].layout, "article");
        let pages = loader.discover(&dir.path().join("pages"), ContentType::Page);
        assert_eq!(pages[0].layout, "page");
    }

    #[test]
    fn test_reserved_keys_do_not_shadow_body() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "notes.md",
            "---\ntitle: Notes\ncontent: injected\ntoc: nope\nmood: calm\n---\nReal body.\n",
        );

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let page = &loader.discover(dir.path(), ContentType::Page)[0];

        assert!(!page.extra.contains_key("content"));
        assert!(!page.extra.contains_key("toc"));
        assert!(page.extra.contains_key("mood"));

        let json = serde_json::to_value(page).unwrap();
        assert_eq!(json["content"], "<p>Real body.</p>\n");
        assert_eq!(json["mood"], "calm");
    }

    #[test]
    fn test_front_matter_wins() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "2024-01-01-hello.md",
            "---\ntitle: Custom\ndate: 2023-06-01\nurl: custom/path/\nlayout: special\nexcerpt: Given.\n---\nBody\n",
        );

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let post = &loader.discover(dir.path(), ContentType::Post)[0];

        assert_eq!(post.title, "Custom");
        assert_eq!(post.url, "/custom/path/");
        assert_eq!(post.layout, "special");
        assert_eq!(post.excerpt, "Given.");
        assert_eq!(post.date.unwrap().format("%Y-%m").to_string(), "2023-06");
    }

    #[test]
    fn test_sorted_newest_first_with_undated_first() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "2022-01-01-old.md", "Old\n");
        write(dir.path(), "2024-01-01-new.md", "New\n");
        write(dir.path(), "undated.md", "Undated\n");

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let urls: Vec<_> = loader
            .discover(dir.path(), ContentType::Post)
            .into_iter()
            .map(|p| p.url)
            .collect();

        assert_eq!(urls, vec!["/posts/undated/", "/posts/new/", "/posts/old/"]);
    }

    #[test]
    fn test_pages_have_no_implicit_date() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.md", "---\ntitle: Home\n---\nWelcome\n");
        write(dir.path(), "docs/setup.md", "Setup\n");

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let pages = loader.discover(dir.path(), ContentType::Page);

        let urls: Vec<_> = pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec!["/docs/setup/", "/"]);
        assert!(pages.iter().all(|p| p.date.is_none()));
        assert!(pages.iter().all(|p| p.layout == "page"));
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "good.md", "---\ntitle: Good\n---\nok\n");
        write(dir.path(), "bad.md", "---\ntitle: [oops\nlayout: x\n---\nbad\n");

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let items = loader.discover(dir.path(), ContentType::Project);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Good");
        assert_eq!(items[0].url, "/projects/good/");
    }

    #[test]
    fn test_excluded_files_skipped() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "keep.md", "keep\n");
        write(dir.path(), "node_modules/pkg/readme.md", "skip\n");

        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer).with_now(now());
        let items = loader.discover(dir.path(), ContentType::Page);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "/keep/");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::default();
        let renderer = MarkdownRenderer::new(false);
        let loader = ContentLoader::new(&config, &renderer);
        assert!(loader
            .discover(&dir.path().join("missing"), ContentType::Post)
            .is_empty());
    }

    #[test]
    fn test_is_excluded() {
        let patterns = compile_patterns(&["*.tmp".to_string(), "drafts".to_string()]);
        let root = Path::new("/root");
        assert!(is_excluded(&patterns, Path::new("/root/a/b.tmp"), root));
        assert!(is_excluded(&patterns, Path::new("/root/drafts/x.md"), root));
        assert!(!is_excluded(&patterns, Path::new("/root/posts/x.md"), root));
    }
}
