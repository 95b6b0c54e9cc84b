//! Generator module - runs the build pipeline and writes the output tree

mod context;
mod css;
pub mod output;
mod search;
mod sitemap;

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::{SiteConfig, TaxonomyConfig};
use crate::content::{loader, ContentItem, ContentLoader, ContentSet, ContentType, ItemSummary};
use crate::helpers::{capitalize, term_slug};
use crate::taxonomy::{TaxonomyIndex, TermMap};
use crate::Folio;

pub use context::{current_year, generate_navigation, ContextBuilder, GENERATOR_NAME};
pub use css::generate_css;
pub use search::generate_search_index;
pub use sitemap::generate_sitemap;

/// What a build produced
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub content_pages: usize,
    pub taxonomy_pages: usize,
    pub list_pages: usize,
    pub assets: usize,
    pub elapsed: Duration,
}

impl BuildSummary {
    pub fn total_pages(&self) -> usize {
        self.content_pages + self.taxonomy_pages + self.list_pages
    }
}

/// Synthetic page object for generated (non-content) pages
#[derive(Debug, Serialize)]
struct GeneratedPage<'a> {
    title: String,
    url: String,
    layout: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    taxonomy_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    taxonomy_term: Option<&'a str>,
}

/// One entry on a taxonomy index page
#[derive(Debug, Serialize)]
struct TermEntry<'a> {
    name: &'a str,
    slug: String,
    url: String,
    count: usize,
}

/// Static site generator
pub struct Generator<'a> {
    folio: &'a Folio,
}

impl<'a> Generator<'a> {
    pub fn new(folio: &'a Folio) -> Self {
        Self { folio }
    }

    fn config(&self) -> &SiteConfig {
        &self.folio.config
    }

    fn output_dir(&self) -> &Path {
        &self.folio.output_dir
    }

    /// Run a full build
    pub fn generate(&self) -> Result<BuildSummary> {
        let start = Instant::now();
        let output_dir = self.output_dir();
        tracing::info!("Building site to {:?}...", output_dir);

        output::clean_dir(output_dir)?;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {:?}", output_dir))?;

        let content = self.discover();
        let taxonomies = TaxonomyIndex::build(&content, &self.config().content.taxonomies);
        tracing::info!("Built {} taxonomy terms", taxonomies.term_count());

        let navigation = generate_navigation(self.config(), &content);
        let contexts = ContextBuilder::new(self.config(), &navigation, &content);

        let mut summary = BuildSummary::default();
        let mut claimed: HashSet<String> = HashSet::new();

        for item in content.iter() {
            if self.render_item(item, &contexts)? {
                summary.content_pages += 1;
            }
            claimed.insert(item.url.clone());
        }

        for definition in &self.config().content.taxonomies {
            let Some(terms) = taxonomies.get(&definition.name) else {
                continue;
            };
            summary.taxonomy_pages +=
                self.render_taxonomy(definition, terms, &contexts, &claimed)?;
        }

        for content_type in [ContentType::Post, ContentType::Project] {
            summary.list_pages +=
                self.render_section_index(content_type, &content, &contexts, &claimed)?;
        }

        summary.assets += self.folio.theme.copy_assets(output_dir)?;
        summary.assets += self.copy_user_assets()?;

        output::write_file(&output_dir.join("style.css"), generate_css(&self.config().theme))?;

        if self.config().features.search.enabled {
            generate_search_index(output_dir, &content)?;
        }

        if !self.config().site.url.is_empty() {
            generate_sitemap(output_dir, &self.config().site.url)?;
        }

        summary.elapsed = start.elapsed();
        tracing::info!(
            "Site built successfully in {:.2}s: {} pages, {} assets -> {:?}",
            summary.elapsed.as_secs_f64(),
            summary.total_pages(),
            summary.assets,
            output_dir
        );

        Ok(summary)
    }

    /// Discover all content from the site's content directories
    pub fn discover(&self) -> ContentSet {
        tracing::info!("Discovering content...");
        ContentLoader::new(&self.folio.config, &self.folio.markdown)
            .discover_all(&self.folio.site_dir)
    }

    /// Render one content item; false when it was skipped
    fn render_item(&self, item: &ContentItem, contexts: &ContextBuilder) -> Result<bool> {
        let context = contexts.page(item, &item.content);
        self.write_page(&item.layout, &item.url, &context)
    }

    /// Term pages and the taxonomy index page, returns pages written
    fn render_taxonomy(
        &self,
        definition: &TaxonomyConfig,
        terms: &TermMap<'_>,
        contexts: &ContextBuilder,
        claimed: &HashSet<String>,
    ) -> Result<usize> {
        let mut written = 0;
        let mut entries = Vec::new();
        let mut seen_slugs = HashSet::new();

        for (term, items) in terms {
            let slug = term_slug(term);
            if slug.is_empty() {
                tracing::warn!("Skipping {} term {:?}: empty slug", definition.name, term);
                continue;
            }
            if !seen_slugs.insert(slug.clone()) {
                tracing::warn!(
                    "{} term {:?} shares the URL slug {:?} with another term",
                    definition.name,
                    term,
                    slug
                );
            }

            let url = format!("{}{}/", definition.path, slug);
            if claimed.contains(&url) {
                tracing::warn!(
                    "Skipping {} page for {:?}: {} belongs to a content page",
                    definition.name,
                    term,
                    url
                );
                continue;
            }

            let page = GeneratedPage {
                title: format!("{} - {}", term, definition.singular_label()),
                url: url.clone(),
                layout: "taxonomy",
                taxonomy_type: Some(definition.name.as_str()),
                taxonomy_term: Some(term.as_str()),
            };
            let summaries: Vec<ItemSummary> = items.iter().map(|i| i.summary()).collect();

            let mut context = contexts.page(&page, "");
            context.insert("taxonomy", definition);
            context.insert("term", term);
            context.insert("slug", &slug);
            context.insert("items", &summaries);

            if self.write_page(page.layout, &page.url, &context)? {
                written += 1;
            }
            entries.push(TermEntry {
                name: term,
                slug,
                url,
                count: items.len(),
            });
        }

        if entries.is_empty() || claimed.contains(&definition.path) {
            return Ok(written);
        }

        let page = GeneratedPage {
            title: capitalize(definition.plural_label()),
            url: definition.path.clone(),
            layout: "taxonomy_index",
            taxonomy_type: Some(definition.name.as_str()),
            taxonomy_term: None,
        };
        let mut context = contexts.page(&page, "");
        context.insert("taxonomy", definition);
        context.insert("terms", &entries);

        if self.write_page(page.layout, &page.url, &context)? {
            written += 1;
        }

        tracing::info!("Generated {} {} pages", written, definition.name);
        Ok(written)
    }

    /// `/posts/` and `/projects/` listings unless a page already owns the URL
    fn render_section_index(
        &self,
        content_type: ContentType,
        content: &ContentSet,
        contexts: &ContextBuilder,
        claimed: &HashSet<String>,
    ) -> Result<usize> {
        let items = content.get(content_type);
        let url = format!("/{}/", content_type.section());
        if items.is_empty() || claimed.contains(&url) {
            return Ok(0);
        }

        let page = GeneratedPage {
            title: capitalize(content_type.section()),
            url,
            layout: "list",
            taxonomy_type: None,
            taxonomy_term: None,
        };
        let summaries: Vec<ItemSummary> = items.iter().map(ContentItem::summary).collect();

        let mut context = contexts.page(&page, "");
        context.insert("section", content_type.section());
        context.insert("items", &summaries);

        Ok(usize::from(self.write_page(page.layout, &page.url, &context)?))
    }

    /// Render a layout and write it to the URL's output file.
    ///
    /// Unsafe URLs are logged and skipped (false); I/O failures are errors.
    fn write_page(&self, layout: &str, url: &str, context: &tera::Context) -> Result<bool> {
        let path = match output::output_path(
            self.output_dir(),
            url,
            self.config().build.permalink_style,
        ) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Skipping page: {}", e);
                return Ok(false);
            }
        };

        let html = self.folio.renderer.render_layout(layout, context, url);
        output::write_file(&path, html)?;
        Ok(true)
    }

    /// Copy each `build.assets` directory to the same relative path
    fn copy_user_assets(&self) -> Result<usize> {
        let patterns = loader::compile_patterns(&self.config().build.exclude);
        let mut count = 0;

        for asset_dir in &self.config().build.assets {
            let src = self.folio.site_dir.join(asset_dir);
            if !src.exists() {
                continue;
            }

            let dest: PathBuf = self.output_dir().join(asset_dir);
            count += output::copy_tree(&src, &dest, |relative| {
                loader::is_excluded(&patterns, relative, Path::new(""))
            })?;
            tracing::debug!("Copied assets from {:?}", src);
        }

        Ok(count)
    }
}
