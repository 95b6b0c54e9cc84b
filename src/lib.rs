//! folio: a static site generator for Markdown content
//!
//! A site directory holds `folio.yml`, Markdown under `content/` and optional
//! `layouts/`, `themes/` and `assets/`. Building discovers the content, groups
//! it into taxonomies, renders everything through Tera templates and writes a
//! static tree to the output directory.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod taxonomy;
pub mod templates;
pub mod theme;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentSet, MarkdownRenderer};
use generator::{BuildSummary, Generator};
use templates::TemplateRenderer;
use theme::ThemeLoader;

/// Inputs for opening a site beyond its directory
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Site config files merged in order; empty means `folio.yml`
    pub config_files: Vec<PathBuf>,
    /// Style files merged into the `theme` section
    pub style_files: Vec<PathBuf>,
    /// Output directory overriding `build.output`
    pub output: Option<PathBuf>,
}

/// A loaded site, ready to build
pub struct Folio {
    /// Merged site configuration
    pub config: config::SiteConfig,
    /// Site directory
    pub site_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Resolved theme
    pub theme: ThemeLoader,
    pub(crate) markdown: Arc<MarkdownRenderer>,
    pub(crate) renderer: TemplateRenderer,
}

impl Folio {
    /// Load config, create directories and set up templates.
    ///
    /// Config problems fall back to defaults; having no template source is an
    /// error.
    pub fn open<P: AsRef<Path>>(site_dir: P, options: &BuildOptions) -> Result<Self> {
        let site_dir = site_dir.as_ref().to_path_buf();

        let config_files = if options.config_files.is_empty() {
            vec![site_dir.join(config::DEFAULT_CONFIG_FILE)]
        } else {
            options.config_files.clone()
        };
        let config = config::load_or_default(&config_files, &options.style_files);

        let output_dir = match &options.output {
            Some(output) => output.clone(),
            None => site_dir.join(&config.build.output),
        };

        fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create output dir {:?}", output_dir))?;
        let dirs = &config.content.directories;
        for dir in [&dirs.posts, &dirs.pages, &dirs.projects] {
            let path = site_dir.join(dir);
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create content dir {:?}", path))?;
        }

        let theme = ThemeLoader::resolve(&site_dir, &config.theme);
        tracing::debug!("Using theme {:?} at {:?}", theme.name(), theme.theme_dir());

        let markdown = Arc::new(MarkdownRenderer::new(config.features.code_highlighting));
        let renderer =
            TemplateRenderer::new(&theme.template_sources(&site_dir), Arc::clone(&markdown))?;

        Ok(Self {
            config,
            site_dir,
            output_dir,
            theme,
            markdown,
            renderer,
        })
    }

    /// Run a full build
    pub fn build(&self) -> Result<BuildSummary> {
        Generator::new(self).generate()
    }

    /// Discover content without writing anything
    pub fn discover(&self) -> ContentSet {
        Generator::new(self).discover()
    }

    /// Empty the output directory
    pub fn clean(&self) -> Result<()> {
        generator::output::clean_dir(&self.output_dir)
    }
}
