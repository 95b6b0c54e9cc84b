//! Template rendering with Tera
//!
//! Templates are layered: the embedded `modern` theme first, then the theme's
//! `templates/` directory, then the site's `layouts/`. A later source
//! overrides a template of the same name from an earlier one.

mod filters;

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::content::MarkdownRenderer;
use crate::error::{error_chain, BuildError};
use crate::helpers::html_escape;
use crate::theme::builtin;

/// Layout used when the requested one does not exist
pub const FALLBACK_LAYOUT: &str = "page";

/// Where templates come from
#[derive(Debug, Clone, Default)]
pub struct TemplateSources {
    /// Start from the embedded `modern` templates
    pub builtin: bool,
    /// Existing template directories, lowest precedence first
    pub dirs: Vec<PathBuf>,
    /// Every directory that was looked at, for error reporting
    pub searched: Vec<PathBuf>,
}

/// Template renderer
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load all template sources; fails when there are none at all
    pub fn new(
        sources: &TemplateSources,
        markdown: Arc<MarkdownRenderer>,
    ) -> Result<Self, BuildError> {
        if !sources.builtin && sources.dirs.is_empty() {
            return Err(BuildError::NoTemplates(sources.searched.clone()));
        }

        let mut templates: IndexMap<String, String> = IndexMap::new();

        if sources.builtin {
            for (name, source) in builtin::TEMPLATES {
                templates.insert(name.to_string(), source.to_string());
            }
        }

        for dir in &sources.dirs {
            let count = collect_templates(dir, &mut templates);
            tracing::debug!("Loaded {} templates from {:?}", count, dir);
        }

        Self::from_templates(templates, markdown)
    }

    /// Build a renderer from (name, source) pairs
    pub fn from_templates(
        templates: IndexMap<String, String>,
        markdown: Arc<MarkdownRenderer>,
    ) -> Result<Self, BuildError> {
        let mut tera = Tera::default();

        // `.html`/`.xml` templates autoescape; rendered bodies are piped through `safe`
        tera.set_escape_fn(html_escape);
        filters::register(&mut tera, markdown);

        tera.add_raw_templates(loadable_templates(templates))?;

        Ok(Self { tera })
    }

    /// Whether a template with this exact name exists
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String, BuildError> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render `{layout}.html` for one output page.
    ///
    /// A missing layout falls back to `page.html`; a render failure yields a
    /// small error page so one bad page never stops the build.
    pub fn render_layout(&self, layout: &str, context: &Context, url: &str) -> String {
        let mut template_name = format!("{}.html", layout);
        if !self.has_template(&template_name) {
            tracing::error!(
                "Template '{}' not found for {}, using {}.html",
                template_name,
                url,
                FALLBACK_LAYOUT
            );
            template_name = format!("{}.html", FALLBACK_LAYOUT);
        }

        match self.render(&template_name, context) {
            Ok(html) => html,
            Err(e) => {
                let message = error_chain(&e);
                tracing::error!("Error rendering template for {}: {}", url, message);
                error_page(&message)
            }
        }
    }
}

/// Inline page written in place of a page that failed to render
pub fn error_page(message: &str) -> String {
    format!("<h1>Error</h1><p>{}</p>", html_escape(message))
}

/// Drop templates that fail to parse, then any template whose parent or
/// imported macro file is gone, so one bad layout never takes the rest down.
fn loadable_templates(templates: IndexMap<String, String>) -> IndexMap<String, String> {
    let mut parsed: IndexMap<String, (String, Vec<String>)> = IndexMap::new();

    for (name, source) in templates {
        match tera::Template::new(&name, None, &source) {
            Ok(template) => {
                let mut needs: Vec<String> = template
                    .imported_macro_files
                    .iter()
                    .map(|(file, _)| file.clone())
                    .collect();
                needs.extend(template.parent);
                parsed.insert(name, (source, needs));
            }
            Err(e) => tracing::error!("Skipping template '{}': {}", name, error_chain(&e)),
        }
    }

    loop {
        let missing: Vec<(String, String)> = parsed
            .iter()
            .filter_map(|(name, (_, needs))| {
                needs
                    .iter()
                    .find(|need| !parsed.contains_key(need.as_str()))
                    .map(|need| (name.clone(), need.clone()))
            })
            .collect();
        if missing.is_empty() {
            break;
        }
        for (name, need) in missing {
            tracing::error!("Skipping template '{}': depends on unavailable '{}'", name, need);
            parsed.shift_remove(&name);
        }
    }

    parsed
        .into_iter()
        .map(|(name, (source, _))| (name, source))
        .collect()
}

/// Read every `.html`/`.xml` template under `dir`, named by relative path
fn collect_templates(dir: &Path, templates: &mut IndexMap<String, String>) -> usize {
    let mut count = 0;

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_template = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == "html" || e == "xml")
            .unwrap_or(false);
        if !path.is_file() || !is_template {
            continue;
        }

        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        match fs::read_to_string(path) {
            Ok(source) => {
                templates.insert(name, source);
                count += 1;
            }
            Err(e) => tracing::warn!("Failed to read template {:?}: {}", path, e),
        }
    }

    count
}
