//! Theme loader - resolves the theme directory, its templates and assets
//!
//! A theme lives in `themes/<name>/` (or `theme.path`) and provides:
//! - `templates/`: Tera templates, overridden by the site's `layouts/`
//! - `assets/`: copied to `{output}/theme/`

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::builtin;
use crate::config::ThemeConfig;
use crate::generator::output::copy_tree;
use crate::templates::TemplateSources;

/// Site directory holding user layouts
pub const LAYOUTS_DIR: &str = "layouts";

/// Resolved theme
#[derive(Debug, Clone)]
pub struct ThemeLoader {
    name: String,
    /// Theme directory path (may not exist)
    theme_dir: PathBuf,
    /// Whether the embedded `modern` theme supplies the base templates
    builtin: bool,
}

impl ThemeLoader {
    /// Resolve the configured theme against a site directory
    pub fn resolve(site_dir: &Path, theme: &ThemeConfig) -> Self {
        let theme_dir = match &theme.path {
            Some(path) => site_dir.join(path),
            None => site_dir.join("themes").join(&theme.name),
        };

        let has_templates = theme_dir.join("templates").is_dir();
        let builtin = theme.name == builtin::NAME && !has_templates;

        if !builtin && !theme_dir.exists() {
            tracing::warn!("Theme directory not found: {:?}", theme_dir);
        }

        Self {
            name: theme.name.clone(),
            theme_dir,
            builtin,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn theme_dir(&self) -> &Path {
        &self.theme_dir
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }

    /// Template sources in override order: builtin, theme, site layouts
    pub fn template_sources(&self, site_dir: &Path) -> TemplateSources {
        let searched = vec![
            self.theme_dir.join("templates"),
            site_dir.join(LAYOUTS_DIR),
        ];
        let dirs = searched.iter().filter(|d| d.is_dir()).cloned().collect();

        TemplateSources {
            builtin: self.builtin,
            dirs,
            searched,
        }
    }

    /// Copy theme assets to `{output}/theme/`, returning the file count
    pub fn copy_assets(&self, output_dir: &Path) -> Result<usize> {
        let dest_root = output_dir.join("theme");
        let mut count = 0;

        if self.builtin {
            for (relative, contents) in builtin::ASSETS {
                let dest = dest_root.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&dest, contents)
                    .with_context(|| format!("Failed to write {:?}", dest))?;
                tracing::debug!("Wrote built-in asset: {:?}", dest);
                count += 1;
            }
        }

        let assets_dir = self.theme_dir.join("assets");
        if assets_dir.is_dir() {
            // Skip files in directories starting with _ or . (e.g., _partial/)
            count += copy_tree(&assets_dir, &dest_root, |relative| {
                relative.components().any(|c| {
                    c.as_os_str()
                        .to_str()
                        .map(|s| s.starts_with('_') || s.starts_with('.'))
                        .unwrap_or(false)
                })
            })?;
        }

        Ok(count)
    }
}
