//! Create a new content file

use anyhow::{Context, Result};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::content::ContentType;

/// Write a new post, page or project with front-matter.
///
/// Posts are named `YYYY-MM-DD-slug.md`, everything else `slug.md`. Returns
/// the created path; an existing file is never overwritten.
pub fn create_content(
    site_dir: &Path,
    config: &SiteConfig,
    title: &str,
    content_type: ContentType,
    today: NaiveDate,
) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let dirs = &config.content.directories;
    let (dir, filename) = match content_type {
        ContentType::Post => (&dirs.posts, format!("{}-{}.md", today.format("%Y-%m-%d"), slug)),
        ContentType::Page => (&dirs.pages, format!("{}.md", slug)),
        ContentType::Project => (&dirs.projects, format!("{}.md", slug)),
    };
    let target_dir = site_dir.join(dir);
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let file_path = target_dir.join(filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut front: IndexMap<&str, Value> = IndexMap::new();
    front.insert("title", Value::from(title));
    front.insert("layout", Value::from(content_type.default_layout()));
    front.insert("description", Value::from(""));
    match content_type {
        ContentType::Post => {
            front.insert("date", Value::from(today.format("%Y-%m-%d").to_string()));
            front.insert("tags", Value::Sequence(Vec::new()));
            front.insert("categories", Value::Sequence(Vec::new()));
        }
        ContentType::Project => {
            front.insert("repo", Value::from(""));
            front.insert("demo", Value::from(""));
            front.insert("tags", Value::Sequence(Vec::new()));
        }
        ContentType::Page => {}
    }

    let body = format!(
        "---\n{}---\n\nWrite your {} here.\n",
        serde_yaml::to_string(&front)?,
        content_type
    );
    fs::write(&file_path, body).with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created {}: {:?}", content_type, file_path);
    Ok(file_path)
}
