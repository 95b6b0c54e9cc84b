//! Scaffold a new site

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::fs;
use std::path::Path;

use crate::config::DEFAULT_CONFIG_FILE;

const DIRECTORIES: &[&str] = &[
    "content/pages",
    "content/posts",
    "content/projects",
    "assets/images",
    "assets/fonts",
    "assets/files",
    "layouts",
];

/// Create a new site in `target_dir`, which must not exist yet
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.exists() {
        anyhow::bail!(
            "Directory {:?} already exists. Choose a different name or delete it first.",
            target_dir
        );
    }

    for dir in DIRECTORIES {
        let path = target_dir.join(dir);
        fs::create_dir_all(&path).with_context(|| format!("Failed to create {:?}", path))?;
    }

    let name = target_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "My Folio Site".to_string());
    write(&target_dir.join(DEFAULT_CONFIG_FILE), &config_file(&name))?;

    let today = Local::now().date_naive();
    for (path, body) in sample_content(&name, today) {
        write(&target_dir.join(path), &body)?;
    }

    tracing::info!("Created new site at {:?}", target_dir);
    Ok(())
}

fn write(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
}

fn config_file(name: &str) -> String {
    format!(
        r#"# folio site configuration
site:
  title: "{name}"
  description: "A site built with folio"
  author: ""
  url: ""
  language: en
  timezone: UTC

theme:
  name: modern

navigation:
  main: []

build:
  output: _site
"#
    )
}

fn sample_content(name: &str, today: NaiveDate) -> Vec<(String, String)> {
    vec![
        (
            "content/pages/index.md".to_string(),
            format!(
                r#"---
title: "Home"
layout: page
---

# Welcome to {name}

This site is built with folio. Edit `content/pages/index.md` to change this page.
"#
            ),
        ),
        (
            "content/pages/about.md".to_string(),
            r#"---
title: "About"
layout: page
---

# About

Tell visitors who you are.
"#
            .to_string(),
        ),
        (
            format!("content/posts/{}-welcome.md", today.format("%Y-%m-%d")),
            format!(
                r#"---
title: "Welcome to folio"
date: {date}
tags: [welcome]
categories: [general]
---

Your first post. Create more with `folio new "My Post"`.

## Next steps

Run `folio serve` and edit this file to see the page reload.
"#,
                date = today.format("%Y-%m-%d")
            ),
        ),
        (
            "content/projects/sample-project.md".to_string(),
            r#"---
title: "Sample Project"
summary: "A project page"
repo: ""
demo: ""
tags: [welcome]
---

Describe your project here.
"#
            .to_string(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_layout() {
        let dir = TempDir::new().unwrap();
        let site = dir.path().join("blog");
        init_site(&site).unwrap();

        assert!(site.join(DEFAULT_CONFIG_FILE).is_file());
        assert!(site.join("content/pages/index.md").is_file());
        assert!(site.join("content/projects/sample-project.md").is_file());
        assert!(site.join("layouts").is_dir());

        let config = crate::config::load(&[site.join(DEFAULT_CONFIG_FILE)], &[]).unwrap();
        assert_eq!(config.site.title, "blog");
        assert!(config.navigation.main.is_empty());
    }

    #[test]
    fn test_init_refuses_existing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
