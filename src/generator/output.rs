//! Output tree helpers: cleaning, URL to file mapping, copying

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::PermalinkStyle;
use crate::error::BuildError;

/// Remove every child of `dir`, keeping the directory itself
pub fn clean_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {:?}", dir))? {
        let path = entry?.path();
        if path.is_dir() && !path.is_symlink() {
            fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove {:?}", path))?;
        } else {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
    }

    tracing::debug!("Cleaned {:?}", dir);
    Ok(())
}

/// File a page URL is written to.
///
/// `/` is always `index.html`; a URL ending in `.html` is used verbatim.
/// Otherwise pretty style writes `a/b/index.html` and flat style `a/b.html`.
pub fn output_path(
    output_dir: &Path,
    url: &str,
    style: PermalinkStyle,
) -> Result<PathBuf, BuildError> {
    if url.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(BuildError::UnsafeUrl(url.to_string()));
    }

    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(output_dir.join("index.html"));
    }
    if trimmed.ends_with(".html") {
        return Ok(output_dir.join(trimmed));
    }

    Ok(match style {
        PermalinkStyle::Pretty => output_dir.join(trimmed).join("index.html"),
        PermalinkStyle::Flat => output_dir.join(format!("{}.html", trimmed)),
    })
}

/// Write a file, creating parent directories
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Generated: {:?}", path);
    Ok(())
}

/// Copy every file under `src` to the same relative path under `dest`.
///
/// `skip` receives paths relative to `src`. Returns the number of files copied.
pub fn copy_tree(src: &Path, dest: &Path, skip: impl Fn(&Path) -> bool) -> Result<usize> {
    let mut count = 0;

    for entry in WalkDir::new(src)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let relative = path.strip_prefix(src)?;
        if skip(relative) {
            continue;
        }

        let target = dest.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)
            .with_context(|| format!("Failed to copy {:?} to {:?}", path, target))?;
        tracing::debug!("Copied: {:?} -> {:?}", path, target);
        count += 1;
    }

    Ok(count)
}
