//! URL generation for content files
//!
//! A pure function of (file path, content type, content root): no I/O, so the
//! same source tree always maps to the same URLs.

use std::path::{Component, Path};

use super::ContentType;
use crate::helpers::split_date_prefix;

/// Compute the canonical URL for a content file.
///
/// - posts: `/posts/{stem}/`, with any `YYYY-MM-DD-` prefix removed
/// - projects: `/projects/{stem}/`
/// - pages: the path relative to `content_root` without extension; `index`
///   files map to their directory (`/` at the root)
pub fn generate_url(file_path: &Path, content_type: ContentType, content_root: &Path) -> String {
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match content_type {
        ContentType::Post => {
            let name = split_date_prefix(&stem)
                .map(|(_, rest)| rest.to_string())
                .unwrap_or(stem);
            format!("/posts/{}/", name)
        }
        ContentType::Project => format!("/projects/{}/", stem),
        ContentType::Page => {
            let relative = file_path.strip_prefix(content_root).unwrap_or(file_path);
            let mut parts: Vec<String> = relative
                .parent()
                .map(path_parts)
                .unwrap_or_default();

            if !stem.eq_ignore_ascii_case("index") {
                parts.push(stem);
            }

            if parts.is_empty() {
                "/".to_string()
            } else {
                format!("/{}/", parts.join("/"))
            }
        }
    }
}

/// Normal components of a relative path, as strings
fn path_parts(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn url(path: &str, content_type: ContentType, root: &str) -> String {
        generate_url(&PathBuf::from(path), content_type, &PathBuf::from(root))
    }

    #[test]
    fn test_post_date_prefix_stripped() {
        for date in ["2024-01-01", "1999-12-31", "2030-06-15"] {
            let path = format!("/site/content/posts/{}-hello-world.md", date);
            assert_eq!(
                url(&path, ContentType::Post, "/site/content/posts"),
                "/posts/hello-world/"
            );
        }
    }

    #[test]
    fn test_post_without_prefix() {
        assert_eq!(
            url("/site/content/posts/notes.md", ContentType::Post, "/site/content/posts"),
            "/posts/notes/"
        );
    }

    #[test]
    fn test_post_in_subdirectory_uses_stem() {
        assert_eq!(
            url(
                "/site/content/posts/2023/2023-05-01-trip.md",
                ContentType::Post,
                "/site/content/posts"
            ),
            "/posts/trip/"
        );
    }

    #[test]
    fn test_project_url() {
        assert_eq!(
            url("/site/content/projects/folio.md", ContentType::Project, "/site/content/projects"),
            "/projects/folio/"
        );
    }

    #[test]
    fn test_root_index_page() {
        assert_eq!(
            url("/site/content/pages/index.md", ContentType::Page, "/site/content/pages"),
            "/"
        );
        assert_eq!(
            url("/other/pages/index.md", ContentType::Page, "/other/pages"),
            "/"
        );
    }

    #[test]
    fn test_nested_index_page() {
        assert_eq!(
            url("/site/content/pages/docs/guide/index.md", ContentType::Page, "/site/content/pages"),
            "/docs/guide/"
        );
    }

    #[test]
    fn test_plain_pages_mirror_path() {
        assert_eq!(
            url("/site/content/pages/about.md", ContentType::Page, "/site/content/pages"),
            "/about/"
        );
        assert_eq!(
            url("/site/content/pages/docs/setup.md", ContentType::Page, "/site/content/pages"),
            "/docs/setup/"
        );
    }

    #[test]
    fn test_deterministic() {
        let a = url("/s/content/pages/x/y.md", ContentType::Page, "/s/content/pages");
        let b = url("/s/content/pages/x/y.md", ContentType::Page, "/s/content/pages");
        assert_eq!(a, b);
    }
}
