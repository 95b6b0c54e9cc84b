//! `sitemap.xml` generation (Sitemap protocol 0.9)

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::output::write_file;
use crate::helpers::{encode_path, escape_xml, full_url};

/// Walk the emitted HTML files and write `{output}/sitemap.xml`.
///
/// Returns the number of URLs listed.
pub fn generate_sitemap(output_dir: &Path, base_url: &str) -> Result<usize> {
    let mut entries = Vec::new();

    for entry in WalkDir::new(output_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        let is_html = path.extension().map(|e| e == "html").unwrap_or(false);
        if !path.is_file() || !is_html {
            continue;
        }

        let relative = path.strip_prefix(output_dir)?;
        let loc = full_url(base_url, &encode_path(&page_url(relative)));
        let lastmod = fs::metadata(path)
            .and_then(|m| m.modified())
            .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d").to_string())
            .ok();

        entries.push((loc, lastmod));
    }

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for (loc, lastmod) in &entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
        if let Some(lastmod) = lastmod {
            xml.push_str(&format!("    <lastmod>{}</lastmod>\n", lastmod));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");

    write_file(&output_dir.join("sitemap.xml"), xml)?;
    tracing::info!("Generated sitemap.xml ({} URLs)", entries.len());
    Ok(entries.len())
}

/// Site path of an output file; `index.html` maps to its directory
fn page_url(relative: &Path) -> String {
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    match parts.split_last() {
        Some((last, dirs)) if last == "index.html" => {
            if dirs.is_empty() {
                "/".to_string()
            } else {
                format!("/{}/", dirs.join("/"))
            }
        }
        _ => format!("/{}", parts.join("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_page_url() {
        assert_eq!(page_url(Path::new("index.html")), "/");
        assert_eq!(page_url(Path::new("posts/hello/index.html")), "/posts/hello/");
        assert_eq!(page_url(Path::new("docs/setup.html")), "/docs/setup.html");
    }

    #[test]
    fn test_sitemap_lists_html_files_in_order() {
        let dir = TempDir::new().unwrap();
        let out = dir.path();
        write_file(&out.join("index.html"), "home").unwrap();
        write_file(&out.join("tags/c sharp/index.html"), "tag").unwrap();
        write_file(&out.join("about/index.html"), "about").unwrap();
        write_file(&out.join("style.css"), "css").unwrap();

        let count = generate_sitemap(out, "https://example.com/").unwrap();
        assert_eq!(count, 3);

        let xml = fs::read_to_string(out.join("sitemap.xml")).unwrap();
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert!(xml.contains("<loc>https://example.com/tags/c%20sharp/</loc>"));
        assert!(!xml.contains("style.css"));

        let about = xml.find("https://example.com/about/").unwrap();
        let home = xml.find("<loc>https://example.com/</loc>").unwrap();
        let tags = xml.find("https://example.com/tags/").unwrap();
        assert!(about < home && home < tags);
        assert_eq!(xml.matches("<lastmod>").count(), 3);
    }
}
