//! End-to-end builds against temporary sites

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use folio::error::BuildError;
use folio::{BuildOptions, Folio};

fn write(root: &Path, path: &str, contents: &str) {
    let path = root.join(path);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn sample_site() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(
        root,
        "content/pages/index.md",
        "---\ntitle: Home\n---\n\nWelcome home.\n",
    );
    write(
        root,
        "content/posts/2024-01-01-hello.md",
        "---\ntitle: Hello\ntags: [intro]\n---\n\nFirst post.\n",
    );
    dir
}

fn html_files(output: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(output)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().map(|x| x == "html").unwrap_or(false))
        .map(|e| {
            let relative = e.path().strip_prefix(output).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn test_build_default_site() {
    let site = sample_site();
    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    let summary = folio.build().unwrap();

    let out = site.path().join("_site");
    assert!(out.join("index.html").is_file());
    assert!(out.join("posts/hello/index.html").is_file());
    assert!(out.join("posts/index.html").is_file());
    assert!(out.join("tags/index.html").is_file());
    assert!(out.join("style.css").is_file());
    assert!(out.join("search.json").is_file());
    assert!(out.join("theme/css/main.css").is_file());
    // no site.url, no sitemap
    assert!(!out.join("sitemap.xml").exists());

    let tag_page = fs::read_to_string(out.join("tags/intro/index.html")).unwrap();
    assert!(tag_page.contains("/posts/hello/"));
    assert!(tag_page.contains("Hello"));

    let post = fs::read_to_string(out.join("posts/hello/index.html")).unwrap();
    assert!(post.contains("<p>First post.</p>"));

    assert_eq!(summary.content_pages, 2);
    assert!(summary.taxonomy_pages >= 2);
    assert_eq!(summary.list_pages, 1);
}

#[test]
fn test_builds_are_repeatable() {
    let site = sample_site();
    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    let out = site.path().join("_site");

    folio.build().unwrap();
    let first = html_files(&out);
    folio.build().unwrap();
    let second = html_files(&out);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_build_cleans_stale_output() {
    let site = sample_site();
    write(site.path(), "_site/stale.html", "old");

    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    folio.build().unwrap();

    assert!(!site.path().join("_site/stale.html").exists());
}

#[test]
fn test_config_and_style_files() {
    let site = sample_site();
    write(
        site.path(),
        "folio.yml",
        "site:\n  title: Notes\n  url: https://example.com\nbuild:\n  permalink_style: flat\n",
    );
    write(site.path(), "style.yml", "colors:\n  primary: \"#ff0000\"\n");

    let options = BuildOptions {
        config_files: vec![site.path().join("folio.yml")],
        style_files: vec![site.path().join("style.yml")],
        output: Some(site.path().join("public")),
    };
    let folio = Folio::open(site.path(), &options).unwrap();
    assert_eq!(folio.config.site.title, "Notes");
    folio.build().unwrap();

    let out = site.path().join("public");
    assert!(out.join("posts/hello.html").is_file());
    assert!(out.join("index.html").is_file());

    let css = fs::read_to_string(out.join("style.css")).unwrap();
    assert!(css.contains("--color-primary: #ff0000;"));

    let sitemap = fs::read_to_string(out.join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://example.com/posts/hello.html</loc>"));
}

#[test]
fn test_site_layouts_override_theme() {
    let site = sample_site();
    write(
        site.path(),
        "layouts/post.html",
        "<article>{{ page.title }}|{{ content | safe }}</article>",
    );

    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    folio.build().unwrap();

    let post = fs::read_to_string(site.path().join("_site/posts/hello/index.html")).unwrap();
    assert_eq!(post, "<article>Hello|<p>First post.</p>\n</article>");
}

#[test]
fn test_missing_theme_without_layouts_is_fatal() {
    let site = sample_site();
    write(site.path(), "folio.yml", "theme:\n  name: nonexistent\n");

    let err = match Folio::open(site.path(), &BuildOptions::default()) {
        Ok(_) => panic!("expected a template error"),
        Err(e) => e,
    };
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::NoTemplates(_))
    ));
}

#[test]
fn test_broken_layout_does_not_stop_build() {
    let site = sample_site();
    write(site.path(), "layouts/gallery.html", "{% if %}broken");
    write(
        site.path(),
        "content/pages/photos.md",
        "---\ntitle: Photos\nlayout: gallery\n---\n\nSome photos.\n",
    );

    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    folio.build().unwrap();

    let out = site.path().join("_site");
    assert!(out.join("index.html").is_file());
    let photos = fs::read_to_string(out.join("photos/index.html")).unwrap();
    assert!(photos.contains("<p>Some photos.</p>"));
}

#[test]
fn test_non_ascii_tags_get_transliterated_pages() {
    let site = sample_site();
    write(
        site.path(),
        "content/posts/2024-02-01-kana.md",
        "---\ntitle: Kana\ntags: [intro, 日本語]\n---\n\nBody.\n",
    );

    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    folio.build().unwrap();

    let slug = folio::helpers::term_slug("日本語");
    assert!(!slug.is_empty());

    let out = site.path().join("_site");
    let tag_page = fs::read_to_string(out.join("tags").join(&slug).join("index.html")).unwrap();
    assert!(tag_page.contains("/posts/kana/"));

    let post = fs::read_to_string(out.join("posts/kana/index.html")).unwrap();
    assert!(!post.contains("/tags//"));
    assert!(post.contains(&format!("/tags/{}/", slug)));
}

#[test]
fn test_titles_are_escaped_in_html() {
    let site = sample_site();
    write(
        site.path(),
        "content/posts/2024-03-01-generics.md",
        "---\ntitle: \"Vec<T> & you\"\n---\n\nUse `Vec<T>` freely.\n",
    );

    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    folio.build().unwrap();

    let post = fs::read_to_string(site.path().join("_site/posts/generics/index.html")).unwrap();
    assert!(post.contains("Vec&lt;T&gt; &amp; you"));
    assert!(!post.contains("<h1>Vec<T>"));
    assert!(post.contains("<code>Vec&lt;T&gt;</code>"));
}

#[test]
fn test_content_page_keeps_term_url() {
    let site = sample_site();
    write(
        site.path(),
        "content/pages/intro.md",
        "---\ntitle: About intro\nurl: /tags/intro/\n---\n\nHand written.\n",
    );

    let folio = Folio::open(site.path(), &BuildOptions::default()).unwrap();
    folio.build().unwrap();

    let page = fs::read_to_string(site.path().join("_site/tags/intro/index.html")).unwrap();
    assert!(page.contains("<p>Hand written.</p>"));
}
