//! Markdown rendering with heading anchors and syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::{html_escape, slugify};

/// Highlighting theme used for fenced code blocks
const HIGHLIGHT_THEME: &str = "base16-ocean.dark";

/// One heading in a page's table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: u8,
    pub id: String,
    pub title: String,
}

/// Result of rendering a Markdown document
#[derive(Debug, Clone, Default)]
pub struct RenderedMarkdown {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    highlight: bool,
}

impl MarkdownRenderer {
    /// Create a renderer; `highlight` toggles syntect highlighting of fenced code
    pub fn new(highlight: bool) -> Self {
        let (syntax_set, theme_set) = if highlight {
            (SyntaxSet::load_defaults_newlines(), ThemeSet::load_defaults())
        } else {
            (SyntaxSet::new(), ThemeSet::new())
        };

        Self {
            syntax_set,
            theme_set,
            highlight,
        }
    }

    /// Render markdown to HTML, assigning ids to headings that lack one
    pub fn render(&self, markdown: &str) -> RenderedMarkdown {
        // Front-matter is stripped before this point, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut toc = Vec::new();
        let mut used_ids: HashMap<String, usize> = HashMap::new();

        // Buffered heading: start index in `events` plus its plain text
        let mut heading: Option<(usize, String)> = None;
        // Inside a fenced/indented code block: language and collected source
        let mut code: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::Heading { .. }) => {
                    heading = Some((events.len(), String::new()));
                    events.push(event);
                }
                Event::End(TagEnd::Heading(level)) => {
                    if let Some((start, text)) = heading.take() {
                        let id = self.assign_heading_id(&mut events[start], &text, &mut used_ids);
                        toc.push(TocEntry {
                            level: heading_level(level),
                            id,
                            title: text.trim().to_string(),
                        });
                    }
                    events.push(Event::End(TagEnd::Heading(level)));
                }
                Event::Start(Tag::CodeBlock(kind)) if self.highlight => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            (!lang.is_empty()).then_some(lang)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) if code.is_some() => {
                    if let Some((lang, source)) = code.take() {
                        let highlighted = self.highlight_code(&source, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code.is_some() => {
                    if let Some((_, source)) = code.as_mut() {
                        source.push_str(&text);
                    }
                }
                Event::Text(ref text) | Event::Code(ref text) if heading.is_some() => {
                    if let Some((_, buf)) = heading.as_mut() {
                        buf.push_str(text);
                    }
                    events.push(event);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        RenderedMarkdown {
            html: html_output,
            toc,
        }
    }

    /// Give the buffered heading start event an id and return it
    fn assign_heading_id(
        &self,
        start: &mut Event,
        text: &str,
        used_ids: &mut HashMap<String, usize>,
    ) -> String {
        let Event::Start(Tag::Heading {
            level,
            id,
            classes,
            attrs,
        }) = start
        else {
            return String::new();
        };

        if let Some(existing) = id {
            let existing = existing.to_string();
            used_ids.entry(existing.clone()).or_insert(0);
            return existing;
        }

        let base = match slugify(text) {
            s if s.is_empty() => "section".to_string(),
            s => s,
        };
        let count = used_ids.entry(base.clone()).or_insert(0);
        let unique = if *count == 0 {
            base.clone()
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;

        *start = Event::Start(Tag::Heading {
            level: *level,
            id: Some(CowStr::from(unique.clone())),
            classes: std::mem::take(classes),
            attrs: std::mem::take(attrs),
        });
        unique
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme_set
            .themes
            .get(HIGHLIGHT_THEME)
            .and_then(|theme| highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok());

        match highlighted {
            Some(html) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                html_escape(lang),
                html
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new(false);
        let out = renderer.render("# Hello World\n\nThis is a test.");
        assert!(out.html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(out.html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_toc_entries_and_unique_ids() {
        let renderer = MarkdownRenderer::new(false);
        let out = renderer.render("## Setup\n\ntext\n\n## Setup\n\n### Install `cargo`\n");
        let ids: Vec<_> = out.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "install-cargo"]);
        assert_eq!(out.toc[2].level, 3);
        assert_eq!(out.toc[2].title, "Install cargo");
        assert!(out.html.contains(r#"<h2 id="setup-1">"#));
    }

    #[test]
    fn test_explicit_heading_id_kept() {
        let renderer = MarkdownRenderer::new(false);
        let out = renderer.render("## Intro {#start}\n");
        assert_eq!(out.toc[0].id, "start");
        assert!(out.html.contains(r#"id="start""#));
    }

    #[test]
    fn test_tables() {
        let renderer = MarkdownRenderer::new(false);
        let out = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.html.contains("<table>"));
    }

    #[test]
    fn test_plain_fenced_code_without_highlighting() {
        let renderer = MarkdownRenderer::new(false);
        let out = renderer.render("```rust\nfn main() {}\n```");
        assert!(out.html.contains(r#"<code class="language-rust">"#));
    }

    #[test]
    fn test_highlighted_code_block() {
        let renderer = MarkdownRenderer::new(true);
        let out = renderer.render("```rust\nfn main() {}\n```");
        assert!(out.html.contains(r#"class="highlight language-rust""#));
        assert!(out.html.contains("main"));
    }
}
