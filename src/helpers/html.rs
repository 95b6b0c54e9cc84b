//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
}

/// Appended to truncated excerpts
pub const ELLIPSIS: &str = "...";

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    TAG_RE.replace_all(s, "").into_owned()
}

/// Plain-text excerpt of rendered HTML.
///
/// Text longer than `length` characters is cut at the last whitespace inside
/// the budget and gets [`ELLIPSIS`] appended, so the result never exceeds
/// `length + ELLIPSIS.len()` characters.
pub fn excerpt(html: &str, length: usize) -> String {
    let text = strip_html(html);
    let text = text.trim();

    if text.chars().count() <= length {
        return text.to_string();
    }

    let truncated: String = text.chars().take(length).collect();
    let cut = match truncated.rfind(char::is_whitespace) {
        Some(pos) if !truncated[..pos].trim_end().is_empty() => truncated[..pos].trim_end(),
        _ => truncated.as_str(),
    };

    format!("{}{}", cut, ELLIPSIS)
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape XML special characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
