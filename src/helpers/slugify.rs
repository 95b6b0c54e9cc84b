use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_SLUG_RE: Regex = Regex::new(r"[^a-z0-9\-]").unwrap();
    static ref HYPHENS_RE: Regex = Regex::new(r"-+").unwrap();
}

/// Normalize text into a URL slug.
///
/// Lowercases, turns whitespace runs into `-`, drops everything outside
/// `[a-z0-9-]`, collapses hyphen runs and trims hyphens from both ends.
pub fn slugify(value: &str) -> String {
    let value = value.to_lowercase();
    let value = WHITESPACE_RE.replace_all(&value, "-");
    let value = NON_SLUG_RE.replace_all(&value, "");
    let value = HYPHENS_RE.replace_all(&value, "-");
    value.trim_matches('-').to_string()
}

/// URL segment for a taxonomy term.
///
/// Uses [`slugify`]; a term with nothing left after that (`日本語`) is
/// transliterated to ASCII instead, so every nameable term gets a page.
pub fn term_slug(term: &str) -> String {
    let strict = slugify(term);
    if strict.is_empty() {
        slug::slugify(term)
    } else {
        strict
    }
}

/// Uppercase the first character (`posts` -> `Posts`)
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
