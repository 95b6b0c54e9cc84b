//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a URL path, `/` excluded
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a URL path, keeping `/` separators
///
/// # Examples
/// ```ignore
/// encode_path("/tags/c sharp/") // -> "/tags/c%20sharp/"
/// ```
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

/// Join a base URL and a site path without doubling slashes
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/about/") // -> "https://example.com/about/"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Make sure a user supplied URL starts with `/`
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with('/') {
        url.to_string()
    } else {
        format!("/{}", url)
    }
}
