//! Custom Tera filters

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Filter, Result, Value};

use crate::content::MarkdownRenderer;
use crate::helpers::{format_date, parse_date_string, slugify, term_slug, DEFAULT_DATE_FORMAT};

/// Register every filter on a Tera instance
pub fn register(tera: &mut tera::Tera, markdown: Arc<MarkdownRenderer>) {
    tera.register_filter("date_format", date_format_filter);
    tera.register_filter("slugify", slugify_filter);
    tera.register_filter("limit", limit_filter);
    tera.register_filter("sort_by", sort_by_filter);
    tera.register_filter("where", where_filter);
    tera.register_filter("term_slug", term_slug_filter);
    tera.register_filter("markdown", MarkdownFilter { renderer: markdown });
}

/// Tera filter: render a string as Markdown.
///
/// The output is HTML, so it is marked safe and skips autoescaping.
struct MarkdownFilter {
    renderer: Arc<MarkdownRenderer>,
}

impl Filter for MarkdownFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
        let source = scalar_string(value);
        if source.is_empty() {
            return Ok(Value::String(String::new()));
        }
        Ok(Value::String(self.renderer.render(&source).html))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Tera filter: reformat a date string.
///
/// Strings that do not parse as a date pass through unchanged.
fn date_format_filter(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => DEFAULT_DATE_FORMAT.to_string(),
    };

    let s = match value {
        Value::Null => return Ok(Value::String(String::new())),
        Value::String(s) => s.clone(),
        other => return Ok(other.clone()),
    };

    match parse_date_string(&s) {
        Some(date) => Ok(Value::String(format_date(&date, &format))),
        None => Ok(Value::String(s)),
    }
}

/// Tera filter: slug for URLs
fn slugify_filter(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(slugify(&scalar_string(value))))
}

/// Tera filter: URL segment of a taxonomy term, as used for term pages
fn term_slug_filter(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    Ok(Value::String(term_slug(&scalar_string(value))))
}

/// Tera filter: first `n` elements (default 10)
fn limit_filter(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let n = match args.get("n") {
        Some(val) => tera::try_get_value!("limit", "n", usize, val),
        None => 10,
    };

    match value {
        Value::Array(items) => Ok(Value::Array(items.iter().take(n).cloned().collect())),
        _ => Ok(Value::Array(Vec::new())),
    }
}

/// Tera filter: stable sort of objects by a key
fn sort_by_filter(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let key = match args.get("key") {
        Some(val) => tera::try_get_value!("sort_by", "key", String, val),
        None => return Err(tera::Error::msg("Filter `sort_by` expected an arg called `key`")),
    };
    let reverse = match args.get("reverse") {
        Some(val) => tera::try_get_value!("sort_by", "reverse", bool, val),
        None => false,
    };

    let Value::Array(items) = value else {
        return Ok(Value::Array(Vec::new()));
    };

    let mut items = items.clone();
    items.sort_by(|a, b| {
        let ordering = compare_values(a.get(&key), b.get(&key));
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    Ok(Value::Array(items))
}

/// Tera filter: keep objects whose `key` equals `value`, or is truthy
fn where_filter(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let key = match args.get("key") {
        Some(val) => tera::try_get_value!("where", "key", String, val),
        None => return Err(tera::Error::msg("Filter `where` expected an arg called `key`")),
    };
    let expected = args.get("value");

    let Value::Array(items) = value else {
        return Ok(Value::Array(Vec::new()));
    };

    let kept = items
        .iter()
        .filter(|item| match (item.get(&key), expected) {
            (Some(actual), Some(expected)) => actual == expected,
            (Some(actual), None) => is_truthy(actual),
            (None, _) => false,
        })
        .cloned()
        .collect();
    Ok(Value::Array(kept))
}

/// Missing keys sort as the empty string; numbers compare numerically
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (a, b) => sort_string(a).cmp(&sort_string(b)),
    }
}

fn sort_string(value: Option<&Value>) -> String {
    value.map(scalar_string).unwrap_or_default()
}

fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_date_format() {
        let out = date_format_filter(&json!("2024-01-15T10:30:00"), &args(&[])).unwrap();
        assert_eq!(out, json!("January 15, 2024"));

        let out = date_format_filter(
            &json!("2024-01-15"),
            &args(&[("format", json!("%d/%m/%Y"))]),
        )
        .unwrap();
        assert_eq!(out, json!("15/01/2024"));

        let out = date_format_filter(&json!("someday"), &args(&[])).unwrap();
        assert_eq!(out, json!("someday"));

        let out = date_format_filter(&Value::Null, &args(&[])).unwrap();
        assert_eq!(out, json!(""));
    }

    #[test]
    fn test_slugify() {
        let out = slugify_filter(&json!("Hello, World!"), &args(&[])).unwrap();
        assert_eq!(out, json!("hello-world"));
        let out = slugify_filter(&json!(2024), &args(&[])).unwrap();
        assert_eq!(out, json!("2024"));
    }

    #[test]
    fn test_limit() {
        let list = json!([1, 2, 3, 4]);
        assert_eq!(
            limit_filter(&list, &args(&[("n", json!(2))])).unwrap(),
            json!([1, 2])
        );
        assert_eq!(limit_filter(&list, &args(&[])).unwrap(), list);
        assert_eq!(limit_filter(&json!("abc"), &args(&[])).unwrap(), json!([]));
    }

    #[test]
    fn test_sort_by_is_stable_and_reversible() {
        let list = json!([
            {"t": "b", "n": 1},
            {"t": "a", "n": 2},
            {"n": 3},
            {"t": "a", "n": 4}
        ]);

        let sorted = sort_by_filter(&list, &args(&[("key", json!("t"))])).unwrap();
        let order: Vec<_> = sorted
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["n"].as_i64().unwrap())
            .collect();
        assert_eq!(order, vec![3, 2, 4, 1]);

        let sorted = sort_by_filter(
            &list,
            &args(&[("key", json!("n")), ("reverse", json!(true))]),
        )
        .unwrap();
        assert_eq!(sorted[0]["n"], json!(4));

        assert!(sort_by_filter(&list, &args(&[])).is_err());
    }

    #[test]
    fn test_where() {
        let list = json!([
            {"title": "a", "featured": true, "kind": "post"},
            {"title": "b", "featured": false, "kind": "page"},
            {"title": "c", "kind": "post"}
        ]);

        let out = where_filter(&list, &args(&[("key", json!("featured"))])).unwrap();
        assert_eq!(out.as_array().unwrap().len(), 1);

        let out = where_filter(
            &list,
            &args(&[("key", json!("kind")), ("value", json!("post"))]),
        )
        .unwrap();
        let titles: Vec<_> = out
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
    }

    #[test]
    fn test_filters_in_template() {
        let mut tera = tera::Tera::default();
        register(&mut tera, Arc::new(MarkdownRenderer::new(false)));
        tera.add_raw_template(
            "t.html",
            "{{ title | slugify }}|{{ body | markdown }}|{{ items | limit(n=1) | length }}|{{ tag | term_slug }}|{{ title }}",
        )
        .unwrap();

        let mut context = tera::Context::new();
        context.insert("title", "My <Post>");
        context.insert("body", "*hi*");
        context.insert("items", &vec![1, 2, 3]);
        context.insert("tag", "Rust Lang");

        // markdown output is safe under autoescape, plain strings are escaped
        let out = tera.render("t.html", &context).unwrap();
        assert_eq!(
            out,
            "my-post|<p><em>hi</em></p>\n|1|rust-lang|My &lt;Post&gt;"
        );
    }
}
