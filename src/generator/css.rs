//! `style.css` generation from the theme section

use indexmap::IndexMap;
use serde_yaml::Value;

use crate::config::ThemeConfig;

/// CSS custom properties under `:root`, in config order.
///
/// `colors.primary` becomes `--color-primary`; nested maps keep joining keys
/// with hyphens, so `components.header.height` becomes
/// `--component-header-height`.
pub fn generate_css(theme: &ThemeConfig) -> String {
    let mut declarations = Vec::new();

    push_group(&mut declarations, "color", &theme.colors);
    push_group(&mut declarations, "font", &theme.fonts);
    push_group(&mut declarations, "layout", &theme.layout);
    push_group(&mut declarations, "component", &theme.components);

    let mut css = String::from(":root {\n");
    for (name, value) in declarations {
        css.push_str(&format!("  --{}: {};\n", name, value));
    }
    css.push_str("}\n");
    css
}

fn push_group(out: &mut Vec<(String, String)>, prefix: &str, map: &IndexMap<String, Value>) {
    for (key, value) in map {
        push_value(out, format!("{}-{}", prefix, key), value);
    }
}

fn push_value(out: &mut Vec<(String, String)>, name: String, value: &Value) {
    match value {
        Value::Mapping(map) => {
            for (key, nested) in map {
                if let Some(key) = scalar(key) {
                    push_value(out, format!("{}-{}", name, key), nested);
                }
            }
        }
        Value::Sequence(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar).collect();
            out.push((name, joined.join(", ")));
        }
        other => {
            if let Some(text) = scalar(other) {
                out.push((name, text));
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        _ => None,
    }
}
