//! Loading and deep-merging YAML configuration documents

use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use super::SiteConfig;
use crate::error::{error_chain, ConfigError};

/// Merge `overlay` into `base`.
///
/// Maps merge key by key, recursing where both sides hold a map. Any other
/// value in `overlay` (scalars, sequences, null) replaces the base value.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Load site config documents and style documents over the defaults.
///
/// Site documents merge at the root; style documents merge into the `theme`
/// section. Missing files are skipped with a warning.
pub fn load(config_paths: &[PathBuf], style_paths: &[PathBuf]) -> Result<SiteConfig, ConfigError> {
    let mut tree = serde_yaml::to_value(SiteConfig::default()).map_err(ConfigError::Schema)?;

    for path in config_paths {
        if let Some(doc) = read_document(path)? {
            deep_merge(&mut tree, doc);
            tracing::info!("Configuration loaded from {}", path.display());
        }
    }

    for path in style_paths {
        if let Some(doc) = read_document(path)? {
            let mut wrapper = Mapping::new();
            wrapper.insert(Value::from("theme"), doc);
            deep_merge(&mut tree, Value::Mapping(wrapper));
            tracing::info!("Style configuration loaded from {}", path.display());
        }
    }

    let mut config: SiteConfig = serde_yaml::from_value(tree).map_err(ConfigError::Schema)?;
    validate(&mut config)?;
    Ok(config)
}

/// Like [`load`], but any error falls back to the built-in defaults
pub fn load_or_default(config_paths: &[PathBuf], style_paths: &[PathBuf]) -> SiteConfig {
    match load(config_paths, style_paths) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}. Using default configuration.", error_chain(&e));
            SiteConfig::default()
        }
    }
}

/// Check invariants and normalize values the rest of the pipeline relies on
pub fn validate(config: &mut SiteConfig) -> Result<(), ConfigError> {
    if config.site.title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site.title must not be empty".to_string(),
        ));
    }

    if config.content.settings.excerpt_length == 0 {
        return Err(ConfigError::Validation(
            "content.settings.excerpt_length must be positive".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for taxonomy in &mut config.content.taxonomies {
        if taxonomy.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "taxonomy names must not be empty".to_string(),
            ));
        }
        if !seen.insert(taxonomy.name.clone()) {
            return Err(ConfigError::Validation(format!(
                "taxonomy `{}` is defined twice",
                taxonomy.name
            )));
        }
        taxonomy.path = normalize_prefix(&taxonomy.path, &taxonomy.name);
    }

    Ok(())
}

/// Read one YAML document. `Ok(None)` when the file does not exist.
fn read_document(path: &Path) -> Result<Option<Value>, ConfigError> {
    if !path.exists() {
        tracing::warn!("Config file not found at {}", path.display());
        return Ok(None);
    }

    let content =
        fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    let value: Value =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Yaml(path.to_path_buf(), e))?;

    match value {
        Value::Null => Ok(Some(Value::Mapping(Mapping::new()))),
        Value::Mapping(_) => Ok(Some(value)),
        _ => Err(ConfigError::Validation(format!(
            "{} must contain a mapping at the top level",
            path.display()
        ))),
    }
}

/// `tags` -> `/tags/`, `/tags` -> `/tags/`
fn normalize_prefix(path: &str, fallback: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    let trimmed = if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    };
    format!("/{}/", trimmed)
}
