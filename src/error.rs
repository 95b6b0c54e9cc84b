//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Invalid YAML in `{0}`")]
    Yaml(PathBuf, #[source] serde_yaml::Error),

    #[error("Config does not match the expected schema")]
    Schema(#[source] serde_yaml::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Errors that stop a build or a single page
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No template directories found (searched: {})", display_paths(.0))]
    NoTemplates(Vec<PathBuf>),

    #[error("Template error")]
    Template(#[from] tera::Error),

    #[error("Refusing to write outside the output directory: {0}")]
    UnsafeUrl(String),
}

/// Render an error and its sources as one line
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
