use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),
}

/// Failures of a naming strategy. These indicate a misconfigured generator
/// and abort the resolution session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("type name mapping produces an invalid identifier: {from} -> {to}")]
    InvalidMapping { from: String, to: String },

    #[error("type name generator returned an invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("type name generator returned a name that is already assigned: {0}")]
    Collision(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("naming failed: {0}")]
    Naming(#[from] NamingError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml_ng::Error,
    },
}
