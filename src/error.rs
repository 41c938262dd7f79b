//! Error types for the context engine
//!
//! Neither error is fatal to an analysis run: loader failures drop the file
//! from the content map and manifest failures leave metadata at its defaults.

use thiserror::Error;

/// Failure to fetch one file's contents from the repository source
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is larger than the {limit} byte limit")]
    TooLarge { path: String, limit: u64 },
}

impl LoadError {
    /// Whether the file was simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound(_))
    }
}

/// Malformed dependency manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid package.json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid Cargo.toml: {0}")]
    Toml(#[from] toml::de::Error),
}
