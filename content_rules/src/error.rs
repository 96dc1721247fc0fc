//! Catalog loading errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source parsed, but holds no archetype a session could bind to.
    #[error("content catalog contains no archetypes")]
    EmptyCatalog,

    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read catalog from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported catalog format for {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
