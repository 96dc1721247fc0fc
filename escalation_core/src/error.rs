//! Error types for the escalation core.

use content_rules::CatalogError;
use thiserror::Error;

/// Failures that stop a session from starting.
///
/// Per-turn problems never surface here: lookups that miss fall back to
/// documented defaults instead.
#[derive(Debug, Error)]
pub enum EscalationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid session options: {0}")]
    Options(#[from] toml::de::Error),

    #[error("invalid session options: {0}")]
    OptionsJson(#[from] serde_json::Error),
}

/// A restored or re-bound archetype key that the catalog does not know.
///
/// Recoverable: the engine has already switched to `fallback` when this is
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("archetype '{requested}' is not in the catalog, using '{fallback}'")]
pub struct UnknownArchetype {
    pub requested: String,
    pub fallback: String,
}

pub type EscalationResult<T> = Result<T, EscalationError>;
