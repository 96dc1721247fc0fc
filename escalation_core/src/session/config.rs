//! Session configuration - turns host options into resolved dial values.

use content_rules::{ContentCatalog, CatalogError, Pacing, SexLevel, Threshold, ViolenceLevel};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::EscalationResult;
use crate::persistence::ChatState;

/// Options as the host's configuration UI supplies them. Every value is a
/// name to be looked up; unknown names fall back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    pub archetype: Option<String>,
    pub pacing: Option<String>,
    pub sex_level: Option<String>,
    pub violence_level: Option<String>,
}

impl SessionOptions {
    /// Parse options from a TOML settings file.
    pub fn from_toml_str(source: &str) -> EscalationResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse options from JSON text.
    pub fn from_json_str(source: &str) -> EscalationResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read options from a host configuration object. Non-string values are
    /// treated as unset.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            archetype: field("archetype"),
            pacing: field("pacing"),
            sex_level: field("sex_level"),
            violence_level: field("violence_level"),
        }
    }
}

/// Values used when the host leaves an option unset or unrecognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDefaults {
    pub archetype_key: Option<String>,
    pub pacing: Pacing,
    pub sex_level: SexLevel,
    pub violence_level: ViolenceLevel,
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            archetype_key: Some("shoggoth".to_string()),
            pacing: Pacing::Deliberate,
            sex_level: SexLevel::Rakish,
            violence_level: ViolenceLevel::Bloody,
        }
    }
}

/// Where the session's archetype came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchetypeSource {
    Explicit,
    ChatState,
    Default,
    Random,
}

/// Resolved dial values for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Escalation gained per turn.
    pub pacing_rate: Threshold,
    pub sex_level: Threshold,
    pub violence_level: Threshold,
    pub archetype_key: String,
    pub archetype_source: ArchetypeSource,
}

impl SessionConfig {
    /// Build a config directly from dial values.
    ///
    /// The caller names the archetype, so the source is `Explicit`; use
    /// [`with_archetype_source`](Self::with_archetype_source) when the key
    /// came from somewhere else.
    pub fn new(
        archetype_key: impl Into<String>,
        pacing_rate: Threshold,
        sex_level: Threshold,
        violence_level: Threshold,
    ) -> Self {
        Self {
            pacing_rate,
            sex_level,
            violence_level,
            archetype_key: archetype_key.into(),
            archetype_source: ArchetypeSource::Explicit,
        }
    }

    /// Record where the archetype key came from.
    pub fn with_archetype_source(mut self, source: ArchetypeSource) -> Self {
        self.archetype_source = source;
        self
    }

    /// Resolve options against the catalog.
    ///
    /// Archetype precedence, highest first: explicit option, persisted chat
    /// selection, configured default, uniform random choice. A candidate the
    /// catalog does not contain is skipped. Dials come from the options or
    /// the defaults; persisted state never overrides them.
    pub fn resolve(
        options: &SessionOptions,
        chat_state: Option<&ChatState>,
        catalog: &ContentCatalog,
        defaults: &SessionDefaults,
        rng: &mut impl Rng,
    ) -> EscalationResult<Self> {
        let (archetype_key, archetype_source) =
            select_archetype(options, chat_state, catalog, defaults, rng)?;

        let pacing = dial(options.pacing.as_deref(), "pacing", Pacing::from_name)
            .unwrap_or(defaults.pacing);
        let sex_level = dial(options.sex_level.as_deref(), "sex_level", SexLevel::from_name)
            .unwrap_or(defaults.sex_level);
        let violence_level = dial(
            options.violence_level.as_deref(),
            "violence_level",
            ViolenceLevel::from_name,
        )
        .unwrap_or(defaults.violence_level);

        debug!(
            archetype = %archetype_key,
            source = ?archetype_source,
            pacing = pacing.name(),
            sex_level = sex_level.name(),
            violence_level = violence_level.name(),
            "session configuration resolved"
        );

        Ok(Self {
            pacing_rate: pacing.rate(),
            sex_level: sex_level.level(),
            violence_level: violence_level.level(),
            archetype_key,
            archetype_source,
        })
    }
}

fn select_archetype(
    options: &SessionOptions,
    chat_state: Option<&ChatState>,
    catalog: &ContentCatalog,
    defaults: &SessionDefaults,
    rng: &mut impl Rng,
) -> EscalationResult<(String, ArchetypeSource)> {
    let candidates = [
        (options.archetype.as_deref(), ArchetypeSource::Explicit),
        (
            chat_state.and_then(|chat| chat.alien_key.as_deref()),
            ArchetypeSource::ChatState,
        ),
        (defaults.archetype_key.as_deref(), ArchetypeSource::Default),
    ];

    for (key, source) in candidates {
        let Some(key) = key else { continue };
        if catalog.contains(key) {
            return Ok((key.to_string(), source));
        }
        warn!(archetype = %key, source = ?source, "archetype not in catalog, trying next");
    }

    let keys = catalog.list_keys();
    let key = keys.choose(rng).ok_or(CatalogError::EmptyCatalog)?;
    Ok((key.to_string(), ArchetypeSource::Random))
}

fn dial<T>(name: Option<&str>, option: &str, lookup: fn(&str) -> Option<T>) -> Option<T> {
    let name = name?;
    let value = lookup(name);
    if value.is_none() {
        warn!(option, value = %name, "unrecognized dial value, using default");
    }
    value
}
