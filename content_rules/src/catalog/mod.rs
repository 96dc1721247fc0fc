//! Content catalog - the read-only table of archetypes and tone text.
//!
//! A catalog is loaded once from a trusted source and shared by every
//! session. It is never mutated after load, so an `Arc<ContentCatalog>` can
//! be read from any thread without locking.

mod tones;

pub use tones::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::archetypes::Archetype;
use crate::dials::ToneAxis;
use crate::error::{CatalogError, CatalogResult};
use crate::threshold::Threshold;

const BUILTIN_CATALOG: &str = include_str!("../../assets/catalog.json");

/// All archetypes plus the shared tone tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCatalog {
    archetypes: BTreeMap<String, Archetype>,
    #[serde(flatten)]
    tones: ToneLevelCatalog,
    #[serde(skip_serializing_if = "Option::is_none")]
    climax: Option<ClimaxRule>,
}

/// On-disk shape of a catalog.
#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default, alias = "aliens")]
    archetypes: BTreeMap<String, Archetype>,
    #[serde(flatten)]
    tones: ToneLevelCatalog,
    #[serde(default)]
    climax: Option<ClimaxRule>,
}

impl ContentCatalog {
    /// Build a catalog, rejecting one with no archetypes.
    pub fn new(
        archetypes: BTreeMap<String, Archetype>,
        tones: ToneLevelCatalog,
    ) -> CatalogResult<Self> {
        if archetypes.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        Ok(Self {
            archetypes,
            tones,
            climax: None,
        })
    }

    /// Set the climax rule.
    pub fn with_climax(mut self, climax: ClimaxRule) -> Self {
        self.climax = Some(climax);
        self
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from JSON text.
    pub fn from_json_str(source: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_json::from_str(source)?;
        Self::from_file(file)
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml_str(source: &str) -> CatalogResult<Self> {
        let file: CatalogFile = toml::from_str(source)?;
        Self::from_file(file)
    }

    /// Load a catalog file, choosing the parser by extension.
    pub fn from_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Self::from_json_str(&source),
            Some("toml") => Self::from_toml_str(&source),
            _ => Err(CatalogError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn from_file(file: CatalogFile) -> CatalogResult<Self> {
        let mut catalog = Self::new(file.archetypes, file.tones)?;
        catalog.climax = file.climax;
        info!(
            archetypes = catalog.archetypes.len(),
            sex_levels = catalog.tones.sex.len(),
            violence_levels = catalog.tones.violence.len(),
            "content catalog loaded"
        );
        Ok(catalog)
    }

    /// Look up an archetype by key.
    pub fn archetype(&self, key: &str) -> Option<&Archetype> {
        self.archetypes.get(key)
    }

    /// Whether `key` names an archetype.
    pub fn contains(&self, key: &str) -> bool {
        self.archetypes.contains_key(key)
    }

    /// Archetype keys in ascending order.
    pub fn list_keys(&self) -> Vec<&str> {
        self.archetypes.keys().map(String::as_str).collect()
    }

    /// Number of archetypes.
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Always false for a constructed catalog.
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Archetype-independent tone tables.
    pub fn tones(&self) -> &ToneLevelCatalog {
        &self.tones
    }

    /// Base tone text for `axis` at `level`.
    pub fn tone_text(&self, axis: ToneAxis, level: Threshold) -> Option<&str> {
        self.tones.text(axis, level)
    }

    /// The climax rule, when the catalog defines one.
    pub fn climax(&self) -> Option<&ClimaxRule> {
        self.climax.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetypes::EvolutionStage;
    use crate::threshold::ThresholdMap;

    const LEGACY_JSON: &str = r#"{
        "aliens": {
            "shoggoth": {
                "name": "Shoggoth",
                "corePrompt": "A formless mass stalks the station.",
                "evolutions": {"0": "dormant", "50": "stirring", "100": "rampant"}
            }
        },
        "sexLevelDescriptions": {"0": "coy", "1": "forward"},
        "violenceLevelDescriptions": {"0": "bloodless", "1": "bloody"}
    }"#;

    #[test]
    fn test_load_legacy_json() {
        let catalog = ContentCatalog::from_json_str(LEGACY_JSON).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.list_keys(), vec!["shoggoth"]);
        assert_eq!(catalog.tone_text(ToneAxis::Sex, 1), Some("forward"));
        assert_eq!(catalog.tone_text(ToneAxis::Violence, 2), Some("bloody"));
        assert!(catalog.climax().is_none());

        let shoggoth = catalog.archetype("shoggoth").unwrap();
        assert_eq!(shoggoth.stage_at(55).unwrap().description, "stirring");
    }

    #[test]
    fn test_load_toml() {
        let catalog = ContentCatalog::from_toml_str(
            r#"
            [climax]
            threshold = 75
            fragment = "It is everywhere now."

            [sex]
            0 = "coy"

            [violence]
            0 = "bloodless"

            [archetypes.mimic]
            name = "Mimic"
            corePrompt = "Someone aboard is not who they seem."

            [archetypes.mimic.evolutions]
            0 = "hiding"
            40 = { description = "slipping", violenceToneOverrides = { 0 = "but cold" } }
            "#,
        )
        .unwrap();

        let mimic = catalog.archetype("mimic").unwrap();
        assert_eq!(mimic.stage_at(10).unwrap().description, "hiding");
        assert_eq!(
            mimic
                .stage_at(40)
                .unwrap()
                .override_for(ToneAxis::Violence, 0),
            Some("but cold")
        );
        assert_eq!(catalog.climax().unwrap().threshold, 75);
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let err = ContentCatalog::from_json_str(r#"{"aliens": {}}"#).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCatalog));

        let err = ContentCatalog::new(BTreeMap::new(), ToneLevelCatalog::default()).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyCatalog));
    }

    #[test]
    fn test_malformed_json() {
        let err = ContentCatalog::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = std::env::temp_dir().join(format!("content_rules_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let json_path = dir.join("catalog.json");
        std::fs::write(&json_path, LEGACY_JSON).unwrap();
        let catalog = ContentCatalog::from_path(&json_path).unwrap();
        assert!(catalog.contains("shoggoth"));

        let yaml_path = dir.join("catalog.yaml");
        std::fs::write(&yaml_path, "aliens: {}").unwrap();
        let err = ContentCatalog::from_path(&yaml_path).unwrap_err();
        assert!(matches!(err, CatalogError::UnsupportedFormat(_)));

        let missing = ContentCatalog::from_path(dir.join("missing.json")).unwrap_err();
        assert!(matches!(missing, CatalogError::Io { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = ContentCatalog::builtin().unwrap();
        assert!(catalog.contains("shoggoth"));
        assert!(catalog.len() >= 2);
        assert!(catalog.climax().is_some());
        for key in catalog.list_keys() {
            let archetype = catalog.archetype(key).unwrap();
            assert!(!archetype.core_prompt.is_empty());
            assert!(archetype.stage_at(0).is_some(), "{key} has no stage at 0");
        }
        for level in 0..=3 {
            assert!(catalog.tone_text(ToneAxis::Sex, level).is_some());
        }
        for level in 0..=2 {
            assert!(catalog.tone_text(ToneAxis::Violence, level).is_some());
        }
    }

    #[test]
    fn test_programmatic_catalog() {
        let mut archetypes = BTreeMap::new();
        archetypes.insert(
            "echo".to_string(),
            Archetype::new("Echo", "A voice repeats.").with_stage(0, EvolutionStage::new("faint")),
        );
        let catalog = ContentCatalog::new(
            archetypes,
            ToneLevelCatalog::new(ThresholdMap::new(), ThresholdMap::new()),
        )
        .unwrap()
        .with_climax(ClimaxRule::new(10, "loud"));

        assert!(catalog.contains("echo"));
        assert!(!catalog.contains("shoggoth"));
        assert_eq!(catalog.climax().unwrap().fragment, "loud");
    }
}
