//! Evolution stages - the narrative phases an archetype moves through.

use serde::{Deserialize, Serialize};

use crate::dials::ToneAxis;
use crate::threshold::{Threshold, ThresholdMap};

/// A narrative phase, keyed in its archetype by the escalation score at which
/// it becomes active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StageRepr")]
pub struct EvolutionStage {
    pub description: String,

    /// Extra sexual-tone text, appended to the global tone text.
    #[serde(rename = "sexToneOverrides", skip_serializing_if = "Option::is_none")]
    pub sex_tone_overrides: Option<ThresholdMap<String>>,

    /// Extra violence-tone text, appended to the global tone text.
    #[serde(
        rename = "violenceToneOverrides",
        skip_serializing_if = "Option::is_none"
    )]
    pub violence_tone_overrides: Option<ThresholdMap<String>>,
}

impl EvolutionStage {
    /// Create a stage with a description and no overrides.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    /// Add a sexual-tone override at the given tone level.
    pub fn with_sex_override(mut self, level: Threshold, text: impl Into<String>) -> Self {
        self.sex_tone_overrides
            .get_or_insert_with(ThresholdMap::new)
            .insert(level, text.into());
        self
    }

    /// Add a violence-tone override at the given tone level.
    pub fn with_violence_override(mut self, level: Threshold, text: impl Into<String>) -> Self {
        self.violence_tone_overrides
            .get_or_insert_with(ThresholdMap::new)
            .insert(level, text.into());
        self
    }

    /// Override table for one tone axis, if the stage has one.
    pub fn overrides(&self, axis: ToneAxis) -> Option<&ThresholdMap<String>> {
        match axis {
            ToneAxis::Sex => self.sex_tone_overrides.as_ref(),
            ToneAxis::Violence => self.violence_tone_overrides.as_ref(),
        }
    }

    /// Override text for one tone axis at `level`.
    pub fn override_for(&self, axis: ToneAxis, level: Threshold) -> Option<&str> {
        self.overrides(axis)
            .and_then(|table| table.resolve(level))
            .map(String::as_str)
    }
}

/// Every shape a stage has been written in by content authors.
#[derive(Deserialize)]
#[serde(untagged)]
enum StageRepr {
    /// Older catalogs store a stage as its bare description.
    Flat(String),
    Structured(StructuredStage),
}

#[derive(Deserialize)]
struct StructuredStage {
    #[serde(default)]
    description: String,
    #[serde(default, alias = "sexToneOverrides", alias = "sexLevelDescriptions")]
    sex_tone_overrides: Option<ThresholdMap<String>>,
    #[serde(
        default,
        alias = "violenceToneOverrides",
        alias = "violenceLevelDescriptions"
    )]
    violence_tone_overrides: Option<ThresholdMap<String>>,
}

impl From<StageRepr> for EvolutionStage {
    fn from(repr: StageRepr) -> Self {
        match repr {
            StageRepr::Flat(description) => EvolutionStage::new(description),
            StageRepr::Structured(stage) => EvolutionStage {
                description: stage.description,
                sex_tone_overrides: stage.sex_tone_overrides,
                violence_tone_overrides: stage.violence_tone_overrides,
            },
        }
    }
}
