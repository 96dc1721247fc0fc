//! Archetype definitions.

use serde::{Deserialize, Serialize};

use super::EvolutionStage;
use crate::threshold::{Threshold, ThresholdMap};

/// A named antagonist template: a core prompt plus tiered evolution stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Archetype {
    pub name: String,

    /// Prefixed to every directive composed for this archetype.
    #[serde(rename = "corePrompt", alias = "core_prompt")]
    pub core_prompt: String,

    /// Stages keyed by the minimum escalation score at which they apply.
    #[serde(default)]
    pub evolutions: ThresholdMap<EvolutionStage>,
}

impl Archetype {
    /// Create an archetype with no evolution stages.
    pub fn new(name: impl Into<String>, core_prompt: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            core_prompt: core_prompt.into(),
            evolutions: ThresholdMap::new(),
        }
    }

    /// Add an evolution stage active from `threshold` onwards.
    pub fn with_stage(mut self, threshold: Threshold, stage: EvolutionStage) -> Self {
        self.evolutions.insert(threshold, stage);
        self
    }

    /// The stage active at `escalation`, if any stage has been reached.
    pub fn stage_at(&self, escalation: Threshold) -> Option<&EvolutionStage> {
        self.evolutions.resolve(escalation)
    }
}
