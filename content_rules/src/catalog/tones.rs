//! Archetype-independent tone text.

use serde::{Deserialize, Serialize};

use crate::dials::ToneAxis;
use crate::threshold::{Threshold, ThresholdMap};

/// Tone text for both axes, keyed by tone level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneLevelCatalog {
    #[serde(default, alias = "sexLevelDescriptions")]
    pub sex: ThresholdMap<String>,

    #[serde(default, alias = "violenceLevelDescriptions")]
    pub violence: ThresholdMap<String>,
}

impl ToneLevelCatalog {
    /// Build from the two per-axis tables.
    pub fn new(sex: ThresholdMap<String>, violence: ThresholdMap<String>) -> Self {
        Self { sex, violence }
    }

    /// The table for one axis.
    pub fn table(&self, axis: ToneAxis) -> &ThresholdMap<String> {
        match axis {
            ToneAxis::Sex => &self.sex,
            ToneAxis::Violence => &self.violence,
        }
    }

    /// Base tone text for `axis` at `level`.
    pub fn text(&self, axis: ToneAxis, level: Threshold) -> Option<&str> {
        self.table(axis).resolve(level).map(String::as_str)
    }
}

/// A fixed fragment added once escalation passes a high-intensity mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimaxRule {
    /// The fragment applies strictly above this score.
    pub threshold: Threshold,
    pub fragment: String,
}

impl ClimaxRule {
    /// Rule that adds `fragment` once escalation exceeds `threshold`.
    pub fn new(threshold: Threshold, fragment: impl Into<String>) -> Self {
        Self {
            threshold,
            fragment: fragment.into(),
        }
    }

    /// Whether `escalation` is past the threshold.
    pub fn applies(&self, escalation: Threshold) -> bool {
        escalation > self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_text_by_axis() {
        let tones = ToneLevelCatalog::new(
            ThresholdMap::new().with(0, "coy".to_string()).with(1, "forward".to_string()),
            ThresholdMap::new().with(1, "bloody".to_string()),
        );

        assert_eq!(tones.text(ToneAxis::Sex, 0), Some("coy"));
        assert_eq!(tones.text(ToneAxis::Sex, 3), Some("forward"));
        assert_eq!(tones.text(ToneAxis::Violence, 0), None);
        assert_eq!(tones.text(ToneAxis::Violence, 2), Some("bloody"));
    }

    #[test]
    fn test_climax_applies_strictly_above() {
        let rule = ClimaxRule::new(75, "It is everywhere now.");
        assert!(!rule.applies(75));
        assert!(rule.applies(76));
    }
}
