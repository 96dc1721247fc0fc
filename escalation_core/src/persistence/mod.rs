//! State codec - moves engine state in and out of the host's persistence slots.
//!
//! Two shapes are stored:
//! - **Message state**, saved after every message, so rewinding to a message
//!   rewinds the escalation: `{ "escalation": 35, "alienKey": "shoggoth" }`.
//! - **Chat state**, shared by every branch of a chat, holding only the
//!   archetype chosen for it: `{ "alienKey": "shoggoth" }`.
//!
//! Host blobs are untyped, so decoding is lenient: any field that is missing
//! or has the wrong type is treated as absent.

use content_rules::Threshold;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::engine::EngineState;

const ESCALATION_FIELD: &str = "escalation";
const ARCHETYPE_FIELD: &str = "alienKey";
const ARCHETYPE_FIELD_ALIAS: &str = "archetypeKey";

/// Per-message persisted state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<Threshold>,

    #[serde(
        default,
        rename = "alienKey",
        alias = "archetypeKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub alien_key: Option<String>,
}

impl MessageState {
    /// State with both fields present.
    pub fn new(escalation: Threshold, alien_key: impl Into<String>) -> Self {
        Self {
            escalation: Some(escalation),
            alien_key: Some(alien_key.into()),
        }
    }

    /// Decode a host blob, ignoring anything unusable.
    pub fn from_value(value: &Value) -> Self {
        Self {
            escalation: value.get(ESCALATION_FIELD).and_then(score_from_value),
            alien_key: archetype_from_value(value),
        }
    }

    /// Encode for the host, leaving out absent fields.
    pub fn to_value(&self) -> Value {
        let mut blob = json!({});
        if let Some(escalation) = self.escalation {
            blob[ESCALATION_FIELD] = json!(escalation);
        }
        if let Some(key) = &self.alien_key {
            blob[ARCHETYPE_FIELD] = json!(key);
        }
        blob
    }
}

/// Chat-level persisted state: the archetype chosen for the whole chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    #[serde(
        default,
        rename = "alienKey",
        alias = "archetypeKey",
        skip_serializing_if = "Option::is_none"
    )]
    pub alien_key: Option<String>,
}

impl ChatState {
    /// Chat state pinned to `alien_key`.
    pub fn new(alien_key: impl Into<String>) -> Self {
        Self {
            alien_key: Some(alien_key.into()),
        }
    }

    /// Decode a host blob; a missing or non-string key reads as absent.
    pub fn from_value(value: &Value) -> Self {
        Self {
            alien_key: archetype_from_value(value),
        }
    }

    /// Encode for the host.
    pub fn to_value(&self) -> Value {
        match &self.alien_key {
            Some(key) => json!({ ARCHETYPE_FIELD: key }),
            None => json!({}),
        }
    }
}

/// Encode engine state as message state.
pub fn to_persisted(state: &EngineState) -> MessageState {
    MessageState::new(state.escalation, state.archetype_key.clone())
}

/// Decode message state, filling gaps with a zero score and the configured
/// archetype.
///
/// The key is taken verbatim; checking it against the catalog is the
/// engine's job.
pub fn from_persisted(persisted: &MessageState, configured_archetype: &str) -> EngineState {
    EngineState {
        escalation: persisted.escalation.unwrap_or(0),
        archetype_key: persisted
            .alien_key
            .clone()
            .unwrap_or_else(|| configured_archetype.to_string()),
    }
}

/// Chat state recording the archetype `state` is bound to.
pub fn chat_state_for(state: &EngineState) -> ChatState {
    ChatState::new(state.archetype_key.clone())
}

// Hosts written in JavaScript store every number as a double.
fn score_from_value(value: &Value) -> Option<Threshold> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|score| score.is_finite() && *score >= 0.0)
            .map(|score| score.trunc() as Threshold)
    })
}

fn archetype_from_value(value: &Value) -> Option<String> {
    value
        .get(ARCHETYPE_FIELD)
        .or_else(|| value.get(ARCHETYPE_FIELD_ALIAS))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_state_from_full_blob() {
        let state = MessageState::from_value(&json!({"escalation": 35, "alienKey": "mimic"}));
        assert_eq!(state, MessageState::new(35, "mimic"));
    }

    #[test]
    fn test_message_state_tolerates_missing_and_bad_fields() {
        assert_eq!(MessageState::from_value(&json!({})), MessageState::default());
        assert_eq!(MessageState::from_value(&Value::Null), MessageState::default());

        let state = MessageState::from_value(&json!({"escalation": "high", "alienKey": 7}));
        assert_eq!(state, MessageState::default());

        let negative = MessageState::from_value(&json!({"escalation": -4}));
        assert_eq!(negative.escalation, None);
    }

    #[test]
    fn test_message_state_accepts_float_scores_and_alias() {
        let state = MessageState::from_value(&json!({"escalation": 12.0, "archetypeKey": "brood"}));
        assert_eq!(state.escalation, Some(12));
        assert_eq!(state.alien_key.as_deref(), Some("brood"));
    }

    #[test]
    fn test_message_state_to_value() {
        let blob = MessageState::new(40, "shoggoth").to_value();
        assert_eq!(blob, json!({"escalation": 40, "alienKey": "shoggoth"}));

        let partial = MessageState {
            escalation: Some(3),
            alien_key: None,
        };
        assert_eq!(partial.to_value(), json!({"escalation": 3}));
    }

    #[test]
    fn test_serde_shape_matches_value_codec() {
        let state = MessageState::new(10, "mimic");
        assert_eq!(serde_json::to_value(&state).unwrap(), state.to_value());

        let chat = ChatState::new("mimic");
        assert_eq!(serde_json::to_value(&chat).unwrap(), chat.to_value());
    }

    #[test]
    fn test_chat_state_codec() {
        let chat = ChatState::from_value(&json!({"alienKey": "brood", "other": true}));
        assert_eq!(chat, ChatState::new("brood"));
        assert_eq!(ChatState::from_value(&json!([])), ChatState::default());
        assert_eq!(ChatState::default().to_value(), json!({}));
    }

    #[test]
    fn test_from_persisted_defaults() {
        let state = from_persisted(&MessageState::default(), "shoggoth");
        assert_eq!(state.escalation, 0);
        assert_eq!(state.archetype_key, "shoggoth");

        let partial = MessageState {
            escalation: None,
            alien_key: Some("mimic".to_string()),
        };
        let state = from_persisted(&partial, "shoggoth");
        assert_eq!(state.escalation, 0);
        assert_eq!(state.archetype_key, "mimic");
    }

    #[test]
    fn test_engine_state_round_trip() {
        let state = EngineState {
            escalation: 85,
            archetype_key: "brood".to_string(),
        };
        let blob = to_persisted(&state).to_value();
        let back = from_persisted(&MessageState::from_value(&blob), "shoggoth");
        assert_eq!(back, state);
        assert_eq!(chat_state_for(&state), ChatState::new("brood"));
    }
}
