//! Stage adapter - the host-facing lifecycle around an escalation session.
//!
//! The host constructs a stage with its initial data, calls `load` once, then
//! `before_prompt` for each user message and `after_response` for each
//! narrator reply. `set_state` is called whenever the host jumps to another
//! point in the chat tree or the user swipes.

use content_rules::ContentCatalog;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

use crate::engine::EscalationEngine;
use crate::error::{EscalationError, EscalationResult};
use crate::events::{HostEvent, Message};
use crate::persistence::{ChatState, MessageState};
use crate::session::{SessionConfig, SessionDefaults, SessionOptions};

/// Everything the host hands over at construction. Blobs are untyped JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialData {
    pub config: Option<Value>,
    pub message_state: Option<Value>,
    pub chat_state: Option<Value>,
}

/// Result of `load`. `success` is false only when no usable archetype
/// exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadResponse {
    pub success: bool,
    pub error: Option<String>,
    pub chat_state: Option<Value>,
}

/// Result of a message hook.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageResponse {
    /// Appended to the prompt sent to the narrator; never shown or stored.
    pub stage_directions: Option<String>,
    pub message_state: Option<Value>,
    pub chat_state: Option<Value>,
    pub error: Option<String>,
}

/// Host lifecycle wrapper around an [`EscalationEngine`].
#[derive(Debug)]
pub struct Stage {
    engine: Result<EscalationEngine, EscalationError>,
}

impl Stage {
    /// Create a stage over the built-in catalog.
    pub fn with_builtin_catalog(data: InitialData) -> Self {
        match ContentCatalog::builtin() {
            Ok(catalog) => Self::new(data, Arc::new(catalog)),
            Err(err) => Self::failed(err.into()),
        }
    }

    /// Create a stage with default settings and a thread-local RNG.
    pub fn new(data: InitialData, catalog: Arc<ContentCatalog>) -> Self {
        Self::with_rng(data, catalog, &SessionDefaults::default(), &mut rand::thread_rng())
    }

    /// Create a stage with explicit defaults and random source.
    pub fn with_rng(
        data: InitialData,
        catalog: Arc<ContentCatalog>,
        defaults: &SessionDefaults,
        rng: &mut impl Rng,
    ) -> Self {
        match Self::start_engine(&data, catalog, defaults, rng) {
            Ok(engine) => Self { engine: Ok(engine) },
            Err(err) => Self::failed(err),
        }
    }

    fn start_engine(
        data: &InitialData,
        catalog: Arc<ContentCatalog>,
        defaults: &SessionDefaults,
        rng: &mut impl Rng,
    ) -> EscalationResult<EscalationEngine> {
        let options = data
            .config
            .as_ref()
            .map(SessionOptions::from_value)
            .unwrap_or_default();
        let chat_state = data.chat_state.as_ref().map(ChatState::from_value);

        let config = SessionConfig::resolve(&options, chat_state.as_ref(), &catalog, defaults, rng)?;
        let mut engine = EscalationEngine::new(catalog, config);
        if let Some(blob) = &data.message_state {
            engine.handle(&HostEvent::StateRestore(MessageState::from_value(blob)));
        }
        Ok(engine)
    }

    fn failed(err: EscalationError) -> Self {
        error!(%err, "escalation stage failed to start");
        Self { engine: Err(err) }
    }

    /// The running engine, unless the stage failed to start.
    pub fn engine(&self) -> Option<&EscalationEngine> {
        self.engine.as_ref().ok()
    }

    /// Why the stage failed to start, if it did.
    pub fn load_error(&self) -> Option<&EscalationError> {
        self.engine.as_ref().err()
    }

    /// Report whether the stage can run. On success the chat state records
    /// the chosen archetype so every branch of the chat keeps it.
    pub fn load(&self) -> LoadResponse {
        match &self.engine {
            Ok(engine) => LoadResponse {
                success: true,
                error: None,
                chat_state: Some(engine.chat_state().to_value()),
            },
            Err(err) => LoadResponse {
                success: false,
                error: Some(err.to_string()),
                chat_state: None,
            },
        }
    }

    /// Restore message state after a jump or swipe.
    pub fn set_state(&mut self, message_state: Option<&Value>) {
        let Some(blob) = message_state else { return };
        match &mut self.engine {
            Ok(engine) => {
                engine.handle(&HostEvent::StateRestore(MessageState::from_value(blob)));
            }
            Err(_) => warn!("set_state ignored: stage failed to load"),
        }
    }

    /// A user message is about to be sent: advance and direct the narrator.
    pub fn before_prompt(&mut self, message: &Message) -> StageResponse {
        match &mut self.engine {
            Ok(engine) => match engine.handle(&HostEvent::TurnAdvance(message.clone())) {
                Some(output) => StageResponse {
                    stage_directions: Some(output.directive).filter(|d| !d.is_empty()),
                    message_state: Some(output.message_state.to_value()),
                    ..Default::default()
                },
                None => StageResponse::default(),
            },
            Err(err) => Self::error_response(err),
        }
    }

    /// The narrator replied: persist the current state unchanged.
    pub fn after_response(&mut self, _message: &Message) -> StageResponse {
        match &self.engine {
            Ok(engine) => StageResponse {
                message_state: Some(engine.message_state().to_value()),
                ..Default::default()
            },
            Err(err) => Self::error_response(err),
        }
    }

    fn error_response(err: &EscalationError) -> StageResponse {
        StageResponse {
            error: Some(err.to_string()),
            ..Default::default()
        }
    }
}
