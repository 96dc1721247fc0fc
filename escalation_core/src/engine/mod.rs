//! Escalation Engine - advances encounter intensity and composes directives.
//!
//! The engine has a single state, active for the life of the session,
//! parameterized by an [`EngineState`]. Two transitions change it:
//! 1. **Turn advance**: the score grows by the session's pacing rate
//! 2. **Restore**: score and archetype are overwritten from persisted state
//!
//! Both are available as free functions over `EngineState` values, and
//! [`EscalationEngine`] wraps them for a session that owns its state.

mod directive;

pub use directive::*;

use content_rules::{Archetype, ContentCatalog, Threshold};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::UnknownArchetype;
use crate::events::HostEvent;
use crate::persistence::{self, ChatState, MessageState};
use crate::session::{SessionConfig, SessionId};

/// The engine's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngineState {
    pub escalation: Threshold,
    pub archetype_key: String,
}

impl EngineState {
    /// Fresh state at zero escalation.
    pub fn new(archetype_key: impl Into<String>) -> Self {
        Self {
            escalation: 0,
            archetype_key: archetype_key.into(),
        }
    }
}

/// Turn-advance transition: add the pacing rate to the score.
///
/// The score has no cap; it saturates at the integer maximum instead of
/// wrapping.
pub fn advance(state: EngineState, config: &SessionConfig) -> EngineState {
    EngineState {
        escalation: state.escalation.saturating_add(config.pacing_rate),
        ..state
    }
}

/// Restore transition: take score and archetype from persisted state.
///
/// A missing score becomes zero and a missing key becomes the configured
/// archetype. A key the catalog does not know is replaced by the configured
/// archetype and reported.
pub fn restore(
    persisted: &MessageState,
    config: &SessionConfig,
    catalog: &ContentCatalog,
) -> (EngineState, Option<UnknownArchetype>) {
    let state = persistence::from_persisted(persisted, &config.archetype_key);
    rebind(state, &config.archetype_key, catalog)
}

/// Keep `state` bound to an archetype that exists in `catalog`, falling back
/// to `configured`, then to the catalog's first key.
fn rebind(
    mut state: EngineState,
    configured: &str,
    catalog: &ContentCatalog,
) -> (EngineState, Option<UnknownArchetype>) {
    if catalog.contains(&state.archetype_key) {
        return (state, None);
    }

    let fallback = if catalog.contains(configured) {
        configured.to_string()
    } else {
        catalog
            .list_keys()
            .first()
            .map(|key| key.to_string())
            .unwrap_or_else(|| configured.to_string())
    };
    let unknown = UnknownArchetype {
        requested: std::mem::replace(&mut state.archetype_key, fallback.clone()),
        fallback,
    };
    (state, Some(unknown))
}

/// What a turn produces for the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutput {
    /// Hidden guidance for the narrator, for this turn only.
    pub directive: String,
    /// State to persist with the message.
    pub message_state: MessageState,
}

/// A session's engine: shared catalog, resolved config, owned state.
#[derive(Debug, Clone)]
pub struct EscalationEngine {
    id: SessionId,
    catalog: Arc<ContentCatalog>,
    config: SessionConfig,
    state: EngineState,
}

impl EscalationEngine {
    /// Start a session at zero escalation.
    ///
    /// If the configured archetype is not in the catalog, the session binds
    /// to the catalog's first archetype instead.
    pub fn new(catalog: Arc<ContentCatalog>, mut config: SessionConfig) -> Self {
        let (state, unknown) = rebind(
            EngineState::new(config.archetype_key.clone()),
            &config.archetype_key,
            &catalog,
        );
        if let Some(unknown) = unknown {
            warn!(%unknown, "configured archetype missing at session start");
            config.archetype_key = state.archetype_key.clone();
        }

        let id = SessionId::new();
        info!(
            session = %id,
            archetype = %state.archetype_key,
            pacing_rate = config.pacing_rate,
            sex_level = config.sex_level,
            violence_level = config.violence_level,
            "escalation session started"
        );

        Self {
            id,
            catalog,
            config,
            state,
        }
    }

    /// Identifier used in log lines for this session.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Resolved session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current escalation state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Catalog the engine reads content from.
    pub fn catalog(&self) -> &Arc<ContentCatalog> {
        &self.catalog
    }

    /// The archetype the session is currently bound to.
    pub fn archetype(&self) -> Option<&Archetype> {
        self.catalog.archetype(&self.state.archetype_key)
    }

    /// Advance one turn and compose the directive for it.
    pub fn on_turn_advance(&mut self) -> TurnOutput {
        self.state = advance(self.state.clone(), &self.config);

        let directive = self.build_directive();
        debug!(
            session = %self.id,
            escalation = self.state.escalation,
            stage = ?self
                .archetype()
                .and_then(|a| a.evolutions.resolve_entry(self.state.escalation))
                .map(|(threshold, _)| threshold),
            "turn advanced"
        );

        TurnOutput {
            directive,
            message_state: self.message_state(),
        }
    }

    /// Overwrite state from persisted input, e.g. after the host rewinds.
    pub fn on_state_restore(&mut self, persisted: &MessageState) -> Option<UnknownArchetype> {
        let (state, unknown) = restore(persisted, &self.config, &self.catalog);
        if let Some(unknown) = &unknown {
            warn!(session = %self.id, %unknown, "restored archetype missing from catalog");
        }
        debug!(
            session = %self.id,
            escalation = state.escalation,
            archetype = %state.archetype_key,
            "state restored"
        );
        self.state = state;
        unknown
    }

    /// React to a host event; turn advances produce output.
    pub fn handle(&mut self, event: &HostEvent) -> Option<TurnOutput> {
        match event {
            HostEvent::TurnAdvance(_) => Some(self.on_turn_advance()),
            HostEvent::StateRestore(persisted) => {
                self.on_state_restore(persisted);
                None
            }
        }
    }

    /// Compose the directive for the current state without advancing.
    pub fn build_directive(&self) -> String {
        let Some(archetype) = self.archetype() else {
            return String::new();
        };
        compose_directive(&DirectiveInputs {
            archetype,
            tones: self.catalog.tones(),
            climax: self.catalog.climax(),
            escalation: self.state.escalation,
            sex_level: self.config.sex_level,
            violence_level: self.config.violence_level,
        })
    }

    /// Replace the catalog between turns. The next directive uses the new
    /// content; an archetype the new catalog lacks is re-bound.
    pub fn swap_catalog(&mut self, catalog: Arc<ContentCatalog>) -> Option<UnknownArchetype> {
        let (state, unknown) = rebind(self.state.clone(), &self.config.archetype_key, &catalog);
        if let Some(unknown) = &unknown {
            warn!(session = %self.id, %unknown, "archetype missing from swapped catalog");
            if !catalog.contains(&self.config.archetype_key) {
                self.config.archetype_key = state.archetype_key.clone();
            }
        }
        info!(session = %self.id, archetypes = catalog.len(), "content catalog swapped");
        self.catalog = catalog;
        self.state = state;
        unknown
    }

    /// Current state in its persisted form.
    pub fn message_state(&self) -> MessageState {
        persistence::to_persisted(&self.state)
    }

    /// Chat-level state recording the session's archetype.
    pub fn chat_state(&self) -> ChatState {
        persistence::chat_state_for(&self.state)
    }
}
