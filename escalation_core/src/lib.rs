//! # Escalation Core
//!
//! Drives narrative escalation for an antagonist encounter. Each turn the
//! engine raises an escalation score by the session's pacing rate, picks the
//! archetype's active evolution stage and the configured tone text, and
//! composes a directive for the narrator.
//!
//! ## Core Components
//!
//! - **session**: resolves dials and the archetype from host options, chat state and defaults
//! - **engine**: the escalation state machine and directive composition
//! - **persistence**: message-level and chat-level state codec
//! - **events**: host events the engine reacts to
//! - **stage**: the host lifecycle adapter (`load`, `before_prompt`, `after_response`, `set_state`)
//!
//! ## Design Philosophy
//!
//! - **Recomputed, not stored**: only the score and archetype key persist; the directive is rebuilt every turn
//! - **Never fails per turn**: lookups that miss fall back to documented defaults
//! - **Shared content**: one `Arc<ContentCatalog>` serves every session read-only

pub mod engine;
pub mod error;
pub mod events;
pub mod persistence;
pub mod session;
pub mod stage;

pub use engine::*;
pub use error::*;
pub use events::*;
pub use persistence::*;
pub use session::*;
pub use stage::*;
