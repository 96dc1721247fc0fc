//! Events delivered by the host.

use serde::{Deserialize, Serialize};

use crate::persistence::MessageState;

/// Who sent a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Bot,
}

/// A chat message as the host reports it. The engine reacts to the fact that
/// a message arrived, not to its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub content: String,
    pub sender: Sender,
}

impl Message {
    /// A message typed by the user.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
        }
    }

    /// A reply from the narrator.
    pub fn from_bot(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Bot,
        }
    }

    /// Whether the narrator sent this message.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

/// Something the host asks the engine to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A new turn is about to be sent to the narrator.
    TurnAdvance(Message),
    /// The host moved to another point in the conversation tree.
    StateRestore(MessageState),
}

impl HostEvent {
    /// Whether this event advances the score.
    pub fn is_turn_advance(&self) -> bool {
        matches!(self, HostEvent::TurnAdvance(_))
    }
}
