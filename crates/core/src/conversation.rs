//! Chat transcript types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Per-session message identifier
///
/// Identifiers are handed out in increasing order, so sorting by id gives
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{:06}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a message is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Text,
    /// Text followed by quick-reply chips
    Suggestion,
    /// Text followed by action buttons
    Action,
}

/// A single transcript entry
///
/// Only bot messages carry suggestions or actions, and never both; the
/// constructors are the only way to build the non-text kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<Action>,
}

impl Message {
    fn new(id: MessageId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            kind: MessageKind::Text,
            suggestions: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Visitor message
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::User, text)
    }

    /// Plain bot reply
    pub fn bot_text(id: MessageId, text: impl Into<String>) -> Self {
        Self::new(id, Sender::Bot, text)
    }

    /// Bot reply with quick-reply chips
    pub fn bot_suggestions(
        id: MessageId,
        text: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Suggestion,
            suggestions,
            ..Self::new(id, Sender::Bot, text)
        }
    }

    /// Bot reply with action buttons
    pub fn bot_actions(id: MessageId, text: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            kind: MessageKind::Action,
            actions,
            ..Self::new(id, Sender::Bot, text)
        }
    }

    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// Find an action on this message by id
    pub fn action(&self, action_id: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == action_id)
    }
}
