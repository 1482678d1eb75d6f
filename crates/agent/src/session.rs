//! Conversation session
//!
//! Transcript, recent context and preference signals for one visitor.
//! A session is reset whenever the widget is opened again.

use serde::{Deserialize, Serialize};

use vendchat_core::{Message, MessageId};

use crate::context::RecentContext;
use crate::preferences::Preferences;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Widget closed
    #[default]
    Idle,
    /// Widget open, only the welcome message shown
    Welcomed,
    /// At least one visitor message
    Conversing,
}

/// Conversation session
#[derive(Debug, Clone)]
pub struct ConversationSession {
    state: SessionState,
    messages: Vec<Message>,
    context: RecentContext,
    preferences: Preferences,
    next_id: u64,
}

impl ConversationSession {
    pub fn new(context_window: usize) -> Self {
        Self {
            state: SessionState::Idle,
            messages: Vec::new(),
            context: RecentContext::new(context_window),
            preferences: Preferences::default(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn context(&self) -> &RecentContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut RecentContext {
        &mut self.context
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    /// Next message id; ids keep increasing across resets
    pub fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Drop everything gathered so far and go back to idle
    pub fn reset(&mut self) {
        self.messages.clear();
        self.context.clear();
        self.preferences = Preferences::default();
        self.state = SessionState::Idle;
    }

    /// Replace the transcript with a single welcome message
    pub fn show_welcome(&mut self, welcome: Message) {
        self.messages.clear();
        self.messages.push(welcome);
        self.state = SessionState::Welcomed;
    }

    /// Append a visitor message
    pub fn push_user(&mut self, text: impl Into<String>) -> Message {
        let message = Message::user(self.allocate_id(), text);
        self.messages.push(message.clone());
        self.state = SessionState::Conversing;
        message
    }

    /// Append a bot message
    pub fn push_bot(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Most recent message offering the given action
    pub fn find_action(&self, action_id: &str) -> Option<&vendchat_core::Action> {
        self.messages.iter().rev().find_map(|m| m.action(action_id))
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendchat_core::{Action, ActionEffect, Sender};

    #[test]
    fn test_lifecycle() {
        let mut session = ConversationSession::default();
        assert_eq!(session.state(), SessionState::Idle);

        let id = session.allocate_id();
        session.show_welcome(Message::bot_text(id, "Welcome"));
        assert_eq!(session.state(), SessionState::Welcomed);
        assert_eq!(session.messages().len(), 1);

        let user = session.push_user("hello");
        assert_eq!(user.sender, Sender::User);
        assert_eq!(session.state(), SessionState::Conversing);

        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut session = ConversationSession::default();
        let a = session.push_user("a");
        session.reset();
        let b = session.push_user("b");
        assert!(b.id > a.id);
    }

    #[test]
    fn test_welcome_replaces_transcript() {
        let mut session = ConversationSession::default();
        session.push_user("one");
        session.push_user("two");
        let id = session.allocate_id();
        session.show_welcome(Message::bot_text(id, "Welcome"));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, "Welcome");
    }

    #[test]
    fn test_find_action_prefers_latest() {
        let mut session = ConversationSession::default();
        let first = session.allocate_id();
        session.push_bot(Message::bot_actions(
            first,
            "old",
            vec![Action::primary("request-quote", "Old", ActionEffect::RequestQuote)],
        ));
        let second = session.allocate_id();
        session.push_bot(Message::bot_actions(
            second,
            "new",
            vec![Action::primary("request-quote", "New", ActionEffect::RequestQuote)],
        ));
        assert_eq!(session.find_action("request-quote").map(|a| a.label.as_str()), Some("New"));
        assert!(session.find_action("missing").is_none());
    }
}
