//! Sales assistant engine
//!
//! Features:
//! - Keyword intent detection over the utterance and recent context
//! - Budget and industry preference signals
//! - Localized replies with suggestion chips and action buttons
//! - Conversation sessions (idle, welcomed, conversing)
//! - Chat widget runtime with simulated typing and cancellable replies

pub mod context;
pub mod delay;
pub mod engine;
pub mod intent;
pub mod preferences;
pub mod response;
pub mod session;
pub mod widget;

pub use context::RecentContext;
pub use delay::TypingDelay;
pub use engine::{ChatEngine, TurnOutcome};
pub use intent::{DetectedIntent, IntentDetector, IntentScore};
pub use preferences::{PreferenceExtractor, Preferences};
pub use response::{action_ids, ResponseGenerator};
pub use session::{ConversationSession, SessionState};
pub use widget::{ChatWidget, WidgetEvent};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Assistant is still typing")]
    Busy,

    #[error("Chat widget is closed")]
    Closed,

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<vendchat_config::ConfigError> for AgentError {
    fn from(err: vendchat_config::ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}
