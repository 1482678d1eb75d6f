//! Server-side widget host
//!
//! Over HTTP the browser performs action effects, so invoking an action on
//! the server only records what the client has to do.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use vendchat_core::WidgetHost;

/// An effect the client must perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordedEffect {
    RequestQuote,
    Close,
    OpenExternal { url: String },
    Navigate { path: String },
}

/// Host that records effects in call order
#[derive(Debug, Default)]
pub struct RecordingHost {
    effects: Mutex<Vec<RecordedEffect>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested_close(&self) -> bool {
        self.effects.lock().contains(&RecordedEffect::Close)
    }

    pub fn into_effects(self) -> Vec<RecordedEffect> {
        self.effects.into_inner()
    }
}

impl WidgetHost for RecordingHost {
    fn request_quote(&self) {
        self.effects.lock().push(RecordedEffect::RequestQuote);
    }

    fn close(&self) {
        self.effects.lock().push(RecordedEffect::Close);
    }

    fn open_external(&self, url: &str) {
        self.effects.lock().push(RecordedEffect::OpenExternal { url: url.to_string() });
    }

    fn navigate(&self, path: &str) {
        self.effects.lock().push(RecordedEffect::Navigate { path: path.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendchat_core::{Action, ActionEffect};

    #[test]
    fn test_records_quote_then_close() {
        let host = RecordingHost::new();
        Action::primary("request-quote", "Quote", ActionEffect::RequestQuote).invoke(&host);
        assert!(host.requested_close());
        assert_eq!(
            host.into_effects(),
            vec![RecordedEffect::RequestQuote, RecordedEffect::Close]
        );
    }

    #[test]
    fn test_effect_json() {
        let effect = RecordedEffect::Navigate { path: "/products".to_string() };
        assert_eq!(
            serde_json::to_value(&effect).unwrap(),
            serde_json::json!({ "type": "navigate", "path": "/products" })
        );
    }
}
