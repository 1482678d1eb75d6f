//! Turn pipeline
//!
//! classify -> extract preferences -> generate reply, against one session.

use vendchat_config::{ContactConfig, KeywordTables};
use vendchat_core::{Message, Translator};

use crate::intent::{DetectedIntent, IntentDetector};
use crate::preferences::PreferenceExtractor;
use crate::response::ResponseGenerator;
use crate::session::ConversationSession;

/// Result of answering one visitor turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub detected: DetectedIntent,
    pub reply: Message,
}

/// Stateless turn processor shared by all sessions
pub struct ChatEngine {
    detector: IntentDetector,
    extractor: PreferenceExtractor,
    generator: ResponseGenerator,
}

impl ChatEngine {
    pub fn new(keywords: &KeywordTables, contact: ContactConfig) -> Self {
        Self {
            detector: IntentDetector::new(keywords),
            extractor: PreferenceExtractor::new(keywords),
            generator: ResponseGenerator::new(contact),
        }
    }

    /// Start a fresh conversation: reset the session and show the welcome
    pub fn open(&self, session: &mut ConversationSession, t: &dyn Translator) -> Message {
        session.reset();
        self.rewelcome(session, t)
    }

    /// Replace the transcript with a welcome in the current language
    ///
    /// Recent context and preference signals are kept.
    pub fn rewelcome(&self, session: &mut ConversationSession, t: &dyn Translator) -> Message {
        let welcome = self.generator.welcome(session.allocate_id(), t);
        session.show_welcome(welcome.clone());
        welcome
    }

    /// Answer a visitor utterance already appended to the transcript
    ///
    /// The haystack is built before the utterance joins the recent context,
    /// so the current utterance is counted once.
    pub fn reply(
        &self,
        session: &mut ConversationSession,
        utterance: &str,
        t: &dyn Translator,
    ) -> TurnOutcome {
        let haystack = IntentDetector::haystack(utterance, session.context().iter());
        let detected = self.detector.classify_haystack(&haystack);
        session.context_mut().push(utterance);

        self.extractor.apply(session.preferences_mut(), utterance);

        let id = session.allocate_id();
        let reply = self
            .generator
            .generate(id, detected.intent, session.preferences(), t);
        session.push_bot(reply.clone());

        tracing::debug!(
            intent = %detected.intent,
            language = t.language().code(),
            kind = ?reply.kind,
            "Generated reply"
        );
        TurnOutcome { detected, reply }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendchat_config::LocaleCatalog;
    use vendchat_core::{IntentKind, Language, MessageKind, Sender};

    fn setup() -> (ChatEngine, LocaleCatalog) {
        (
            ChatEngine::new(&KeywordTables::default(), ContactConfig::default()),
            LocaleCatalog::builtin().unwrap(),
        )
    }

    #[test]
    fn test_open_shows_single_welcome() {
        let (engine, catalog) = setup();
        let dict = catalog.dictionary(Language::English);
        let mut session = ConversationSession::default();
        session.push_user("left over");

        engine.open(&mut session, &*dict);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, dict.t("chatbot.welcome"));
        assert!(session.context().is_empty());
    }

    #[test]
    fn test_reply_appends_context_once() {
        let (engine, catalog) = setup();
        let dict = catalog.dictionary(Language::English);
        let mut session = ConversationSession::default();
        engine.open(&mut session, &*dict);

        session.push_user("What is the price?");
        let outcome = engine.reply(&mut session, "What is the price?", &*dict);
        assert_eq!(outcome.detected.intent, IntentKind::Pricing);
        assert_eq!(outcome.detected.count, 1);
        assert_eq!(session.context().len(), 1);
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[2].sender, Sender::Bot);
    }

    #[test]
    fn test_context_carries_between_turns() {
        let (engine, catalog) = setup();
        let dict = catalog.dictionary(Language::English);
        let mut session = ConversationSession::default();
        engine.open(&mut session, &*dict);

        engine.reply(&mut session, "tell me about pricing and cost", &*dict);
        let outcome = engine.reply(&mut session, "what about that", &*dict);
        assert_eq!(outcome.detected.intent, IntentKind::Pricing);
    }

    #[test]
    fn test_budget_in_same_turn_personalizes_pricing() {
        let (engine, catalog) = setup();
        let dict = catalog.dictionary(Language::English);
        let mut session = ConversationSession::default();
        engine.open(&mut session, &*dict);

        let utterance = "My budget is limited, what is the price?";
        let outcome = engine.reply(&mut session, utterance, &*dict);
        assert_eq!(outcome.detected.intent, IntentKind::Pricing);
        assert_eq!(outcome.reply.kind, MessageKind::Action);
        assert!(outcome.reply.text.contains(utterance));
    }

    #[test]
    fn test_rewelcome_keeps_signals() {
        let (engine, catalog) = setup();
        let mut session = ConversationSession::default();
        let english = catalog.dictionary(Language::English);
        engine.open(&mut session, &*english);
        engine.reply(&mut session, "I have a limited budget", &*english);

        let arabic = catalog.dictionary(Language::Arabic);
        let welcome = engine.rewelcome(&mut session, &*arabic);
        assert_eq!(welcome.text, arabic.t("chatbot.welcome"));
        assert_eq!(session.messages().len(), 1);
        assert!(session.preferences().budget_signal.is_some());
    }
}
