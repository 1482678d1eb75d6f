//! End-to-end chat widget scenarios
//!
//! Time is paused, so the simulated typing delay elapses instantly.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

use vendchat_agent::{action_ids, ChatWidget, SessionState, WidgetEvent};
use vendchat_config::{ChatbotConfig, KeywordTables, LocaleCatalog};
use vendchat_core::{ActionEffect, Language, Message, MessageKind, Sender, Translator, WidgetHost};

fn catalog() -> Arc<LocaleCatalog> {
    Arc::new(LocaleCatalog::builtin().unwrap())
}

fn widget() -> ChatWidget {
    ChatWidget::new(&ChatbotConfig::default(), catalog(), &KeywordTables::default()).unwrap()
}

/// Next bot answer to a visitor turn; plain-text welcomes are skipped
async fn next_bot_reply(rx: &mut broadcast::Receiver<WidgetEvent>) -> Message {
    timeout(Duration::from_secs(5), async {
        loop {
            if let WidgetEvent::MessageAppended(message) = rx.recv().await.unwrap() {
                if message.is_bot() && message.kind != MessageKind::Text {
                    return message;
                }
            }
        }
    })
    .await
    .expect("bot reply within the typing window")
}

/// Host recording calls in order
#[derive(Default)]
struct RecordingHost {
    calls: RefCell<Vec<String>>,
}

impl WidgetHost for RecordingHost {
    fn request_quote(&self) {
        self.calls.borrow_mut().push("request_quote".to_string());
    }

    fn close(&self) {
        self.calls.borrow_mut().push("close".to_string());
    }

    fn open_external(&self, url: &str) {
        self.calls.borrow_mut().push(format!("open_external:{}", url));
    }

    fn navigate(&self, path: &str) {
        self.calls.borrow_mut().push(format!("navigate:{}", path));
    }
}

/// Open in English, then switch to Arabic while open
#[tokio::test(start_paused = true)]
async fn test_welcome_follows_language() {
    let catalog = catalog();
    let widget = widget();
    widget.open();

    let messages = widget.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, Sender::Bot);
    assert_eq!(messages[0].kind, MessageKind::Text);
    assert_eq!(messages[0].text, catalog.dictionary(Language::English).t("chatbot.welcome"));

    widget.set_language(Language::Arabic);
    let messages = widget.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text, catalog.dictionary(Language::Arabic).t("chatbot.welcome"));
    assert!(widget.language().is_rtl());
}

/// Opening announces the welcome before any reply is produced
#[tokio::test(start_paused = true)]
async fn test_welcome_event_precedes_reply() {
    let catalog = catalog();
    let widget = widget();
    let mut rx = widget.subscribe();
    widget.open();

    let mut welcome = None;
    while let Ok(event) = rx.try_recv() {
        if let WidgetEvent::MessageAppended(message) = event {
            welcome = Some(message);
        }
    }
    let welcome = welcome.expect("welcome appended on open");
    assert_eq!(welcome.kind, MessageKind::Text);
    assert_eq!(welcome.text, catalog.dictionary(Language::English).t("chatbot.welcome"));

    widget.submit("Can I get a quote?").unwrap();
    let reply = next_bot_reply(&mut rx).await;
    assert_ne!(reply.id, welcome.id);
    assert_eq!(reply.kind, MessageKind::Action);
}

/// Language switch after a conversation resets the transcript
#[tokio::test(start_paused = true)]
async fn test_language_switch_resets_transcript() {
    let widget = widget();
    let mut rx = widget.subscribe();
    widget.open();

    widget.submit("hello there").unwrap();
    next_bot_reply(&mut rx).await;
    assert_eq!(widget.messages().len(), 3);

    widget.set_language(Language::Arabic);
    assert_eq!(widget.messages().len(), 1);
    assert_eq!(widget.state(), SessionState::Welcomed);
}

/// Quote request: one action that opens the quote form, then closes
#[tokio::test(start_paused = true)]
async fn test_quote_request_flow() {
    let widget = widget();
    let mut rx = widget.subscribe();
    widget.open();

    widget.submit("Can I get a quote?").unwrap();
    let reply = next_bot_reply(&mut rx).await;
    assert_eq!(widget.messages().len(), 3);
    assert_eq!(reply.kind, MessageKind::Action);
    assert_eq!(reply.actions.len(), 1);
    assert_eq!(reply.actions[0].id, action_ids::REQUEST_QUOTE);

    let host = RecordingHost::default();
    widget.invoke_action(action_ids::REQUEST_QUOTE, &host).unwrap();
    assert_eq!(*host.calls.borrow(), vec!["request_quote", "close"]);
}

/// Contact reply offers WhatsApp and email links
#[tokio::test(start_paused = true)]
async fn test_contact_flow() {
    let widget = widget();
    let mut rx = widget.subscribe();
    widget.open();

    widget.submit("How can I contact you?").unwrap();
    let reply = next_bot_reply(&mut rx).await;
    let ids: Vec<_> = reply.actions.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec![action_ids::WHATSAPP, action_ids::EMAIL]);

    let host = RecordingHost::default();
    widget.invoke_action(action_ids::WHATSAPP, &host).unwrap();
    let calls = host.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("open_external:https://wa.me/"));
}

/// A budget mention personalizes the next pricing reply
#[tokio::test(start_paused = true)]
async fn test_budget_personalizes_pricing() {
    let catalog = catalog();
    let english = catalog.dictionary(Language::English);
    let widget = widget();
    let mut rx = widget.subscribe();
    widget.open();

    widget.submit("What is the price?").unwrap();
    let generic = next_bot_reply(&mut rx).await;
    assert_eq!(generic.text, english.t("chatbot.responses.pricing"));

    widget.submit("I have a limited budget").unwrap();
    next_bot_reply(&mut rx).await;
    assert_eq!(
        widget.preferences().budget_signal.as_deref(),
        Some("I have a limited budget")
    );

    widget.submit("How much does it cost?").unwrap();
    let personalized = next_bot_reply(&mut rx).await;
    assert!(personalized.text.contains("I have a limited budget"));

    let host = RecordingHost::default();
    widget.invoke_action(action_ids::VIEW_PRODUCTS, &host).unwrap();
    assert_eq!(*host.calls.borrow(), vec!["navigate:/products"]);
}

/// Suggestion chips, when sent back, are understood
#[tokio::test(start_paused = true)]
async fn test_suggestion_chips_round_trip() {
    for language in [Language::English, Language::Arabic] {
        let widget = widget();
        widget.set_language(language);
        let mut rx = widget.subscribe();
        widget.open();

        widget.submit("xyzzy").unwrap();
        let menu = next_bot_reply(&mut rx).await;
        assert_eq!(menu.kind, MessageKind::Suggestion);

        // "Get a quote" chip
        let chip = menu.suggestions[3].clone();
        widget.submit(&chip).unwrap();
        let reply = next_bot_reply(&mut rx).await;
        assert_eq!(reply.kind, MessageKind::Action, "{}: {}", language, chip);
        assert!(matches!(reply.actions[0].effect, ActionEffect::RequestQuote));
    }
}

/// Closing mid-reply leaves nothing behind
#[tokio::test(start_paused = true)]
async fn test_close_while_typing() {
    let widget = widget();
    widget.open();
    widget.submit("Tell me about your machines").unwrap();
    assert!(widget.is_typing());

    widget.close();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!widget.is_open());
    assert!(widget.messages().is_empty());
    assert_eq!(widget.state(), SessionState::Idle);
}
