//! Reply generation
//!
//! One branch per intent. Every display string comes from the active
//! dictionary under `chatbot.*`; intents without copy of their own are
//! answered like `default`.

use vendchat_config::ContactConfig;
use vendchat_core::{Action, ActionEffect, IntentKind, Message, MessageId, Translator, Vars};

use crate::preferences::Preferences;

/// Stable action identifiers
pub mod action_ids {
    pub const REQUEST_QUOTE: &str = "request-quote";
    pub const VIEW_PRODUCTS: &str = "view-products";
    pub const WHATSAPP: &str = "whatsapp";
    pub const EMAIL: &str = "email";
}

const GREETING_CHIPS: &[&str] = &["pricing", "products", "getQuote", "contact"];
const PRODUCTS_CHIPS: &[&str] = &["features", "pricing", "industries"];
const FEATURES_CHIPS: &[&str] = &["products", "pricing", "getQuote"];
const INDUSTRIES_CHIPS: &[&str] = &["products", "installation", "getQuote"];
const DEFAULT_CHIPS: &[&str] = &["products", "pricing", "contact", "getQuote"];

/// Builds bot replies for detected intents
#[derive(Debug, Clone, Default)]
pub struct ResponseGenerator {
    contact: ContactConfig,
}

impl ResponseGenerator {
    pub fn new(contact: ContactConfig) -> Self {
        Self { contact }
    }

    /// Opening message shown when the widget opens
    pub fn welcome(&self, id: MessageId, t: &dyn Translator) -> Message {
        Message::bot_text(id, t.t("chatbot.welcome"))
    }

    /// Reply to a classified turn
    pub fn generate(
        &self,
        id: MessageId,
        intent: IntentKind,
        preferences: &Preferences,
        t: &dyn Translator,
    ) -> Message {
        match intent {
            IntentKind::Greeting => suggestions(id, t, "greeting", GREETING_CHIPS),
            IntentKind::Products => suggestions(id, t, "products", PRODUCTS_CHIPS),
            IntentKind::Features => suggestions(id, t, "features", FEATURES_CHIPS),
            IntentKind::Industries => suggestions(id, t, "industries", INDUSTRIES_CHIPS),
            IntentKind::Contact => self.contact_reply(id, t),
            IntentKind::Pricing => self.pricing_reply(id, preferences, t),
            IntentKind::Quote => Message::bot_actions(
                id,
                t.t("chatbot.responses.quote"),
                vec![request_quote(t)],
            ),
            IntentKind::Support
            | IntentKind::Company
            | IntentKind::Installation
            | IntentKind::Maintenance
            | IntentKind::Payment
            | IntentKind::Analytics
            | IntentKind::Default => suggestions(id, t, "default", DEFAULT_CHIPS),
        }
    }

    fn pricing_reply(
        &self,
        id: MessageId,
        preferences: &Preferences,
        t: &dyn Translator,
    ) -> Message {
        let text = match &preferences.budget_signal {
            Some(budget) => t.t_with(
                "chatbot.responses.pricingPersonalized",
                Some(&Vars::new().with("budget", budget)),
            ),
            None => t.t("chatbot.responses.pricing"),
        };

        Message::bot_actions(
            id,
            text,
            vec![
                request_quote(t),
                Action::secondary(
                    action_ids::VIEW_PRODUCTS,
                    t.t("chatbot.actions.viewProducts"),
                    ActionEffect::Navigate {
                        path: self.contact.products_path.clone(),
                    },
                ),
            ],
        )
    }

    fn contact_reply(&self, id: MessageId, t: &dyn Translator) -> Message {
        Message::bot_actions(
            id,
            t.t("chatbot.responses.contact"),
            vec![
                Action::primary(
                    action_ids::WHATSAPP,
                    t.t("chatbot.actions.whatsapp"),
                    ActionEffect::OpenExternal {
                        url: self.whatsapp_url(&t.t("chatbot.whatsappMessage")),
                    },
                ),
                Action::secondary(
                    action_ids::EMAIL,
                    t.t("chatbot.actions.email"),
                    ActionEffect::OpenExternal {
                        url: self.mailto_url(&t.t("chatbot.emailSubject")),
                    },
                ),
            ],
        )
    }

    /// WhatsApp deep link with a prefilled message
    pub fn whatsapp_url(&self, message: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            self.contact.whatsapp_number,
            urlencoding::encode(message)
        )
    }

    pub fn mailto_url(&self, subject: &str) -> String {
        format!("mailto:{}?subject={}", self.contact.email, urlencoding::encode(subject))
    }
}

fn suggestions(id: MessageId, t: &dyn Translator, response: &str, chips: &[&str]) -> Message {
    Message::bot_suggestions(
        id,
        t.t(&format!("chatbot.responses.{}", response)),
        chips
            .iter()
            .map(|chip| t.t(&format!("chatbot.suggestions.{}", chip)))
            .collect(),
    )
}

fn request_quote(t: &dyn Translator) -> Action {
    Action::primary(
        action_ids::REQUEST_QUOTE,
        t.t("chatbot.actions.getQuote"),
        ActionEffect::RequestQuote,
    )
}
