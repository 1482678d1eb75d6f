//! Actionable buttons offered by the assistant
//!
//! An action's effect is described as data and performed later, when the
//! visitor taps the button, against whatever [`WidgetHost`] embeds the chat.

use serde::{Deserialize, Serialize};

/// Visual weight of an action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Primary,
    Secondary,
}

/// What happens when an action is invoked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEffect {
    /// Open the quote form, then close the chat
    RequestQuote,
    /// Open an external link (WhatsApp deep link, mailto)
    OpenExternal { url: String },
    /// Navigate within the site
    Navigate { path: String },
}

/// Side effects the chat widget can ask its host page to perform
///
/// All calls are fire-and-forget.
pub trait WidgetHost {
    /// Open the quote request form
    fn request_quote(&self);

    /// Close the chat widget
    fn close(&self);

    /// Open a link outside the site
    fn open_external(&self, url: &str);

    /// Navigate to a path on the site
    fn navigate(&self, path: &str);
}

/// A button attached to a bot message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Stable identifier of the logical action (e.g. `request-quote`)
    pub id: String,
    /// Localized label
    pub label: String,
    pub kind: ActionKind,
    pub effect: ActionEffect,
}

impl Action {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        kind: ActionKind,
        effect: ActionEffect,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            effect,
        }
    }

    pub fn primary(id: impl Into<String>, label: impl Into<String>, effect: ActionEffect) -> Self {
        Self::new(id, label, ActionKind::Primary, effect)
    }

    pub fn secondary(
        id: impl Into<String>,
        label: impl Into<String>,
        effect: ActionEffect,
    ) -> Self {
        Self::new(id, label, ActionKind::Secondary, effect)
    }

    /// Perform the action's effect against the host
    pub fn invoke(&self, host: &dyn WidgetHost) {
        tracing::debug!(action = %self.id, "Invoking action");
        match &self.effect {
            ActionEffect::RequestQuote => {
                host.request_quote();
                host.close();
            }
            ActionEffect::OpenExternal { url } => host.open_external(url),
            ActionEffect::Navigate { path } => host.navigate(path),
        }
    }
}
