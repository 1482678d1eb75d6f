//! Visitor intents recognised by the assistant

use serde::{Deserialize, Serialize};

/// Named category of visitor purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Greeting,
    Pricing,
    Products,
    Features,
    Contact,
    Quote,
    Support,
    Company,
    Industries,
    Installation,
    Maintenance,
    Payment,
    Analytics,
    /// Fallback when nothing matches; never matched directly
    Default,
}

impl IntentKind {
    /// Intents that can win classification, in tie-break order
    pub const CLASSIFIABLE: [IntentKind; 13] = [
        IntentKind::Greeting,
        IntentKind::Pricing,
        IntentKind::Products,
        IntentKind::Features,
        IntentKind::Contact,
        IntentKind::Quote,
        IntentKind::Support,
        IntentKind::Company,
        IntentKind::Industries,
        IntentKind::Installation,
        IntentKind::Maintenance,
        IntentKind::Payment,
        IntentKind::Analytics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Greeting => "greeting",
            IntentKind::Pricing => "pricing",
            IntentKind::Products => "products",
            IntentKind::Features => "features",
            IntentKind::Contact => "contact",
            IntentKind::Quote => "quote",
            IntentKind::Support => "support",
            IntentKind::Company => "company",
            IntentKind::Industries => "industries",
            IntentKind::Installation => "installation",
            IntentKind::Maintenance => "maintenance",
            IntentKind::Payment => "payment",
            IntentKind::Analytics => "analytics",
            IntentKind::Default => "default",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        Self::CLASSIFIABLE
            .iter()
            .chain(std::iter::once(&IntentKind::Default))
            .find(|kind| kind.as_str() == name)
            .copied()
    }
}

impl std::fmt::Display for IntentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
