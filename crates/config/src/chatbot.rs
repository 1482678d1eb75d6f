//! Chat assistant configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use vendchat_core::Language;

use crate::ConfigError;

/// Chat assistant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatbotConfig {
    /// Language used when no preference has been saved
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Lower bound of the simulated typing delay (inclusive)
    #[serde(default = "default_typing_delay_min")]
    pub typing_delay_min_ms: u64,

    /// Upper bound of the simulated typing delay (exclusive)
    #[serde(default = "default_typing_delay_max")]
    pub typing_delay_max_ms: u64,

    /// Number of recent visitor utterances kept for intent scoring
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Reject new messages while a reply is pending
    #[serde(default = "default_true")]
    pub block_input_while_typing: bool,

    /// Contact channels offered by action buttons
    #[serde(default)]
    pub contact: ContactConfig,
}

fn default_language() -> String {
    "en".to_string()
}
fn default_typing_delay_min() -> u64 {
    800
}
fn default_typing_delay_max() -> u64 {
    2000
}
fn default_context_window() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            typing_delay_min_ms: default_typing_delay_min(),
            typing_delay_max_ms: default_typing_delay_max(),
            context_window: default_context_window(),
            block_input_while_typing: true,
            contact: ContactConfig::default(),
        }
    }
}

impl ChatbotConfig {
    /// Parsed default language
    pub fn language(&self) -> Result<Language, ConfigError> {
        Language::from_str_loose(&self.default_language).ok_or_else(|| ConfigError::InvalidValue {
            field: "chatbot.default_language".to_string(),
            message: format!("Unsupported language '{}'", self.default_language),
        })
    }

    pub fn typing_delay_min(&self) -> Duration {
        Duration::from_millis(self.typing_delay_min_ms)
    }

    pub fn typing_delay_max(&self) -> Duration {
        Duration::from_millis(self.typing_delay_max_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.language()?;

        if self.typing_delay_min_ms >= self.typing_delay_max_ms {
            return Err(ConfigError::InvalidValue {
                field: "chatbot.typing_delay_min_ms".to_string(),
                message: format!(
                    "Must be below typing_delay_max_ms ({} >= {})",
                    self.typing_delay_min_ms, self.typing_delay_max_ms
                ),
            });
        }

        if self.context_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chatbot.context_window".to_string(),
                message: "Must keep at least one utterance".to_string(),
            });
        }

        self.contact.validate()
    }
}

/// Contact channels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// WhatsApp number in international format, digits only
    #[serde(default = "default_whatsapp_number")]
    pub whatsapp_number: String,

    /// Sales mailbox
    #[serde(default = "default_email")]
    pub email: String,

    /// Site path of the product catalogue
    #[serde(default = "default_products_path")]
    pub products_path: String,
}

fn default_whatsapp_number() -> String {
    "966500000000".to_string()
}
fn default_email() -> String {
    "sales@vendchat.example".to_string()
}
fn default_products_path() -> String {
    "/products".to_string()
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            whatsapp_number: default_whatsapp_number(),
            email: default_email(),
            products_path: default_products_path(),
        }
    }
}

impl ContactConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let digits_only = self.whatsapp_number.chars().all(|c| c.is_ascii_digit());
        if self.whatsapp_number.is_empty() || !digits_only {
            return Err(ConfigError::InvalidValue {
                field: "chatbot.contact.whatsapp_number".to_string(),
                message: "Must be a non-empty string of digits".to_string(),
            });
        }

        if !self.email.contains('@') {
            return Err(ConfigError::InvalidValue {
                field: "chatbot.contact.email".to_string(),
                message: format!("'{}' is not an email address", self.email),
            });
        }

        if !self.products_path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "chatbot.contact.products_path".to_string(),
                message: "Must be an absolute site path".to_string(),
            });
        }

        Ok(())
    }
}
