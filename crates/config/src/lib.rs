//! Configuration management for the vendchat assistant
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`VENDCHAT__` prefix)
//!
//! and owns the content the assistant speaks with:
//! - Locale dictionaries (embedded English and Arabic, overridable per file)
//! - Intent, budget and industry keyword tables
//! - The persisted locale preference

pub mod chatbot;
pub mod keywords;
pub mod locales;
pub mod preference;
pub mod settings;

pub use chatbot::{ChatbotConfig, ContactConfig};
pub use keywords::{IntentKeywords, KeywordTables};
pub use locales::LocaleCatalog;
pub use preference::LocalePreferenceStore;
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, RuntimeEnvironment, ServerConfig,
    Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<vendchat_core::Error> for ConfigError {
    fn from(err: vendchat_core::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
