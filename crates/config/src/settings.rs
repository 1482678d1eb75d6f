//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ChatbotConfig, ConfigError};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Chat assistant behaviour
    #[serde(default)]
    pub chatbot: ChatbotConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Directory with `<code>.json` locale overrides; embedded copy otherwise
    #[serde(default)]
    pub locales_dir: Option<String>,

    /// YAML file overriding the built-in keyword tables
    #[serde(default)]
    pub keywords_path: Option<String>,

    /// Where the visitor's language choice is remembered
    #[serde(default = "default_preference_path")]
    pub preference_path: String,
}

fn default_preference_path() -> String {
    "data/locale.json".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::default(),
            server: ServerConfig::default(),
            chatbot: ChatbotConfig::default(),
            observability: ObservabilityConfig::default(),
            locales_dir: None,
            keywords_path: None,
            preference_path: default_preference_path(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chatbot.validate()?;
        self.server.validate(self.environment)?;

        if let Some(dir) = &self.locales_dir {
            if !Path::new(dir).is_dir() {
                if self.environment.is_strict() {
                    return Err(ConfigError::FileNotFound(dir.clone()));
                }
                tracing::warn!(
                    locales_dir = %dir,
                    "Locale directory missing, using embedded dictionaries"
                );
            }
        }

        if let Some(path) = &self.keywords_path {
            if !Path::new(path).is_file() {
                if self.environment.is_strict() {
                    return Err(ConfigError::FileNotFound(path.clone()));
                }
                tracing::warn!(
                    keywords_path = %path,
                    "Keyword file missing, using built-in tables"
                );
            }
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed origins; empty means localhost only
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum concurrent chat sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time after which a chat session is dropped
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_true() -> bool {
    true
}
fn default_max_sessions() -> usize {
    1000
}
fn default_session_timeout() -> u64 {
    1800
}
fn default_cleanup_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

impl ServerConfig {
    fn validate(&self, environment: RuntimeEnvironment) -> Result<(), ConfigError> {
        if self.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "Must allow at least one session".to_string(),
            });
        }

        if self.session_timeout_secs == 0 || self.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_timeout_secs".to_string(),
                message: "Timeout and cleanup interval must be positive".to_string(),
            });
        }

        if !self.cors_enabled && environment.is_production() {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_enabled".to_string(),
                message: "CORS must be enabled in production".to_string(),
            });
        }

        Ok(())
    }
}

/// Logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Load settings with an explicit configuration directory
pub fn load_settings_from(
    dir: impl AsRef<Path>,
    env: Option<&str>,
) -> Result<Settings, ConfigError> {
    let dir = dir.as_ref();
    let mut builder = Config::builder()
        .add_source(File::from(dir.join("default")).required(false));

    if let Some(env) = env {
        builder = builder.add_source(File::from(dir.join(env)).required(false));
    }

    let settings: Settings = builder
        .add_source(
            Environment::with_prefix("VENDCHAT")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("server.cors_origins"),
        )
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_settings_validate() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.preference_path, "data/locale.json");
    }

    #[test]
    fn test_default_preference_path_is_writable() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::default();
        assert!(!settings.preference_path.is_empty());

        // Same relative layout the server uses, rooted in a scratch dir
        let path = dir.path().join(&settings.preference_path);
        let store = crate::LocalePreferenceStore::new(&path, vendchat_core::Language::English);
        store.save(vendchat_core::Language::Arabic).unwrap();
        assert_eq!(store.load(), vendchat_core::Language::Arabic);
    }

    #[test]
    fn test_layered_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.yaml"),
            concat!(
                "server:\n",
                "  port: 9000\n",
                "chatbot:\n",
                "  typing_delay_min_ms: 100\n",
                "  typing_delay_max_ms: 200\n",
            ),
        )
        .unwrap();
        fs::write(
            dir.path().join("staging.yaml"),
            "environment: staging\nserver:\n  port: 9100\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.chatbot.typing_delay_min_ms, 100);
        assert_eq!(settings.chatbot.default_language, "en");
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(dir.path(), Some("production-missing")).unwrap();
        assert_eq!(settings.server.max_sessions, 1000);
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.yaml"), "chatbot:\n  context_window: 0\n").unwrap();
        assert!(matches!(
            load_settings_from(dir.path(), None),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_strict_environment_requires_locale_dir() {
        let settings = Settings {
            environment: RuntimeEnvironment::Production,
            locales_dir: Some("/definitely/not/here".to_string()),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::FileNotFound(_))));
    }
}
