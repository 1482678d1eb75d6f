//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;
use std::time::Duration;

use metrics_exporter_prometheus::PrometheusHandle;

use vendchat_agent::ChatEngine;
use vendchat_config::{KeywordTables, LocaleCatalog, LocalePreferenceStore, Settings};

use crate::session::SessionManager;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Session manager
    pub sessions: Arc<SessionManager>,
    /// Remembered site language, used for new sessions
    pub preference: Arc<LocalePreferenceStore>,
    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Build state from settings: locale dictionaries, keyword tables and
    /// the session manager
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        let catalog = Arc::new(LocaleCatalog::load(config.locales_dir.as_deref())?);
        let keywords = KeywordTables::load_or_default(config.keywords_path.as_deref());
        let engine = Arc::new(ChatEngine::new(&keywords, config.chatbot.contact.clone()));

        let sessions = Arc::new(SessionManager::new(
            engine,
            catalog,
            config.chatbot.clone(),
            config.server.max_sessions,
            Duration::from_secs(config.server.session_timeout_secs),
            Duration::from_secs(config.server.cleanup_interval_secs),
        ));

        let preference = Arc::new(LocalePreferenceStore::new(
            &config.preference_path,
            config.chatbot.language()?,
        ));

        let metrics = if config.observability.metrics_enabled {
            crate::metrics::init_metrics()
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            sessions,
            preference,
            metrics,
        })
    }
}
