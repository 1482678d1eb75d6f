//! Session Management
//!
//! One chat widget per visitor session, expired after a period of
//! inactivity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::Instant;

use vendchat_agent::{ChatEngine, ChatWidget, Preferences, SessionState};
use vendchat_config::{ChatbotConfig, LocaleCatalog};
use vendchat_core::{Language, Message};

use crate::ServerError;

/// Serializable view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: String,
    pub open: bool,
    pub state: SessionState,
    pub language: Language,
    pub direction: &'static str,
    pub typing: bool,
    pub messages: Vec<Message>,
    pub preferences: Preferences,
}

/// Session state
pub struct ChatSession {
    /// Session ID
    pub id: String,
    /// Widget driving the conversation
    pub widget: ChatWidget,
    /// Creation time
    pub created_at: Instant,
    /// Last activity
    pub last_activity: RwLock<Instant>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>, widget: ChatWidget) -> Self {
        let now = Instant::now();
        Self {
            id: id.into(),
            widget,
            created_at: now,
            last_activity: RwLock::new(now),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    /// Check if session is expired
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    pub fn view(&self) -> SessionView {
        let language = self.widget.language();
        SessionView {
            session_id: self.id.clone(),
            open: self.widget.is_open(),
            state: self.widget.state(),
            language,
            direction: language.direction().as_str(),
            typing: self.widget.is_typing(),
            messages: self.widget.messages(),
            preferences: self.widget.preferences(),
        }
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<ChatSession>>>,
    engine: Arc<ChatEngine>,
    catalog: Arc<LocaleCatalog>,
    chatbot: ChatbotConfig,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(
        engine: Arc<ChatEngine>,
        catalog: Arc<LocaleCatalog>,
        chatbot: ChatbotConfig,
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            engine,
            catalog,
            chatbot,
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    /// Start a background task that periodically removes expired sessions
    ///
    /// Send `true` on the returned channel to stop it.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(removed, remaining = manager.count(), "Session cleanup");
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session with an open widget
    pub fn create(&self, language: Language) -> Result<Arc<ChatSession>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            Self::remove_expired(&mut sessions, self.session_timeout);
            if sessions.len() >= self.max_sessions {
                return Err(ServerError::Capacity);
            }
        }

        let widget =
            ChatWidget::with_engine(&self.chatbot, self.catalog.clone(), self.engine.clone())?;
        widget.set_language(language);
        widget.open();

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(ChatSession::new(&id, widget));
        sessions.insert(id.clone(), session.clone());
        crate::metrics::set_active_sessions(sessions.len());

        tracing::info!(session_id = %id, language = language.code(), "Created session");
        Ok(session)
    }

    /// Get a session by ID
    pub fn get(&self, id: &str) -> Result<Arc<ChatSession>, ServerError> {
        self.sessions
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
    }

    /// Remove a session; returns whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.remove(id) else {
            return false;
        };
        session.widget.close();
        crate::metrics::set_active_sessions(sessions.len());
        tracing::info!(session_id = %id, "Removed session");
        true
    }

    /// Active session count
    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Remove expired sessions; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        let removed = Self::remove_expired(&mut sessions, self.session_timeout);
        crate::metrics::set_active_sessions(sessions.len());
        removed
    }

    fn remove_expired(
        sessions: &mut HashMap<String, Arc<ChatSession>>,
        timeout: Duration,
    ) -> usize {
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            if let Some(session) = sessions.remove(id) {
                session.widget.close();
                tracing::info!(session_id = %id, "Expired session");
            }
        }
        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendchat_config::{ContactConfig, KeywordTables};

    fn manager(max_sessions: usize, timeout: Duration) -> Arc<SessionManager> {
        Arc::new(SessionManager::new(
            Arc::new(ChatEngine::new(&KeywordTables::default(), ContactConfig::default())),
            Arc::new(LocaleCatalog::builtin().unwrap()),
            ChatbotConfig::default(),
            max_sessions,
            timeout,
            Duration::from_secs(1),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_creation() {
        let manager = manager(10, Duration::from_secs(60));
        let session = manager.create(Language::Arabic).unwrap();

        let view = session.view();
        assert!(view.open);
        assert_eq!(view.language, Language::Arabic);
        assert_eq!(view.direction, "rtl");
        assert_eq!(view.messages.len(), 1);
        assert_eq!(view.state, SessionState::Welcomed);
        assert_eq!(manager.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_get_and_remove() {
        let manager = manager(10, Duration::from_secs(60));
        let id = manager.create(Language::English).unwrap().id.clone();

        assert_eq!(manager.get(&id).unwrap().id, id);
        assert!(manager.remove(&id));
        assert!(!manager.remove(&id));
        assert!(matches!(manager.get(&id), Err(ServerError::SessionNotFound(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_capacity_limit() {
        let manager = manager(1, Duration::from_secs(60));
        manager.create(Language::English).unwrap();
        assert!(matches!(manager.create(Language::English), Err(ServerError::Capacity)));

        // An expired session frees its slot
        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(manager.create(Language::English).is_ok());
        assert_eq!(manager.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_keeps_session_alive() {
        let manager = manager(10, Duration::from_secs(60));
        let active = manager.create(Language::English).unwrap();
        let idle = manager.create(Language::English).unwrap();

        tokio::time::advance(Duration::from_secs(40)).await;
        active.touch();
        tokio::time::advance(Duration::from_secs(40)).await;

        assert_eq!(manager.cleanup_expired(), 1);
        assert!(manager.get(&active.id).is_ok());
        assert!(manager.get(&idle.id).is_err());
        assert!(!idle.widget.is_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task() {
        let manager = manager(10, Duration::from_secs(5));
        manager.create(Language::English).unwrap();

        let shutdown = manager.start_cleanup_task();
        tokio::time::sleep(Duration::from_secs(7)).await;
        assert_eq!(manager.count(), 0);

        shutdown.send(true).unwrap();
    }
}
