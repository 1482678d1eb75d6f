//! Chat widget runtime
//!
//! Owns one conversation session and drives turn-taking: visitor messages
//! are appended immediately, bot replies after a simulated typing delay.
//! Replies are produced by a per-open worker task. Closing the widget, or
//! switching language while it is open, aborts the worker; a reply that
//! still reaches the widget afterwards is discarded by its epoch.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use vendchat_config::{ChatbotConfig, KeywordTables, LocaleCatalog};
use vendchat_core::{Action, Language, Message, WidgetHost};

use crate::delay::TypingDelay;
use crate::engine::ChatEngine;
use crate::preferences::Preferences;
use crate::session::{ConversationSession, SessionState};
use crate::AgentError;

/// Widget events
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// Widget opened
    Opened { language: Language },
    /// Widget closed, transcript discarded
    Closed,
    /// Active language changed
    LanguageChanged { language: Language },
    /// A message joined the transcript
    MessageAppended(Message),
    /// A reply is pending
    TypingStarted,
    /// No reply is pending any more
    TypingStopped,
}

struct WidgetState {
    open: bool,
    /// Bumped whenever pending replies must be forgotten
    epoch: u64,
    language: Language,
    session: ConversationSession,
    /// Replies queued but not yet delivered
    pending: usize,
    replies: Option<mpsc::UnboundedSender<String>>,
    worker: Option<JoinHandle<()>>,
}

struct WidgetInner {
    engine: Arc<ChatEngine>,
    catalog: Arc<LocaleCatalog>,
    delay: TypingDelay,
    block_input_while_typing: bool,
    state: Mutex<WidgetState>,
    event_tx: broadcast::Sender<WidgetEvent>,
}

impl WidgetInner {
    fn emit(&self, event: WidgetEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Stop the reply worker; returns whether a reply was pending
    fn stop_worker(&self, state: &mut WidgetState) -> bool {
        if let Some(worker) = state.worker.take() {
            worker.abort();
        }
        state.replies = None;
        let was_typing = state.pending > 0;
        state.pending = 0;
        was_typing
    }

    fn deliver_reply(&self, epoch: u64, utterance: &str) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        if !state.open || state.epoch != epoch {
            tracing::debug!(epoch, current = state.epoch, "Discarding stale reply");
            return;
        }

        let dictionary = self.catalog.dictionary(state.language);
        let outcome = self.engine.reply(&mut state.session, utterance, &*dictionary);
        state.pending = state.pending.saturating_sub(1);

        self.emit(WidgetEvent::MessageAppended(outcome.reply));
        if state.pending == 0 {
            self.emit(WidgetEvent::TypingStopped);
        }
    }
}

impl Drop for WidgetInner {
    fn drop(&mut self) {
        if let Some(worker) = self.state.get_mut().worker.take() {
            worker.abort();
        }
    }
}

fn start_worker(inner: &Arc<WidgetInner>, state: &mut WidgetState) {
    let (tx, rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(run_replies(Arc::downgrade(inner), state.epoch, inner.delay, rx));
    state.replies = Some(tx);
    state.worker = Some(worker);
}

async fn run_replies(
    widget: Weak<WidgetInner>,
    epoch: u64,
    delay: TypingDelay,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    while let Some(utterance) = rx.recv().await {
        tokio::time::sleep(delay.sample()).await;

        let Some(inner) = widget.upgrade() else {
            tracing::debug!("Widget gone before reply was ready");
            return;
        };
        inner.deliver_reply(epoch, &utterance);
    }
}

/// Chat widget controller
pub struct ChatWidget {
    inner: Arc<WidgetInner>,
}

impl ChatWidget {
    /// Create a closed widget in the configured default language
    pub fn new(
        config: &ChatbotConfig,
        catalog: Arc<LocaleCatalog>,
        keywords: &KeywordTables,
    ) -> Result<Self, AgentError> {
        config.validate()?;
        let engine = Arc::new(ChatEngine::new(keywords, config.contact.clone()));
        Self::with_engine(config, catalog, engine)
    }

    /// Create a widget sharing an existing engine
    pub fn with_engine(
        config: &ChatbotConfig,
        catalog: Arc<LocaleCatalog>,
        engine: Arc<ChatEngine>,
    ) -> Result<Self, AgentError> {
        let language = config.language()?;
        let (event_tx, _) = broadcast::channel(100);

        Ok(Self {
            inner: Arc::new(WidgetInner {
                engine,
                catalog,
                delay: TypingDelay::from_config(config),
                block_input_while_typing: config.block_input_while_typing,
                state: Mutex::new(WidgetState {
                    open: false,
                    epoch: 0,
                    language,
                    session: ConversationSession::new(config.context_window),
                    pending: 0,
                    replies: None,
                    worker: None,
                }),
                event_tx,
            }),
        })
    }

    /// Subscribe to widget events
    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn is_open(&self) -> bool {
        self.inner.state.lock().open
    }

    pub fn language(&self) -> Language {
        self.inner.state.lock().language
    }

    pub fn is_typing(&self) -> bool {
        self.inner.state.lock().pending > 0
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.lock().session.state()
    }

    /// Snapshot of the transcript
    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().session.messages().to_vec()
    }

    pub fn preferences(&self) -> Preferences {
        self.inner.state.lock().session.preferences().clone()
    }

    /// Open the widget with a fresh session and a welcome message
    ///
    /// Must be called from within a Tokio runtime. Opening an open widget
    /// does nothing.
    pub fn open(&self) {
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        if state.open {
            return;
        }

        state.open = true;
        state.epoch += 1;
        let dictionary = self.inner.catalog.dictionary(state.language);
        let welcome = self.inner.engine.open(&mut state.session, &*dictionary);
        start_worker(&self.inner, state);

        tracing::info!(language = state.language.code(), epoch = state.epoch, "Chat widget opened");
        self.inner.emit(WidgetEvent::Opened { language: state.language });
        self.inner.emit(WidgetEvent::MessageAppended(welcome));
    }

    /// Close the widget, dropping the session and any pending reply
    pub fn close(&self) {
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        if !state.open {
            return;
        }

        state.open = false;
        let was_typing = self.inner.stop_worker(state);
        state.session.reset();

        tracing::info!(dropped_reply = was_typing, "Chat widget closed");
        if was_typing {
            self.inner.emit(WidgetEvent::TypingStopped);
        }
        self.inner.emit(WidgetEvent::Closed);
    }

    /// Switch the active language
    ///
    /// While open, the transcript is replaced by a welcome message in the
    /// new language and any pending reply is dropped.
    pub fn set_language(&self, language: Language) {
        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        if state.language == language {
            return;
        }

        state.language = language;
        tracing::info!(language = language.code(), open = state.open, "Chat language changed");
        self.inner.emit(WidgetEvent::LanguageChanged { language });

        if !state.open {
            return;
        }

        let was_typing = self.inner.stop_worker(state);
        state.epoch += 1;
        let dictionary = self.inner.catalog.dictionary(language);
        let welcome = self.inner.engine.rewelcome(&mut state.session, &*dictionary);
        start_worker(&self.inner, state);

        if was_typing {
            self.inner.emit(WidgetEvent::TypingStopped);
        }
        self.inner.emit(WidgetEvent::MessageAppended(welcome));
    }

    /// Submit a visitor message
    ///
    /// The message is appended right away; the reply follows after the
    /// typing delay. Returns the appended message.
    pub fn submit(&self, text: &str) -> Result<Message, AgentError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AgentError::EmptyMessage);
        }

        let mut guard = self.inner.state.lock();
        let state = &mut *guard;
        if !state.open {
            return Err(AgentError::Closed);
        }
        if self.inner.block_input_while_typing && state.pending > 0 {
            return Err(AgentError::Busy);
        }

        let replies = state.replies.as_ref().ok_or(AgentError::Closed)?;
        replies.send(text.to_string()).map_err(|_| AgentError::Closed)?;

        let message = state.session.push_user(text);
        state.pending += 1;

        self.inner.emit(WidgetEvent::MessageAppended(message.clone()));
        if state.pending == 1 {
            self.inner.emit(WidgetEvent::TypingStarted);
        }
        Ok(message)
    }

    /// Perform an action offered by a bot message
    ///
    /// The most recent message carrying `action_id` is used.
    pub fn invoke_action(
        &self,
        action_id: &str,
        host: &dyn WidgetHost,
    ) -> Result<Action, AgentError> {
        let action = {
            let state = self.inner.state.lock();
            if !state.open {
                return Err(AgentError::Closed);
            }
            state
                .session
                .find_action(action_id)
                .cloned()
                .ok_or_else(|| AgentError::UnknownAction(action_id.to_string()))?
        };

        // Lock released: the host may close this widget
        action.invoke(host);
        Ok(action)
    }
}
