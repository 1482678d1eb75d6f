//! Vendchat Server
//!
//! HTTP API driving one chat widget per visitor session.

pub mod host;
pub mod http;
pub mod metrics;
pub mod session;
pub mod state;

pub use host::{RecordedEffect, RecordingHost};
pub use http::create_router;
pub use metrics::{init_metrics, record_message, record_request, set_active_sessions};
pub use session::{ChatSession, SessionManager, SessionView};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use vendchat_agent::AgentError;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Max sessions reached")]
    Capacity,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        match err {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Capacity => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AgentError> for ServerError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::EmptyMessage => ServerError::InvalidRequest(err.to_string()),
            AgentError::Busy | AgentError::Closed => ServerError::Conflict(err.to_string()),
            AgentError::UnknownAction(_) => ServerError::NotFound(err.to_string()),
            AgentError::Config(_) => ServerError::Internal(err.to_string()),
        }
    }
}

impl From<vendchat_config::ConfigError> for ServerError {
    fn from(err: vendchat_config::ConfigError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = StatusCode::from(self);
        if status.is_server_error() {
            tracing::error!(error = %message, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
