//! HTTP Endpoints
//!
//! REST API for the chat widget.

use std::time::Duration;

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use vendchat_core::{Language, Message, Script};

use crate::host::{RecordedEffect, RecordingHost};
use crate::metrics::{record_message, record_request};
use crate::session::SessionView;
use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        .route("/api/chat/sessions", post(create_session).get(list_sessions))
        .route("/api/chat/sessions/:id", get(get_session).delete(delete_session))
        .route("/api/chat/sessions/:id/open", post(open_widget))
        .route("/api/chat/sessions/:id/close", post(close_widget))
        .route("/api/chat/sessions/:id/messages", post(submit_message))
        .route("/api/chat/sessions/:id/language", put(set_language))
        .route("/api/chat/sessions/:id/actions/:action_id", post(invoke_action))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(cors_layer),
        )
        .with_state(state)
}

fn localhost_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:3000"))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return localhost_cors();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return localhost_cors();
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

fn parse_language(value: &str) -> Result<Language, ServerError> {
    Language::from_str_loose(value)
        .ok_or_else(|| ServerError::InvalidRequest(format!("Unsupported language '{}'", value)))
}

/// Create session request
#[derive(Debug, Default, Deserialize)]
struct CreateSessionRequest {
    language: Option<String>,
}

/// Create session; the widget opens with a welcome message
async fn create_session(
    State(state): State<AppState>,
    request: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<SessionView>), ServerError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let language = match request.language.as_deref() {
        Some(code) => parse_language(code)?,
        None => state.preference.load(),
    };

    let session = state.sessions.create(language)?;
    record_request("create_session", StatusCode::CREATED.as_u16());
    Ok((StatusCode::CREATED, Json(session.view())))
}

/// List sessions
async fn list_sessions(State(state): State<AppState>) -> Json<serde_json::Value> {
    let sessions = state.sessions.list();
    Json(serde_json::json!({
        "sessions": sessions,
        "count": sessions.len(),
    }))
}

/// Get session transcript and status
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.sessions.get(&id)?;
    record_request("get_session", StatusCode::OK.as_u16());
    Ok(Json(session.view()))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    let status = if state.sessions.remove(&id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    };
    record_request("delete_session", status.as_u16());
    status
}

/// Reopen a closed widget with a fresh conversation
async fn open_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.sessions.get(&id)?;
    session.touch();
    session.widget.open();
    Ok(Json(session.view()))
}

/// Close the widget, discarding the conversation
async fn close_widget(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let session = state.sessions.get(&id)?;
    session.touch();
    session.widget.close();
    Ok(Json(session.view()))
}

/// Message request
#[derive(Debug, Deserialize)]
struct MessageRequest {
    text: String,
}

/// Message accepted; the reply follows after the typing delay
#[derive(Debug, Serialize)]
struct MessageAccepted {
    message: Message,
    typing: bool,
}

async fn submit_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<(StatusCode, Json<MessageAccepted>), ServerError> {
    let session = state.sessions.get(&id)?;
    session.touch();

    let message = session.widget.submit(&request.text)?;
    let language = session.widget.language();
    tracing::debug!(
        session_id = %id,
        script = ?Script::detect(&message.text),
        language = language.code(),
        "Visitor message accepted"
    );
    record_message(language.code());
    record_request("submit_message", StatusCode::ACCEPTED.as_u16());

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageAccepted {
            message,
            typing: session.widget.is_typing(),
        }),
    ))
}

/// Language request
#[derive(Debug, Deserialize)]
struct LanguageRequest {
    language: String,
}

/// Switch language; an open widget restarts with a fresh welcome
async fn set_language(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<LanguageRequest>,
) -> Result<Json<SessionView>, ServerError> {
    let language = parse_language(&request.language)?;
    let session = state.sessions.get(&id)?;
    session.touch();
    session.widget.set_language(language);

    if let Err(e) = state.preference.save(language) {
        tracing::warn!(error = %e, "Failed to persist locale preference");
    }
    record_request("set_language", StatusCode::OK.as_u16());
    Ok(Json(session.view()))
}

/// Action invocation result
#[derive(Debug, Serialize)]
struct ActionInvoked {
    action_id: String,
    /// Effects the client performs, in order
    effects: Vec<RecordedEffect>,
    open: bool,
}

async fn invoke_action(
    State(state): State<AppState>,
    Path((id, action_id)): Path<(String, String)>,
) -> Result<Json<ActionInvoked>, ServerError> {
    let session = state.sessions.get(&id)?;
    session.touch();

    let host = RecordingHost::new();
    session.widget.invoke_action(&action_id, &host)?;
    if host.requested_close() {
        session.widget.close();
    }

    record_request("invoke_action", StatusCode::OK.as_u16());
    Ok(Json(ActionInvoked {
        action_id,
        effects: host.into_effects(),
        open: session.widget.is_open(),
    }))
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness check
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ready",
        "sessions": state.sessions.count(),
    }))
}

/// Prometheus metrics
async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .ok_or(StatusCode::NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vendchat_config::Settings;

    #[tokio::test]
    async fn test_router_creation() {
        let state = AppState::new(Settings::default()).unwrap();
        let _ = create_router(state);
    }

    #[test]
    fn test_cors_layer_variants() {
        let _ = build_cors_layer(&[], true);
        let _ = build_cors_layer(&[], false);
        let origins = ["https://example.com".to_string(), "bad\norigin".to_string()];
        let _ = build_cors_layer(&origins, true);
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language("AR").unwrap(), Language::Arabic);
        assert!(matches!(parse_language("fr"), Err(ServerError::InvalidRequest(_))));
    }
}
