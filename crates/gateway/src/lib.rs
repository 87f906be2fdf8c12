//! HTTP API gateway for supportbot.
//!
//! Endpoints:
//!
//! - `POST /chat`                  route one message, get `{reply, source}`
//! - `POST /reset`                 clear a session's history
//! - `GET  /history/{session_id}`  a session's turns, oldest first
//! - `GET  /health`                liveness, corpus size, AI availability
//! - `GET  /faqs`                  the loaded FAQ corpus
//!
//! Every error is a JSON object `{"error": "..."}`, including unknown
//! routes (404) and wrong methods (405).

use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use supportbot_agent::{ChatReply, ChatService};
use supportbot_config::{AppConfig, GatewayConfig};
use supportbot_core::{Error, FaqRecord, SessionId, Turn};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{error, info, warn};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub service: Arc<ChatService>,
    pub max_message_length: usize,
}

pub type SharedState = Arc<GatewayState>;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Build the Axum router with all gateway routes and layers.
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/reset", post(reset_handler))
        .route("/history/{session_id}", get(history_handler))
        .route("/health", get(health_handler))
        .route("/faqs", get(faqs_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS from the configured origins; `"*"` allows any origin.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Start the gateway HTTP server.
///
/// The corpus, provider and history store are built once here and shared by
/// every request.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let service = Arc::new(ChatService::from_config(&config).await?);
    if service.faq_count() == 0 {
        warn!("No FAQs loaded; every message will go to the AI fallback");
    }

    let state = Arc::new(GatewayState {
        service,
        max_message_length: config.gateway.max_message_length,
    });
    let app = build_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Request / response types ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResetRequest {
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub faq_count: usize,
    pub ai_available: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FaqListResponse {
    pub faqs: Vec<FaqRecord>,
}

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            api_error(StatusCode::BAD_REQUEST, "No JSON data provided")
        }
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            api_error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
        }
        other => api_error(
            StatusCode::BAD_REQUEST,
            format!("Invalid JSON body: {}", other.body_text()),
        ),
    }
}

fn internal_error(context: &str, e: Error) -> ApiError {
    error!(error = %e, "{context}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// A present, non-empty string field. Whitespace is kept as sent.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

// --- Handlers ---

async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(payload) = payload.map_err(bad_json)?;

    let (Some(session_id), Some(message)) =
        (required(payload.session_id), required(payload.message))
    else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "session_id and message required",
        ));
    };

    if message.chars().count() > state.max_message_length {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!(
                "Message exceeds maximum length of {} characters",
                state.max_message_length
            ),
        ));
    }

    let session_id = SessionId::from(session_id);
    state
        .service
        .chat(&session_id, &message)
        .await
        .map(Json)
        .map_err(|e| internal_error("Chat turn failed", e))
}

async fn reset_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ResetRequest>, JsonRejection>,
) -> Result<Json<ResetResponse>, ApiError> {
    let Json(payload) = payload.map_err(bad_json)?;

    let Some(session_id) = required(payload.session_id) else {
        return Err(api_error(StatusCode::BAD_REQUEST, "session_id is required"));
    };

    let session_id = SessionId::from(session_id);
    state
        .service
        .reset(&session_id)
        .await
        .map_err(|e| internal_error("Session reset failed", e))?;

    info!(session_id = %session_id, "Session reset");
    Ok(Json(ResetResponse {
        message: format!("Session {session_id} reset successfully"),
    }))
}

async fn history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Turn>>, ApiError> {
    match state.service.history(&SessionId::from(session_id)).await {
        Ok(turns) => Ok(Json(turns)),
        Err(e) => {
            error!(error = %e, "History fetch failed");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not fetch session history",
            ))
        }
    }
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        faq_count: state.service.faq_count(),
        ai_available: state.service.ai_available().await,
    })
}

async fn faqs_handler(State(state): State<SharedState>) -> Json<FaqListResponse> {
    Json(FaqListResponse {
        faqs: state.service.faqs().to_vec(),
    })
}

async fn not_found_handler() -> ApiError {
    api_error(StatusCode::NOT_FOUND, "Endpoint not found")
}

async fn method_not_allowed_handler() -> ApiError {
    api_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
