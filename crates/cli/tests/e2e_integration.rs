//! End-to-end tests for supportbot.
//!
//! These drive a message from the boundary all the way through FAQ matching,
//! the AI fallback, and history persistence, using mock generation services
//! and real history stores.

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use supportbot_agent::{
    AiFallback, ChatService, ContextBuilder, FaqCorpus, FaqMatcher, TurnOrchestrator, load_corpus,
};
use supportbot_config::{AppConfig, GatewayConfig};
use supportbot_core::error::ProviderError;
use supportbot_core::provider::{Provider, ProviderRequest, ProviderResponse};
use supportbot_core::{FaqRecord, HistoryStore, SessionId, Source, Turn};
use supportbot_gateway::{GatewayState, build_router};
use supportbot_memory::{InMemoryHistory, SqliteHistory};
use tower::ServiceExt;

// ── Mock providers ──────────────────────────────────────────────────────

/// Answers every prompt with the same text and remembers the prompts.
struct ScriptedProvider {
    reply: String,
    prompts: std::sync::Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.into(),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.prompts.lock().unwrap().push(request.prompt);
        Ok(ProviderResponse {
            text: self.reply.clone(),
            model: request.model,
            usage: None,
        })
    }
}

/// Fault-injected client: every call fails.
struct ExplodingProvider;

#[async_trait::async_trait]
impl Provider for ExplodingProvider {
    fn name(&self) -> &str {
        "exploding"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::ApiError {
            status_code: 503,
            message: "upstream exploded".into(),
        })
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

fn password_corpus() -> FaqCorpus {
    FaqCorpus::new(vec![
        FaqRecord::new("How do I reset my password?", "Visit Settings > Password.")
            .with_keywords(["password", "reset"]),
    ])
}

fn service(provider: Arc<dyn Provider>, store: Arc<dyn HistoryStore>) -> ChatService {
    let orchestrator = TurnOrchestrator::new(
        Arc::new(password_corpus()),
        FaqMatcher::default(),
        ContextBuilder::new("You are a support assistant."),
        AiFallback::new(provider, "test-model"),
    );
    ChatService::new(orchestrator, store)
}

fn memory_service(provider: Arc<dyn Provider>) -> ChatService {
    service(provider, Arc::new(InMemoryHistory::new()))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Scenario 1: FAQ hit ─────────────────────────────────────────────────

#[tokio::test]
async fn e2e_faq_hit_short_circuits_ai() {
    let provider = Arc::new(ScriptedProvider::new("should not be used"));
    let svc = memory_service(provider.clone());
    let session = SessionId::from("scenario-1");

    let reply = svc.chat(&session, "how do i reset my password").await.unwrap();

    assert_eq!(reply.reply, "Visit Settings > Password.");
    assert_eq!(reply.source, Source::Faq);
    assert_eq!(provider.calls(), 0);

    let history = svc.history(&session).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].source, Source::Faq);
}

// ── Scenario 2: no match, AI fallback ───────────────────────────────────

#[tokio::test]
async fn e2e_no_match_falls_back_to_ai() {
    let provider = Arc::new(ScriptedProvider::new("I can't check the weather, sorry."));
    let svc = memory_service(provider.clone());
    let session = SessionId::from("scenario-2");

    let reply = svc.chat(&session, "what is the weather today").await.unwrap();

    assert_eq!(reply.source, Source::Ai);
    assert_eq!(reply.reply, "I can't check the weather, sorry.");
    assert_eq!(provider.calls(), 1);
    assert!(provider.last_prompt().starts_with("You are a support assistant.\n\n"));
    assert!(provider
        .last_prompt()
        .ends_with("Current user message: what is the weather today"));
}

#[tokio::test]
async fn e2e_ai_prompt_carries_last_five_turns() {
    let provider = Arc::new(ScriptedProvider::new("ok"));
    let svc = memory_service(provider.clone());
    let session = SessionId::from("long-session");

    for i in 1..=7 {
        svc.chat(&session, &format!("small talk {i}")).await.unwrap();
    }

    let prompt = provider.last_prompt();
    // The 7th call saw six prior turns; only turns 2..=6 fit in the window.
    assert!(!prompt.contains("User: small talk 1\n"));
    for i in 2..=6 {
        assert!(prompt.contains(&format!("User: small talk {i}\n")), "turn {i} missing");
    }
    assert_eq!(svc.history(&session).await.unwrap().len(), 7);
}

// ── Scenario 3: reset then history ──────────────────────────────────────

#[tokio::test]
async fn e2e_reset_then_history_is_empty() {
    let svc = memory_service(Arc::new(ScriptedProvider::new("hi")));
    let session = SessionId::from("scenario-3");

    svc.chat(&session, "hello").await.unwrap();
    svc.chat(&session, "how do i reset my password").await.unwrap();
    assert_eq!(svc.history(&session).await.unwrap().len(), 2);

    svc.reset(&session).await.unwrap();
    assert!(svc.history(&session).await.unwrap().is_empty());
}

#[tokio::test]
async fn e2e_reset_on_sqlite_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sessions.db");
    let store = SqliteHistory::new(db.to_str().unwrap()).await.unwrap();
    let svc = service(Arc::new(ScriptedProvider::new("hi")), Arc::new(store));
    let session = SessionId::from("scenario-3-sqlite");

    svc.chat(&session, "hello").await.unwrap();
    let turns: Vec<Turn> = svc.history(&session).await.unwrap();
    assert_eq!(turns.len(), 1);

    svc.reset(&session).await.unwrap();
    assert!(svc.history(&session).await.unwrap().is_empty());
}

// ── Scenario 4: generation fault ────────────────────────────────────────

#[tokio::test]
async fn e2e_generation_fault_degrades_to_apology() {
    let svc = memory_service(Arc::new(ExplodingProvider));
    let session = SessionId::from("scenario-4");

    let reply = svc.chat(&session, "what is the weather today").await.unwrap();

    assert_eq!(reply.source, Source::Ai);
    assert!(reply.reply.contains("upstream exploded"));
    assert!(reply.reply.contains("technical difficulties"));

    // The degraded turn is still recorded
    let history = svc.history(&session).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].assistant, reply.reply);
    assert!(!svc.ai_available().await);
}

// ── Over HTTP ───────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_http_round_trip() {
    let svc = memory_service(Arc::new(ScriptedProvider::new("generated")));
    let state = Arc::new(GatewayState {
        service: Arc::new(svc),
        max_message_length: 1000,
    });
    let app = build_router(state, &GatewayConfig::default());

    let response = app
        .clone()
        .oneshot(post_json(
            "/chat",
            serde_json::json!({"session_id": "web", "message": "how do i reset my password"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["source"], "FAQ");

    let response = app
        .clone()
        .oneshot(post_json(
            "/chat",
            serde_json::json!({"session_id": "web", "message": "what is the weather today"}),
        ))
        .await
        .unwrap();
    let json = json_body(response).await;
    assert_eq!(json["source"], "AI");
    assert_eq!(json["reply"], "generated");

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/history/web").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let turns = json_body(response).await;
    assert_eq!(turns.as_array().unwrap().len(), 2);
    assert_eq!(turns[0]["source"], "FAQ");
    assert_eq!(turns[1]["source"], "AI");

    let response = app
        .clone()
        .oneshot(post_json("/reset", serde_json::json!({"session_id": "web"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/history/web").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(json_body(response).await, serde_json::json!([]));
}

// ── Wiring from configuration ───────────────────────────────────────────

#[tokio::test]
async fn e2e_service_from_config_loads_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("faq_dataset.json");
    let mut file = std::fs::File::create(&dataset).unwrap();
    write!(
        file,
        r#"[{{"question": "How do I get a refund?", "answer": "Refunds are open for 30 days after purchase.", "keywords": "refund return"}}]"#
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.faq.dataset_path = dataset.display().to_string();
    config.memory.backend = "sqlite".into();
    config.memory.path = dir.path().join("sessions.db").display().to_string();

    let svc = ChatService::from_config(&config).await.unwrap();
    assert_eq!(svc.faq_count(), 1);
    assert_eq!(load_corpus(&dataset).unwrap().len(), 1);

    let reply = svc
        .chat(&"cfg".into(), "how can i get a refund")
        .await
        .unwrap();
    assert_eq!(reply.source, Source::Faq);
    assert_eq!(reply.reply, "Refunds are open for 30 days after purchase.");
}

#[tokio::test]
async fn e2e_bundled_dataset_routing_with_default_threshold() {
    let mut config = AppConfig::default();
    config.faq.dataset_path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../faq_dataset.json").into();
    config.memory.backend = "memory".into();
    config.api_key = None;

    let svc = ChatService::from_config(&config).await.unwrap();
    assert_eq!(svc.faq_count(), 8);
    let session = SessionId::from("bundled");

    let reply = svc.chat(&session, "how do i reset my password").await.unwrap();
    assert_eq!(reply.source, Source::Faq);
    assert!(reply.reply.contains("Reset Password"));

    // No API key: the AI turn degrades to the apology, but it is still an AI turn
    let reply = svc.chat(&session, "what is the weather today").await.unwrap();
    assert_eq!(reply.source, Source::Ai);
    assert!(reply.reply.contains("technical difficulties"));
}
