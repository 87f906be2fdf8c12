//! Chat service: the turn orchestrator bound to a history store.
//!
//! This is the surface the HTTP gateway and the CLI talk to.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use supportbot_config::AppConfig;
use supportbot_core::error::Error;
use supportbot_core::history::HistoryStore;
use supportbot_core::{FaqRecord, Result, SessionId, Source, Turn};
use tracing::{debug, info};

use crate::corpus::FaqCorpus;
use crate::orchestrator::TurnOrchestrator;

/// The reply half of a turn, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    pub source: Source,
}

pub struct ChatService {
    orchestrator: TurnOrchestrator,
    store: Arc<dyn HistoryStore>,
}

impl ChatService {
    pub fn new(orchestrator: TurnOrchestrator, store: Arc<dyn HistoryStore>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }

    /// Build every collaborator from configuration: corpus (loaded once),
    /// generation provider, and history store.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let corpus = Arc::new(FaqCorpus::load_or_empty(&config.faq.dataset_path));

        let router = supportbot_providers::build_from_config(config);
        let provider = router.default().ok_or_else(|| Error::Config {
            message: format!("Provider '{}' is not available", config.default_provider),
        })?;

        let store = supportbot_memory::build_from_config(&config.memory).await?;

        info!(
            faqs = corpus.len(),
            provider = %provider.name(),
            store = %store.name(),
            "Chat service ready"
        );

        Ok(Self::new(
            TurnOrchestrator::from_config(config, corpus, provider),
            store,
        ))
    }

    /// Handle one message: load history, route, save, reply.
    ///
    /// Requests for the same session are not serialized. Two concurrent
    /// calls can read the same history and the later save wins, dropping
    /// the other turn.
    pub async fn chat(&self, session_id: &SessionId, message: &str) -> Result<ChatReply> {
        let history = self.store.get(session_id).await?;
        debug!(session_id = %session_id, turns = history.len(), "Loaded history");

        let outcome = self
            .orchestrator
            .handle_turn(session_id, message, &history)
            .await;

        self.store.save(session_id, &outcome.history).await?;

        Ok(ChatReply {
            reply: outcome.reply,
            source: outcome.source,
        })
    }

    /// Empty a session's history.
    pub async fn reset(&self, session_id: &SessionId) -> Result<()> {
        self.store.clear(session_id).await?;
        Ok(())
    }

    /// A session's turns in chronological order; empty if unknown.
    pub async fn history(&self, session_id: &SessionId) -> Result<Vec<Turn>> {
        Ok(self.store.get(session_id).await?)
    }

    pub fn faqs(&self) -> &[FaqRecord] {
        self.orchestrator.faqs()
    }

    pub fn faq_count(&self) -> usize {
        self.faqs().len()
    }

    /// Whether the generation service answers a probe right now.
    pub async fn ai_available(&self) -> bool {
        self.orchestrator.fallback().is_available().await
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Number of sessions with stored history.
    pub async fn session_count(&self) -> Result<usize> {
        Ok(self.store.session_count().await?)
    }
}
