//! In-memory history store: useful for testing and ephemeral runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use supportbot_core::error::HistoryError;
use supportbot_core::history::HistoryStore;
use supportbot_core::turn::{SessionId, Turn};
use tokio::sync::RwLock;

/// Keeps every session's history in a map. Lost on restart.
pub struct InMemoryHistory {
    sessions: Arc<RwLock<HashMap<SessionId, Vec<Turn>>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    fn name(&self) -> &str { "memory" }

    async fn get(&self, session_id: &SessionId) -> Result<Vec<Turn>, HistoryError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), HistoryError> {
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), turns.to_vec());
        Ok(())
    }

    async fn clear(&self, session_id: &SessionId) -> Result<(), HistoryError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn session_count(&self) -> Result<usize, HistoryError> {
        Ok(self.sessions.read().await.len())
    }
}
