//! History store trait: per-session conversation persistence.
//!
//! The routing core never owns history. It receives a snapshot from the
//! store, appends exactly one turn, and hands the whole sequence back.

use async_trait::async_trait;
use crate::error::HistoryError;
use crate::turn::{SessionId, Turn};

/// The core HistoryStore trait.
///
/// Implementations: SQLite, in-memory (for testing and ephemeral runs).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "memory").
    fn name(&self) -> &str;

    /// Fetch a session's history in append order. Unknown sessions yield an
    /// empty sequence.
    async fn get(&self, session_id: &SessionId) -> std::result::Result<Vec<Turn>, HistoryError>;

    /// Replace a session's stored history with `turns`.
    async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> std::result::Result<(), HistoryError>;

    /// Forget a session's history.
    async fn clear(&self, session_id: &SessionId) -> std::result::Result<(), HistoryError>;

    /// Number of sessions with stored history.
    async fn session_count(&self) -> std::result::Result<usize, HistoryError>;
}
