//! SQLite history store.
//!
//! One row per session in the `sessions` table; the whole conversation is
//! kept as a JSON array in `conversation_history`. Saving replaces the array,
//! so two requests racing on the same session resolve last-write-wins.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use supportbot_core::error::HistoryError;
use supportbot_core::history::HistoryStore;
use supportbot_core::turn::{SessionId, Turn};
use tracing::{debug, info};

/// A SQLite-backed session history store.
pub struct SqliteHistory {
    pool: SqlitePool,
}

impl SqliteHistory {
    /// Open (or create) the database at `path`.
    ///
    /// Accepts a plain file path or a `sqlite:` URL. Pass `"sqlite::memory:"`
    /// for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, HistoryError> {
        let options = if path.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(path)
                .map_err(|e| HistoryError::Storage(format!("Invalid SQLite path: {e}")))?
        } else {
            SqliteConnectOptions::new().filename(path)
        };

        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        // A single connection keeps `:memory:` databases shared across queries.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, HistoryError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id                   INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id           TEXT UNIQUE NOT NULL,
                conversation_history TEXT NOT NULL DEFAULT '[]',
                created_at           TEXT NOT NULL,
                updated_at           TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("sessions table: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for SqliteHistory {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn get(&self, session_id: &SessionId) -> Result<Vec<Turn>, HistoryError> {
        let row = sqlx::query("SELECT conversation_history FROM sessions WHERE session_id = ?1")
            .bind(session_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HistoryError::QueryFailed(format!("SELECT failed: {e}")))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };

        let json: String = row
            .try_get("conversation_history")
            .map_err(|e| HistoryError::QueryFailed(format!("conversation_history column: {e}")))?;

        serde_json::from_str(&json).map_err(|e| HistoryError::Corrupt {
            session_id: session_id.to_string(),
            reason: e.to_string(),
        })
    }

    async fn save(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(turns)
            .map_err(|e| HistoryError::Storage(format!("History serialization: {e}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, conversation_history, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            ON CONFLICT(session_id) DO UPDATE SET
                conversation_history = excluded.conversation_history,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session_id.as_str())
        .bind(&json)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("INSERT failed: {e}")))?;

        debug!(session_id = %session_id, turns = turns.len(), "Saved session history");
        Ok(())
    }

    async fn clear(&self, session_id: &SessionId) -> Result<(), HistoryError> {
        sqlx::query("DELETE FROM sessions WHERE session_id = ?1")
            .bind(session_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| HistoryError::Storage(format!("DELETE failed: {e}")))?;

        info!(session_id = %session_id, "Session history cleared");
        Ok(())
    }

    async fn session_count(&self) -> Result<usize, HistoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM sessions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| HistoryError::QueryFailed(format!("COUNT failed: {e}")))?;

        let count: i64 = row
            .try_get("count")
            .map_err(|e| HistoryError::QueryFailed(format!("count column: {e}")))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supportbot_core::turn::Source;

    async fn test_store() -> SqliteHistory {
        SqliteHistory::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn unknown_session_is_empty() {
        let store = test_store().await;
        assert!(store.get(&"missing".into()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_and_get_preserves_order() {
        let store = test_store().await;
        let id = SessionId::from("s1");
        let turns = vec![
            Turn::new("first", "one", Source::Faq),
            Turn::new("second", "two", Source::Ai),
        ];

        store.save(&id, &turns).await.unwrap();
        let loaded = store.get(&id).await.unwrap();

        assert_eq!(loaded, turns);
    }

    #[tokio::test]
    async fn upsert_replaces_history() {
        let store = test_store().await;
        let id = SessionId::from("s1");

        store.save(&id, &[Turn::new("a", "b", Source::Ai)]).await.unwrap();
        store
            .save(
                &id,
                &[Turn::new("a", "b", Source::Ai), Turn::new("c", "d", Source::Faq)],
            )
            .await
            .unwrap();

        assert_eq!(store.get(&id).await.unwrap().len(), 2);
        assert_eq!(store.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_removes_session() {
        let store = test_store().await;
        let id = SessionId::from("s1");
        store.save(&id, &[Turn::new("a", "b", Source::Ai)]).await.unwrap();

        store.clear(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_empty());
        assert_eq!(store.session_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clear_unknown_session_is_ok() {
        let store = test_store().await;
        assert!(store.clear(&"ghost".into()).await.is_ok());
    }

    #[tokio::test]
    async fn corrupt_row_is_reported() {
        let store = test_store().await;
        sqlx::query(
            "INSERT INTO sessions (session_id, conversation_history, created_at, updated_at)
             VALUES ('bad', 'not json', '', '')",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.get(&"bad".into()).await.unwrap_err();
        assert!(matches!(err, HistoryError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn file_database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.db");
        let path = path.to_str().unwrap();
        let id = SessionId::from("persist");

        {
            let store = SqliteHistory::new(path).await.unwrap();
            store.save(&id, &[Turn::new("q", "a", Source::Faq)]).await.unwrap();
            store.pool.close().await;
        }

        let reopened = SqliteHistory::new(path).await.unwrap();
        let turns = reopened.get(&id).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].source, Source::Faq);
    }

    #[tokio::test]
    async fn backend_name() {
        assert_eq!(test_store().await.name(), "sqlite");
    }
}
