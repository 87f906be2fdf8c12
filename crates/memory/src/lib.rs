//! Session history storage implementations for supportbot.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::sync::Arc;
use supportbot_config::MemoryConfig;
use supportbot_core::error::HistoryError;
use supportbot_core::history::HistoryStore;

pub use in_memory::InMemoryHistory;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteHistory;

/// Build the configured history store.
pub async fn build_from_config(
    config: &MemoryConfig,
) -> Result<Arc<dyn HistoryStore>, HistoryError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(InMemoryHistory::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => Ok(Arc::new(SqliteHistory::new(&config.path).await?)),
        other => Err(HistoryError::Storage(format!(
            "Unsupported history backend '{other}'"
        ))),
    }
}
