//! Error types for the supportbot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all supportbot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Session history errors ---
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned no text: {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Stored history for session {session_id} is corrupt: {reason}")]
    Corrupt { session_id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read FAQ dataset at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse FAQ dataset at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Unsupported FAQ dataset format: {0}")]
    UnsupportedFormat(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn config_error_carries_message() {
        let err = Error::Config {
            message: "No generation provider named 'nope'".into(),
        };
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn history_error_names_session() {
        let err = Error::History(HistoryError::Corrupt {
            session_id: "abc".into(),
            reason: "expected array".into(),
        });
        assert!(err.to_string().contains("abc"));
        assert!(err.to_string().contains("expected array"));
    }

    #[test]
    fn corpus_error_names_path() {
        let err = CorpusError::Read {
            path: PathBuf::from("/data/faq.json"),
            reason: "No such file".into(),
        };
        assert!(err.to_string().contains("/data/faq.json"));
    }
}
