//! Turn and session domain types.
//!
//! These are the value objects that flow through a chat exchange:
//! user sends a message → orchestrator produces a reply → a `Turn` is
//! appended to the session's history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, caller-supplied session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generate a fresh random session identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    /// Canned answer from the FAQ corpus
    #[serde(rename = "FAQ")]
    Faq,
    /// Generated by the language-model fallback
    #[serde(rename = "AI")]
    Ai,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Faq => write!(f, "FAQ"),
            Source::Ai => write!(f, "AI"),
        }
    }
}

/// One completed exchange: the user's message, the reply, its provenance,
/// and when it happened. Never mutated after it is appended to a history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// The user's message
    pub user: String,

    /// The reply that was sent back
    pub assistant: String,

    /// Whether the reply came from the FAQ corpus or the AI fallback
    pub source: Source,

    /// Serialized as an RFC 3339 (ISO-8601) string
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(user: impl Into<String>, assistant: impl Into<String>, source: Source) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
            source,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_as_upper_tag() {
        assert_eq!(serde_json::to_string(&Source::Faq).unwrap(), "\"FAQ\"");
        assert_eq!(serde_json::to_string(&Source::Ai).unwrap(), "\"AI\"");
    }

    #[test]
    fn turn_json_shape() {
        let turn = Turn::new("hi", "hello", Source::Ai);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["user"], "hi");
        assert_eq!(json["assistant"], "hello");
        assert_eq!(json["source"], "AI");
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn session_id_is_transparent() {
        let id = SessionId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
        assert_eq!(id.to_string(), "abc-123");
    }

    #[test]
    fn generated_session_ids_differ() {
        assert_ne!(SessionId::generate(), SessionId::generate());
    }
}
