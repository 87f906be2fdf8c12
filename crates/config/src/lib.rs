//! Configuration loading, validation, and management for supportbot.
//!
//! Loads configuration from `~/.supportbot/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.supportbot/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default generation provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per generated reply
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Top-k sampling cutoff
    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Requests per minute per client. Recorded for operators; the gateway
    /// does not enforce it.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// FAQ corpus and matching
    #[serde(default)]
    pub faq: FaqConfig,

    /// Conversation context for the AI fallback
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Session history persistence
    #[serde(default)]
    pub memory: MemoryConfig,

    /// HTTP gateway
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "gemini".into()
}
fn default_model() -> String {
    "gemini-1.0-pro".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1000
}
fn default_top_p() -> f32 {
    0.8
}
fn default_top_k() -> u32 {
    40
}
fn default_rate_limit() -> u32 {
    60
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("top_p", &self.top_p)
            .field("top_k", &self.top_k)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("faq", &self.faq)
            .field("conversation", &self.conversation)
            .field("memory", &self.memory)
            .field("gateway", &self.gateway)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    /// JSON or TOML file holding the FAQ records
    #[serde(default = "default_dataset_path")]
    pub dataset_path: String,

    /// A record must score strictly above this to short-circuit the AI
    /// fallback. Tuned against the 2 / 1 / 0.5 weighting and the bundled
    /// `faq_dataset.json`; recalibrate per corpus.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
}

fn default_dataset_path() -> String {
    "faq_dataset.json".into()
}
/// Short words like "a" or "me" are substrings of many corpus words, so
/// off-topic chatter routinely scores 8 to 14 against a small corpus.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 15.0;

fn default_match_threshold() -> f64 {
    DEFAULT_MATCH_THRESHOLD
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            match_threshold: default_match_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// How many recent turns are replayed to the AI fallback
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,

    /// Documented ceiling on stored turns per session. Not enforced when
    /// appending turns.
    #[serde(default = "default_max_history")]
    pub max_history: usize,

    /// Persona prepended to every AI prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_context_turns() -> usize {
    5
}
fn default_max_history() -> usize {
    20
}
fn default_system_prompt() -> String {
    "You are a helpful AI customer support assistant.

Your role:
- Provide accurate, helpful responses to customer queries
- Be polite, professional, and empathetic
- Keep responses concise but informative
- If you don't know something, acknowledge it and offer to help find the answer
- Always end with asking if there's anything else you can help with

Guidelines:
- Be friendly and approachable
- Use simple, clear language
- Provide step-by-step instructions when helpful
- Ask clarifying questions when needed
- Maintain a positive tone throughout the conversation"
        .into()
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            context_turns: default_context_turns(),
            max_history: default_max_history(),
            system_prompt: default_system_prompt(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// "sqlite" or "memory"
    #[serde(default = "default_memory_backend")]
    pub backend: String,

    /// SQLite database file (ignored by the in-memory backend)
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_memory_backend() -> String {
    "sqlite".into()
}
fn default_db_path() -> String {
    "sessions.db".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: default_memory_backend(),
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// CORS origins. `["*"]` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Longest accepted chat message, in characters
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,

    /// Request body size limit
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:7860".into(),
        "http://127.0.0.1:7860".into(),
    ]
}
fn default_max_message_length() -> usize {
    1000
}
fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
            max_message_length: default_max_message_length(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

const KNOWN_MEMORY_BACKENDS: &[&str] = &["sqlite", "memory"];

impl AppConfig {
    /// Load configuration from the default path (~/.supportbot/config.toml).
    ///
    /// Also checks environment variables:
    /// - `SUPPORTBOT_API_KEY` (highest priority), `GEMINI_API_KEY`, `OPENAI_API_KEY`
    /// - `SUPPORTBOT_PROVIDER`, `SUPPORTBOT_MODEL`
    /// - `SUPPORTBOT_FAQ_PATH`, `SUPPORTBOT_DB_PATH`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        if !config.has_api_key() {
            tracing::warn!(
                "No API key configured; AI fallback replies will degrade. \
                 Set SUPPORTBOT_API_KEY or GEMINI_API_KEY."
            );
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function (the real
    /// environment in `load`, a map in tests).
    fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = lookup("SUPPORTBOT_API_KEY")
                .or_else(|| lookup("GEMINI_API_KEY"))
                .or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(provider) = lookup("SUPPORTBOT_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = lookup("SUPPORTBOT_MODEL") {
            self.default_model = model;
        }

        if let Some(path) = lookup("SUPPORTBOT_FAQ_PATH") {
            self.faq.dataset_path = path;
        }

        if let Some(path) = lookup("SUPPORTBOT_DB_PATH") {
            self.memory.path = path;
        }
    }

    /// Model for the default provider: its `[providers.<name>]`
    /// `default_model` when set, the top-level `default_model` otherwise.
    pub fn effective_model(&self) -> &str {
        self.providers
            .get(&self.default_provider)
            .and_then(|p| p.default_model.as_deref())
            .unwrap_or(&self.default_model)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".supportbot")
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.faq.match_threshold.is_nan() || self.faq.match_threshold < 0.0 {
            return Err(ConfigError::ValidationError(
                "faq.match_threshold must be a non-negative number".into(),
            ));
        }

        if self.conversation.context_turns == 0 {
            return Err(ConfigError::ValidationError(
                "conversation.context_turns must be at least 1".into(),
            ));
        }

        if self.gateway.max_message_length == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_message_length must be at least 1".into(),
            ));
        }

        if !KNOWN_MEMORY_BACKENDS.contains(&self.memory.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "memory.backend must be one of {KNOWN_MEMORY_BACKENDS:?}, got '{}'",
                self.memory.backend
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            top_k: default_top_k(),
            rate_limit_per_minute: default_rate_limit(),
            faq: FaqConfig::default(),
            conversation: ConversationConfig::default(),
            memory: MemoryConfig::default(),
            gateway: GatewayConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
