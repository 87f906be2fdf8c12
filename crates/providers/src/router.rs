//! Provider router: selects the correct generation provider based on config.

use std::collections::HashMap;
use std::sync::Arc;
use supportbot_core::provider::Provider;
use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use tracing::warn;

/// Routes generation requests to the right provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }
}

/// Build providers from configuration.
///
/// The default provider is registered even without an API key; its calls
/// then fail with `NotConfigured` and the AI fallback degrades. A provider
/// that is neither well known nor given an `api_url` is skipped.
pub fn build_from_config(config: &supportbot_config::AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    for (name, provider_config) in &config.providers {
        let api_key = provider_config
            .api_key
            .clone()
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        if let Some(provider) = build_one(name, provider_config.api_url.as_deref(), &api_key) {
            router.register(name.clone(), provider);
        }
    }

    if router.get(&config.default_provider).is_none() {
        let api_key = config.api_key.clone().unwrap_or_default();
        if let Some(provider) = build_one(&config.default_provider, None, &api_key) {
            router.register(config.default_provider.clone(), provider);
        }
    }

    router
}

fn build_one(name: &str, api_url: Option<&str>, api_key: &str) -> Option<Arc<dyn Provider>> {
    if name == "gemini" {
        let mut p = GeminiProvider::new(api_key);
        if let Some(url) = api_url {
            p = p.with_base_url(url);
        }
        return Some(Arc::new(p));
    }

    let Some(base_url) = api_url.or_else(|| default_base_url(name)) else {
        warn!(provider = name, "Unknown provider without api_url, skipping");
        return None;
    };
    Some(Arc::new(OpenAiCompatProvider::new(name, base_url, api_key)))
}

/// Base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "deepseek" => Some("https://api.deepseek.com/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        _ => None,
    }
}
