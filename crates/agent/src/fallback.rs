//! AI fallback: turns an assembled prompt into a reply via the generation
//! service.
//!
//! Failures are carried as a [`GenerationOutcome`] internally and flattened
//! into an apology string only at [`AiFallback::generate`], which never
//! fails.

use std::sync::Arc;
use supportbot_config::AppConfig;
use supportbot_core::error::ProviderError;
use supportbot_core::provider::{Provider, ProviderRequest};
use tracing::{debug, warn};

/// Result of one generation attempt.
pub type GenerationOutcome = std::result::Result<String, ProviderError>;

/// Wraps a [`Provider`] with the sampling settings used for replies.
pub struct AiFallback {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    top_p: Option<f32>,
    top_k: Option<u32>,
}

impl AiFallback {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            top_p: None,
            top_k: None,
        }
    }

    /// Take model and sampling settings from configuration.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, config.effective_model())
            .with_temperature(config.default_temperature)
            .with_max_tokens(config.default_max_tokens)
            .with_top_p(config.top_p)
            .with_top_k(config.top_k)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One generation attempt, failure included.
    pub async fn try_generate(&self, context: &str) -> GenerationOutcome {
        let request = ProviderRequest {
            model: self.model.clone(),
            prompt: context.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
        };

        debug!(provider = %self.provider.name(), model = %self.model, "Generating fallback reply");
        let response = self.provider.complete(request).await?;
        Ok(response.text)
    }

    /// Generate a reply. Any failure becomes an apology that quotes the error.
    pub async fn generate(&self, context: &str) -> String {
        match self.try_generate(context).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = %self.provider.name(), error = %e, "Generation failed");
                apology(&e)
            }
        }
    }

    /// Probe the service with a minimal request. `false` on any failure.
    /// Used for health reporting only.
    pub async fn is_available(&self) -> bool {
        match self.provider.health_check(&self.model).await {
            Ok(ok) => ok,
            Err(e) => {
                debug!(provider = %self.provider.name(), error = %e, "Availability probe failed");
                false
            }
        }
    }
}

/// The degraded reply sent when generation fails.
pub fn apology(error: &ProviderError) -> String {
    format!(
        "I apologize, but I'm experiencing technical difficulties. \
         Please try again or contact our support team directly. Error: {error}"
    )
}
