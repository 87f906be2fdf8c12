//! Mock generation providers shared by this crate's tests.

use std::sync::Mutex;
use supportbot_core::error::ProviderError;
use supportbot_core::provider::{Provider, ProviderRequest, ProviderResponse};

/// Returns a fixed reply and records every request it receives.
pub struct ScriptedProvider {
    reply: String,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn always(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        Ok(ProviderResponse {
            text: self.reply.clone(),
            model,
            usage: None,
        })
    }
}

/// Fails every call with the configured error.
pub struct FailingProvider {
    error: ProviderError,
}

impl FailingProvider {
    pub fn network(message: &str) -> Self {
        Self {
            error: ProviderError::Network(message.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(self.error.clone())
    }
}
