//! Adapter from a chat [`Provider`] to the router's [`Inference`] boundary.
//!
//! Every prompt is sent as a single user message with the configured model,
//! temperature and token limit. Each call is bounded by a timeout.

use agriroute_core::error::ProviderError;
use agriroute_core::message::Message;
use agriroute_core::provider::{Provider, ProviderRequest};
use agriroute_core::Inference;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs `generate(prompt)` against a provider.
pub struct ProviderInference {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl ProviderInference {
    /// Create an adapter with the default temperature (0.7) and a 120s timeout.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            timeout: Duration::from_secs(120),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }
}

#[async_trait]
impl Inference for ProviderInference {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        let request = ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            provider = %self.provider.name(),
            model = %self.model,
            prompt_chars = prompt.len(),
            "Generating"
        );

        match tokio::time::timeout(self.timeout, self.provider.complete(request)).await {
            Ok(Ok(response)) => Ok(response.message.content),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                warn!(
                    provider = %self.provider.name(),
                    timeout = ?self.timeout,
                    "Inference call timed out"
                );
                Err(ProviderError::Timeout(format!(
                    "Provider '{}' timed out after {:?}",
                    self.provider.name(),
                    self.timeout
                )))
            }
        }
    }
}
