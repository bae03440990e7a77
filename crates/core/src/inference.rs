//! The inference boundary consumed by the router.
//!
//! Classification, aggregation and every persona responder reduce to one
//! operation: send a prompt, get text back. Keeping that contract this narrow
//! lets tests script the whole routing pipeline without a provider.

use crate::error::ProviderError;
use async_trait::async_trait;

/// A text generation service: `generate(prompt) -> text`.
///
/// Implementations must be safe to share across tasks. Errors are returned
/// as-is; retries and backoff are the implementation's concern.
#[async_trait]
pub trait Inference: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError>;
}
