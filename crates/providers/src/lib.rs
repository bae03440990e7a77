//! LLM Provider implementations for AgriRoute.
//!
//! All providers implement the `agriroute_core::Provider` trait.
//! The router selects the correct provider based on configuration, and
//! [`ProviderInference`] adapts it to the `agriroute_core::Inference`
//! boundary the expert router consumes.

pub mod gemini;
pub mod inference;
pub mod openai_compat;
pub mod router;

pub use gemini::GeminiProvider;
pub use inference::ProviderInference;
pub use openai_compat::OpenAiCompatProvider;
pub use router::{ProviderRouter, build_from_config, build_inference};

/// Shared HTTP client settings. Per-call deadlines are enforced by
/// [`ProviderInference`].
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
