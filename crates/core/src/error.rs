//! Error types for the AgriRoute domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Provider failures and routing failures each get their own enum.

use thiserror::Error;

/// The top-level error type for all AgriRoute operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Routing errors ---
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures raised while routing a single request.
///
/// A request for which no registered responder matches is *not* an error;
/// it takes the clarification path instead.
#[derive(Debug, Clone, Error)]
pub enum RoutingError {
    #[error("Intent classification failed: {0}")]
    Classification(ProviderError),

    #[error("Responder '{responder}' failed: {reason}")]
    Responder { responder: String, reason: String },

    #[error("All {attempted} matched responders failed")]
    AllRespondersFailed { attempted: usize },

    #[error("Response aggregation failed: {0}")]
    Aggregation(ProviderError),
}
