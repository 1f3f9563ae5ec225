pub mod gateway;
pub mod gemini;

pub use gateway::{GatewayError, ModelGateway};
pub use gemini::GeminiClient;

use async_trait::async_trait;

/// Failure classes for a single model call. The gateway retries the secondary
/// credential on either class; the distinction only matters for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Quota or rate-limit signature (HTTP 429 or a RESOURCE_EXHAUSTED body).
    RateLimited(String),
    /// Anything else: network failure, 5xx, unexpected response shape.
    Upstream(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::RateLimited(msg) => write!(f, "rate limited: {}", msg),
            ModelError::Upstream(msg) => write!(f, "{}", msg),
        }
    }
}

/// A completion backend bound to one credential. The gateway owns a primary
/// and an optional secondary implementation.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_text: &str) -> Result<String, ModelError>;

    /// Short label used in log lines to tell credentials apart.
    fn label(&self) -> &str;
}
