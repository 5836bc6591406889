use async_trait::async_trait;

use crate::{AdviceRequest, AiError};

/// A source of free-text financial advice.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, request: &AdviceRequest) -> Result<String, AiError>;
}

/// Ask `advisor` once; any failure becomes its fixed fallback sentence.
///
/// Never returns an error and never retries.
pub async fn advise_or_fallback(advisor: &dyn Advisor, request: &AdviceRequest) -> String {
    match advisor.advise(request).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => AiError::EmptyResponse.fallback().to_string(),
        Err(err) => {
            tracing::error!(error = %err, "advice request failed");
            err.fallback().to_string()
        }
    }
}
