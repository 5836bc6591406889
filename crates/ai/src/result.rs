use thiserror::Error;

/// Shown when no API key is configured.
pub const FALLBACK_MISSING_KEY: &str = "API Key is missing. Please configure the environment.";

/// Shown when the model answered with no text.
pub const FALLBACK_EMPTY: &str = "I couldn't generate a response at this time.";

/// Shown for any transport, HTTP or decoding failure.
pub const FALLBACK_UNAVAILABLE: &str =
    "Sorry, I'm having trouble connecting to the brain right now. Please try again.";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("advisor credential is not configured")]
    MissingCredential,

    #[error("advisor returned no text")]
    EmptyResponse,

    #[error("advisor request failed: {0}")]
    Transport(String),

    #[error("advisor response could not be decoded: {0}")]
    Decode(String),
}

impl AiError {
    /// Fixed user-facing sentence for this failure.
    pub fn fallback(&self) -> &'static str {
        match self {
            AiError::MissingCredential => FALLBACK_MISSING_KEY,
            AiError::EmptyResponse => FALLBACK_EMPTY,
            AiError::Transport(_) | AiError::Decode(_) => FALLBACK_UNAVAILABLE,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            AiError::Decode(value.to_string())
        } else {
            AiError::Transport(value.to_string())
        }
    }
}
