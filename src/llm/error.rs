//! Error types for model calls.

use thiserror::Error;

/// Model client error type.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key configured.
    #[error("Anthropic API key missing. Set ANTHROPIC_API_KEY in your environment.")]
    MissingApiKey,
    /// HTTP client error.
    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),
    /// The model API answered with a non-success status.
    #[error("model api returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Image decoding or encoding failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result alias for model calls.
pub type LlmResult<T> = Result<T, LlmError>;
