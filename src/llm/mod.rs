//! Model access for the backend: the [`Assistant`] seam, the Anthropic
//! implementation and upload normalisation.

pub mod anthropic;
pub mod error;
pub mod image;

use std::future::Future;
use std::pin::Pin;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use error::{LlmError, LlmResult};

/// Boxed future type for model calls.
pub type LlmFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Image attached to a completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageInput {
    /// MIME type of `data`.
    pub media_type: String,
    /// Encoded image bytes.
    pub data: Vec<u8>,
}

/// Single-turn completion request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionRequest {
    /// System prompt.
    pub system: Option<String>,
    /// User text.
    pub prompt: String,
    /// Optional image sent after the text.
    pub image: Option<ImageInput>,
    /// Token budget.
    pub max_tokens: u32,
}

/// Something that turns a prompt into reply text.
pub trait Assistant: Send + Sync {
    /// Run one completion.
    ///
    /// # Errors
    /// Returns an error if the model call fails.
    fn complete(&self, request: CompletionRequest) -> LlmFuture<'_, LlmResult<String>>;

    /// Whether the assistant can be called at all (e.g. credentials present).
    fn is_ready(&self) -> bool;

    /// Model name reported by `/health`.
    fn model(&self) -> &str;
}
