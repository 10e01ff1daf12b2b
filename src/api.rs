//! Wire types shared by the HTTP client and the server routes.

use serde::{Deserialize, Serialize};

use crate::conversation::Conversation;

/// Text chat request body for `POST /chat`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's message.
    pub message: String,
    /// Optional system prompt overriding the server default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Optional token budget overriding the server default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Request with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            system: None,
            max_tokens: None,
        }
    }
}

/// Response body for `POST /chat` and `POST /chat-image`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The assistant's reply.
    pub reply: String,
    /// Whether the reply is a canned easter egg.
    #[serde(default)]
    pub easter_egg: bool,
}

/// Body of `GET /history` responses and `PUT /history` requests.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HistoryPayload {
    /// Full conversation list, oldest first.
    pub conversations: Vec<Conversation>,
}

/// Response body for `GET /health`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always true when the server answers.
    pub ok: bool,
    /// Whether an Anthropic API key is configured.
    pub anthropic_ready: bool,
    /// Model used for completions.
    pub model: String,
}
