//! Anthropic Messages API client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::error::{LlmError, LlmResult};
use super::{Assistant, CompletionRequest, LlmFuture};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default model.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

/// Reply used when the model returns no text blocks.
pub const EMPTY_REPLY: &str = "(no response)";

/// Connection settings for the Messages API.
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    /// API key; empty means not configured.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// API root URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Client for `POST /v1/messages`.
#[derive(Clone, Debug)]
pub struct AnthropicClient {
    http: Client,
    config: AnthropicConfig,
    messages_url: Url,
}

impl AnthropicClient {
    /// Build a client. A missing API key is allowed; see [`Assistant::is_ready`].
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: AnthropicConfig) -> LlmResult<Self> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let messages_url = base.join("v1/messages")?;
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config,
            messages_url,
        })
    }
}

impl Assistant for AnthropicClient {
    fn complete(&self, request: CompletionRequest) -> LlmFuture<'_, LlmResult<String>> {
        Box::pin(async move {
            if !self.is_ready() {
                return Err(LlmError::MissingApiKey);
            }

            let mut content = vec![ContentBlock::Text {
                text: &request.prompt,
            }];
            if let Some(image) = &request.image {
                content.push(ContentBlock::Image {
                    source: ImageSource {
                        kind: "base64",
                        media_type: &image.media_type,
                        data: super::image::to_base64(&image.data),
                    },
                });
            }

            let body = MessagesRequest {
                model: &self.config.model,
                max_tokens: request.max_tokens,
                system: request.system.as_deref(),
                messages: vec![ApiMessage {
                    role: "user",
                    content,
                }],
            };

            debug!(
                "Calling {} (image: {})",
                self.config.model,
                request.image.is_some()
            );
            let response = self
                .http
                .post(self.messages_url.clone())
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Status {
                    status: status.as_u16(),
                    body,
                });
            }

            let bytes = response.bytes().await?;
            let parsed: MessagesResponse = serde_json::from_slice(&bytes)?;
            Ok(extract_text(&parsed.content))
        })
    }

    fn is_ready(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn extract_text(blocks: &[ResponseBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        if block.kind == "text" {
            if let Some(text) = &block.text {
                out.push_str(text);
            }
        }
    }
    let trimmed = out.trim();
    if trimmed.is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        trimmed.to_string()
    }
}
