//! reqwest implementation of the transport and history collaborators.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::config::ClientConfig;
use super::error::{ClientError, ClientResult};
use super::{ChatReply, ChatTransport, ClientFuture, HistoryService, ImageUpload};
use crate::api::{ChatRequest, ChatResponse, HistoryPayload};
use crate::conversation::Conversation;

/// HTTP client for the chat backend.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a client from the configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let mut base_url = Url::parse(&config.api_base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("http client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Backend root URL, always ending with `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path)?)
    }
}

/// Map a non-success status to [`ClientError::Server`].
async fn ensure_success(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Server {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = ensure_success(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            text: response.reply,
            easter_egg: response.easter_egg,
        }
    }
}

impl ChatTransport for HttpBackend {
    fn send_message(&self, text: &str) -> ClientFuture<'_, ClientResult<ChatReply>> {
        let request = ChatRequest::new(text);
        Box::pin(async move {
            let url = self.endpoint("chat")?;
            let response = self.client.post(url).json(&request).send().await?;
            let reply: ChatResponse = read_json(response).await?;
            Ok(reply.into())
        })
    }

    fn send_image_message(
        &self,
        text: &str,
        image: ImageUpload,
    ) -> ClientFuture<'_, ClientResult<ChatReply>> {
        let prompt = text.trim().to_string();
        Box::pin(async move {
            let url = self.endpoint("chat-image")?;
            let size = image.bytes.len();
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime)
                .map_err(|e| ClientError::InvalidRequest(format!("mime type: {e}")))?;

            let mut form = Form::new().part("file", part);
            if !prompt.is_empty() {
                form = form.text("prompt", prompt);
            }

            debug!("Uploading image ({size} bytes)");
            let response = self.client.post(url).multipart(form).send().await?;
            let reply: ChatResponse = read_json(response).await?;
            Ok(reply.into())
        })
    }
}

impl HistoryService for HttpBackend {
    fn save_history(
        &self,
        token: &str,
        conversations: Vec<Conversation>,
    ) -> ClientFuture<'_, ClientResult<()>> {
        let token = token.to_string();
        Box::pin(async move {
            let url = self.endpoint("history")?;
            let count = conversations.len();
            let payload = HistoryPayload { conversations };
            let response = self
                .client
                .put(url)
                .bearer_auth(&token)
                .json(&payload)
                .send()
                .await?;
            ensure_success(response).await?;
            debug!("Saved {count} conversations to history");
            Ok(())
        })
    }

    fn load_history(
        &self,
        token: &str,
    ) -> ClientFuture<'_, ClientResult<Option<Vec<Conversation>>>> {
        let token = token.to_string();
        Box::pin(async move {
            let url = self.endpoint("history")?;
            let response = self.client.get(url).bearer_auth(&token).send().await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }
            let payload: HistoryPayload = read_json(response).await?;
            Ok(Some(payload.conversations))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ClientConfig::default().with_api_base_url("https://example.com/api");
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.base_url().as_str(), "https://example.com/api/");
        assert_eq!(
            backend.endpoint("chat").unwrap().as_str(),
            "https://example.com/api/chat"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClientConfig::default().with_api_base_url("::::");
        assert!(HttpBackend::new(&config).is_err());
    }
}
