//! HTTP route handlers for the chat API.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use tower_http::services::ServeDir;
use tracing::{debug, error};

use super::state::AppState;
use crate::api::{ChatRequest, ChatResponse, HealthResponse, HistoryPayload};
use crate::llm::image::{JPEG_MEDIA_TYPE, normalize_to_jpeg};
use crate::llm::{CompletionRequest, ImageInput, LlmError};

type ApiError = (StatusCode, String);

/// Create the API router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = ServeDir::new(&state.config.static_dir);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_check))
        .route("/chat", post(chat))
        .route("/chat-image", post(chat_image))
        .route("/history", get(load_history).put(save_history))
        .fallback_service(static_dir)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, message.into())
}

/// Keep the status axum picked, so oversized uploads stay 413.
fn multipart_error(err: &MultipartError) -> ApiError {
    (err.status(), err.body_text())
}

fn internal(message: impl Into<String>) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, message.into())
}

/// Reply sent instead of a model answer when no API key is configured.
fn not_ready_reply() -> Json<ChatResponse> {
    Json(ChatResponse {
        reply: LlmError::MissingApiKey.to_string(),
        easter_egg: false,
    })
}

/// Health check endpoint.
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        anthropic_ready: state.assistant.is_ready(),
        model: state.assistant.model().to_string(),
    })
}

/// Handle text chat requests.
async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(bad_request("message must not be empty"));
    }

    if let Some(egg) = state.config.easter_egg_for(&request.message) {
        debug!("Easter egg triggered");
        return Ok(Json(ChatResponse {
            reply: egg.reply.clone(),
            easter_egg: true,
        }));
    }

    if !state.assistant.is_ready() {
        return Ok(not_ready_reply());
    }

    let completion = CompletionRequest {
        system: Some(
            request
                .system
                .unwrap_or_else(|| state.config.system_prompt.clone()),
        ),
        prompt: request.message,
        image: None,
        max_tokens: request.max_tokens.unwrap_or(state.config.chat_max_tokens),
    };

    let reply = state.assistant.complete(completion).await.map_err(|e| {
        error!("Chat completion failed: {e}");
        internal(format!("LLM error: {e}"))
    })?;

    Ok(Json(ChatResponse {
        reply,
        easter_egg: false,
    }))
}

/// Handle image chat requests (multipart `file`, optional `prompt` and `max_tokens`).
async fn chat_image(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut file: Option<Vec<u8>> = None;
    let mut prompt: Option<String> = None;
    let mut max_tokens: Option<u32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(&e))?;
                file = Some(bytes.to_vec());
            }
            "prompt" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(&e))?;
                prompt = Some(text);
            }
            "max_tokens" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(&e))?;
                let parsed = raw
                    .trim()
                    .parse()
                    .map_err(|_| bad_request(format!("invalid max_tokens: {raw}")))?;
                max_tokens = Some(parsed);
            }
            _ => {}
        }
    }

    let raw = file.ok_or_else(|| bad_request("missing file field"))?;

    if !state.assistant.is_ready() {
        return Ok(not_ready_reply());
    }

    let jpeg = tokio::task::spawn_blocking(move || normalize_to_jpeg(&raw))
        .await
        .map_err(|e| internal(format!("image task failed: {e}")))?
        .map_err(|e| bad_request(format!("unsupported image: {e}")))?;

    let prompt = prompt
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| state.config.image_prompt.clone());

    let completion = CompletionRequest {
        system: None,
        prompt,
        image: Some(ImageInput {
            media_type: JPEG_MEDIA_TYPE.to_string(),
            data: jpeg,
        }),
        max_tokens: max_tokens.unwrap_or(state.config.image_max_tokens),
    };

    let reply = state.assistant.complete(completion).await.map_err(|e| {
        error!("Image completion failed: {e}");
        internal(format!("LLM error: {e}"))
    })?;

    Ok(Json(ChatResponse {
        reply,
        easter_egg: false,
    }))
}

/// Extract the bearer token identifying whose history to touch.
fn bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| (StatusCode::UNAUTHORIZED, "missing bearer token".to_string()))
}

/// Return the saved conversation list.
async fn load_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<HistoryPayload>, ApiError> {
    let owner = bearer_token(&headers)?;
    let stored = state.history.load(&owner).await.map_err(|e| {
        error!("History load failed: {e}");
        internal("failed to load history")
    })?;

    stored
        .map(|conversations| Json(HistoryPayload { conversations }))
        .ok_or_else(|| (StatusCode::NOT_FOUND, "no saved history".to_string()))
}

/// Overwrite the saved conversation list.
async fn save_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<HistoryPayload>,
) -> Result<StatusCode, ApiError> {
    let owner = bearer_token(&headers)?;
    let count = payload.conversations.len();
    state
        .history
        .save(&owner, payload.conversations, Utc::now().timestamp_millis())
        .await
        .map_err(|e| {
            error!("History save failed: {e}");
            internal("failed to save history")
        })?;

    debug!("Saved {count} conversations");
    Ok(StatusCode::NO_CONTENT)
}
