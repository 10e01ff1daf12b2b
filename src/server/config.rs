//! Server configuration, read from the environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::llm::anthropic::{AnthropicConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// System prompt used when a chat request brings none.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Be concise and accurate.";

/// Instruction sent with images uploaded without text.
pub const DEFAULT_IMAGE_PROMPT: &str =
    "Extract the text from this image and solve/answer any questions shown. Be concise.";

/// Errors raised while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("invalid value for {key}: {value}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },
    /// Easter egg list is not valid JSON.
    #[error("invalid easter egg list: {0}")]
    EasterEggs(#[from] serde_json::Error),
    /// URL parse error.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// Canned reply for a trigger phrase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EasterEgg {
    /// Message that triggers the reply, compared case-insensitively.
    pub trigger: String,
    /// Reply sent back with `easter_egg: true`.
    pub reply: String,
}

/// Configuration for the HTTP server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
    /// Model API settings.
    pub anthropic: AnthropicConfig,
    /// `SQLite` database holding saved histories.
    pub history_db: PathBuf,
    /// Directory served for unmatched paths (the web front end).
    pub static_dir: PathBuf,
    /// Token budget for text chat.
    pub chat_max_tokens: u32,
    /// Token budget for image chat.
    pub image_max_tokens: u32,
    /// Default system prompt for text chat.
    pub system_prompt: String,
    /// Default instruction for images sent without text.
    pub image_prompt: String,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Canned replies.
    pub easter_eggs: Vec<EasterEgg>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            anthropic: AnthropicConfig::default(),
            history_db: PathBuf::from("history.sqlite"),
            static_dir: PathBuf::from("static"),
            chat_max_tokens: 800,
            image_max_tokens: 1000,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            image_prompt: DEFAULT_IMAGE_PROMPT.to_string(),
            max_upload_bytes: 10 * 1024 * 1024, // 10 MB
            easter_eggs: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read from the process environment.
    ///
    /// # Errors
    /// Returns an error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read from an arbitrary key lookup. Unset keys keep their defaults.
    ///
    /// Keys: `PERNAI_PORT`, `ANTHROPIC_API_KEY`, `CLAUDE_MODEL`,
    /// `ANTHROPIC_BASE_URL`, `PERNAI_HISTORY_DB`, `PERNAI_STATIC_DIR`,
    /// `PERNAI_EASTER_EGGS` (JSON list of `{ trigger, reply }`).
    ///
    /// # Errors
    /// Returns an error if a variable holds an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PERNAI_PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PERNAI_PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            config.anthropic.api_key = key;
        }
        config.anthropic.model = get("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        config.anthropic.base_url =
            get("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if let Some(path) = get("PERNAI_HISTORY_DB") {
            config.history_db = PathBuf::from(path);
        }
        if let Some(path) = get("PERNAI_STATIC_DIR") {
            config.static_dir = PathBuf::from(path);
        }
        if let Some(raw) = get("PERNAI_EASTER_EGGS") {
            config.easter_eggs = serde_json::from_str(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.anthropic.base_url)?;
        if self.chat_max_tokens == 0 || self.image_max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_tokens".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Canned reply matching the whole message, if any.
    #[must_use]
    pub fn easter_egg_for(&self, message: &str) -> Option<&EasterEgg> {
        let message = message.trim();
        self.easter_eggs
            .iter()
            .find(|egg| egg.trigger.trim().eq_ignore_ascii_case(message))
    }
}
