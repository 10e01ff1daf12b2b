//! Application state shared across all request handlers.

use std::sync::Arc;

use super::config::ServerConfig;
use super::history_store::{HistoryStore, SqliteHistoryStore};
use crate::llm::{AnthropicClient, Assistant};

/// Shared application state.
pub struct AppState {
    /// Model used for chat replies.
    pub assistant: Arc<dyn Assistant>,
    /// Saved conversation lists.
    pub history: Arc<dyn HistoryStore>,
    /// Server settings.
    pub config: ServerConfig,
}

impl AppState {
    /// Assemble state from already-built parts.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        assistant: Arc<dyn Assistant>,
        history: Arc<dyn HistoryStore>,
    ) -> Arc<Self> {
        Arc::new(Self {
            assistant,
            history,
            config,
        })
    }

    /// Build the Anthropic client and open the history database.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built or the database cannot be opened.
    pub async fn from_config(
        config: ServerConfig,
    ) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let assistant = AnthropicClient::new(config.anthropic.clone())
            .map_err(|e| format!("Failed to create Anthropic client: {e}"))?;
        if !assistant.is_ready() {
            tracing::warn!("ANTHROPIC_API_KEY is not set; chat replies will report the missing key");
        }

        let history = SqliteHistoryStore::open(&config.history_db)
            .await
            .map_err(|e| format!("Failed to open history database: {e}"))?;

        Ok(Self::new(config, Arc::new(assistant), Arc::new(history)))
    }
}
