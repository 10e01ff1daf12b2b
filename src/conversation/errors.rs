//! Error types for the conversation store.

use thiserror::Error;

use super::ids::ConversationId;

/// Conversation store error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Rejected input, such as blank message text.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation on the active conversation before the store was initialized.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// No conversation with the given id.
    #[error("conversation not found: {0}")]
    NotFound(ConversationId),
}

/// Convenience result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
