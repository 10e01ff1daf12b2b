//! Client-side conversation state.
//!
//! - `ids`: opaque conversation identifiers
//! - `types`: conversations, messages and title derivation
//! - `store`: the in-memory store with its active pointer
//! - `errors`: store error taxonomy

pub mod errors;
pub mod ids;
pub mod store;
pub mod types;

pub use errors::{StoreError, StoreResult};
pub use ids::ConversationId;
pub use store::{ConversationStore, Snapshot};
pub use types::{
    Conversation, DEFAULT_TITLE, DEFAULT_TITLE_MAX_CHARS, MediaRef, Message, MessageKind, Role,
    derive_title,
};
