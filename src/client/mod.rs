//! Client side of the chat assistant.
//!
//! The [`session::ChatSession`] drives the conversation store and talks to
//! three collaborators through narrow traits:
//! - [`ChatTransport`]: sends a message and returns the model's reply
//! - [`HistoryService`]: loads and saves the conversation list for a token
//! - [`Renderer`]: redraws from a snapshot after every mutation
//!
//! [`http::HttpBackend`] implements the first two against the server in
//! [`crate::server`].

pub mod config;
pub mod error;
pub mod http;
pub mod session;

use std::future::Future;
use std::pin::Pin;

pub use config::{AuthSession, AutosavePolicy, ClientConfig, Preferences};
pub use error::{ClientError, ClientResult, NETWORK_ERROR_REPLY, SERVER_ERROR_REPLY};
pub use http::HttpBackend;
pub use session::ChatSession;

use crate::conversation::{Conversation, Snapshot};

/// Boxed future type for collaborator operations.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Reply produced by the transport.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatReply {
    /// Assistant text.
    pub text: String,
    /// Whether the server tagged the reply as an easter egg.
    pub easter_egg: bool,
}

/// Raw image attached to the next message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name.
    pub file_name: String,
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Sends user input to the model backend.
pub trait ChatTransport: Send + Sync {
    /// Send a text message.
    ///
    /// # Errors
    /// Returns [`ClientError::Network`] when no response arrived, or a
    /// server/decode error otherwise.
    fn send_message(&self, text: &str) -> ClientFuture<'_, ClientResult<ChatReply>>;

    /// Send an image with optional accompanying text.
    ///
    /// # Errors
    /// Same as [`Self::send_message`].
    fn send_image_message(
        &self,
        text: &str,
        image: ImageUpload,
    ) -> ClientFuture<'_, ClientResult<ChatReply>>;
}

/// Server-side storage of the conversation list, keyed by an auth token.
pub trait HistoryService: Send + Sync {
    /// Overwrite the stored list.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    fn save_history(
        &self,
        token: &str,
        conversations: Vec<Conversation>,
    ) -> ClientFuture<'_, ClientResult<()>>;

    /// Fetch the stored list; `None` when nothing is stored for the token.
    ///
    /// # Errors
    /// Returns an error if the request fails.
    fn load_history(&self, token: &str) -> ClientFuture<'_, ClientResult<Option<Vec<Conversation>>>>;
}

/// Redraws the conversation list and the active conversation.
pub trait Renderer: Send + Sync {
    /// Called after every store mutation and thinking-indicator change.
    fn render(&self, snapshot: Snapshot<'_>, thinking: bool);
}

/// Renderer that draws nothing, for headless sessions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _snapshot: Snapshot<'_>, _thinking: bool) {}
}
