//! Chat front-end core and its HTTP backend.
//!
//! - [`conversation`]: the in-memory conversation list with an active pointer
//! - [`client`]: the chat session that drives the list through the backend
//! - [`server`]: the axum backend (Anthropic relay, image chat, saved history)

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(unused_must_use)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::print_stdout)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

/// Wire types shared by client and server.
pub mod api;
/// Chat session, configuration and HTTP transport.
pub mod client;
/// Conversations, messages and the conversation store.
pub mod conversation;
/// Model access (Anthropic) and image normalisation.
pub mod llm;
/// HTTP server and API routes.
pub mod server;
/// Process startup for the server binary.
pub mod start_server;
