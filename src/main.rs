//! Binary entrypoint for the chat backend.

use std::process::ExitCode;

use pernai_chat::start_server;

/// Serve the chat API and front end until Ctrl-C.
fn main() -> ExitCode {
    start_server::run()
}
