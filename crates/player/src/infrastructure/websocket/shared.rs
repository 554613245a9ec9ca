//! Frame encoding shared by the transport and the dispatch loop.
//!
//! Kept free of any socket types so the session logic can be exercised against the
//! in-memory transport.

use rookline_shared::{ClientMessage, ServerMessage};

pub fn parse_server_message(text: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn encode_client_message(message: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}
