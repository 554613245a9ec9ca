//! Push channel over WebSocket

pub mod client;
pub mod shared;

pub use client::WsTransport;
pub use shared::{encode_client_message, parse_server_message};
