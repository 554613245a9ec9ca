//! Rookline Protocol - Shared types for the room server and the player client
//!
//! This crate contains the wire formats:
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - Peer-connection signaling payloads carried inside `webrtc_signal` messages
//! - REST request/response DTOs for the room endpoints
//!
//! # Design Principles
//!
//! 1. **No business logic** - Pure data types and serialization
//! 2. **Closed variant sets** - every tagged enum has an `Unknown` fallback so a newer
//!    server never breaks an older client

pub mod messages;
pub mod requests;
pub mod responses;
pub mod signaling;

pub use messages::{BoardSnapshot, ClientMessage, GameAction, MoveDelta, ServerMessage};
pub use requests::JoinRoomRequest;
pub use responses::{CreateRoomResponse, HealthResponse, JoinRoomResponse};
pub use signaling::{IceCandidate, SdpKind, SessionDescription, SignalMessage};
