//! Room API Port - the REST side of the room server
//!
//! Lobby operations (create, join, health) and the full-state board fetch used for the
//! initial sync, the rematch resync, and fallback polling.

use async_trait::async_trait;
use thiserror::Error;

use rookline_domain::RoomId;
use rookline_shared::{
    BoardSnapshot, CreateRoomResponse, HealthResponse, JoinRoomRequest, JoinRoomResponse,
};

/// Errors surfaced by the REST adapter
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Transport-level failure (DNS, refused connection, reset)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Non-success status; `message` is the server's `detail` when it sent one
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// The body did not match the expected shape
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The configured base URL cannot produce a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait RoomApiPort: Send + Sync {
    /// `GET /api/health`
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    /// `POST /api/rooms`
    async fn create_room(&self) -> Result<CreateRoomResponse, ApiError>;

    /// `POST /api/rooms/{room_id}/join`
    async fn join_room(
        &self,
        room_id: &RoomId,
        request: &JoinRoomRequest,
    ) -> Result<JoinRoomResponse, ApiError>;

    /// `GET /api/rooms/{room_id}/board`
    async fn fetch_board(&self, room_id: &RoomId) -> Result<BoardSnapshot, ApiError>;
}
