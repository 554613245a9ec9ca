//! Lobby Service - create and join rooms over REST

use std::sync::Arc;

use rookline_domain::{PlayerId, RoomId};
use rookline_shared::{HealthResponse, JoinRoomRequest};

use crate::application::dto::SessionIdentity;
use crate::application::error::LobbyError;
use crate::ports::outbound::RoomApiPort;

pub struct LobbyService {
    api: Arc<dyn RoomApiPort>,
}

impl LobbyService {
    pub fn new(api: Arc<dyn RoomApiPort>) -> Self {
        Self { api }
    }

    pub async fn health(&self) -> Result<HealthResponse, LobbyError> {
        Ok(self.api.health().await?)
    }

    /// Create an empty room and return its id
    pub async fn create_room(&self) -> Result<RoomId, LobbyError> {
        let response = self.api.create_room().await?;
        tracing::info!(room = %response.room_id, "Created room");
        Ok(response.room_id)
    }

    /// Join `room_id` under a freshly generated player id.
    ///
    /// Failures (unknown room, room full, network) are returned as-is; nothing retries.
    pub async fn join_room(
        &self,
        room_id: &str,
        display_name: &str,
    ) -> Result<SessionIdentity, LobbyError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(LobbyError::EmptyName);
        }
        let room_id = RoomId::parse(room_id)?;
        let request = JoinRoomRequest {
            player_id: PlayerId::generate(),
            name: name.to_string(),
        };

        let response = self.api.join_room(&room_id, &request).await?;
        tracing::info!(
            room = %response.room_id,
            player = %response.player_id,
            color = %response.color,
            "Joined room"
        );
        Ok(SessionIdentity::new(
            response.room_id,
            response.player_id,
            name,
            response.color,
        ))
    }
}
