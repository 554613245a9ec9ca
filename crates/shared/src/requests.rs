//! REST request bodies

use serde::{Deserialize, Serialize};

use rookline_domain::PlayerId;

/// Body of `POST /api/rooms/{room_id}/join`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub player_id: PlayerId,
    pub name: String,
}
