//! REST response bodies

use serde::{Deserialize, Serialize};

use rookline_domain::{Color, PlayerId, RoomId};

/// Response of `POST /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
    #[serde(default)]
    pub status: String,
}

/// Response of `POST /api/rooms/{room_id}/join`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRoomResponse {
    pub player_id: PlayerId,
    pub color: Color,
    pub room_id: RoomId,
}

/// Response of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_response_parses_server_shape() {
        let response: JoinRoomResponse = serde_json::from_value(json!({
            "player_id": "p-1",
            "color": "black",
            "room_id": "1a2b3c4d"
        }))
        .expect("deserialize");
        assert_eq!(response.color, Color::Black);
        assert_eq!(response.room_id.as_str(), "1a2b3c4d");
    }
}
