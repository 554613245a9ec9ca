use rookline_domain::{Color, PlayerId, RoomId};

/// Who we are in which room. Fixed from join until leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    pub room_id: RoomId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub color: Color,
}

impl SessionIdentity {
    pub fn new(
        room_id: RoomId,
        player_id: PlayerId,
        player_name: impl Into<String>,
        color: Color,
    ) -> Self {
        Self {
            room_id,
            player_id,
            player_name: player_name.into(),
            color,
        }
    }
}
