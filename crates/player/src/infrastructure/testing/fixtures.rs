//! Simple test fixtures used across unit tests.

use rookline_domain::{BoardState, Color, GameStatus, PlayerId, RoomId, Square};
use rookline_shared::{BoardSnapshot, MoveDelta, ServerMessage};

use crate::application::dto::SessionIdentity;
use crate::ports::outbound::ApiError;

pub fn api_request_failed(msg: &str) -> ApiError {
    ApiError::RequestFailed(msg.to_string())
}

pub fn room_id() -> RoomId {
    RoomId::parse("1a2b3c4d").expect("fixture room id")
}

pub fn white_player() -> PlayerId {
    PlayerId::parse("player-white").expect("fixture player id")
}

pub fn black_player() -> PlayerId {
    PlayerId::parse("player-black").expect("fixture player id")
}

pub fn square(label: &str) -> Square {
    label.parse().expect("fixture square")
}

/// Identity of the white player in [`room_id`]
pub fn white_identity() -> SessionIdentity {
    SessionIdentity::new(room_id(), white_player(), "Alice", Color::White)
}

/// Identity of the black player in [`room_id`]
pub fn black_identity() -> SessionIdentity {
    SessionIdentity::new(room_id(), black_player(), "Bob", Color::Black)
}

/// Active game in the starting position with both seats taken
pub fn opening_snapshot() -> BoardSnapshot {
    BoardSnapshot {
        board: BoardState::standard(),
        current_turn: Color::White,
        game_status: GameStatus::Active,
        player1_name: Some("Alice".to_string()),
        player2_name: Some("Bob".to_string()),
        ..BoardSnapshot::default()
    }
}

/// Broadcast of one move, e.g. `move_delta("e2", "e4", "white_pawn", Color::Black)`
pub fn move_delta(from: &str, to: &str, piece: &str, next_turn: Color) -> ServerMessage {
    ServerMessage::Move(MoveDelta {
        from_square: square(from),
        to_square: square(to),
        piece: piece.parse().expect("fixture piece"),
        player: None,
        current_turn: next_turn,
        move_type: None,
    })
}
