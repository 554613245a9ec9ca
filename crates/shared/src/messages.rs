//! WebSocket message types for room server ↔ player communication
//!
//! Both directions are JSON objects discriminated by a `type` field.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown `type` values deserialize to `Unknown` instead of failing

use serde::{Deserialize, Serialize};

use rookline_domain::{BoardState, Color, GameStatus, Piece, PlayerId, Square};

use crate::signaling::SignalMessage;

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

/// Messages from the player client to the room server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Move intent; the server validates legality and broadcasts a `move` delta
    Move {
        from_square: Square,
        to_square: Square,
        piece: Piece,
        player_color: Color,
    },
    /// Peer-connection negotiation, forwarded verbatim to the other player
    WebrtcSignal { signal: SignalMessage },
    /// Resign / undo / rematch
    GameAction { action: GameAction },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameAction {
    Resign,
    UndoRequest,
    RematchRequest,
}

// =============================================================================
// Server Messages (Server → Player)
// =============================================================================

/// Full observable game state.
///
/// Sent as `board_state` right after the channel opens and returned by the
/// fetch-board REST endpoint. Every field is optional on the wire; missing fields take
/// their empty/absent defaults so a snapshot always overwrites everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub board: BoardState,
    #[serde(default)]
    pub current_turn: Color,
    #[serde(default)]
    pub game_status: GameStatus,
    #[serde(default)]
    pub player1_name: Option<String>,
    #[serde(default)]
    pub player2_name: Option<String>,
    /// Player id of the winner; only the REST endpoint reports it
    #[serde(default)]
    pub winner: Option<PlayerId>,
    #[serde(default)]
    pub undo_requests: Vec<PlayerId>,
    #[serde(default)]
    pub rematch_requests: Vec<PlayerId>,
}

/// One confirmed move broadcast to both players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDelta {
    pub from_square: Square,
    pub to_square: Square,
    pub piece: Piece,
    #[serde(default)]
    pub player: Option<PlayerId>,
    pub current_turn: Color,
    /// Server-side classification (`castling_kingside`, `en_passant`, ...); informational
    #[serde(default)]
    pub move_type: Option<String>,
}

/// Messages from the room server to the player client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    BoardState(BoardSnapshot),
    Move(MoveDelta),
    /// The server rejected our move intent
    InvalidMove {
        #[serde(default)]
        reason: String,
    },
    WebrtcSignal {
        signal: SignalMessage,
        #[serde(default)]
        from_player: Option<PlayerId>,
    },
    PlayerDisconnected { player_id: PlayerId },
    GameResigned { resigned_by: PlayerId },
    UndoRequested { requested_by: PlayerId },
    RematchRequested { requested_by: PlayerId },
    RematchStarted {
        #[serde(default)]
        requested_by: Option<PlayerId>,
    },

    /// Unknown message type for forward compatibility
    ///
    /// When deserializing an unknown variant, this variant is used instead of
    /// failing. Allows older clients to gracefully handle new message types.
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Wire discriminator, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::BoardState(_) => "board_state",
            ServerMessage::Move(_) => "move",
            ServerMessage::InvalidMove { .. } => "invalid_move",
            ServerMessage::WebrtcSignal { .. } => "webrtc_signal",
            ServerMessage::PlayerDisconnected { .. } => "player_disconnected",
            ServerMessage::GameResigned { .. } => "game_resigned",
            ServerMessage::UndoRequested { .. } => "undo_requested",
            ServerMessage::RematchRequested { .. } => "rematch_requested",
            ServerMessage::RematchStarted { .. } => "rematch_started",
            ServerMessage::Unknown => "unknown",
        }
    }
}
