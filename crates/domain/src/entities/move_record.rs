use serde::{Deserialize, Serialize};

use crate::ids::PlayerId;
use crate::value_objects::{Piece, Square};

/// One confirmed move, as appended to the local history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    /// Absent when the server omitted the mover in the delta.
    pub acting_player: Option<PlayerId>,
    /// Server classification of special moves (`castling_kingside`, `en_passant`);
    /// `None` for ordinary moves.
    pub move_type: Option<String>,
}
