//! Observable game state

use rookline_domain::{BoardState, Color, GameStatus, MoveRecord, PendingRequests};

/// Everything the UI renders, as last reconciled.
///
/// Published by the session loop through a watch channel; clones are snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameView {
    pub board: BoardState,
    pub turn: Color,
    pub status: GameStatus,
    /// Display name of the first player to join (white)
    pub white_name: Option<String>,
    /// Display name of the second player to join (black)
    pub black_name: Option<String>,
    pub winner: Option<Color>,
    pub history: Vec<MoveRecord>,
    pub pending: PendingRequests,
    /// Transient notice from the server, e.g. why a move was rejected
    pub advisory: Option<String>,
    /// Set by `player_disconnected`, cleared by the next snapshot
    pub opponent_disconnected: bool,
}

impl GameView {
    /// The last `n` moves, oldest first
    pub fn recent_moves(&self, n: usize) -> &[MoveRecord] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn is_turn_of(&self, color: Color) -> bool {
        self.status == GameStatus::Active && self.turn == color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookline_domain::{Piece, PieceKind, Square};

    fn record(from: &str, to: &str) -> MoveRecord {
        MoveRecord {
            from: from.parse::<Square>().expect("square"),
            to: to.parse::<Square>().expect("square"),
            piece: Piece::new(Color::White, PieceKind::Knight),
            acting_player: None,
            move_type: None,
        }
    }

    #[test]
    fn recent_moves_returns_suffix_window() {
        let view = GameView {
            history: vec![record("g1", "f3"), record("f3", "g5"), record("g5", "e6")],
            ..GameView::default()
        };

        assert_eq!(view.recent_moves(2), &view.history[1..]);
        assert_eq!(view.recent_moves(10).len(), 3);
        assert!(view.recent_moves(0).is_empty());
    }

    #[test]
    fn fresh_view_waits_for_white() {
        let view = GameView::default();
        assert_eq!(view.status, GameStatus::Waiting);
        assert_eq!(view.turn, Color::White);
        assert!(!view.is_turn_of(Color::White));
    }
}
