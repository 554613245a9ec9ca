use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value_objects::{Color, Piece, PieceKind, Square};

/// Client-side cache of piece placement.
///
/// The authoritative board lives on the server. This cache only changes through
/// whole-snapshot replacement or a single confirmed move delta; it never checks legality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardState {
    squares: BTreeMap<Square, Piece>,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

impl BoardState {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Standard starting position, as the server derives it for a fresh room.
    pub fn standard() -> Self {
        let mut squares = BTreeMap::new();
        for (file, kind) in (0u8..).zip(BACK_RANK) {
            for (rank, color, piece_kind) in [
                (0, Color::White, kind),
                (1, Color::White, PieceKind::Pawn),
                (6, Color::Black, PieceKind::Pawn),
                (7, Color::Black, kind),
            ] {
                if let Ok(square) = Square::from_coords(file, rank) {
                    squares.insert(square, Piece::new(color, piece_kind));
                }
            }
        }
        Self { squares }
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares.get(&square).copied()
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.squares.remove(&square)
    }

    /// Apply a confirmed move: vacate `from`, then set `to`, overwriting any occupant.
    ///
    /// Returns the overwritten destination occupant, if any.
    pub fn apply_move(&mut self, from: Square, to: Square, piece: Piece) -> Option<Piece> {
        self.squares.remove(&from);
        self.squares.insert(to, piece)
    }

    pub fn len(&self) -> usize {
        self.squares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().map(|(square, piece)| (*square, *piece))
    }
}

impl FromIterator<(Square, Piece)> for BoardState {
    fn from_iter<I: IntoIterator<Item = (Square, Piece)>>(iter: I) -> Self {
        Self {
            squares: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(label: &str) -> Square {
        label.parse().expect("valid square")
    }

    fn pc(label: &str) -> Piece {
        label.parse().expect("valid piece")
    }

    #[test]
    fn standard_position_has_32_pieces() {
        let board = BoardState::standard();
        assert_eq!(board.len(), 32);
        assert_eq!(board.get(sq("e1")), Some(pc("white_king")));
        assert_eq!(board.get(sq("d8")), Some(pc("black_queen")));
        assert_eq!(board.get(sq("e4")), None);
    }

    #[test]
    fn apply_move_vacates_source_and_overwrites_destination() {
        let mut board: BoardState = [(sq("e4"), pc("white_pawn")), (sq("d5"), pc("black_pawn"))]
            .into_iter()
            .collect();

        let captured = board.apply_move(sq("e4"), sq("d5"), pc("white_pawn"));

        assert_eq!(captured, Some(pc("black_pawn")));
        assert_eq!(board.get(sq("e4")), None);
        assert_eq!(board.get(sq("d5")), Some(pc("white_pawn")));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn apply_move_from_empty_square_still_sets_destination() {
        let mut board = BoardState::empty();
        board.apply_move(sq("a2"), sq("a4"), pc("white_pawn"));
        assert_eq!(board.get(sq("a4")), Some(pc("white_pawn")));
    }

    #[test]
    fn serializes_as_square_to_piece_map() {
        let board: BoardState = [(sq("e2"), pc("white_pawn"))].into_iter().collect();
        let json = serde_json::to_value(&board).expect("serialize");
        assert_eq!(json, serde_json::json!({ "e2": "white_pawn" }));

        let back: BoardState = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, board);
    }

    #[test]
    fn rejects_maps_with_bad_labels() {
        let json = serde_json::json!({ "z9": "white_pawn" });
        assert!(serde_json::from_value::<BoardState>(json).is_err());
    }
}
