//! Plain-text board rendering

use std::fmt::Write;

use rookline_domain::{Color, GameStatus, Piece, PieceKind, Square};

use crate::application::dto::GameView;

fn glyph(piece: Piece) -> char {
    let c = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };
    match piece.color {
        Color::White => c.to_ascii_uppercase(),
        Color::Black => c,
    }
}

/// Board from `perspective`'s side: uppercase white, lowercase black, `.` empty.
pub fn render_board(view: &GameView, perspective: Color) -> String {
    let ranks: Vec<u8> = match perspective {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<u8> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    let mut out = String::new();
    for &rank in &ranks {
        let _ = write!(out, "{} ", rank + 1);
        for &file in &files {
            let cell = Square::from_coords(file, rank)
                .ok()
                .and_then(|sq| view.board.get(sq))
                .map(glyph)
                .unwrap_or('.');
            out.push(' ');
            out.push(cell);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push(' ');
        out.push(char::from(b'a' + file));
    }
    out
}

/// One-line summary for `me`: players, status, whose turn, advisory
pub fn render_status(view: &GameView, me: Color) -> String {
    let white = view.white_name.as_deref().unwrap_or("?");
    let black = view.black_name.as_deref().unwrap_or("waiting...");
    let mut line = format!("{white} (white) vs {black} (black) | ");
    match view.status {
        GameStatus::Active => {
            let _ = write!(line, "{} to move", view.turn);
            if view.is_turn_of(me) {
                line.push_str(" (you)");
            }
        }
        GameStatus::Waiting => line.push_str("waiting for opponent"),
        status if status.is_over() => {
            let outcome = match view.winner {
                Some(winner) => format!("{winner} wins"),
                None => "draw".to_string(),
            };
            let _ = write!(line, "{status:?}, {outcome}");
        }
        status => {
            let _ = write!(line, "{status:?}");
        }
    }
    if view.opponent_disconnected {
        line.push_str(" | opponent disconnected");
    }
    if let Some(advisory) = &view.advisory {
        let _ = write!(line, " | {advisory}");
    }
    line
}

/// The last `n` moves as `e2-e4`, tagged with the server's classification of
/// special moves. `None` before the first move.
pub fn render_moves(view: &GameView, n: usize) -> Option<String> {
    let moves = view.recent_moves(n);
    if moves.is_empty() {
        return None;
    }
    let listed: Vec<String> = moves
        .iter()
        .map(|m| match &m.move_type {
            Some(kind) => format!("{}-{} ({kind})", m.from, m.to),
            None => format!("{}-{}", m.from, m.to),
        })
        .collect();
    Some(format!("Last moves: {}", listed.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rookline_domain::{BoardState, MoveRecord};

    fn opening() -> GameView {
        GameView {
            board: BoardState::standard(),
            status: GameStatus::Active,
            white_name: Some("Alice".to_string()),
            black_name: Some("Bob".to_string()),
            ..GameView::default()
        }
    }

    #[test]
    fn white_sees_own_pieces_at_bottom() {
        let text = render_board(&opening(), Color::White);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8  r n b q k b n r");
        assert_eq!(lines[7], "1  R N B Q K B N R");
        assert_eq!(lines[8], "   a b c d e f g h");
    }

    #[test]
    fn black_sees_board_flipped() {
        let text = render_board(&opening(), Color::Black);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "1  R N B K Q B N R");
        assert_eq!(lines[8], "   h g f e d c b a");
    }

    #[test]
    fn status_mentions_turn_and_advisory() {
        let mut view = opening();
        view.advisory = Some("Not your turn".to_string());
        assert_eq!(
            render_status(&view, Color::Black),
            "Alice (white) vs Bob (black) | white to move | Not your turn"
        );
        view.advisory = None;
        assert_eq!(
            render_status(&view, Color::White),
            "Alice (white) vs Bob (black) | white to move (you)"
        );

        view.status = GameStatus::Resigned;
        view.winner = Some(Color::Black);
        assert_eq!(
            render_status(&view, Color::White),
            "Alice (white) vs Bob (black) | Resigned, black wins"
        );
    }

    fn record(from: &str, to: &str, piece: &str, move_type: Option<&str>) -> MoveRecord {
        MoveRecord {
            from: from.parse().expect("square"),
            to: to.parse().expect("square"),
            piece: piece.parse().expect("piece"),
            acting_player: None,
            move_type: move_type.map(str::to_string),
        }
    }

    #[test]
    fn move_list_shows_recent_window_with_special_moves() {
        let mut view = opening();
        assert_eq!(render_moves(&view, 3), None);

        view.history = vec![
            record("e2", "e4", "white_pawn", None),
            record("e7", "e5", "black_pawn", None),
            record("g1", "f3", "white_knight", None),
            record("b8", "c6", "black_knight", None),
            record("e1", "g1", "white_king", Some("castling_kingside")),
        ];
        assert_eq!(
            render_moves(&view, 3).as_deref(),
            Some("Last moves: g1-f3, b8-c6, e1-g1 (castling_kingside)")
        );
    }
}
