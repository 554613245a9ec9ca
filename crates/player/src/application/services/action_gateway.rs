//! Action Gateway - validates and dispatches player intents
//!
//! Moves are checked locally against ownership and turn before anything is sent. The
//! local board is untouched; it only changes when the server confirms with a delta.

use rookline_domain::{Color, Square};
use rookline_shared::{ClientMessage, GameAction};

use crate::application::dto::GameView;
use crate::application::error::{ActionError, TransportError};
use crate::application::services::connection_supervisor::OutboundSink;

#[derive(Debug, Clone, Copy)]
pub struct ActionGateway {
    color: Color,
}

impl ActionGateway {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    /// Check and send a move intent.
    ///
    /// Succeeds once the intent is handed to the channel; delivery is best-effort and a
    /// closed channel only logs.
    pub fn move_piece(
        &self,
        game: &GameView,
        from: Square,
        to: Square,
        sink: &mut impl OutboundSink,
    ) -> Result<(), ActionError> {
        let piece = game.board.get(from).ok_or(ActionError::NoPieceAt(from))?;
        if piece.color != self.color {
            return Err(ActionError::NotYourPiece {
                square: from,
                piece,
            });
        }
        if game.turn != self.color {
            return Err(ActionError::NotYourTurn { turn: game.turn });
        }

        tracing::debug!(%from, %to, %piece, "Sending move intent");
        let _ = sink.send(&ClientMessage::Move {
            from_square: from,
            to_square: to,
            piece,
            player_color: self.color,
        });
        Ok(())
    }

    /// Resign, undo-request and rematch-request go out unconditionally.
    pub fn game_action(
        &self,
        action: GameAction,
        sink: &mut impl OutboundSink,
    ) -> Result<(), TransportError> {
        tracing::debug!(?action, "Sending game action");
        sink.send(&ClientMessage::GameAction { action })
    }

    pub fn resign(&self, sink: &mut impl OutboundSink) -> Result<(), TransportError> {
        self.game_action(GameAction::Resign, sink)
    }

    pub fn request_undo(&self, sink: &mut impl OutboundSink) -> Result<(), TransportError> {
        self.game_action(GameAction::UndoRequest, sink)
    }

    pub fn request_rematch(&self, sink: &mut impl OutboundSink) -> Result<(), TransportError> {
        self.game_action(GameAction::RematchRequest, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::square;
    use rookline_domain::{BoardState, GameStatus};

    #[derive(Default)]
    struct RecordingSink {
        open: bool,
        sent: Vec<ClientMessage>,
    }

    impl OutboundSink for RecordingSink {
        fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
            if !self.open {
                return Err(TransportError::NotOpen);
            }
            self.sent.push(message.clone());
            Ok(())
        }
    }

    fn open_sink() -> RecordingSink {
        RecordingSink {
            open: true,
            ..RecordingSink::default()
        }
    }

    fn opening(turn: Color) -> GameView {
        GameView {
            board: BoardState::standard(),
            turn,
            status: GameStatus::Active,
            ..GameView::default()
        }
    }

    #[test]
    fn own_piece_on_own_turn_is_sent_without_touching_board() {
        let gateway = ActionGateway::new(Color::White);
        let game = opening(Color::White);
        let mut sink = open_sink();

        gateway
            .move_piece(&game, square("e2"), square("e4"), &mut sink)
            .expect("move accepted");

        assert_eq!(
            sink.sent,
            vec![ClientMessage::Move {
                from_square: square("e2"),
                to_square: square("e4"),
                piece: "white_pawn".parse().expect("piece"),
                player_color: Color::White,
            }]
        );
        assert_eq!(game.board.get(square("e4")), None);
    }

    #[test]
    fn white_moving_black_piece_is_rejected_and_nothing_sent() {
        let gateway = ActionGateway::new(Color::White);
        let mut sink = open_sink();

        let result = gateway.move_piece(
            &opening(Color::White),
            square("e7"),
            square("e5"),
            &mut sink,
        );

        assert!(matches!(result, Err(ActionError::NotYourPiece { .. })));
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn empty_square_is_rejected() {
        let gateway = ActionGateway::new(Color::White);
        let mut sink = open_sink();

        let result = gateway.move_piece(
            &opening(Color::White),
            square("e4"),
            square("e5"),
            &mut sink,
        );

        assert_eq!(result, Err(ActionError::NoPieceAt(square("e4"))));
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn out_of_turn_is_rejected() {
        let gateway = ActionGateway::new(Color::Black);
        let mut sink = open_sink();

        let result = gateway.move_piece(
            &opening(Color::White),
            square("e7"),
            square("e5"),
            &mut sink,
        );

        assert_eq!(
            result,
            Err(ActionError::NotYourTurn { turn: Color::White })
        );
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn valid_move_on_closed_channel_still_succeeds() {
        let gateway = ActionGateway::new(Color::White);
        let mut sink = RecordingSink::default();

        assert!(gateway
            .move_piece(&opening(Color::White), square("g1"), square("f3"), &mut sink)
            .is_ok());
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn game_actions_are_unconditional() {
        let gateway = ActionGateway::new(Color::Black);
        let mut sink = open_sink();

        gateway.resign(&mut sink).expect("resign");
        gateway.request_undo(&mut sink).expect("undo");
        gateway.request_rematch(&mut sink).expect("rematch");

        let actions: Vec<_> = sink
            .sent
            .iter()
            .map(|m| match m {
                ClientMessage::GameAction { action } => *action,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            actions,
            vec![
                GameAction::Resign,
                GameAction::UndoRequest,
                GameAction::RematchRequest
            ]
        );

        assert_eq!(
            gateway.resign(&mut RecordingSink::default()),
            Err(TransportError::NotOpen)
        );
    }
}
