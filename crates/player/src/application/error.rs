//! Application-level error types

use thiserror::Error;

use rookline_domain::{Color, DomainError, Piece, Square};

use crate::infrastructure::config::ConfigError;
use crate::ports::outbound::ApiError;

/// Why a move was refused before anything was sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("No piece on {0}")]
    NoPieceAt(Square),

    #[error("{piece} on {square} is not yours")]
    NotYourPiece { square: Square, piece: Piece },

    #[error("It is {turn}'s turn")]
    NotYourTurn { turn: Color },
}

/// Outbound write failures. Writes are best-effort; callers may ignore these.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Channel is not open")]
    NotOpen,

    #[error("Failed to encode message: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LobbyError {
    #[error("Display name must not be empty")]
    EmptyName,

    #[error(transparent)]
    InvalidRoom(#[from] DomainError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The dispatch loop has stopped
    #[error("Session has ended")]
    Ended,
}
