use std::fmt;

use serde::{Deserialize, Serialize};

use super::Color;
use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::King => "king",
            PieceKind::Queen => "queen",
            PieceKind::Rook => "rook",
            PieceKind::Bishop => "bishop",
            PieceKind::Knight => "knight",
            PieceKind::Pawn => "pawn",
        }
    }
}

impl std::str::FromStr for PieceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "king" => Ok(PieceKind::King),
            "queen" => Ok(PieceKind::Queen),
            "rook" => Ok(PieceKind::Rook),
            "bishop" => Ok(PieceKind::Bishop),
            "knight" => Ok(PieceKind::Knight),
            "pawn" => Ok(PieceKind::Pawn),
            _ => Err(DomainError::InvalidPiece(s.to_string())),
        }
    }
}

/// A piece identifier. Wire form is `"<color>_<kind>"`, e.g. `"white_pawn"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.color, self.kind.as_str())
    }
}

impl std::str::FromStr for Piece {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (color, kind) = s
            .split_once('_')
            .ok_or_else(|| DomainError::InvalidPiece(s.to_string()))?;
        let color = color
            .parse::<Color>()
            .map_err(|_| DomainError::InvalidPiece(s.to_string()))?;
        let kind = kind
            .parse::<PieceKind>()
            .map_err(|_| DomainError::InvalidPiece(s.to_string()))?;
        Ok(Self { color, kind })
    }
}

impl TryFrom<String> for Piece {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Piece> for String {
    fn from(value: Piece) -> Self {
        value.to_string()
    }
}
