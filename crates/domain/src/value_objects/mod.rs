//! Value objects - immutable chess vocabulary shared by every layer.

mod color;
mod game_status;
mod piece;
mod square;

pub use color::Color;
pub use game_status::GameStatus;
pub use piece::{Piece, PieceKind};
pub use square::Square;
