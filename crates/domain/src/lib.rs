//! Rookline domain types.
//!
//! Value objects (colors, pieces, squares) and the client-side board cache with its
//! invariants. Nothing here performs I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use entities::{BoardState, MoveRecord, PendingRequests};
pub use error::DomainError;
pub use ids::{PlayerId, RoomId};
pub use value_objects::{Color, GameStatus, Piece, PieceKind, Square};
