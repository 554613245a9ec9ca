//! Entities - the mutable client-side game cache.

mod board;
mod move_record;
mod pending_requests;

pub use board::BoardState;
pub use move_record::MoveRecord;
pub use pending_requests::PendingRequests;
