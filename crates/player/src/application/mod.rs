//! Application layer: the sync core and the session that owns it

pub mod dto;
pub mod error;
pub mod services;

pub use error::{ActionError, LobbyError, SessionError, TransportError};
