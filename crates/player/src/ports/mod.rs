//! Port traits for the player client.
//!
//! Outbound ports describe everything the sync core needs from the outside world:
//! the room REST endpoints, the push channel, and the audio peer connection.

pub mod outbound;
