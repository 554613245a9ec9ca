//! Connection state publication

pub mod connection;

pub use connection::{ConnectionState, ConnectionStateObserver, ConnectionStatePublisher};
