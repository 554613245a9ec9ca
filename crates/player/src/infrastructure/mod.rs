//! Infrastructure adapters: REST client, push transport, peer connection and config.

pub mod config;
pub mod http_client;
pub mod messaging;
pub mod peer;
pub mod websocket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{BackendConfig, ConfigError, SyncSettings, VoiceSettings};
pub use messaging::{ConnectionState, ConnectionStateObserver};
