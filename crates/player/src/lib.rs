//! Rookline player client.
//!
//! Keeps two players' view of a shared chess game consistent over an unreliable
//! network: a push channel carries snapshots, deltas and voice signaling, with REST
//! polling as fallback while the channel is down.
//!
//! - `ports`: boundaries to the room server and the audio peer connection
//! - `infrastructure`: reqwest / tokio-tungstenite / webrtc adapters, config, test fakes
//! - `application`: the sync core and the session loop that owns it
//! - `ui`: console rendering and command parsing for the runner binary

pub mod application;
pub mod infrastructure;
pub mod ports;
pub mod ui;

pub use application::dto::{GameView, SessionIdentity};
pub use application::services::{LobbyService, Session, SessionDeps};
pub use infrastructure::{BackendConfig, ConnectionState, SyncSettings, VoiceSettings};
