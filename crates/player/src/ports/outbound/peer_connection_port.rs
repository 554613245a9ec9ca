//! Peer Connection Port - the audio peer connection negotiated over the push channel
//!
//! The relay only drives offer/answer/candidate exchange; media capture and playback
//! live behind the adapter.

use async_trait::async_trait;
use thiserror::Error;

use rookline_shared::{IceCandidate, SessionDescription};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeerError {
    /// No audio device or peer stack on this platform
    #[error("Peer connection unavailable: {0}")]
    Unavailable(String),

    /// The peer stack rejected a description or candidate
    #[error("Negotiation failed: {0}")]
    Negotiation(String),
}

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PeerConnectionPort: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, PeerError>;

    async fn create_answer(&self) -> Result<SessionDescription, PeerError>;

    /// Install `description` locally. Returns the description to send to the other
    /// player, which may carry candidates gathered while installing it.
    async fn set_local_description(
        &self,
        description: SessionDescription,
    ) -> Result<SessionDescription, PeerError>;

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), PeerError>;

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), PeerError>;

    /// Release the connection and any media tracks
    async fn close(&self);
}
