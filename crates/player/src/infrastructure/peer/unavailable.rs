//! Fallback peer connection for when the WebRTC stack cannot be built.

use async_trait::async_trait;

use rookline_shared::{IceCandidate, SessionDescription};

use crate::ports::outbound::{PeerConnectionPort, PeerError};

/// Refuses every negotiation step with the reason the real stack failed.
///
/// The relay logs the refusal and the game continues without voice.
#[derive(Debug, Clone)]
pub struct UnavailablePeerConnection {
    reason: String,
}

impl UnavailablePeerConnection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable<T>(&self) -> Result<T, PeerError> {
        Err(PeerError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl PeerConnectionPort for UnavailablePeerConnection {
    async fn create_offer(&self) -> Result<SessionDescription, PeerError> {
        self.unavailable()
    }

    async fn create_answer(&self) -> Result<SessionDescription, PeerError> {
        self.unavailable()
    }

    async fn set_local_description(
        &self,
        _description: SessionDescription,
    ) -> Result<SessionDescription, PeerError> {
        self.unavailable()
    }

    async fn set_remote_description(
        &self,
        _description: SessionDescription,
    ) -> Result<(), PeerError> {
        self.unavailable()
    }

    async fn add_ice_candidate(&self, _candidate: IceCandidate) -> Result<(), PeerError> {
        self.unavailable()
    }

    async fn close(&self) {}
}
