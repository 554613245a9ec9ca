//! Peer connection adapters for voice calls.

mod rtc;
mod unavailable;

pub use rtc::RtcPeerConnection;
pub use unavailable::UnavailablePeerConnection;
