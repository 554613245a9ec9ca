//! Peer-connection signaling payloads.
//!
//! The core only inspects the tag; SDP bodies and candidate objects are carried verbatim
//! between the peer-connection object and the channel.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// A local or remote session description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// An ICE candidate, opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IceCandidate(pub serde_json::Value);

/// Signal carried in the `signal` field of a `webrtc_signal` message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalMessage {
    Offer { sdp: String },
    Answer { sdp: String },
    IceCandidate { candidate: IceCandidate },

    /// Forward-compatibility fallback for newer signal kinds.
    #[serde(other)]
    Unknown,
}

impl From<SessionDescription> for SignalMessage {
    fn from(desc: SessionDescription) -> Self {
        match desc.kind {
            SdpKind::Offer => SignalMessage::Offer { sdp: desc.sdp },
            SdpKind::Answer => SignalMessage::Answer { sdp: desc.sdp },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ice_candidate_tag_is_kebab_case() {
        let signal = SignalMessage::IceCandidate {
            candidate: IceCandidate(json!({
                "candidate": "candidate:1 1 udp 1 10.0.0.1 5000 typ host"
            })),
        };
        let value = serde_json::to_value(&signal).expect("serialize");
        assert_eq!(value["type"], "ice-candidate");
        assert_eq!(
            serde_json::from_value::<SignalMessage>(value).expect("deserialize"),
            signal
        );
    }

    #[test]
    fn offer_ignores_extra_browser_fields() {
        let signal: SignalMessage =
            serde_json::from_value(json!({ "type": "offer", "sdp": "v=0", "extra": 1 }))
                .expect("deserialize");
        assert_eq!(signal, SignalMessage::from(SessionDescription::offer("v=0")));
    }

    #[test]
    fn unknown_signal_kinds_fall_back() {
        let signal: SignalMessage =
            serde_json::from_value(json!({ "type": "renegotiate" })).expect("deserialize");
        assert_eq!(signal, SignalMessage::Unknown);
    }
}
