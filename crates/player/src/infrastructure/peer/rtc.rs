//! WebRTC peer connection for voice calls.
//!
//! The connection carries one receive-only audio transceiver; capturing and playing
//! audio is left to the host. Local descriptions are handed back only after ICE
//! gathering finishes (or times out), so offers and answers carry their candidates
//! inline and nothing has to be trickled over the push channel.

use async_trait::async_trait;
use serde::Deserialize;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::Error as WebRtcError;

use rookline_shared::{IceCandidate, SdpKind, SessionDescription};

use crate::infrastructure::config::VoiceSettings;
use crate::ports::outbound::{PeerConnectionPort, PeerError};

fn unavailable(e: WebRtcError) -> PeerError {
    PeerError::Unavailable(e.to_string())
}

fn negotiation(e: WebRtcError) -> PeerError {
    PeerError::Negotiation(e.to_string())
}

fn to_rtc(description: SessionDescription) -> Result<RTCSessionDescription, PeerError> {
    let parsed = match description.kind {
        SdpKind::Offer => RTCSessionDescription::offer(description.sdp),
        SdpKind::Answer => RTCSessionDescription::answer(description.sdp),
    };
    parsed.map_err(negotiation)
}

fn from_rtc(description: RTCSessionDescription) -> Result<SessionDescription, PeerError> {
    match description.sdp_type {
        RTCSdpType::Offer => Ok(SessionDescription::offer(description.sdp)),
        RTCSdpType::Answer => Ok(SessionDescription::answer(description.sdp)),
        other => Err(PeerError::Negotiation(format!(
            "unexpected description type {other:?}"
        ))),
    }
}

/// Candidate as a browser serializes `RTCIceCandidate.toJSON()`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrowserCandidate {
    candidate: String,
    #[serde(default)]
    sdp_mid: Option<String>,
    #[serde(default, rename = "sdpMLineIndex")]
    sdp_mline_index: Option<u16>,
    #[serde(default)]
    username_fragment: Option<String>,
}

/// `None` for the empty end-of-candidates marker.
fn to_candidate_init(candidate: IceCandidate) -> Result<Option<RTCIceCandidateInit>, PeerError> {
    let parsed: BrowserCandidate = serde_json::from_value(candidate.0)
        .map_err(|e| PeerError::Negotiation(format!("malformed ICE candidate: {e}")))?;
    if parsed.candidate.is_empty() {
        return Ok(None);
    }
    Ok(Some(RTCIceCandidateInit {
        candidate: parsed.candidate,
        sdp_mid: parsed.sdp_mid,
        sdp_mline_index: parsed.sdp_mline_index,
        username_fragment: parsed.username_fragment,
    }))
}

pub struct RtcPeerConnection {
    pc: RTCPeerConnection,
    settings: VoiceSettings,
}

impl RtcPeerConnection {
    /// Build the peer connection and its receive-only audio transceiver.
    pub async fn connect(settings: VoiceSettings) -> Result<Self, PeerError> {
        let mut media = MediaEngine::default();
        media.register_default_codecs().map_err(unavailable)?;
        let registry =
            register_default_interceptors(Registry::new(), &mut media).map_err(unavailable)?;
        let api = APIBuilder::new()
            .with_media_engine(media)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if settings.ice_servers.is_empty() {
            Vec::new()
        } else {
            vec![RTCIceServer {
                urls: settings.ice_servers.clone(),
                ..Default::default()
            }]
        };
        let pc = api
            .new_peer_connection(RTCConfiguration {
                ice_servers,
                ..Default::default()
            })
            .await
            .map_err(unavailable)?;

        pc.add_transceiver_from_kind(
            RTPCodecType::Audio,
            Some(RTCRtpTransceiverInit {
                direction: RTCRtpTransceiverDirection::Recvonly,
                send_encodings: Vec::new(),
            }),
        )
        .await
        .map_err(unavailable)?;

        pc.on_peer_connection_state_change(Box::new(|state: RTCPeerConnectionState| {
            tracing::info!(%state, "Voice connection state changed");
            Box::pin(async {})
        }));
        pc.on_track(Box::new(|_track, _receiver, _transceiver| {
            tracing::info!("Receiving opponent audio");
            Box::pin(async {})
        }));

        Ok(Self { pc, settings })
    }
}

#[async_trait]
impl PeerConnectionPort for RtcPeerConnection {
    async fn create_offer(&self) -> Result<SessionDescription, PeerError> {
        let offer = self.pc.create_offer(None).await.map_err(negotiation)?;
        from_rtc(offer)
    }

    async fn create_answer(&self) -> Result<SessionDescription, PeerError> {
        let answer = self.pc.create_answer(None).await.map_err(negotiation)?;
        from_rtc(answer)
    }

    async fn set_local_description(
        &self,
        description: SessionDescription,
    ) -> Result<SessionDescription, PeerError> {
        let mut gathered = self.pc.gathering_complete_promise().await;
        self.pc
            .set_local_description(to_rtc(description.clone())?)
            .await
            .map_err(negotiation)?;

        if tokio::time::timeout(self.settings.gather_timeout, gathered.recv())
            .await
            .is_err()
        {
            tracing::warn!(
                timeout = ?self.settings.gather_timeout,
                "ICE gathering timed out; sending the candidates found so far"
            );
        }

        match self.pc.local_description().await {
            Some(local) => from_rtc(local),
            None => Ok(description),
        }
    }

    async fn set_remote_description(
        &self,
        description: SessionDescription,
    ) -> Result<(), PeerError> {
        self.pc
            .set_remote_description(to_rtc(description)?)
            .await
            .map_err(negotiation)
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<(), PeerError> {
        match to_candidate_init(candidate)? {
            Some(init) => self.pc.add_ice_candidate(init).await.map_err(negotiation),
            None => Ok(()),
        }
    }

    async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            tracing::warn!("Failed to close peer connection: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use rookline_shared::SignalMessage;
    use serde_json::json;
    use webrtc::peer_connection::signaling_state::RTCSignalingState;

    use crate::application::services::SignalingRelay;

    fn host_only() -> VoiceSettings {
        VoiceSettings {
            ice_servers: Vec::new(),
            gather_timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn two_peers_negotiate_through_relays() {
        let caller = Arc::new(RtcPeerConnection::connect(host_only()).await.expect("caller"));
        let callee = Arc::new(RtcPeerConnection::connect(host_only()).await.expect("callee"));
        let caller_relay = SignalingRelay::new(caller.clone());
        let callee_relay = SignalingRelay::new(callee.clone());

        let offer = caller_relay.start_call().await.expect("offer");
        let SignalMessage::Offer { sdp } = &offer else {
            panic!("expected offer, got {offer:?}");
        };
        assert!(sdp.contains("m=audio"));
        assert!(sdp.contains("a=recvonly"));
        assert_eq!(caller.pc.signaling_state(), RTCSignalingState::HaveLocalOffer);

        let answer = callee_relay.handle_inbound(offer).await.expect("answer");
        assert!(matches!(answer, SignalMessage::Answer { .. }));
        assert_eq!(callee.pc.signaling_state(), RTCSignalingState::Stable);

        assert_eq!(caller_relay.handle_inbound(answer).await, None);
        assert_eq!(caller.pc.signaling_state(), RTCSignalingState::Stable);

        caller_relay.close().await;
        callee_relay.close().await;
    }

    #[test]
    fn browser_candidate_json_is_understood() {
        let init = to_candidate_init(IceCandidate(json!({
            "candidate": "candidate:1 1 udp 2122260223 192.168.1.20 54321 typ host",
            "sdpMid": "0",
            "sdpMLineIndex": 0,
            "usernameFragment": "abcd"
        })))
        .expect("parse")
        .expect("candidate");

        assert_eq!(init.sdp_mid.as_deref(), Some("0"));
        assert_eq!(init.sdp_mline_index, Some(0));
        assert_eq!(init.username_fragment.as_deref(), Some("abcd"));
    }

    #[test]
    fn end_of_candidates_marker_is_skipped() {
        let init = to_candidate_init(IceCandidate(json!({ "candidate": "" }))).expect("parse");
        assert!(init.is_none());
        assert!(to_candidate_init(IceCandidate(json!({ "sdpMid": "0" }))).is_err());
    }
}
