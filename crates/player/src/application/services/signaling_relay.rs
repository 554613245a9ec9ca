//! Signaling Relay - drives peer-connection negotiation from channel signals
//!
//! Negotiation steps are awaited on a dedicated worker task so a slow peer stack never
//! stalls the session loop. Jobs are processed one at a time, which keeps candidates
//! behind the offer they belong to. Every failure is logged and swallowed.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use rookline_shared::{SessionDescription, SignalMessage};

use crate::ports::outbound::{PeerConnectionPort, PeerError};

#[derive(Debug)]
pub enum RelayJob {
    /// Signal received from the other player
    Inbound(SignalMessage),
    /// Place a call: create and send an offer
    StartCall,
    /// Close the peer connection and stop the worker
    Close,
}

#[derive(Clone)]
pub struct SignalingRelay {
    peer: Arc<dyn PeerConnectionPort>,
}

impl SignalingRelay {
    pub fn new(peer: Arc<dyn PeerConnectionPort>) -> Self {
        Self { peer }
    }

    /// Handle one inbound signal. Returns the reply to send, if any.
    pub async fn handle_inbound(&self, signal: SignalMessage) -> Option<SignalMessage> {
        let result = match signal {
            SignalMessage::Offer { sdp } => self.answer_offer(sdp).await.map(Some),
            SignalMessage::Answer { sdp } => self
                .peer
                .set_remote_description(SessionDescription::answer(sdp))
                .await
                .map(|_| None),
            SignalMessage::IceCandidate { candidate } => {
                self.peer.add_ice_candidate(candidate).await.map(|_| None)
            }
            SignalMessage::Unknown => {
                tracing::debug!("Ignoring unknown signal");
                Ok(None)
            }
        };

        result.unwrap_or_else(|e| {
            tracing::warn!("Signaling failed: {}", e);
            None
        })
    }

    /// Create an offer, install it locally and return it for sending.
    pub async fn start_call(&self) -> Option<SignalMessage> {
        match self.create_local(true).await {
            Ok(offer) => Some(offer),
            Err(e) => {
                tracing::warn!("Failed to start call: {}", e);
                None
            }
        }
    }

    async fn answer_offer(&self, sdp: String) -> Result<SignalMessage, PeerError> {
        self.peer
            .set_remote_description(SessionDescription::offer(sdp))
            .await?;
        self.create_local(false).await
    }

    async fn create_local(&self, offer: bool) -> Result<SignalMessage, PeerError> {
        let description = if offer {
            self.peer.create_offer().await?
        } else {
            self.peer.create_answer().await?
        };
        let installed = self.peer.set_local_description(description).await?;
        Ok(SignalMessage::from(installed))
    }

    pub async fn close(&self) {
        self.peer.close().await;
    }

    /// Run jobs sequentially; replies go to `replies` for the session to send.
    pub fn spawn_worker(
        self,
        mut jobs: mpsc::UnboundedReceiver<RelayJob>,
        replies: mpsc::UnboundedSender<SignalMessage>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(job) = jobs.recv().await {
                let reply = match job {
                    RelayJob::Inbound(signal) => self.handle_inbound(signal).await,
                    RelayJob::StartCall => self.start_call().await,
                    RelayJob::Close => break,
                };
                if let Some(reply) = reply {
                    if replies.send(reply).is_err() {
                        break;
                    }
                }
            }
            self.close().await;
            tracing::debug!("Signaling worker stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::MockPeerConnectionPort;
    use mockall::predicate::eq;
    use mockall::Sequence;
    use rookline_shared::IceCandidate;
    use serde_json::json;

    #[tokio::test]
    async fn offer_is_answered() {
        let mut peer = MockPeerConnectionPort::new();
        let mut seq = Sequence::new();
        peer.expect_set_remote_description()
            .with(eq(SessionDescription::offer("remote-offer")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        peer.expect_create_answer()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(SessionDescription::answer("local-answer")));
        peer.expect_set_local_description()
            .with(eq(SessionDescription::answer("local-answer")))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(SessionDescription::answer("local-answer\r\na=candidate:1")));

        let relay = SignalingRelay::new(Arc::new(peer));
        let reply = relay
            .handle_inbound(SignalMessage::Offer {
                sdp: "remote-offer".to_string(),
            })
            .await;

        assert_eq!(
            reply,
            Some(SignalMessage::Answer {
                sdp: "local-answer\r\na=candidate:1".to_string()
            })
        );
    }

    #[tokio::test]
    async fn answer_sets_remote_description_only() {
        let mut peer = MockPeerConnectionPort::new();
        peer.expect_set_remote_description()
            .with(eq(SessionDescription::answer("remote-answer")))
            .times(1)
            .returning(|_| Ok(()));

        let relay = SignalingRelay::new(Arc::new(peer));
        let reply = relay
            .handle_inbound(SignalMessage::Answer {
                sdp: "remote-answer".to_string(),
            })
            .await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn candidates_are_added() {
        let candidate = IceCandidate(json!({
            "candidate": "candidate:0 1 UDP 1 10.0.0.2 9 typ host"
        }));
        let mut peer = MockPeerConnectionPort::new();
        peer.expect_add_ice_candidate()
            .with(eq(candidate.clone()))
            .times(1)
            .returning(|_| Ok(()));

        let relay = SignalingRelay::new(Arc::new(peer));
        assert_eq!(
            relay
                .handle_inbound(SignalMessage::IceCandidate { candidate })
                .await,
            None
        );
    }

    #[tokio::test]
    async fn negotiation_failure_is_swallowed() {
        let mut peer = MockPeerConnectionPort::new();
        peer.expect_set_remote_description()
            .returning(|_| Err(PeerError::Negotiation("bad sdp".to_string())));
        peer.expect_create_answer().never();

        let relay = SignalingRelay::new(Arc::new(peer));
        let reply = relay
            .handle_inbound(SignalMessage::Offer {
                sdp: "garbage".to_string(),
            })
            .await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn start_call_sends_local_offer() {
        let mut peer = MockPeerConnectionPort::new();
        peer.expect_create_offer()
            .times(1)
            .returning(|| Ok(SessionDescription::offer("local-offer")));
        peer.expect_set_local_description()
            .times(1)
            .returning(|description| Ok(description));

        let relay = SignalingRelay::new(Arc::new(peer));
        assert_eq!(
            relay.start_call().await,
            Some(SignalMessage::Offer {
                sdp: "local-offer".to_string()
            })
        );
    }

    #[tokio::test]
    async fn worker_relays_replies_and_closes_peer() {
        let mut peer = MockPeerConnectionPort::new();
        peer.expect_create_offer()
            .returning(|| Ok(SessionDescription::offer("local-offer")));
        peer.expect_set_local_description()
            .returning(|description| Ok(description));
        peer.expect_close().times(1).returning(|| ());

        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        let (replies_tx, mut replies_rx) = mpsc::unbounded_channel();
        let worker = SignalingRelay::new(Arc::new(peer)).spawn_worker(jobs_rx, replies_tx);

        jobs_tx.send(RelayJob::StartCall).expect("send job");
        jobs_tx.send(RelayJob::Close).expect("send job");
        worker.await.expect("worker");

        assert_eq!(
            replies_rx.recv().await,
            Some(SignalMessage::Offer {
                sdp: "local-offer".to_string()
            })
        );
    }
}
