//! Connection Supervisor - owns the push channel for one session
//!
//! The supervisor is plain state driven by the session loop: it opens channels through
//! the [`PushTransport`], classifies their events, and keeps the reconnect deadline.
//! It never sleeps itself; the loop waits on [`ConnectionSupervisor::reconnect_deadline`]
//! and calls back into [`ConnectionSupervisor::reconnect_due`].

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use url::Url;

use rookline_shared::ClientMessage;

use crate::application::error::TransportError;
use crate::infrastructure::config::SyncSettings;
use crate::infrastructure::messaging::ConnectionState;
use crate::infrastructure::websocket::encode_client_message;
use crate::ports::outbound::{
    ChannelEvent, ChannelEventKind, ChannelEventSender, ChannelWriter, ConnectionId, PushTransport,
};

/// Lifecycle of the current channel.
///
/// ```text
/// Connecting --Opened--> Open --Errored--> Error --Closed--> Closed
///     |                   |                                   ^
///     +--OpenFailed--> Error                 Open --Closed----+
/// ```
/// Any phase returns to `Connecting` when a new channel is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    Connecting,
    Open,
    Closed,
    Error,
}

/// What the session loop must do after a channel event.
#[derive(Debug, PartialEq, Eq)]
pub enum ChannelOutcome {
    /// Event from a superseded connection
    Ignored,
    /// Channel is up; fallback polling can stop
    Opened,
    /// One inbound frame to decode and dispatch
    Inbound(String),
    /// Channel failed; poll at this interval until it is back
    Failed { poll_interval: Duration },
    Closed,
}

/// Anything outbound messages can be written to.
pub trait OutboundSink {
    fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError>;
}

pub struct ConnectionSupervisor {
    transport: Arc<dyn PushTransport>,
    events: ChannelEventSender,
    channel_url: Url,
    settings: SyncSettings,
    phase: ChannelPhase,
    current: ConnectionId,
    writer: Option<ChannelWriter>,
    reconnect_at: Option<Instant>,
    reconnect_attempts: u32,
}

impl ConnectionSupervisor {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        events: ChannelEventSender,
        channel_url: Url,
        settings: SyncSettings,
    ) -> Self {
        Self {
            transport,
            events,
            channel_url,
            settings,
            phase: ChannelPhase::Closed,
            current: ConnectionId::default(),
            writer: None,
            reconnect_at: None,
            reconnect_attempts: 0,
        }
    }

    pub fn phase(&self) -> ChannelPhase {
        self.phase
    }

    /// Observable state derived from the phase
    pub fn state(&self) -> ConnectionState {
        match self.phase {
            ChannelPhase::Open => ConnectionState::Connected,
            ChannelPhase::Error => ConnectionState::Error,
            ChannelPhase::Connecting | ChannelPhase::Closed => ConnectionState::Disconnected,
        }
    }

    pub fn reconnect_deadline(&self) -> Option<Instant> {
        self.reconnect_at
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    /// Open a fresh channel, superseding any previous one.
    pub fn establish(&mut self) {
        self.current = self.current.next();
        self.phase = ChannelPhase::Connecting;
        self.writer = None;
        tracing::info!(connection = %self.current, url = %self.channel_url, "Opening push channel");
        self.transport
            .open(&self.channel_url, self.current, self.events.clone());
    }

    /// Classify one transport event and update the phase.
    ///
    /// `playing` gates reconnect scheduling; a session that is leaving never reconnects.
    pub fn handle_event(
        &mut self,
        event: ChannelEvent,
        now: Instant,
        playing: bool,
    ) -> ChannelOutcome {
        if event.connection != self.current {
            tracing::debug!(
                connection = %event.connection,
                current = %self.current,
                "Ignoring event from superseded channel"
            );
            return ChannelOutcome::Ignored;
        }

        match event.kind {
            ChannelEventKind::Opened(writer) => {
                tracing::info!(connection = %self.current, "Push channel open");
                self.phase = ChannelPhase::Open;
                self.writer = Some(writer);
                self.reconnect_attempts = 0;
                ChannelOutcome::Opened
            }
            ChannelEventKind::Message(text) => ChannelOutcome::Inbound(text),
            ChannelEventKind::Errored(reason) => {
                tracing::warn!(connection = %self.current, %reason, "Push channel error");
                self.phase = ChannelPhase::Error;
                self.writer = None;
                ChannelOutcome::Failed {
                    poll_interval: self.settings.poll_interval_after_error,
                }
            }
            ChannelEventKind::OpenFailed(reason) => {
                tracing::warn!(connection = %self.current, %reason, "Push channel failed to open");
                self.phase = ChannelPhase::Error;
                self.writer = None;
                self.schedule_reconnect(now, playing);
                ChannelOutcome::Failed {
                    poll_interval: self.settings.poll_interval_after_open_failure,
                }
            }
            ChannelEventKind::Closed => {
                tracing::info!(connection = %self.current, "Push channel closed");
                self.phase = ChannelPhase::Closed;
                self.writer = None;
                self.schedule_reconnect(now, playing);
                ChannelOutcome::Closed
            }
        }
    }

    /// Replaces any pending deadline, so at most one reconnect is ever outstanding.
    fn schedule_reconnect(&mut self, now: Instant, playing: bool) {
        if !playing {
            self.reconnect_at = None;
            return;
        }
        if let Some(max) = self.settings.max_reconnect_attempts {
            if self.reconnect_attempts >= max {
                tracing::error!(
                    attempts = self.reconnect_attempts,
                    "Max reconnection attempts reached, giving up"
                );
                self.reconnect_at = None;
                return;
            }
        }
        let at = now + self.settings.reconnect_delay;
        tracing::info!(
            delay_ms = self.settings.reconnect_delay.as_millis() as u64,
            attempt = self.reconnect_attempts + 1,
            "Scheduling reconnect"
        );
        self.reconnect_at = Some(at);
    }

    /// The reconnect deadline elapsed. Opens a new channel if still playing.
    pub fn reconnect_due(&mut self, playing: bool) {
        if self.reconnect_at.take().is_none() {
            return;
        }
        if !playing {
            tracing::debug!("Reconnect cancelled, session no longer playing");
            return;
        }
        self.reconnect_attempts += 1;
        self.establish();
    }

    /// Cancel any reconnect and drop the channel. Late events are ignored.
    pub fn shutdown(&mut self) {
        self.reconnect_at = None;
        self.writer = None;
        self.phase = ChannelPhase::Closed;
        self.current = self.current.next();
    }
}

impl OutboundSink for ConnectionSupervisor {
    /// Best-effort write: dropped and logged unless the channel is open.
    fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
        let writer = match (&self.writer, self.phase) {
            (Some(writer), ChannelPhase::Open) => writer,
            _ => {
                tracing::warn!(phase = ?self.phase, "Dropping outbound message, channel not open");
                return Err(TransportError::NotOpen);
            }
        };

        let text = encode_client_message(message).map_err(|e| {
            tracing::error!("Failed to serialize WebSocket message: {}", e);
            TransportError::Encode(e.to_string())
        })?;

        if writer.send_text(text) {
            Ok(())
        } else {
            tracing::warn!(connection = %self.current, "Dropping outbound message, writer closed");
            Err(TransportError::NotOpen)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{black_player, room_id};
    use crate::infrastructure::testing::FakePushTransport;
    use crate::infrastructure::BackendConfig;
    use rookline_shared::GameAction;
    use tokio::sync::mpsc;

    struct Harness {
        transport: FakePushTransport,
        supervisor: ConnectionSupervisor,
        events: mpsc::UnboundedReceiver<ChannelEvent>,
    }

    impl Harness {
        fn new(settings: SyncSettings) -> Self {
            let transport = FakePushTransport::new();
            let (tx, events) = mpsc::unbounded_channel();
            let url = BackendConfig::new("http://localhost:8001")
                .expect("config")
                .channel_url(&room_id(), &black_player())
                .expect("url");
            let supervisor =
                ConnectionSupervisor::new(Arc::new(transport.clone()), tx, url, settings);
            Self {
                transport,
                supervisor,
                events,
            }
        }

        fn pump(&mut self, now: Instant, playing: bool) -> Vec<ChannelOutcome> {
            let mut outcomes = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                outcomes.push(self.supervisor.handle_event(event, now, playing));
            }
            outcomes
        }
    }

    fn resign() -> ClientMessage {
        ClientMessage::GameAction {
            action: GameAction::Resign,
        }
    }

    #[test]
    fn establish_opens_player_channel() {
        let mut h = Harness::new(SyncSettings::default());
        h.supervisor.establish();

        assert_eq!(h.transport.open_count(), 1);
        assert_eq!(
            h.transport.last_url().expect("url").as_str(),
            "ws://localhost:8001/api/ws/1a2b3c4d/player-black"
        );
        assert_eq!(h.supervisor.phase(), ChannelPhase::Connecting);
        assert_eq!(h.supervisor.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn send_before_open_is_dropped() {
        let mut h = Harness::new(SyncSettings::default());
        h.supervisor.establish();

        assert_eq!(h.supervisor.send(&resign()), Err(TransportError::NotOpen));
        h.transport.accept_latest();
        h.pump(Instant::now(), true);

        assert_eq!(h.supervisor.send(&resign()), Ok(()));
        assert_eq!(h.transport.sent_frames().len(), 1);
    }

    #[test]
    fn close_while_playing_schedules_one_reconnect() {
        let mut h = Harness::new(SyncSettings::default());
        let now = Instant::now();
        h.supervisor.establish();
        h.transport.accept_latest();
        h.transport.break_latest("reset by peer");

        let outcomes = h.pump(now, true);
        assert_eq!(
            outcomes,
            vec![
                ChannelOutcome::Opened,
                ChannelOutcome::Failed {
                    poll_interval: Duration::from_secs(2)
                },
                ChannelOutcome::Closed,
            ]
        );
        assert_eq!(
            h.supervisor.reconnect_deadline(),
            Some(now + Duration::from_secs(5))
        );
        assert_eq!(h.supervisor.state(), ConnectionState::Disconnected);

        h.supervisor.reconnect_due(true);
        assert_eq!(h.transport.open_count(), 2);
        assert_eq!(h.supervisor.reconnect_deadline(), None);

        // Only one deadline was outstanding
        h.supervisor.reconnect_due(true);
        assert_eq!(h.transport.open_count(), 2);
    }

    #[test]
    fn close_after_leaving_does_not_reconnect() {
        let mut h = Harness::new(SyncSettings::default());
        h.supervisor.establish();
        h.transport.close_latest();
        h.pump(Instant::now(), false);

        assert_eq!(h.supervisor.reconnect_deadline(), None);
    }

    #[test]
    fn failed_open_reports_error_and_schedules_reconnect() {
        let mut h = Harness::new(SyncSettings::default());
        h.supervisor.establish();
        h.transport.refuse_latest("connection refused");

        assert_eq!(
            h.pump(Instant::now(), true),
            vec![ChannelOutcome::Failed {
                poll_interval: Duration::from_secs(3)
            }]
        );
        assert_eq!(h.supervisor.state(), ConnectionState::Error);
        assert!(h.supervisor.reconnect_deadline().is_some());
    }

    #[test]
    fn events_from_superseded_channels_are_ignored() {
        let mut h = Harness::new(SyncSettings::default());
        h.supervisor.establish();
        let first = h.transport.latest_connection().expect("first connection");
        h.supervisor.establish();

        h.transport.emit(first, ChannelEventKind::Closed);
        assert_eq!(h.pump(Instant::now(), true), vec![ChannelOutcome::Ignored]);
        assert_eq!(h.supervisor.reconnect_deadline(), None);
        assert_eq!(h.supervisor.phase(), ChannelPhase::Connecting);
    }

    #[test]
    fn bounded_policy_stops_after_max_attempts() {
        let mut h = Harness::new(SyncSettings {
            max_reconnect_attempts: Some(1),
            ..SyncSettings::default()
        });
        h.supervisor.establish();
        h.transport.refuse_latest("refused");
        h.pump(Instant::now(), true);
        h.supervisor.reconnect_due(true);
        assert_eq!(h.supervisor.reconnect_attempts(), 1);

        h.transport.refuse_latest("refused again");
        h.pump(Instant::now(), true);
        assert_eq!(h.supervisor.reconnect_deadline(), None);
    }

    #[test]
    fn shutdown_cancels_reconnect_and_drops_writer() {
        let mut h = Harness::new(SyncSettings::default());
        h.supervisor.establish();
        h.transport.accept_latest();
        h.pump(Instant::now(), true);

        h.supervisor.shutdown();

        assert!(h.transport.latest_writer_dropped());
        assert_eq!(h.supervisor.reconnect_deadline(), None);
        h.transport.close_latest();
        assert_eq!(h.pump(Instant::now(), false), vec![ChannelOutcome::Ignored]);
    }
}
