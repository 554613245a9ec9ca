//! Session Service - one joined room, one dispatch loop
//!
//! [`Session::start`] spawns a task that owns every piece of mutable sync state: the
//! connection supervisor, the fallback poller, the reconciler and the action gateway.
//! Network I/O runs in spawned tasks whose results come back to the loop as messages,
//! so nothing here needs a lock. Observers read the [`GameView`] and the connection state
//! through watch channels.

use std::future::pending;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use rookline_domain::Square;
use rookline_shared::{BoardSnapshot, ClientMessage, GameAction, ServerMessage, SignalMessage};

use crate::application::dto::{GameView, SessionIdentity};
use crate::application::error::{ActionError, SessionError, TransportError};
use crate::application::services::action_gateway::ActionGateway;
use crate::application::services::connection_supervisor::{
    ChannelOutcome, ConnectionSupervisor, OutboundSink,
};
use crate::application::services::fallback_poller::{FallbackPoller, PollDecision};
use crate::application::services::signaling_relay::{RelayJob, SignalingRelay};
use crate::application::services::state_reconciler::{FetchStamp, StateReconciler};
use crate::infrastructure::config::{BackendConfig, SyncSettings};
use crate::infrastructure::messaging::{ConnectionStateObserver, ConnectionStatePublisher};
use crate::infrastructure::websocket::parse_server_message;
use crate::ports::outbound::{
    ApiError, ChannelEvent, PeerConnectionPort, PushTransport, RoomApiPort,
};

/// Collaborators a session is built from
#[derive(Clone)]
pub struct SessionDeps {
    pub api: Arc<dyn RoomApiPort>,
    pub transport: Arc<dyn PushTransport>,
    pub peer: Arc<dyn PeerConnectionPort>,
    pub backend: BackendConfig,
    pub settings: SyncSettings,
}

enum SessionCommand {
    Move {
        from: Square,
        to: Square,
        reply: oneshot::Sender<Result<(), ActionError>>,
    },
    Action {
        action: GameAction,
        reply: oneshot::Sender<Result<(), TransportError>>,
    },
    StartCall,
    Leave,
}

struct BoardFetch {
    stamp: FetchStamp,
    reason: &'static str,
    result: Result<BoardSnapshot, ApiError>,
}

/// Handle to a running session.
///
/// Dropping the handle also ends the session; [`Session::leave`] additionally waits
/// for the loop to finish tearing down.
pub struct Session {
    identity: SessionIdentity,
    commands: mpsc::UnboundedSender<SessionCommand>,
    view: watch::Receiver<GameView>,
    connection: ConnectionStateObserver,
    task: Option<JoinHandle<()>>,
}

impl Session {
    /// Spawn the dispatch loop. Opens the push channel and fetches the board at once.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(identity: SessionIdentity, deps: SessionDeps) -> Result<Self, SessionError> {
        let channel_url = deps
            .backend
            .channel_url(&identity.room_id, &identity.player_id)?;

        let (channel_tx, channel_rx) = mpsc::unbounded_channel();
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (relay_tx, relay_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(GameView::default());
        let (connection, observer) = ConnectionStatePublisher::channel();

        SignalingRelay::new(deps.peer).spawn_worker(relay_rx, signal_tx);

        let runtime = SessionRuntime {
            supervisor: ConnectionSupervisor::new(
                deps.transport,
                channel_tx,
                channel_url,
                deps.settings.clone(),
            ),
            poller: FallbackPoller::new(),
            reconciler: StateReconciler::new(&identity, deps.settings.advisory_ttl),
            gateway: ActionGateway::new(identity.color),
            identity: identity.clone(),
            api: deps.api,
            playing: true,
            relay: relay_tx,
            fetches: fetch_tx,
            view: view_tx,
            connection,
        };
        let inbox = Inbox {
            channel: channel_rx,
            fetches: fetch_rx,
            signals: signal_rx,
            commands: commands_rx,
        };

        tracing::info!(
            room = %identity.room_id,
            player = %identity.player_id,
            color = %identity.color,
            "Starting session"
        );
        let task = tokio::spawn(runtime.run(inbox));

        Ok(Self {
            identity,
            commands: commands_tx,
            view: view_rx,
            connection: observer,
            task: Some(task),
        })
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    /// Current game view
    pub fn view(&self) -> GameView {
        self.view.borrow().clone()
    }

    /// Receiver that is notified whenever the game view changes
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.view.clone()
    }

    pub fn connection(&self) -> ConnectionStateObserver {
        self.connection.clone()
    }

    fn command(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Ended)
    }

    /// Validate locally and send a move intent.
    pub async fn move_piece(&self, from: Square, to: Square) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.command(SessionCommand::Move { from, to, reply })?;
        rx.await.map_err(|_| SessionError::Ended)??;
        Ok(())
    }

    async fn game_action(&self, action: GameAction) -> Result<(), SessionError> {
        let (reply, rx) = oneshot::channel();
        self.command(SessionCommand::Action { action, reply })?;
        rx.await.map_err(|_| SessionError::Ended)??;
        Ok(())
    }

    pub async fn resign(&self) -> Result<(), SessionError> {
        self.game_action(GameAction::Resign).await
    }

    pub async fn request_undo(&self) -> Result<(), SessionError> {
        self.game_action(GameAction::UndoRequest).await
    }

    pub async fn request_rematch(&self) -> Result<(), SessionError> {
        self.game_action(GameAction::RematchRequest).await
    }

    /// Offer a voice call to the other player
    pub fn start_call(&self) -> Result<(), SessionError> {
        self.command(SessionCommand::StartCall)
    }

    /// Leave the room: cancel timers, close the channel and the peer connection.
    pub async fn leave(mut self) {
        let _ = self.commands.send(SessionCommand::Leave);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Session task failed: {}", e);
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let _ = self.commands.send(SessionCommand::Leave);
    }
}

struct Inbox {
    channel: mpsc::UnboundedReceiver<ChannelEvent>,
    fetches: mpsc::UnboundedReceiver<BoardFetch>,
    signals: mpsc::UnboundedReceiver<SignalMessage>,
    commands: mpsc::UnboundedReceiver<SessionCommand>,
}

struct SessionRuntime {
    identity: SessionIdentity,
    api: Arc<dyn RoomApiPort>,
    playing: bool,
    supervisor: ConnectionSupervisor,
    poller: FallbackPoller,
    reconciler: StateReconciler,
    gateway: ActionGateway,
    relay: mpsc::UnboundedSender<RelayJob>,
    fetches: mpsc::UnboundedSender<BoardFetch>,
    view: watch::Sender<GameView>,
    connection: ConnectionStatePublisher,
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

impl SessionRuntime {
    async fn run(mut self, mut inbox: Inbox) {
        self.supervisor.establish();
        self.fetch_board("initial sync");

        loop {
            let reconnect_at = self.supervisor.reconnect_deadline();
            let poll_at = self.poller.next_tick();
            let advisory_at = self.reconciler.advisory_deadline();

            tokio::select! {
                Some(event) = inbox.channel.recv() => self.on_channel_event(event),
                Some(fetch) = inbox.fetches.recv() => self.on_board_fetched(fetch),
                Some(signal) = inbox.signals.recv() => self.send_signal(signal),
                command = inbox.commands.recv() => match command {
                    Some(SessionCommand::Leave) | None => break,
                    Some(command) => self.on_command(command),
                },
                _ = sleep_until_opt(reconnect_at) => self.supervisor.reconnect_due(self.playing),
                _ = sleep_until_opt(poll_at) => self.on_poll_tick(),
                _ = sleep_until_opt(advisory_at) => {
                    self.reconciler.expire_advisory(Instant::now());
                }
            }

            self.publish();
        }

        self.shutdown();
    }

    fn on_channel_event(&mut self, event: ChannelEvent) {
        let now = Instant::now();
        match self.supervisor.handle_event(event, now, self.playing) {
            ChannelOutcome::Ignored | ChannelOutcome::Closed => {}
            ChannelOutcome::Opened => {
                self.poller.stop();
            }
            ChannelOutcome::Inbound(text) => self.on_frame(&text, now),
            ChannelOutcome::Failed { poll_interval } => {
                if self.playing {
                    self.poller.start(poll_interval, now);
                }
            }
        }
    }

    fn on_frame(&mut self, text: &str, now: Instant) {
        let message = match parse_server_message(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!("Failed to parse server message: {}", e);
                return;
            }
        };
        tracing::debug!(kind = message.kind(), "Server message");

        match message {
            ServerMessage::WebrtcSignal { signal, from_player } => {
                tracing::debug!(from = ?from_player, "Relaying signal");
                let _ = self.relay.send(RelayJob::Inbound(signal));
            }
            rematch @ ServerMessage::RematchStarted { .. } => {
                self.reconciler.apply_message(rematch, now);
                self.fetch_board("rematch resync");
            }
            other => {
                self.reconciler.apply_message(other, now);
            }
        }
    }

    fn on_board_fetched(&mut self, fetch: BoardFetch) {
        let BoardFetch {
            stamp,
            reason,
            result,
        } = fetch;
        match result {
            Ok(snapshot) => {
                if self.reconciler.apply_polled_snapshot(snapshot, stamp) {
                    tracing::debug!(reason, "Applied fetched board");
                }
            }
            Err(e) => tracing::warn!(reason, "Board fetch failed: {}", e),
        }
    }

    fn on_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Move { from, to, reply } => {
                let result =
                    self.gateway
                        .move_piece(self.reconciler.view(), from, to, &mut self.supervisor);
                let _ = reply.send(result);
            }
            SessionCommand::Action { action, reply } => {
                let _ = reply.send(self.gateway.game_action(action, &mut self.supervisor));
            }
            SessionCommand::StartCall => {
                let _ = self.relay.send(RelayJob::StartCall);
            }
            SessionCommand::Leave => {}
        }
    }

    fn on_poll_tick(&mut self) {
        let state = self.supervisor.state();
        if self.poller.on_tick(Instant::now(), self.playing, state) == PollDecision::Fetch {
            self.fetch_board("fallback poll");
        }
    }

    fn send_signal(&mut self, signal: SignalMessage) {
        let _ = self.supervisor.send(&ClientMessage::WebrtcSignal { signal });
    }

    /// Fetch the full board off-loop; the result re-enters as a [`BoardFetch`].
    fn fetch_board(&mut self, reason: &'static str) {
        let stamp = self.reconciler.stamp_fetch();
        let api = Arc::clone(&self.api);
        let room_id = self.identity.room_id.clone();
        let results = self.fetches.clone();
        tracing::debug!(reason, ?stamp, "Fetching board");
        tokio::spawn(async move {
            let result = api.fetch_board(&room_id).await;
            let _ = results.send(BoardFetch {
                stamp,
                reason,
                result,
            });
        });
    }

    fn publish(&self) {
        let view = self.reconciler.view();
        self.view.send_if_modified(|current| {
            if *current == *view {
                false
            } else {
                *current = view.clone();
                true
            }
        });
        self.connection.set(self.supervisor.state());
    }

    fn shutdown(&mut self) {
        tracing::info!(room = %self.identity.room_id, "Leaving session");
        self.playing = false;
        self.supervisor.shutdown();
        self.poller.stop();
        let _ = self.relay.send(RelayJob::Close);
        self.publish();
    }
}
