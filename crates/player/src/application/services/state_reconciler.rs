//! State Reconciler - applies server messages to the local game view
//!
//! Snapshots replace everything, deltas patch one move in, terminal events adjust
//! status. The board is never validated here; the server is authoritative.
//!
//! Every push-delivered mutation bumps a local `revision`. Each REST fetch is stamped
//! with that revision and an issue sequence number. A polled snapshot is rejected if a
//! push landed since its fetch was issued, or if a later-issued fetch was already
//! applied, so a slow poll can never roll back newer state.

use std::time::Duration;

use tokio::time::Instant;

use rookline_domain::{BoardState, Color, GameStatus, MoveRecord, PendingRequests, PlayerId};
use rookline_shared::{BoardSnapshot, MoveDelta, ServerMessage};

use crate::application::dto::{GameView, SessionIdentity};

/// Issued with every board fetch; see [`StateReconciler::apply_polled_snapshot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchStamp {
    revision: u64,
    sequence: u64,
}

pub struct StateReconciler {
    player_id: PlayerId,
    color: Color,
    view: GameView,
    revision: u64,
    fetches_issued: u64,
    latest_fetch_applied: u64,
    advisory_ttl: Duration,
    advisory_expires: Option<Instant>,
}

impl StateReconciler {
    pub fn new(identity: &SessionIdentity, advisory_ttl: Duration) -> Self {
        Self {
            player_id: identity.player_id.clone(),
            color: identity.color,
            view: GameView::default(),
            revision: 0,
            fetches_issued: 0,
            latest_fetch_applied: 0,
            advisory_ttl,
            advisory_expires: None,
        }
    }

    pub fn view(&self) -> &GameView {
        &self.view
    }

    /// Monotonic count of applied push-delivered mutations
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Stamp a board fetch that is about to be sent.
    pub fn stamp_fetch(&mut self) -> FetchStamp {
        self.fetches_issued += 1;
        FetchStamp {
            revision: self.revision,
            sequence: self.fetches_issued,
        }
    }

    pub fn advisory_deadline(&self) -> Option<Instant> {
        self.advisory_expires
    }

    /// Apply one push-delivered message. Returns whether game state changed.
    ///
    /// `webrtc_signal` is not game state and is ignored here; the session routes it to
    /// the signaling relay before calling in.
    pub fn apply_message(&mut self, message: ServerMessage, now: Instant) -> bool {
        match message {
            ServerMessage::BoardState(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            ServerMessage::Move(delta) => {
                self.apply_delta(delta);
                true
            }
            ServerMessage::InvalidMove { reason } => {
                self.set_advisory(reason, now);
                false
            }
            ServerMessage::GameResigned { resigned_by } => {
                self.apply_resignation(&resigned_by);
                true
            }
            ServerMessage::RematchStarted { .. } => {
                self.apply_rematch();
                true
            }
            ServerMessage::UndoRequested { requested_by } => {
                let added = self.view.pending.request_undo(requested_by);
                self.bump_if(added)
            }
            ServerMessage::RematchRequested { requested_by } => {
                let added = self.view.pending.request_rematch(requested_by);
                self.bump_if(added)
            }
            ServerMessage::PlayerDisconnected { player_id } => {
                if player_id == self.player_id || self.view.opponent_disconnected {
                    return false;
                }
                tracing::info!(player = %player_id, "Opponent disconnected");
                self.view.opponent_disconnected = true;
                self.bump_if(true)
            }
            ServerMessage::WebrtcSignal { .. } => false,
            ServerMessage::Unknown => {
                tracing::debug!("Ignoring unknown server message");
                false
            }
        }
    }

    /// Apply a snapshot fetched over REST.
    ///
    /// Returns false, leaving state untouched, if a push mutation landed while the
    /// fetch was in flight or a fetch issued after this one has already been applied.
    /// Overlapping fetches issued at the same revision therefore resolve to the newest.
    pub fn apply_polled_snapshot(&mut self, snapshot: BoardSnapshot, stamp: FetchStamp) -> bool {
        if stamp.revision != self.revision || stamp.sequence <= self.latest_fetch_applied {
            tracing::debug!(
                ?stamp,
                revision = self.revision,
                latest_fetch_applied = self.latest_fetch_applied,
                "Discarding stale polled snapshot"
            );
            return false;
        }
        self.replace_with(snapshot);
        self.latest_fetch_applied = stamp.sequence;
        true
    }

    /// Apply a push-delivered snapshot: wholesale replace, fields absent from the
    /// snapshot reset to empty.
    pub fn apply_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.replace_with(snapshot);
        self.revision += 1;
    }

    fn replace_with(&mut self, snapshot: BoardSnapshot) {
        let winner = snapshot.winner.as_ref().map(|w| self.color_of(w));
        let view = &mut self.view;
        view.board = snapshot.board;
        view.turn = snapshot.current_turn;
        view.status = snapshot.game_status;
        view.white_name = snapshot.player1_name;
        view.black_name = snapshot.player2_name;
        view.winner = winner;
        view.pending =
            PendingRequests::from_lists(snapshot.undo_requests, snapshot.rematch_requests);
        view.opponent_disconnected = false;
    }

    fn apply_delta(&mut self, delta: MoveDelta) {
        self.view
            .board
            .apply_move(delta.from_square, delta.to_square, delta.piece);
        self.view.turn = delta.current_turn;
        self.view.history.push(MoveRecord {
            from: delta.from_square,
            to: delta.to_square,
            piece: delta.piece,
            acting_player: delta.player,
            move_type: delta.move_type.filter(|kind| !kind.is_empty()),
        });
        self.revision += 1;
    }

    fn apply_resignation(&mut self, resigned_by: &PlayerId) {
        self.view.status = GameStatus::Resigned;
        self.view.winner = Some(if resigned_by == &self.player_id {
            self.color.opposite()
        } else {
            self.color
        });
        self.revision += 1;
    }

    fn apply_rematch(&mut self) {
        let view = &mut self.view;
        view.board = BoardState::empty();
        view.turn = Color::White;
        view.status = GameStatus::Active;
        view.winner = None;
        view.history.clear();
        view.pending.clear();
        self.revision += 1;
    }

    /// The server reports winners by player id; we only know our own.
    fn color_of(&self, player: &PlayerId) -> Color {
        if player == &self.player_id {
            self.color
        } else {
            self.color.opposite()
        }
    }

    fn set_advisory(&mut self, reason: String, now: Instant) {
        let text = if reason.is_empty() {
            "Invalid move".to_string()
        } else {
            reason
        };
        tracing::info!(advisory = %text, "Move rejected by server");
        self.view.advisory = Some(text);
        self.advisory_expires = Some(now + self.advisory_ttl);
    }

    /// Clear the advisory if its time is up. Returns whether it was cleared.
    pub fn expire_advisory(&mut self, now: Instant) -> bool {
        match self.advisory_expires {
            Some(at) if at <= now => {
                self.advisory_expires = None;
                self.view.advisory = None;
                true
            }
            _ => false,
        }
    }

    fn bump_if(&mut self, changed: bool) -> bool {
        if changed {
            self.revision += 1;
        }
        changed
    }
}
