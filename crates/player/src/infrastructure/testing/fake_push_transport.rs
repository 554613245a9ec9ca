//! In-memory push transport.
//!
//! Records every `open` call and lets tests play the server: accept or refuse the
//! connection, push frames, error or close it, and read back what the client sent.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;
use url::Url;

use crate::ports::outbound::{
    ChannelEvent, ChannelEventKind, ChannelEventSender, ChannelWriter, ConnectionId, PushTransport,
};

struct OpenedChannel {
    connection: ConnectionId,
    url: Url,
    events: ChannelEventSender,
    outbound: Option<mpsc::UnboundedReceiver<String>>,
}

#[derive(Default)]
struct State {
    opened: Vec<OpenedChannel>,
    sent: Vec<serde_json::Value>,
}

#[derive(Clone, Default)]
pub struct FakePushTransport {
    state: Arc<Mutex<State>>,
}

impl FakePushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake transport state poisoned")
    }

    /// Number of `open` calls so far
    pub fn open_count(&self) -> usize {
        self.lock().opened.len()
    }

    pub fn last_url(&self) -> Option<Url> {
        self.lock().opened.last().map(|c| c.url.clone())
    }

    pub fn latest_connection(&self) -> Option<ConnectionId> {
        self.lock().opened.last().map(|c| c.connection)
    }

    /// Emit an event as if it came from `connection`, stale or not
    pub fn emit(&self, connection: ConnectionId, kind: ChannelEventKind) {
        let state = self.lock();
        if let Some(channel) = state.opened.iter().find(|c| c.connection == connection) {
            let _ = channel.events.send(ChannelEvent::new(connection, kind));
        }
    }

    fn emit_latest(&self, kind: ChannelEventKind) {
        if let Some(connection) = self.latest_connection() {
            self.emit(connection, kind);
        }
    }

    /// Complete the handshake of the most recent connection
    pub fn accept_latest(&self) {
        let (writer, outbound) = ChannelWriter::channel();
        {
            let mut state = self.lock();
            if let Some(channel) = state.opened.last_mut() {
                channel.outbound = Some(outbound);
            }
        }
        self.emit_latest(ChannelEventKind::Opened(writer));
    }

    pub fn refuse_latest(&self, reason: &str) {
        self.emit_latest(ChannelEventKind::OpenFailed(reason.to_string()));
    }

    /// Push one JSON frame on the most recent connection
    pub fn push_latest(&self, frame: serde_json::Value) {
        self.emit_latest(ChannelEventKind::Message(frame.to_string()));
    }

    pub fn push_raw_latest(&self, text: &str) {
        self.emit_latest(ChannelEventKind::Message(text.to_string()));
    }

    /// Error followed by close, the way a dropped socket reports
    pub fn break_latest(&self, reason: &str) {
        self.emit_latest(ChannelEventKind::Errored(reason.to_string()));
        self.emit_latest(ChannelEventKind::Closed);
    }

    pub fn close_latest(&self) {
        self.emit_latest(ChannelEventKind::Closed);
    }

    /// Every frame the client wrote so far, across all connections
    pub fn sent_frames(&self) -> Vec<serde_json::Value> {
        let mut state = self.lock();
        drain_outbound(&mut state);
        state.sent.clone()
    }

    /// Whether the client dropped its writer for the most recent connection
    pub fn latest_writer_dropped(&self) -> bool {
        let mut state = self.lock();
        drain_outbound(&mut state);
        match state.opened.last_mut().and_then(|c| c.outbound.as_mut()) {
            Some(outbound) => matches!(
                outbound.try_recv(),
                Err(mpsc::error::TryRecvError::Disconnected)
            ),
            None => false,
        }
    }
}

fn drain_outbound(state: &mut State) {
    let State { opened, sent } = state;
    for channel in opened.iter_mut() {
        let Some(outbound) = channel.outbound.as_mut() else {
            continue;
        };
        while let Ok(text) = outbound.try_recv() {
            sent.push(
                serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)),
            );
        }
    }
}

impl PushTransport for FakePushTransport {
    fn open(&self, url: &Url, connection: ConnectionId, events: ChannelEventSender) {
        self.lock().opened.push(OpenedChannel {
            connection,
            url: url.clone(),
            events,
            outbound: None,
        });
    }
}
