//! Push Transport Port - opens the per-room push channel
//!
//! A transport never decides anything: it reports what happened to one opened
//! connection as [`ChannelEvent`]s tagged with the [`ConnectionId`] it was opened
//! with. Events from a superseded connection are discarded by the supervisor.

use std::fmt;

use tokio::sync::mpsc;
use url::Url;

/// Identity of one `open` call; strictly increasing per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outbound half of an open channel.
///
/// Cloneable; sending after the channel closed is reported as `false`.
#[derive(Debug, Clone)]
pub struct ChannelWriter {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelWriter {
    pub fn new(tx: mpsc::UnboundedSender<String>) -> Self {
        Self { tx }
    }

    /// Writer plus the receiving end a transport drains into its socket
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn send_text(&self, text: String) -> bool {
        self.tx.send(text).is_ok()
    }
}

#[derive(Debug)]
pub enum ChannelEventKind {
    /// Handshake completed; the writer accepts outbound text frames
    Opened(ChannelWriter),
    /// One inbound text frame
    Message(String),
    /// Read or protocol error; a `Closed` follows
    Errored(String),
    /// The channel is gone (server close, network drop, or local shutdown)
    Closed,
    /// The connection could not be established at all
    OpenFailed(String),
}

#[derive(Debug)]
pub struct ChannelEvent {
    pub connection: ConnectionId,
    pub kind: ChannelEventKind,
}

impl ChannelEvent {
    pub fn new(connection: ConnectionId, kind: ChannelEventKind) -> Self {
        Self { connection, kind }
    }
}

pub type ChannelEventSender = mpsc::UnboundedSender<ChannelEvent>;

/// Opens push channels. Implementations must return immediately and report
/// progress through `events`.
pub trait PushTransport: Send + Sync {
    fn open(&self, url: &Url, connection: ConnectionId, events: ChannelEventSender);
}
