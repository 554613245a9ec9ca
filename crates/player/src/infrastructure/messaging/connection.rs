//! Connection state observation.
//!
//! The session's dispatch loop is the only writer; UIs and tests hold cheap
//! [`ConnectionStateObserver`] clones and can await changes.

use std::fmt;

use tokio::sync::watch;

/// Connection state of the push channel as seen by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No channel, or the channel closed
    #[default]
    Disconnected,
    /// Channel open
    Connected,
    /// The channel errored or could not be opened
    Error,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Write side, owned by the dispatch loop.
#[derive(Debug)]
pub struct ConnectionStatePublisher {
    tx: watch::Sender<ConnectionState>,
}

impl ConnectionStatePublisher {
    pub fn channel() -> (Self, ConnectionStateObserver) {
        let (tx, rx) = watch::channel(ConnectionState::Disconnected);
        (Self { tx }, ConnectionStateObserver { rx })
    }

    /// Publish `state`; observers are only woken when it differs from the last value.
    pub fn set(&self, state: ConnectionState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}

/// Observable connection state for UI binding.
#[derive(Debug, Clone)]
pub struct ConnectionStateObserver {
    rx: watch::Receiver<ConnectionState>,
}

impl ConnectionStateObserver {
    /// Get the current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.rx.borrow()
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Wait for the next published change. Returns `None` once the session is gone.
    pub async fn changed(&mut self) -> Option<ConnectionState> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
